// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ImageStream reconciler - watches image streams on one cluster and syncs their tags.

use crate::error::{Result, SyncerError};
use crate::sync::finalizers::{has_finalizer, is_terminating};
use crate::sync::{ObjectFilter, RegistrySyncer};
use crate::types::ImageStream;
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub struct ImageStreamReconciler {
    cluster: String,
    client: Client,
    syncer: Arc<RegistrySyncer>,
    filter: Arc<ObjectFilter>,
    requeue_interval: Duration,
}

impl ImageStreamReconciler {
    pub fn new(
        cluster: String,
        client: Client,
        syncer: Arc<RegistrySyncer>,
        filter: Arc<ObjectFilter>,
        requeue_interval: Duration,
    ) -> Self {
        Self {
            cluster,
            client,
            syncer,
            filter,
            requeue_interval,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let image_streams: Api<ImageStream> = Api::all(self.client.clone());
        let cluster = self.cluster.clone();
        let context = Arc::new(self);

        Controller::new(image_streams, WatcherConfig::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| {
                let cluster = cluster.clone();
                async move {
                    match res {
                        Ok(o) => debug!("Reconciled imageStream on {}: {:?}", cluster, o),
                        Err(e) => warn!("Reconciliation error on {}: {:?}", cluster, e),
                    }
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(
    image_stream: Arc<ImageStream>,
    ctx: Arc<ImageStreamReconciler>,
) -> Result<Action> {
    let name = image_stream.name_any();
    let namespace = image_stream.namespace().unwrap_or_default();

    debug!("Reconciling imageStream {}/{} on {}", namespace, name, ctx.cluster);

    if is_terminating(&*image_stream) {
        if has_finalizer(&*image_stream) {
            ctx.syncer
                .propagate_deletion(&ctx.cluster, &image_stream)
                .await?;
        }
        return Ok(Action::await_change());
    }

    // tags are independent, a failing one must not hold back its siblings
    let mut errors = Vec::new();
    for tag in tag_names(&image_stream) {
        let tag_name = format!("{}:{}", name, tag);
        if !ctx.filter.should_sync(&namespace, &tag_name) {
            debug!("{}/{} is not configured for syncing, skipping", namespace, tag_name);
            continue;
        }
        if let Err(e) = ctx.syncer.reconcile(&namespace, &tag_name).await {
            warn!("Failed to sync {}/{}: {}", namespace, tag_name, e);
            errors.push(e);
        }
    }
    SyncerError::collect(errors)?;

    Ok(Action::await_change())
}

/// Tags of an image stream, as reported in its status or declared in its spec
fn tag_names(image_stream: &ImageStream) -> Vec<String> {
    let from_status: Vec<String> = image_stream
        .status
        .as_ref()
        .map(|s| s.tags.iter().map(|t| t.tag.clone()).collect())
        .unwrap_or_default();

    if !from_status.is_empty() {
        return from_status;
    }

    image_stream
        .spec
        .tags
        .iter()
        .map(|t| t.name.clone())
        .collect()
}

fn error_policy(
    _image_stream: Arc<ImageStream>,
    error: &SyncerError,
    ctx: Arc<ImageStreamReconciler>,
) -> Action {
    error!("Reconciliation error on {}: {}", ctx.cluster, error);
    Action::requeue(ctx.requeue_interval)
}
