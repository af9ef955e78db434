// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::constants::annotations;
use crate::error::{Result, SyncerError};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Ensure a namespace exists in the cluster, create it with a provenance annotation if it doesn't
#[instrument(skip(client))]
pub async fn ensure_namespace_exists(client: &Client, cluster: &str, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get(namespace).await {
        Ok(_) => {
            debug!("Namespace {} already exists", namespace);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            info!("Creating namespace {}", namespace);
            namespaces
                .create(&PostParams::default(), &requested_namespace(namespace))
                .await
                .map_err(|e| {
                    SyncerError::NamespaceError(format!(
                        "Failed to create namespace {} on cluster {}: {}",
                        namespace, cluster, e
                    ))
                })?;
            info!("Namespace {} created successfully", namespace);
            Ok(())
        }
        Err(e) => Err(SyncerError::NamespaceError(format!(
            "Failed to check namespace {} on cluster {}: {}",
            namespace, cluster, e
        ))),
    }
}

fn requested_namespace(namespace: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            annotations: Some(BTreeMap::from([(
                annotations::REQUESTER.to_string(),
                annotations::REQUESTER_VALUE.to_string(),
            )])),
            ..Default::default()
        },
        ..Default::default()
    }
}
