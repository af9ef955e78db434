// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Keeps an image stream tag identical on every cluster.
//!
//! One pass reads the tag from every cluster, picks the cluster with the newest image
//! as the source and imports that image on every cluster that holds a different one.
//! Every write is create-if-absent or patch-if-different, so a failed pass can simply
//! be retried.

use crate::error::{Result, SyncerError};
use crate::kubernetes::{ensure_namespace_exists, is_not_found};
use crate::registry::{docker_image_imported_from_targeting_cluster, public_domain_for_image};
use crate::sync::finalizers::{
    ensure_finalizer, ensure_remove_finalizer, has_finalizer, is_terminating,
};
use crate::sync::image_streams::ensure_image_stream;
use crate::sync::import::import_image;
use crate::sync::pull_secret::ensure_pull_secret;
use crate::sync::selector::{find_newest, same_image};
use crate::types::{parse_tag_name, ImageStream, ImageStreamTag};
use kube::{api::DeleteParams, Api, Client, ResourceExt};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

pub struct RegistrySyncer {
    clients: BTreeMap<String, Client>,
    pull_secret: Vec<u8>,
}

impl RegistrySyncer {
    pub fn new(clients: BTreeMap<String, Client>, pull_secret: Vec<u8>) -> Self {
        Self {
            clients,
            pull_secret,
        }
    }

    /// Sync the image stream tag `namespace/name` across all clusters
    #[instrument(skip(self))]
    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<()> {
        let (stream_name, tag) = parse_tag_name(name)
            .ok_or_else(|| SyncerError::InvalidTagName(format!("{}/{}", namespace, name)))?;

        debug!("Starting reconciliation");

        let observations = self.observe(namespace, name).await?;
        let Some(source_cluster) = find_newest(&observations) else {
            info!("imageStreamTag does not exist on any cluster");
            return Ok(());
        };
        let source_tag = &observations[source_cluster];
        let source_client = &self.clients[source_cluster];

        let image_streams: Api<ImageStream> = Api::namespaced(source_client.clone(), namespace);
        let source_stream = image_streams.get(stream_name).await.map_err(|source| {
            SyncerError::GetImageStream {
                name: format!("{}/{}", namespace, stream_name),
                cluster: source_cluster.to_string(),
                source,
            }
        })?;

        if is_terminating(&source_stream) {
            if !has_finalizer(&source_stream) {
                debug!("Source imageStream is being deleted and is not managed, skipping");
                return Ok(());
            }
            return self.propagate_deletion(source_cluster, &source_stream).await;
        }
        ensure_finalizer(source_client, source_cluster, &source_stream).await?;

        let mut errors = Vec::new();
        for (cluster, client) in &self.clients {
            if cluster == source_cluster {
                continue;
            }
            if docker_image_imported_from_targeting_cluster(cluster, Some(source_tag)) {
                debug!("Source image was imported from {}, skipping it", cluster);
                continue;
            }
            if observations
                .get(cluster)
                .is_some_and(|tag| same_image(tag, source_tag))
            {
                debug!("Cluster {} already has the image", cluster);
                continue;
            }

            if let Err(e) = self
                .sync_to_cluster(
                    cluster,
                    client,
                    source_cluster,
                    source_tag,
                    &source_stream,
                    tag,
                )
                .await
            {
                warn!("Failed to sync to cluster {}: {}", cluster, e);
                errors.push(e);
            }
        }

        SyncerError::collect(errors)
    }

    /// Read the tag from every cluster. Clusters without the tag are left out.
    async fn observe(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, ImageStreamTag>> {
        let mut observations = BTreeMap::new();

        for (cluster, client) in &self.clients {
            let tags: Api<ImageStreamTag> = Api::namespaced(client.clone(), namespace);
            match tags.get(name).await {
                Ok(tag) => {
                    observations.insert(cluster.clone(), tag);
                }
                Err(e) if is_not_found(&e) => {
                    debug!("imageStreamTag not found on cluster {}", cluster);
                }
                Err(source) => {
                    return Err(SyncerError::GetImageStreamTag {
                        name: format!("{}/{}", namespace, name),
                        cluster: cluster.clone(),
                        source,
                    })
                }
            }
        }

        Ok(observations)
    }

    async fn sync_to_cluster(
        &self,
        cluster: &str,
        client: &Client,
        source_cluster: &str,
        source_tag: &ImageStreamTag,
        source_stream: &ImageStream,
        tag: &str,
    ) -> Result<()> {
        let namespace = source_stream.namespace().unwrap_or_default();
        let stream_name = source_stream.name_any();

        let reference = source_tag
            .image
            .docker_image_reference
            .as_deref()
            .ok_or_else(|| SyncerError::MissingImageReference {
                name: format!("{}/{}:{}", namespace, stream_name, tag),
                cluster: source_cluster.to_string(),
            })?;
        let public_reference = public_domain_for_image(source_cluster, reference)?;

        ensure_namespace_exists(client, cluster, &namespace).await?;
        ensure_image_stream(client, cluster, source_stream).await?;
        ensure_pull_secret(client, cluster, &namespace, &self.pull_secret).await?;

        import_image(client, cluster, &namespace, &stream_name, tag, &public_reference).await
    }

    /// Delete the image stream from every other cluster, then release it on `cluster`
    #[instrument(skip(self, image_stream), fields(image_stream = %image_stream.name_any()))]
    pub async fn propagate_deletion(&self, cluster: &str, image_stream: &ImageStream) -> Result<()> {
        let namespace = image_stream.namespace().unwrap_or_default();
        let name = image_stream.name_any();

        info!("ImageStream is being deleted on {}, deleting it on the other clusters", cluster);

        for (other, client) in &self.clients {
            if other == cluster {
                continue;
            }
            let image_streams: Api<ImageStream> = Api::namespaced(client.clone(), &namespace);
            match image_streams.delete(&name, &DeleteParams::default()).await {
                Ok(_) => info!("Deleted imageStream {}/{} on cluster {}", namespace, name, other),
                Err(e) if is_not_found(&e) => {
                    debug!("ImageStream {}/{} already gone on cluster {}", namespace, name, other)
                }
                Err(e) => {
                    return Err(SyncerError::write(
                        format!("delete imageStream {}/{}", namespace, name),
                        other,
                        e,
                    ))
                }
            }
        }

        let Some(client) = self.clients.get(cluster) else {
            warn!("No client for cluster {}, cannot remove finalizer", cluster);
            return Ok(());
        };
        ensure_remove_finalizer(client, cluster, image_stream).await
    }
}
