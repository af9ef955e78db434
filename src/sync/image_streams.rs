// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Creating image streams on clusters that do not have them yet

use crate::constants::{annotations, FINALIZER};
use crate::error::{Result, SyncerError};
use crate::types::{ImageStream, ImageStreamSpec};
use kube::{
    api::{ObjectMeta, Patch, PatchParams, PostParams},
    Api, Client, ResourceExt,
};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Annotations that are carried over to other clusters
pub fn release_annotations(image_stream: &ImageStream) -> BTreeMap<String, String> {
    image_stream
        .annotations()
        .iter()
        .filter(|(k, _)| k.starts_with(annotations::RELEASE_PREFIX))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Build the copy of an image stream that is created on other clusters.
/// Tags are left out, the import fills them in.
pub fn image_stream_copy(source: &ImageStream) -> ImageStream {
    let release = release_annotations(source);

    ImageStream {
        metadata: ObjectMeta {
            name: source.metadata.name.clone(),
            namespace: source.metadata.namespace.clone(),
            annotations: (!release.is_empty()).then_some(release),
            finalizers: Some(vec![FINALIZER.to_string()]),
            ..Default::default()
        },
        spec: ImageStreamSpec {
            lookup_policy: source.spec.lookup_policy.clone(),
            tags: Vec::new(),
        },
        status: None,
    }
}

/// Ensure the image stream exists on the target cluster and carries the source's release annotations
#[instrument(skip(client, source), fields(image_stream = %source.name_any()))]
pub async fn ensure_image_stream(client: &Client, cluster: &str, source: &ImageStream) -> Result<()> {
    let namespace = source.namespace().unwrap_or_default();
    let name = source.name_any();
    let image_streams: Api<ImageStream> = Api::namespaced(client.clone(), &namespace);

    let existing = image_streams
        .get_opt(&name)
        .await
        .map_err(|source| SyncerError::GetImageStream {
            name: format!("{}/{}", namespace, name),
            cluster: cluster.to_string(),
            source,
        })?;

    match existing {
        None => {
            info!("Creating imageStream {}/{} on cluster {}", namespace, name, cluster);
            image_streams
                .create(&PostParams::default(), &image_stream_copy(source))
                .await
                .map_err(|e| {
                    SyncerError::write(format!("create imageStream {}/{}", namespace, name), cluster, e)
                })?;
        }
        Some(existing) => {
            let missing = missing_annotations(&existing, source);
            if missing.is_empty() {
                debug!("ImageStream already up to date on cluster {}", cluster);
                return Ok(());
            }

            info!(
                "Updating {} annotations of imageStream {}/{} on cluster {}",
                missing.len(),
                namespace,
                name,
                cluster
            );
            let patch = json!({ "metadata": { "annotations": missing } });
            image_streams
                .patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
                .await
                .map_err(|e| {
                    SyncerError::write(
                        format!("patch annotations of imageStream {}/{}", namespace, name),
                        cluster,
                        e,
                    )
                })?;
        }
    }

    Ok(())
}

/// Release annotations of the source that the target lacks or holds with another value
fn missing_annotations(target: &ImageStream, source: &ImageStream) -> BTreeMap<String, String> {
    let current = target.annotations();
    release_annotations(source)
        .into_iter()
        .filter(|(k, v)| current.get(k) != Some(v))
        .collect()
}
