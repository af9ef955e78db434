// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Adding and removing the syncer finalizer on image streams.

use crate::constants::FINALIZER;
use crate::error::{Result, SyncerError};
use crate::types::ImageStream;
use kube::{
    api::{Patch, PatchParams},
    Api, Client, Resource, ResourceExt,
};
use serde_json::json;
use tracing::{debug, info, instrument};

pub fn is_terminating<K: Resource>(obj: &K) -> bool {
    obj.meta().deletion_timestamp.is_some()
}

pub fn has_finalizer<K: Resource>(obj: &K) -> bool {
    obj.finalizers().iter().any(|f| f == FINALIZER)
}

/// The finalizers with `finalizer` removed, or `None` when it is not there
pub fn without_finalizer(finalizers: &[String], finalizer: &str) -> Option<Vec<String>> {
    if !finalizers.iter().any(|f| f == finalizer) {
        return None;
    }
    Some(
        finalizers
            .iter()
            .filter(|f| *f != finalizer)
            .cloned()
            .collect(),
    )
}

/// The finalizers with `finalizer` appended, or `None` when it is already there
pub fn with_finalizer(finalizers: &[String], finalizer: &str) -> Option<Vec<String>> {
    if finalizers.iter().any(|f| f == finalizer) {
        return None;
    }
    let mut updated = finalizers.to_vec();
    updated.push(finalizer.to_string());
    Some(updated)
}

/// Add the syncer finalizer to the image stream unless it already has it
#[instrument(skip(client, image_stream), fields(image_stream = %image_stream.name_any()))]
pub async fn ensure_finalizer(
    client: &Client,
    cluster: &str,
    image_stream: &ImageStream,
) -> Result<()> {
    let Some(finalizers) = with_finalizer(image_stream.finalizers(), FINALIZER) else {
        debug!("Finalizer already present");
        return Ok(());
    };

    info!("Adding finalizer to imageStream on cluster {}", cluster);
    patch_finalizers(client, cluster, image_stream, finalizers).await
}

/// Remove the syncer finalizer from the current version of the image stream.
/// Nothing is written when the stream is gone or the finalizer was already removed.
#[instrument(skip(client, image_stream), fields(image_stream = %image_stream.name_any()))]
pub async fn ensure_remove_finalizer(
    client: &Client,
    cluster: &str,
    image_stream: &ImageStream,
) -> Result<()> {
    let namespace = image_stream.namespace().unwrap_or_default();
    let name = image_stream.name_any();
    let image_streams: Api<ImageStream> = Api::namespaced(client.clone(), &namespace);

    let current = image_streams
        .get_opt(&name)
        .await
        .map_err(|source| SyncerError::GetImageStream {
            name: format!("{}/{}", namespace, name),
            cluster: cluster.to_string(),
            source,
        })?;

    let Some(current) = current else {
        debug!("ImageStream is already gone");
        return Ok(());
    };

    let Some(finalizers) = without_finalizer(current.finalizers(), FINALIZER) else {
        debug!("Finalizer already removed");
        return Ok(());
    };

    info!("Removing finalizer from imageStream on cluster {}", cluster);
    patch_finalizers(client, cluster, &current, finalizers).await
}

/// Merge-patch the finalizer list, guarded by the resource version it was computed from
async fn patch_finalizers(
    client: &Client,
    cluster: &str,
    image_stream: &ImageStream,
    finalizers: Vec<String>,
) -> Result<()> {
    let namespace = image_stream.namespace().unwrap_or_default();
    let name = image_stream.name_any();
    let image_streams: Api<ImageStream> = Api::namespaced(client.clone(), &namespace);

    let patch = json!({
        "metadata": {
            "finalizers": finalizers,
            "resourceVersion": image_stream.resource_version(),
        }
    });
    image_streams
        .patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
        .await
        .map_err(|e| {
            SyncerError::write(
                format!("patch finalizers of imageStream {}/{}", namespace, name),
                cluster,
                e,
            )
        })?;

    Ok(())
}
