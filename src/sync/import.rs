// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Importing an image into an image stream tag on a target cluster

use crate::error::{Result, SyncerError};
use crate::types::image::{
    ImageImportSpec, TagReferencePolicy, DOCKER_IMAGE_KIND, LOCAL_REFERENCE_POLICY,
};
use crate::types::{ImageStreamImport, ImageStreamImportSpec};
use k8s_openapi::api::core::v1::{LocalObjectReference, ObjectReference};
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use tracing::{info, instrument};

/// Build an import of `reference` into `<image_stream>:<tag>`
pub fn image_stream_import(
    namespace: &str,
    image_stream: &str,
    tag: &str,
    reference: &str,
) -> ImageStreamImport {
    ImageStreamImport {
        metadata: ObjectMeta {
            name: Some(image_stream.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: ImageStreamImportSpec {
            import: true,
            images: vec![ImageImportSpec {
                from: ObjectReference {
                    kind: Some(DOCKER_IMAGE_KIND.to_string()),
                    name: Some(reference.to_string()),
                    ..Default::default()
                },
                to: Some(LocalObjectReference {
                    name: tag.to_string(),
                }),
                reference_policy: Some(TagReferencePolicy {
                    type_: LOCAL_REFERENCE_POLICY.to_string(),
                }),
            }],
        },
        status: None,
    }
}

/// Check the status the API server returned for an import.
/// A successful import reports exactly one image.
pub fn check_import_status(import: &ImageStreamImport) -> std::result::Result<(), String> {
    let images = import
        .status
        .as_ref()
        .map(|s| s.images.as_slice())
        .unwrap_or_default();

    match images {
        [only] if only.image.is_some() => Ok(()),
        [only] => Err(format!(
            "imageStreamImport did not succeed: reason: {}, message: {}",
            only.status.reason.as_deref().unwrap_or_default(),
            only.status.message.as_deref().unwrap_or_default()
        )),
        _ => Err(format!(
            "imageStreamImport did not succeed: expected status for 1 image, got {}",
            images.len()
        )),
    }
}

/// Import the image into the tag on the target cluster and verify the result
#[instrument(skip(client))]
pub async fn import_image(
    client: &Client,
    cluster: &str,
    namespace: &str,
    image_stream: &str,
    tag: &str,
    reference: &str,
) -> Result<()> {
    let imports: Api<ImageStreamImport> = Api::namespaced(client.clone(), namespace);
    let failed = |reason: String| SyncerError::ImportFailed {
        tag: tag.to_string(),
        image_stream: image_stream.to_string(),
        namespace: namespace.to_string(),
        cluster: cluster.to_string(),
        reason,
    };

    info!(
        "Importing {} into {}/{}:{} on cluster {}",
        reference, namespace, image_stream, tag, cluster
    );

    let created = imports
        .create(
            &PostParams::default(),
            &image_stream_import(namespace, image_stream, tag, reference),
        )
        .await
        .map_err(|e| failed(e.to_string()))?;

    check_import_status(&created).map_err(failed)?;

    info!("Imported {}/{}:{} on cluster {}", namespace, image_stream, tag, cluster);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{image_path, image_stream_import_json, MockService};
    use serde_json::json;

    #[test]
    fn test_image_stream_import_request() {
        let import = image_stream_import(
            "ci",
            "applyconfig",
            "latest",
            "registry.ci.openshift.org/ci/applyconfig@sha256:new",
        );

        let value = serde_json::to_value(&import).unwrap();
        assert_eq!(value["kind"], "ImageStreamImport");
        assert_eq!(value["apiVersion"], "image.openshift.io/v1");
        assert_eq!(
            value["spec"],
            json!({
                "import": true,
                "images": [{
                    "from": {
                        "kind": "DockerImage",
                        "name": "registry.ci.openshift.org/ci/applyconfig@sha256:new"
                    },
                    "to": {"name": "latest"},
                    "referencePolicy": {"type": "Local"}
                }]
            })
        );
    }

    fn response(json: &str) -> ImageStreamImport {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_check_import_status_success() {
        let import = response(&image_stream_import_json("ci", "applyconfig", None));
        assert_eq!(check_import_status(&import), Ok(()));
    }

    #[test]
    fn test_check_import_status_failure_message() {
        let import = response(&image_stream_import_json(
            "ci",
            "applyconfig",
            Some("failing as requested"),
        ));
        assert_eq!(
            check_import_status(&import).unwrap_err(),
            "imageStreamImport did not succeed: reason: , message: failing as requested"
        );
    }

    #[test]
    fn test_check_import_status_without_images() {
        let import = image_stream_import("ci", "applyconfig", "latest", "quay.io/x@sha256:a");
        assert!(check_import_status(&import).is_err());
    }

    #[tokio::test]
    async fn test_import_image_failure_is_wrapped() {
        let mock = MockService::new().on_post(
            &image_path("ci", "imagestreamimports", ""),
            201,
            &image_stream_import_json("ci", "applyconfig", Some("failing as requested")),
        );

        let err = import_image(
            &mock.into_client(),
            "app.ci",
            "ci",
            "applyconfig",
            "latest",
            "registry.svc.ci.openshift.org/ci/applyconfig@sha256:a",
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to create and check the status for imageStreamImport for tag latest of applyconfig in namespace ci on cluster app.ci: imageStreamImport did not succeed: reason: , message: failing as requested"
        );
    }
}
