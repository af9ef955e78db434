// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pull secret used by image imports on target clusters

use crate::constants::{pull_secret, OPERATOR_NAME};
use crate::error::{Result, SyncerError};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::{
    api::{ObjectMeta, Patch, PatchParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Apply the pull secret into the namespace so imports there can authenticate
#[instrument(skip(client, data))]
pub async fn ensure_pull_secret(
    client: &Client,
    cluster: &str,
    namespace: &str,
    data: &[u8],
) -> Result<()> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);

    let pp = PatchParams::apply(OPERATOR_NAME).force();
    secrets
        .patch(
            pull_secret::NAME,
            &pp,
            &Patch::Apply(&pull_secret_for(namespace, data)),
        )
        .await
        .map_err(|e| {
            SyncerError::write(
                format!("apply secret {}/{}", namespace, pull_secret::NAME),
                cluster,
                e,
            )
        })?;

    debug!("Pull secret applied in {} on cluster {}", namespace, cluster);
    Ok(())
}

fn pull_secret_for(namespace: &str, data: &[u8]) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(pull_secret::NAME.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            pull_secret::KEY.to_string(),
            ByteString(data.to_vec()),
        )])),
        type_: Some(pull_secret::TYPE.to_string()),
        ..Default::default()
    }
}
