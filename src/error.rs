// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncerError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to parse kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("invalid imageStreamTag name {0}, expected <imagestream>:<tag>")]
    InvalidTagName(String),

    #[error("failed to get imageStreamTag {name} from cluster {cluster}: {source}")]
    GetImageStreamTag {
        name: String,
        cluster: String,
        source: kube::Error,
    },

    #[error("failed to get imageStream {name} from cluster {cluster}: {source}")]
    GetImageStream {
        name: String,
        cluster: String,
        source: kube::Error,
    },

    #[error("failed to {action} on cluster {cluster}: {source}")]
    ClusterWrite {
        action: String,
        cluster: String,
        source: kube::Error,
    },

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),

    #[error("failed to create and check the status for imageStreamImport for tag {tag} of {image_stream} in namespace {namespace} on cluster {cluster}: {reason}")]
    ImportFailed {
        tag: String,
        image_stream: String,
        namespace: String,
        cluster: String,
        reason: String,
    },

    #[error("failed to get the domain for cluster {0}")]
    UnknownCluster(String),

    #[error("imageStreamTag {name} on cluster {cluster} has no docker image reference")]
    MissingImageReference { name: String, cluster: String },

    #[error("{}", join_errors(.0))]
    Multiple(Vec<SyncerError>),
}

fn join_errors(errors: &[SyncerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SyncerError {
    pub(crate) fn write(action: impl Into<String>, cluster: &str, source: kube::Error) -> Self {
        SyncerError::ClusterWrite {
            action: action.into(),
            cluster: cluster.to_string(),
            source,
        }
    }

    /// Fold the errors of independent steps into one result. A single error is returned as-is.
    pub(crate) fn collect(mut errors: Vec<SyncerError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(SyncerError::Multiple(errors)),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncerError>;
