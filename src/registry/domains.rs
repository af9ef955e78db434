// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Mapping between cluster names and the hostnames of their image registries.

use crate::error::{Result, SyncerError};
use crate::types::ImageStreamTag;

/// Registry hostnames of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryDomains {
    /// In-cluster service DNS of the registry, only reachable from inside the cluster
    pub private: &'static str,
    /// Externally reachable hostname of the same registry
    pub public: &'static str,
}

const CLUSTER_DOMAINS: &[(&str, RegistryDomains)] = &[
    (
        "api.ci",
        RegistryDomains {
            private: "docker-registry.default.svc:5000",
            public: "registry.svc.ci.openshift.org",
        },
    ),
    (
        "app.ci",
        RegistryDomains {
            private: "image-registry.openshift-image-registry.svc:5000",
            public: "registry.ci.openshift.org",
        },
    ),
];

/// Look up the registry domains of a cluster
pub fn domains_for(cluster: &str) -> Option<RegistryDomains> {
    CLUSTER_DOMAINS
        .iter()
        .find(|(name, _)| *name == cluster)
        .map(|(_, domains)| *domains)
}

/// Rewrite an image reference that points at the cluster's in-cluster registry
/// so that it points at the public hostname instead. Other references are returned as-is.
pub fn public_domain_for_image(cluster: &str, image: &str) -> Result<String> {
    let domains =
        domains_for(cluster).ok_or_else(|| SyncerError::UnknownCluster(cluster.to_string()))?;

    match image.strip_prefix(domains.private) {
        Some(rest) if rest.starts_with('/') => Ok(format!("{}{}", domains.public, rest)),
        _ => Ok(image.to_string()),
    }
}

/// Whether the tag was imported from the public registry of `cluster` itself.
/// Importing it back into that cluster would point the cluster at its own image.
pub fn docker_image_imported_from_targeting_cluster(
    cluster: &str,
    tag: Option<&ImageStreamTag>,
) -> bool {
    let Some(domains) = domains_for(cluster) else {
        return false;
    };

    tag.and_then(ImageStreamTag::docker_image_from)
        .and_then(|from| from.strip_prefix(domains.public))
        .is_some_and(|rest| rest.starts_with('/'))
}
