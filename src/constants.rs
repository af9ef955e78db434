// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes annotation keys used by the registry syncer
pub mod annotations {
    /// Marks namespaces created by the syncer
    pub const REQUESTER: &str = "dptp.openshift.io/requester";
    pub const REQUESTER_VALUE: &str = "registry_syncer";
    /// Image stream annotations with this prefix are carried over to other clusters
    pub const RELEASE_PREFIX: &str = "release.openshift.io";
}

/// Finalizer placed on image streams managed by the syncer
pub const FINALIZER: &str = "dptp.openshift.io/registry-syncer";

/// The operator name used for server-side apply
pub const OPERATOR_NAME: &str = "registry-syncer";

/// Pull secret written next to imported image streams
pub mod pull_secret {
    pub const NAME: &str = "registry-pull-credentials";
    pub const KEY: &str = ".dockerconfigjson";
    pub const TYPE: &str = "kubernetes.io/dockerconfigjson";
}

/// Image API polling configuration
pub mod discovery {
    pub const IMAGE_API_GROUP: &str = "image.openshift.io";
    /// Initial polling interval in seconds when waiting for the image API
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// Delay before a failed reconciliation is retried
pub const DEFAULT_REQUEUE_SECS: u64 = 60;
