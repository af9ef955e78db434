// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for API discovery, client creation, and namespace management.

pub mod client;
pub mod discovery;
pub mod namespaces;

pub use client::create_cluster_clients;
pub use discovery::wait_for_image_api;
pub use namespaces::ensure_namespace_exists;

/// Whether an API call failed because the object does not exist
pub fn is_not_found(error: &kube::Error) -> bool {
    matches!(error, kube::Error::Api(err) if err.code == 404)
}
