// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Image registry hostnames per cluster.

pub mod domains;

pub use domains::{docker_image_imported_from_targeting_cluster, public_domain_for_image};
