// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::DEFAULT_REQUEUE_SECS;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Kubeconfig whose context names are the clusters to keep in sync
    pub kubeconfig: PathBuf,
    /// File holding the dockerconfigjson used by image imports
    pub pull_secret_path: PathBuf,
    /// Subset of kubeconfig contexts to use, all of them when empty
    pub clusters: BTreeSet<String>,
    pub image_stream_tags: BTreeSet<String>,
    pub image_streams: BTreeSet<String>,
    pub image_stream_prefixes: BTreeSet<String>,
    pub image_stream_namespaces: BTreeSet<String>,
    pub denied_image_streams: BTreeSet<String>,
    pub requeue_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let kubeconfig = var("KUBECONFIG").context("KUBECONFIG environment variable not set")?;
        let pull_secret_path =
            var("PULL_SECRET_PATH").context("PULL_SECRET_PATH environment variable not set")?;
        let requeue_secs = match var("REQUEUE_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("REQUEUE_SECS is not a number: {}", v))?,
            None => DEFAULT_REQUEUE_SECS,
        };

        Ok(Config {
            kubeconfig: kubeconfig.into(),
            pull_secret_path: pull_secret_path.into(),
            clusters: parse_set(var("CLUSTERS")),
            image_stream_tags: parse_set(var("IMAGE_STREAM_TAGS")),
            image_streams: parse_set(var("IMAGE_STREAMS")),
            image_stream_prefixes: parse_set(var("IMAGE_STREAM_PREFIXES")),
            image_stream_namespaces: parse_set(var("IMAGE_STREAM_NAMESPACES")),
            denied_image_streams: parse_set(var("DENIED_IMAGE_STREAMS")),
            requeue_interval: Duration::from_secs(requeue_secs),
        })
    }

    /// Whether the kubeconfig context with this name should be synced
    pub fn wants_cluster(&self, name: &str) -> bool {
        self.clusters.is_empty() || self.clusters.contains(name)
    }

    /// Read the pull secret from disk
    pub async fn load_pull_secret(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.pull_secret_path).await.with_context(|| {
            format!(
                "failed to read pull secret from {}",
                self.pull_secret_path.display()
            )
        })
    }
}

fn parse_set(value: Option<String>) -> BTreeSet<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
