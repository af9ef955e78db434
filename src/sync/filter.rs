// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Decides which image stream tags are in scope for syncing.

use crate::config::Config;
use crate::types::parse_tag_name;
use std::collections::BTreeSet;
use tracing::debug;

/// Allow/deny sets an image stream tag name is matched against.
///
/// Entries use these forms:
/// - tags: `namespace/name:tag`
/// - streams and denied streams: `namespace/name`
/// - prefixes: `namespace/name-prefix`
/// - namespaces: `namespace`
#[derive(Debug, Clone, Default)]
pub struct ObjectFilter {
    image_stream_tags: BTreeSet<String>,
    image_streams: BTreeSet<String>,
    image_stream_prefixes: BTreeSet<String>,
    image_stream_namespaces: BTreeSet<String>,
    denied_image_streams: BTreeSet<String>,
}

impl ObjectFilter {
    pub fn new(
        image_stream_tags: BTreeSet<String>,
        image_streams: BTreeSet<String>,
        image_stream_prefixes: BTreeSet<String>,
        image_stream_namespaces: BTreeSet<String>,
        denied_image_streams: BTreeSet<String>,
    ) -> Self {
        Self {
            image_stream_tags,
            image_streams,
            image_stream_prefixes,
            image_stream_namespaces,
            denied_image_streams,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.image_stream_tags.clone(),
            config.image_streams.clone(),
            config.image_stream_prefixes.clone(),
            config.image_stream_namespaces.clone(),
            config.denied_image_streams.clone(),
        )
    }

    /// Whether the image stream tag `namespace/name` should be synced.
    /// Names that are not of the form `<imagestream>:<tag>` are never synced.
    pub fn should_sync(&self, namespace: &str, name: &str) -> bool {
        let Some((stream, _)) = parse_tag_name(name) else {
            debug!("{}/{} is not a valid imageStreamTag name, ignoring", namespace, name);
            return false;
        };

        if self.image_stream_tags.contains(&format!("{}/{}", namespace, name)) {
            return true;
        }

        let stream_key = format!("{}/{}", namespace, stream);
        if self.image_streams.contains(&stream_key) {
            return true;
        }

        if self
            .image_stream_prefixes
            .iter()
            .any(|prefix| stream_key.starts_with(prefix.as_str()))
        {
            return true;
        }

        self.image_stream_namespaces.contains(namespace)
            && !self.denied_image_streams.contains(&stream_key)
    }
}
