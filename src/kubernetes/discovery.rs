// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Image API availability checking

use crate::constants::discovery::{IMAGE_API_GROUP, POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::Result;
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Wait for the ImageStream API to become available on a cluster.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_image_api(cluster: &str, client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match check_image_api_exists(client).await {
            Ok(true) => {
                info!("ImageStream API ({}/v1) is available on {}", IMAGE_API_GROUP, cluster);
                return Ok(());
            }
            Ok(false) => {
                info!(
                    "ImageStream API ({}/v1) not yet available on {}, waiting {} seconds...",
                    IMAGE_API_GROUP, cluster, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for ImageStream API on {}: {}, retrying in {} seconds...",
                    cluster, e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}

async fn check_image_api_exists(client: &Client) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[IMAGE_API_GROUP])
        .run()
        .await?;

    let found = discovery
        .groups()
        .filter(|group| group.name() == IMAGE_API_GROUP)
        .flat_map(|group| group.recommended_resources())
        .any(|(ar, _)| ar.kind == "ImageStream" && ar.version == "v1");
    Ok(found)
}
