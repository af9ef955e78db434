// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{info, warn};

use registry_syncer::config::Config;
use registry_syncer::kubernetes::{create_cluster_clients, wait_for_image_api};
use registry_syncer::reconcilers::ImageStreamReconciler;
use registry_syncer::sync::{ObjectFilter, RegistrySyncer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting registry-syncer");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: kubeconfig={}, requeue_interval={:?}",
        config.kubeconfig.display(),
        config.requeue_interval
    );
    let pull_secret = config.load_pull_secret().await?;

    // Create one client per cluster
    let clients = create_cluster_clients(&config).await?;
    info!(
        "Connected to clusters: {}",
        clients.keys().cloned().collect::<Vec<_>>().join(", ")
    );

    // Wait for the image API on every cluster before starting reconcilers
    for (cluster, client) in &clients {
        wait_for_image_api(cluster, client).await?;
    }

    let syncer = Arc::new(RegistrySyncer::new(clients.clone(), pull_secret));
    let filter = Arc::new(ObjectFilter::from_config(&config));

    info!("Starting reconcilers...");

    let reconcilers = clients.into_iter().map(|(cluster, client)| {
        ImageStreamReconciler::new(
            cluster,
            client,
            syncer.clone(),
            filter.clone(),
            config.requeue_interval,
        )
        .run()
    });
    try_join_all(reconcilers).await?;

    // This should never be reached as reconcilers run forever
    warn!("All reconcilers stopped unexpectedly");
    Ok(())
}
