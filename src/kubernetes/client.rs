// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-cluster client creation from a multi-context kubeconfig

use crate::config::Config;
use crate::error::{Result, SyncerError};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Create one client per kubeconfig context. The context name is the cluster name.
#[instrument(skip(config), fields(kubeconfig = %config.kubeconfig.display()))]
pub async fn create_cluster_clients(config: &Config) -> Result<BTreeMap<String, Client>> {
    let raw = tokio::fs::read_to_string(&config.kubeconfig)
        .await
        .map_err(|e| {
            SyncerError::KubeconfigError(format!(
                "Failed to read {}: {}",
                config.kubeconfig.display(),
                e
            ))
        })?;
    let kubeconfig = parse_kubeconfig(&raw)?;

    let mut clients = BTreeMap::new();
    for cluster in cluster_names(&kubeconfig, config) {
        info!("Creating client for cluster '{}'", cluster);
        let client = create_client_for_context(&kubeconfig, &cluster).await?;
        clients.insert(cluster, client);
    }

    if clients.is_empty() {
        return Err(SyncerError::KubeconfigError(
            "no usable contexts found in kubeconfig".to_string(),
        ));
    }

    Ok(clients)
}

fn parse_kubeconfig(raw: &str) -> Result<Kubeconfig> {
    serde_yaml::from_str(raw)
        .map_err(|e| SyncerError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))
}

/// Context names of the kubeconfig that the configuration selects
fn cluster_names(kubeconfig: &Kubeconfig, config: &Config) -> Vec<String> {
    kubeconfig
        .contexts
        .iter()
        .map(|c| c.name.clone())
        .filter(|name| {
            let wanted = config.wants_cluster(name);
            if !wanted {
                debug!("Skipping kubeconfig context '{}'", name);
            }
            wanted
        })
        .collect()
}

async fn create_client_for_context(kubeconfig: &Kubeconfig, context: &str) -> Result<Client> {
    let options = KubeConfigOptions {
        context: Some(context.to_string()),
        ..Default::default()
    };

    let client_config = kube::Config::from_custom_kubeconfig(kubeconfig.clone(), &options)
        .await
        .map_err(|e| {
            SyncerError::KubeconfigError(format!(
                "Failed to create config for context {}: {}",
                context, e
            ))
        })?;

    Client::try_from(client_config).map_err(|e| {
        SyncerError::KubeconfigError(format!(
            "Failed to create client for context {}: {}",
            context, e
        ))
    })
}
