use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pgedge_core::config::ClusterEnv;
use pgedge_core::validate::validate_document;
use pgedge_store::{ClusterStore, StoreConfig};
use tracing::{info, warn};

use crate::bus::mqtt::MqttPublisher;
use crate::bus::{self, BrokerConfig};
use crate::output;

pub async fn run(
    env: &ClusterEnv,
    cluster_name: &str,
    broker: &str,
    client_id: Option<String>,
    connect_timeout_secs: u64,
) -> Result<()> {
    let store = ClusterStore::open(StoreConfig::for_env(env));
    let doc = store
        .load(cluster_name)
        .context("failed to load cluster JSON")?;
    validate_document(&doc).context("validation error")?;
    if doc.cluster_name != cluster_name {
        warn!(
            file_cluster = %doc.cluster_name,
            requested = cluster_name,
            "cluster_name in file differs from requested cluster; topics use the file's name"
        );
    }

    let cfg = BrokerConfig::parse(
        broker,
        client_id.unwrap_or_else(|| bus::default_client_id(&env.operator)),
        Duration::from_secs(connect_timeout_secs),
    )?;
    let publisher = MqttPublisher::connect(&cfg)
        .await
        .context("failed to connect to MQTT broker")?;

    let pb = if output::is_json() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    pb.set_style(ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}")?);

    let report = bus::announce(&doc, &publisher, &pb).await;
    pb.finish_and_clear();
    publisher.disconnect().await;

    for failed in report.outcomes.iter().filter(|o| !o.ok) {
        if let Some(e) = &failed.error {
            output::eprintln_line(&format!("Failed to send MQTT message for node {}: {e}", failed.node));
        }
    }
    output::print(&report)?;

    let failed = report.failed();
    if failed > 0 {
        bail!(
            "{failed} of {} initialization messages failed",
            report.outcomes.len()
        );
    }
    info!(cluster = %doc.cluster_name, "cluster initialization complete");
    Ok(())
}
