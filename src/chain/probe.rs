//! One-shot connectivity check across all configured networks.

use super::NetworkTarget;
use crate::config::NetworkId;
use futures::future::join_all;
use tracing::{info, warn};

/// Outcome of probing one network.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub network: NetworkId,
    pub result: std::result::Result<u64, String>,
}

impl ProbeReport {
    pub fn is_connected(&self) -> bool {
        self.result.is_ok()
    }
}

/// Query the latest block of every network concurrently.
///
/// Reports come back in target order; one failing network never hides the rest.
pub async fn probe_networks(targets: &[NetworkTarget]) -> Vec<ProbeReport> {
    let probes = targets.iter().map(|target| async move {
        let network = target.config.id;
        let result = match target.rpc() {
            Ok(rpc) => rpc.latest_block_number().await.map_err(|e| e.to_string()),
            Err(reason) => Err(reason),
        };
        match &result {
            Ok(block) => info!(%network, block, "[PROBE] connected"),
            Err(error) => warn!(%network, %error, "[PROBE] could not connect"),
        }
        ProbeReport { network, result }
    });
    join_all(probes).await
}
