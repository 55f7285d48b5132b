//! EVM chain access.

use crate::config::NetworkConfig;
use crate::errors::Result;
use async_trait::async_trait;
use ethers::types::{Address, U256};

pub mod client;
pub mod probe;

pub use client::EvmRpc;
pub use probe::{ProbeReport, probe_networks};

/// The slice of JSON-RPC the scanner needs.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Latest block number; also the reachability check.
    async fn latest_block_number(&self) -> Result<u64>;

    /// Native-token balance of `account` at the latest block, in wei.
    async fn native_balance(&self, account: Address) -> Result<U256>;

    async fn is_reachable(&self) -> bool {
        self.latest_block_number().await.is_ok()
    }
}

/// A configured network paired with its RPC client.
pub struct NetworkTarget {
    pub config: NetworkConfig,
    rpc: Option<Box<dyn ChainRpc>>,
}

impl NetworkTarget {
    pub fn new(config: NetworkConfig, rpc: Box<dyn ChainRpc>) -> Self {
        Self {
            config,
            rpc: Some(rpc),
        }
    }

    /// A network whose endpoint could not be built; every step on it fails.
    pub fn unconfigured(config: NetworkConfig) -> Self {
        Self { config, rpc: None }
    }

    /// The RPC client, or why there is none.
    pub fn rpc(&self) -> std::result::Result<&dyn ChainRpc, String> {
        match &self.rpc {
            Some(rpc) => Ok(rpc.as_ref()),
            None => Err(self
                .config
                .missing_endpoint()
                .unwrap_or_else(|| format!("{} has no RPC client", self.config.id))),
        }
    }
}
