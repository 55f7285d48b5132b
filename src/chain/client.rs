use super::ChainRpc;
use crate::errors::Result;
use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, U256},
};
use std::time::Duration;
use url::Url;

/// Handle for a single EVM JSON-RPC endpoint.
#[derive(Clone, Debug)]
pub struct EvmRpc {
    provider: Provider<Http>,
}

impl EvmRpc {
    /// Build a client whose every request is bounded by `timeout`.
    ///
    /// No request is made here; reachability is checked per scan.
    pub fn new(rpc_url: &Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let provider = Provider::new(Http::new_with_client(rpc_url.clone(), http));
        Ok(Self { provider })
    }
}

#[async_trait]
impl ChainRpc for EvmRpc {
    async fn latest_block_number(&self) -> Result<u64> {
        let block = self.provider.get_block_number().await?;
        Ok(block.as_u64())
    }

    async fn native_balance(&self, account: Address) -> Result<U256> {
        let balance = self.provider.get_balance(account, None).await?;
        Ok(balance)
    }
}
