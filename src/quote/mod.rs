//! DEX-aggregator price quotes.

use crate::errors::QuoteError;
use async_trait::async_trait;
use ethers::types::{Address, U256};
use url::Url;

pub mod client;

pub use client::{AggregatorClient, parse_quote_body, quote_url};

/// Source of swap quotes: how much `to` token `amount` of `from` token buys.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn quote(
        &self,
        api_base: &Url,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<U256, QuoteError>;
}
