use bigdecimal::BigDecimal;
use ethers::types::U256;
use num_bigint::BigInt;

/// Configuration for round-trip evaluation
#[derive(Debug, Clone)]
pub struct ArbitrageConfig {
    pub min_profit_percent: BigDecimal,
    pub min_balance_wei: U256,
}

/// Balance split into the traded share and the untouched reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeSplit {
    pub trade_amount: U256,
    /// Informational only.
    pub reserve: U256,
}

/// Amounts along one A -> B -> A round trip
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTrip {
    pub trade_amount: U256,
    pub forward_amount: U256,
    pub reverse_amount: U256,
    /// `reverse_amount - trade_amount`; negative on a losing trip.
    pub profit: BigInt,
    pub profit_percent: f64,
}
