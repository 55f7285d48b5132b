use super::types::{ArbitrageConfig, RoundTrip, TradeSplit};
use bigdecimal::BigDecimal;
use ethers::types::U256;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

/// Share of the balance put into the round trip, as a fraction.
const TRADE_SHARE_NUM: u64 = 8;
const TRADE_SHARE_DEN: u64 = 10;

/// `trade_amount = floor(balance * 0.8)`, `reserve = balance - trade_amount`.
pub fn split_balance(balance: U256) -> TradeSplit {
    // Divide first so huge balances cannot overflow.
    let whole = balance / TRADE_SHARE_DEN * TRADE_SHARE_NUM;
    let rest = balance % TRADE_SHARE_DEN * TRADE_SHARE_NUM / TRADE_SHARE_DEN;
    let trade_amount = whole + rest;
    TradeSplit {
        trade_amount,
        reserve: balance - trade_amount,
    }
}

/// Profit of a completed round trip.
///
/// Returns `None` when `trade_amount` is zero.
pub fn evaluate_round_trip(
    trade_amount: U256,
    forward_amount: U256,
    reverse_amount: U256,
) -> Option<RoundTrip> {
    if trade_amount.is_zero() {
        return None;
    }
    let profit = to_bigint(reverse_amount) - to_bigint(trade_amount);
    let percent = BigDecimal::new(profit.clone(), 0) * BigDecimal::from(100u32)
        / BigDecimal::new(to_bigint(trade_amount), 0);
    Some(RoundTrip {
        trade_amount,
        forward_amount,
        reverse_amount,
        profit,
        profit_percent: percent.to_f64()?,
    })
}

/// `profit_percent >= min_profit_percent`, decided without rounding.
///
/// Cross-multiplied so the boundary value triggers exactly.
pub fn meets_threshold(round_trip: &RoundTrip, config: &ArbitrageConfig) -> bool {
    let lhs = BigDecimal::new(round_trip.profit.clone(), 0) * BigDecimal::from(100u32);
    let rhs = config.min_profit_percent.clone()
        * BigDecimal::new(to_bigint(round_trip.trade_amount), 0);
    lhs >= rhs
}

pub fn to_bigint(value: U256) -> BigInt {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    BigInt::from_bytes_be(Sign::Plus, &bytes)
}
