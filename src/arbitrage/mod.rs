pub mod evaluator;
pub mod types;

pub use evaluator::{evaluate_round_trip, meets_threshold, split_balance};
pub use types::{ArbitrageConfig, RoundTrip, TradeSplit};
