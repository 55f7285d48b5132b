//! Shared data structures used throughout the application.

use crate::arbitrage::{RoundTrip, TradeSplit};
use crate::config::NetworkId;
use ethers::types::U256;
use std::fmt;
use thiserror::Error;

/// Placeholder id attached to a simulated trigger.
///
/// Never built from, or submitted as, a real transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaperTxId([u8; 32]);

impl PaperTxId {
    /// Fresh random id.
    pub fn generate() -> Self {
        Self(rand::random())
    }
}

impl fmt::Display for PaperTxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PaperTxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaperTxId({self})")
    }
}

/// Why one network's step failed. Contained to that network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("RPC unreachable: {0}")]
    Connectivity(String),

    #[error("configuration: {0}")]
    Configuration(String),

    #[error("quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("{0}")]
    Generic(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    LowBalance { balance: U256 },
    NoPriceData { reason: String },
    BelowThreshold,
}

/// Decision for one network in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Threshold met. Simulated only.
    Triggered {
        paper_tx: PaperTxId,
        explorer_link: String,
    },
    Skipped(SkipReason),
    Failed(StepError),
}

impl ScanOutcome {
    pub fn is_triggered(&self) -> bool {
        matches!(self, ScanOutcome::Triggered { .. })
    }
}

/// Everything learned about one network in one cycle.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub network: NetworkId,
    pub balance: Option<U256>,
    pub split: Option<TradeSplit>,
    pub round_trip: Option<RoundTrip>,
    pub outcome: ScanOutcome,
}

impl ScanResult {
    pub fn new(network: NetworkId, outcome: ScanOutcome) -> Self {
        Self {
            network,
            balance: None,
            split: None,
            round_trip: None,
            outcome,
        }
    }
}

/// Per-cycle aggregate of network results, in scan order.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub cycle: u64,
    pub results: Vec<ScanResult>,
    /// Shutdown arrived before every network was scanned.
    pub interrupted: bool,
}

impl CycleReport {
    pub fn new(cycle: u64) -> Self {
        Self {
            cycle,
            ..Self::default()
        }
    }

    pub fn triggered(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_triggered()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, ScanOutcome::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, ScanOutcome::Failed(_)))
            .count()
    }
}
