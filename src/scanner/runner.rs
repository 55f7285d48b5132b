//! The per-network arbitrage scan loop.

use super::shutdown::ShutdownSignal;
use crate::arbitrage::{ArbitrageConfig, evaluate_round_trip, meets_threshold, split_balance};
use crate::chain::{EvmRpc, NetworkTarget};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{CycleReport, PaperTxId, ScanOutcome, ScanResult, SkipReason, StepError};
use crate::quote::{AggregatorClient, QuoteSource};
use ethers::types::{Address, U256};
use ethers::utils::format_ether;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Sequential, single-worker scanner over a fixed list of networks.
pub struct Scanner {
    targets: Vec<NetworkTarget>,
    quotes: Box<dyn QuoteSource>,
    account: Option<Address>,
    arbitrage: ArbitrageConfig,
    scan_interval: Duration,
}

impl Scanner {
    pub fn new(
        targets: Vec<NetworkTarget>,
        quotes: Box<dyn QuoteSource>,
        account: Option<Address>,
        arbitrage: ArbitrageConfig,
        scan_interval: Duration,
    ) -> Self {
        Self {
            targets,
            quotes,
            account,
            arbitrage,
            scan_interval,
        }
    }

    /// Wire real RPC and quote clients for every configured network.
    pub fn connect(config: &AppConfig) -> Result<Self> {
        let timeout = config.settings.http_timeout;
        let targets = config
            .networks
            .iter()
            .map(|network| match &network.rpc_url {
                Some(url) => {
                    let rpc = EvmRpc::new(url, timeout)?;
                    Ok(NetworkTarget::new(network.clone(), Box::new(rpc)))
                }
                None => Ok(NetworkTarget::unconfigured(network.clone())),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(
            targets,
            Box::new(AggregatorClient::new(timeout)?),
            config.account,
            ArbitrageConfig {
                min_profit_percent: config.settings.min_profit_percent.clone(),
                min_balance_wei: config.settings.min_balance_wei,
            },
            config.settings.scan_interval,
        ))
    }

    pub fn targets(&self) -> &[NetworkTarget] {
        &self.targets
    }

    /// Run the loop on its own task.
    pub fn spawn(self, shutdown: ShutdownSignal) -> JoinHandle<u64> {
        tokio::spawn(self.run(shutdown))
    }

    /// Run a single cycle on its own task; yields 1, or 0 if already stopped.
    pub fn spawn_once(self, shutdown: ShutdownSignal) -> JoinHandle<u64> {
        tokio::spawn(self.run_once(shutdown))
    }

    pub async fn run_once(self, mut shutdown: ShutdownSignal) -> u64 {
        if shutdown.is_triggered() {
            return 0;
        }
        self.run_cycle(1, &mut shutdown).await;
        1
    }

    /// Scan until shutdown; returns the number of cycles started.
    pub async fn run(self, mut shutdown: ShutdownSignal) -> u64 {
        info!(
            networks = self.targets.len(),
            interval_secs = self.scan_interval.as_secs(),
            "[SCAN] starting round-trip scan (paper mode, nothing is executed)"
        );
        let mut cycles = 0;
        while !shutdown.is_triggered() {
            cycles += 1;
            let report = self.run_cycle(cycles, &mut shutdown).await;
            if report.interrupted {
                break;
            }
            tokio::select! {
                biased;
                _ = shutdown.triggered() => break,
                _ = tokio::time::sleep(self.scan_interval) => {}
            }
        }
        info!(cycles, "[SCAN] scan loop stopped");
        cycles
    }

    /// One pass over every network, in configured order.
    ///
    /// Shutdown is checked between networks and raced against the in-flight
    /// step; an abandoned step leaves the report marked `interrupted`.
    pub async fn run_cycle(&self, cycle: u64, shutdown: &mut ShutdownSignal) -> CycleReport {
        let mut report = CycleReport::new(cycle);
        for target in &self.targets {
            if shutdown.is_triggered() {
                report.interrupted = true;
                break;
            }
            tokio::select! {
                biased;
                _ = shutdown.triggered() => {
                    report.interrupted = true;
                    break;
                }
                result = self.scan_network(target) => report.results.push(result),
            }
        }
        info!(
            cycle,
            scanned = report.results.len(),
            triggered = report.triggered(),
            skipped = report.skipped(),
            failed = report.failed(),
            interrupted = report.interrupted,
            "[SCAN] cycle complete"
        );
        report
    }

    /// Scan one network. Every failure is folded into the outcome.
    pub async fn scan_network(&self, target: &NetworkTarget) -> ScanResult {
        let mut result = ScanResult::new(
            target.config.id,
            ScanOutcome::Skipped(SkipReason::BelowThreshold),
        );
        let outcome = match self.evaluate_network(target, &mut result).await {
            Ok(outcome) => outcome,
            Err(StepError::QuoteUnavailable(reason)) => {
                ScanOutcome::Skipped(SkipReason::NoPriceData { reason })
            }
            Err(error) => ScanOutcome::Failed(error),
        };
        result.outcome = outcome;
        log_result(target, &result);
        result
    }

    async fn evaluate_network(
        &self,
        target: &NetworkTarget,
        result: &mut ScanResult,
    ) -> std::result::Result<ScanOutcome, StepError> {
        let network = &target.config;

        let rpc = target.rpc().map_err(StepError::Configuration)?;
        let block = rpc
            .latest_block_number()
            .await
            .map_err(|e| StepError::Connectivity(e.to_string()))?;
        debug!(network = %network.id, block, "[SCAN] rpc reachable");

        let account = self
            .account
            .ok_or_else(|| StepError::Configuration("wallet not set".into()))?;
        let balance = rpc
            .native_balance(account)
            .await
            .map_err(|e| StepError::Connectivity(e.to_string()))?;
        result.balance = Some(balance);

        let split = split_balance(balance);
        if balance < self.arbitrage.min_balance_wei || split.trade_amount.is_zero() {
            return Ok(ScanOutcome::Skipped(SkipReason::LowBalance { balance }));
        }
        result.split = Some(split);

        let tokens = &network.tokens;
        let forward = self
            .request_quote(target, tokens.start.address, tokens.via.address, split.trade_amount)
            .await?;
        let reverse = self
            .request_quote(target, tokens.via.address, tokens.start.address, forward)
            .await?;

        let round_trip = evaluate_round_trip(split.trade_amount, forward, reverse)
            .ok_or_else(|| StepError::Generic("profit percentage is not representable".into()))?;
        let triggered = meets_threshold(&round_trip, &self.arbitrage);
        result.round_trip = Some(round_trip);

        if triggered {
            let paper_tx = PaperTxId::generate();
            Ok(ScanOutcome::Triggered {
                explorer_link: network.tx_link(&paper_tx),
                paper_tx,
            })
        } else {
            Ok(ScanOutcome::Skipped(SkipReason::BelowThreshold))
        }
    }

    /// A quote that failed or came back empty is `QuoteUnavailable`.
    async fn request_quote(
        &self,
        target: &NetworkTarget,
        from: Address,
        to: Address,
        amount: U256,
    ) -> std::result::Result<U256, StepError> {
        let out = self
            .quotes
            .quote(&target.config.quote_api_base, from, to, amount)
            .await
            .map_err(|e| StepError::QuoteUnavailable(e.to_string()))?;
        if out.is_zero() {
            return Err(StepError::QuoteUnavailable("quote returned zero".into()));
        }
        Ok(out)
    }
}

fn log_result(target: &NetworkTarget, result: &ScanResult) {
    let network = target.config.id;
    match &result.outcome {
        ScanOutcome::Triggered {
            paper_tx,
            explorer_link,
        } => {
            if let Some(trip) = &result.round_trip {
                info!(
                    %network,
                    trade = %format_ether(trip.trade_amount),
                    forward = %trip.forward_amount,
                    reverse = %format_ether(trip.reverse_amount),
                    profit = %trip.profit,
                    profit_percent = %format!("{:.4}", trip.profit_percent),
                    reserve = %reserve(result),
                    %paper_tx,
                    link = %explorer_link,
                    "[SCAN] arbitrage triggered (simulated)"
                );
            }
        }
        ScanOutcome::Skipped(SkipReason::BelowThreshold) => {
            if let Some(trip) = &result.round_trip {
                info!(
                    %network,
                    trade = %format_ether(trip.trade_amount),
                    forward = %trip.forward_amount,
                    reverse = %format_ether(trip.reverse_amount),
                    profit = %trip.profit,
                    profit_percent = %format!("{:.4}", trip.profit_percent),
                    reserve = %reserve(result),
                    "[SCAN] below profit threshold, skipping"
                );
            }
        }
        ScanOutcome::Skipped(SkipReason::LowBalance { balance }) => {
            warn!(%network, balance = %format_ether(*balance), "[SCAN] balance too low, skipping");
        }
        ScanOutcome::Skipped(SkipReason::NoPriceData { reason }) => {
            warn!(%network, %reason, "[SCAN] could not get price data");
        }
        ScanOutcome::Failed(error) => {
            warn!(%network, %error, "[SCAN] network step failed");
        }
    }
}

fn reserve(result: &ScanResult) -> String {
    result
        .split
        .map_or_else(String::new, |split| format_ether(split.reserve))
}
