use anyhow::Result;
use arb_scanner::{
    chain::probe_networks,
    cli::{Cli, Commands},
    config::AppConfig,
    scanner::{Scanner, shutdown_channel},
    utils,
};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    tracing::info!(
        networks = config.networks.len(),
        min_profit_percent = %config.settings.min_profit_percent,
        min_balance_wei = %config.settings.min_balance_wei,
        "[INIT] arb-scanner starting"
    );
    for network in &config.networks {
        if let Some(reason) = network.missing_endpoint() {
            tracing::warn!(network = %network.id, %reason, "[INIT] no RPC endpoint; this network will fail every cycle");
        }
    }
    if config.account.is_none() {
        tracing::warn!("[INIT] no wallet configured; balance-dependent steps will be skipped");
    }

    match cli.command() {
        Commands::Networks => list_networks(&config),
        Commands::Probe => {
            let scanner = Scanner::connect(&config)?;
            let reports = probe_networks(scanner.targets()).await;
            let connected = reports.iter().filter(|r| r.is_connected()).count();
            tracing::info!(connected, total = reports.len(), "[PROBE] done");
        }
        Commands::Scan { once } => run_scan(&config, once).await?,
    }
    Ok(())
}

async fn run_scan(config: &AppConfig, once: bool) -> Result<()> {
    let scanner = Scanner::connect(config)?;
    let (shutdown, signal) = shutdown_channel();

    let mut worker = if once {
        scanner.spawn_once(signal)
    } else {
        scanner.spawn(signal)
    };
    tracing::info!(once, "[INIT] scan worker started (CTRL+C to stop)");
    tokio::select! {
        joined = &mut worker => {
            let cycles = joined?;
            tracing::info!(cycles, "[SHUTDOWN] scan worker exited");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("[SHUTDOWN] interrupt received, stopping scanner");
            shutdown.trigger();
            let cycles = worker.await?;
            tracing::info!(cycles, "[SHUTDOWN] scanner stopped");
        }
    }
    Ok(())
}

fn list_networks(config: &AppConfig) {
    for network in &config.networks {
        tracing::info!(
            network = %network.id,
            chain_id = network.chain_id,
            rpc = %network
                .rpc_url
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), utils::redact_url),
            quote_api = %network.quote_api_base,
            pair = %format!("{}/{}", network.tokens.start.symbol, network.tokens.via.symbol),
            "[NETWORKS]"
        );
    }
}
