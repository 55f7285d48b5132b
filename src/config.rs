//! Network table and runtime settings.
//!
//! The network list is a fixed, ordered table of immutable records. The
//! environment can narrow or reorder it (`NETWORKS`) and override endpoints,
//! but every record is validated before the scanner sees it.

use crate::errors::{AppError, Result};
use crate::wallet;
use bigdecimal::BigDecimal;
use ethers::types::{Address, U256};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const INFURA_KEY_PLACEHOLDER: &str = "{INFURA_KEY}";
const QUOTE_API_ROOT: &str = "https://api.1inch.io/v5.0";

/// Supported networks, in default scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkId {
    Ethereum,
    Polygon,
    Bsc,
    Avalanche,
    Arbitrum,
}

impl NetworkId {
    pub const ALL: [NetworkId; 5] = [
        NetworkId::Ethereum,
        NetworkId::Polygon,
        NetworkId::Bsc,
        NetworkId::Avalanche,
        NetworkId::Arbitrum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Ethereum => "ethereum",
            NetworkId::Polygon => "polygon",
            NetworkId::Bsc => "bsc",
            NetworkId::Avalanche => "avalanche",
            NetworkId::Arbitrum => "arbitrum",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            NetworkId::Ethereum => 1,
            NetworkId::Polygon => 137,
            NetworkId::Bsc => 56,
            NetworkId::Avalanche => 43114,
            NetworkId::Arbitrum => 42161,
        }
    }

    /// Suffix used by per-network env overrides, e.g. `RPC_URL_POLYGON`.
    fn env_suffix(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        NetworkId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| AppError::Config(format!("unknown network id `{}`", s.trim())))
    }
}

/// Compile-time defaults for one network.
struct NetworkDefaults {
    rpc_url: &'static str,
    explorer_tx_url: &'static str,
    start: (&'static str, &'static str),
    via: (&'static str, &'static str),
}

fn defaults_for(id: NetworkId) -> NetworkDefaults {
    match id {
        NetworkId::Ethereum => NetworkDefaults {
            rpc_url: "https://mainnet.infura.io/v3/{INFURA_KEY}",
            explorer_tx_url: "https://etherscan.io/tx/",
            start: ("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            via: ("USDT", "0xdAC17F958D2ee523a2206206994597C13D831ec7"),
        },
        NetworkId::Polygon => NetworkDefaults {
            rpc_url: "https://polygon-rpc.com",
            explorer_tx_url: "https://polygonscan.com/tx/",
            start: ("WMATIC", "0x0d500B1d8E8e7Ea892c3A0e7b8E464521b7cFd5d"),
            via: ("USDT", "0x3813e82e6f7098b9583FC0F33a962D02018B6803"),
        },
        NetworkId::Bsc => NetworkDefaults {
            rpc_url: "https://bsc-dataseed.binance.org",
            explorer_tx_url: "https://bscscan.com/tx/",
            start: ("WBNB", "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
            via: ("USDT", "0x55d398326f99059fF775485246999027B3197955"),
        },
        NetworkId::Avalanche => NetworkDefaults {
            rpc_url: "https://api.avax.network/ext/bc/C/rpc",
            explorer_tx_url: "https://snowtrace.io/tx/",
            start: ("WAVAX", "0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7"),
            via: ("USDT", "0x9702230a8ea53601f5cd2dc00fdbc13d4df4a8c7"),
        },
        NetworkId::Arbitrum => NetworkDefaults {
            rpc_url: "https://arbitrum-mainnet.infura.io/v3/{INFURA_KEY}",
            explorer_tx_url: "https://arbiscan.io/tx/",
            start: ("WETH", "0x82af49447d8a07e3bd95bd0d56f35241523fbab1"),
            via: ("USDT", "0xfd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9"),
        },
    }
}

/// One side of the round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLeg {
    pub symbol: String,
    pub address: Address,
}

impl TokenLeg {
    fn parse(network: NetworkId, (symbol, address): (&str, &str)) -> Result<Self> {
        let address = Address::from_str(address).map_err(|e| {
            AppError::Config(format!("{network}: bad {symbol} address `{address}`: {e}"))
        })?;
        Ok(Self {
            symbol: symbol.to_string(),
            address,
        })
    }
}

/// The two tokens traded on a network: `start` -> `via` -> `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub start: TokenLeg,
    pub via: TokenLeg,
}

/// Immutable per-network record, validated at load.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub id: NetworkId,
    pub chain_id: u64,
    /// `None` when the default endpoint needs `INFURA_KEY` and none was given.
    /// The network then fails its own step instead of blocking startup.
    pub rpc_url: Option<Url>,
    /// Explorer prefix; a transaction hash is appended to it.
    pub explorer_tx_url: String,
    pub quote_api_base: Url,
    pub tokens: TokenPair,
}

impl NetworkConfig {
    /// Build the record for `id` from built-in defaults plus env overrides.
    fn resolve<F>(id: NetworkId, lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = defaults_for(id);
        let suffix = id.env_suffix();

        let rpc_raw = match non_empty(lookup(&format!("RPC_URL_{suffix}"))) {
            Some(url) => Some(url),
            None if defaults.rpc_url.contains(INFURA_KEY_PLACEHOLDER) => {
                non_empty(lookup("INFURA_KEY"))
                    .map(|key| defaults.rpc_url.replace(INFURA_KEY_PLACEHOLDER, &key))
            }
            None => Some(defaults.rpc_url.to_string()),
        };
        let quote_raw = non_empty(lookup(&format!("QUOTE_API_BASE_{suffix}")))
            .unwrap_or_else(|| format!("{QUOTE_API_ROOT}/{}", id.chain_id()));

        let tokens = TokenPair {
            start: TokenLeg::parse(id, defaults.start)?,
            via: TokenLeg::parse(id, defaults.via)?,
        };
        if tokens.start.address == tokens.via.address {
            return Err(AppError::Config(format!(
                "{id}: round-trip legs must be distinct tokens"
            )));
        }

        Ok(Self {
            id,
            chain_id: id.chain_id(),
            rpc_url: rpc_raw.as_deref().map(Url::parse).transpose()?,
            explorer_tx_url: defaults.explorer_tx_url.to_string(),
            quote_api_base: Url::parse(&quote_raw)?,
            tokens,
        })
    }

    /// Why this network has no RPC endpoint, if it has none.
    pub fn missing_endpoint(&self) -> Option<String> {
        match self.rpc_url {
            Some(_) => None,
            None => Some(format!(
                "{} has no RPC endpoint: set INFURA_KEY or RPC_URL_{}",
                self.id,
                self.id.env_suffix()
            )),
        }
    }

    /// Explorer link for a transaction id.
    pub fn tx_link(&self, tx: &impl fmt::Display) -> String {
        format!("{}{}", self.explorer_tx_url, tx)
    }
}

/// Knobs of the scan loop.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub scan_interval: Duration,
    /// Trigger when `profit_percent >= min_profit_percent`.
    pub min_profit_percent: BigDecimal,
    /// Balances below this (in wei) are skipped.
    pub min_balance_wei: U256,
    pub http_timeout: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(10),
            min_profit_percent: BigDecimal::new(3.into(), 1),
            min_balance_wei: U256::exp10(15),
            http_timeout: Duration::from_secs(10),
        }
    }
}

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub networks: Vec<NetworkConfig>,
    pub settings: ScanSettings,
    /// Read-only account whose native balance sizes the trade.
    pub account: Option<Address>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ids = match non_empty(lookup("NETWORKS")) {
            Some(raw) => parse_network_list(&raw)?,
            None => NetworkId::ALL.to_vec(),
        };
        let networks = ids
            .into_iter()
            .map(|id| NetworkConfig::resolve(id, &lookup))
            .collect::<Result<Vec<_>>>()?;
        validate_networks(&networks)?;

        let defaults = ScanSettings::default();
        let settings = ScanSettings {
            scan_interval: match non_empty(lookup("SCAN_INTERVAL_SECS")) {
                Some(raw) => parse_secs("SCAN_INTERVAL_SECS", &raw)?,
                None => defaults.scan_interval,
            },
            min_profit_percent: match non_empty(lookup("MIN_PROFIT_PERCENT")) {
                Some(raw) => BigDecimal::from_str(raw.trim()).map_err(|e| {
                    AppError::Config(format!("MIN_PROFIT_PERCENT `{raw}` is not a decimal: {e}"))
                })?,
                None => defaults.min_profit_percent,
            },
            min_balance_wei: match non_empty(lookup("MIN_BALANCE_WEI")) {
                Some(raw) => U256::from_dec_str(raw.trim()).map_err(|e| {
                    AppError::Config(format!("MIN_BALANCE_WEI `{raw}` is not an integer: {e}"))
                })?,
                None => defaults.min_balance_wei,
            },
            http_timeout: match non_empty(lookup("HTTP_TIMEOUT_SECS")) {
                Some(raw) => parse_secs("HTTP_TIMEOUT_SECS", &raw)?,
                None => defaults.http_timeout,
            },
        };

        let account = wallet::resolve_account(
            non_empty(lookup("WALLET_ADDRESS")).as_deref(),
            non_empty(lookup("WALLET_PRIVATE_KEY")).as_deref(),
        )?;

        Ok(Self {
            networks,
            settings,
            account,
        })
    }
}

/// Parse a comma-separated, ordered list of network ids.
pub fn parse_network_list(raw: &str) -> Result<Vec<NetworkId>> {
    let ids = raw
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(NetworkId::from_str)
        .collect::<Result<Vec<_>>>()?;
    if ids.is_empty() {
        return Err(AppError::Config("NETWORKS lists no network".into()));
    }
    Ok(ids)
}

/// Reject duplicate ids and mismatched chain ids.
pub fn validate_networks(networks: &[NetworkConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for network in networks {
        if !seen.insert(network.id) {
            return Err(AppError::Config(format!(
                "network `{}` is configured twice",
                network.id
            )));
        }
        if network.chain_id != network.id.chain_id() {
            return Err(AppError::Config(format!(
                "network `{}` has chain id {}, expected {}",
                network.id,
                network.chain_id,
                network.id.chain_id()
            )));
        }
    }
    Ok(())
}

/// Whole seconds, strictly positive.
fn parse_secs(name: &str, raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().parse()?;
    if secs == 0 {
        return Err(AppError::Config(format!("{name} must be at least 1")));
    }
    Ok(Duration::from_secs(secs))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_table_keeps_fixed_order() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("INFURA_KEY", "abc")])).unwrap();
        let ids: Vec<_> = cfg.networks.iter().map(|n| n.id).collect();
        assert_eq!(ids, NetworkId::ALL.to_vec());
        assert_eq!(
            cfg.networks[0].rpc_url.as_ref().unwrap().as_str(),
            "https://mainnet.infura.io/v3/abc"
        );
        assert_eq!(
            cfg.networks[1].quote_api_base.as_str(),
            "https://api.1inch.io/v5.0/137"
        );
        assert!(cfg.account.is_none());
    }

    #[test]
    fn default_settings_match_reference_cadence() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("INFURA_KEY", "abc")])).unwrap();
        assert_eq!(cfg.settings.scan_interval, Duration::from_secs(10));
        assert_eq!(cfg.settings.min_balance_wei, U256::exp10(15));
        assert_eq!(
            cfg.settings.min_profit_percent,
            BigDecimal::from_str("0.3").unwrap()
        );
    }

    #[test]
    fn subset_respects_listed_order() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("NETWORKS", "bsc, Polygon")])).unwrap();
        let ids: Vec<_> = cfg.networks.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![NetworkId::Bsc, NetworkId::Polygon]);
    }

    #[test]
    fn rejects_unknown_network() {
        let err = AppConfig::from_lookup(lookup_from(&[("NETWORKS", "polygon,solana")]))
            .unwrap_err();
        assert!(err.to_string().contains("solana"));
    }

    #[test]
    fn rejects_duplicate_network() {
        let err =
            AppConfig::from_lookup(lookup_from(&[("NETWORKS", "bsc,polygon,BSC")])).unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn missing_infura_key_leaves_only_infura_networks_without_endpoint() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(
            "WALLET_ADDRESS",
            "0x000000000000000000000000000000000000dEaD",
        )]))
        .unwrap();
        let unconfigured: Vec<_> = cfg
            .networks
            .iter()
            .filter(|n| n.rpc_url.is_none())
            .map(|n| n.id)
            .collect();
        assert_eq!(unconfigured, vec![NetworkId::Ethereum, NetworkId::Arbitrum]);
        assert!(
            cfg.networks[0]
                .missing_endpoint()
                .unwrap()
                .contains("RPC_URL_ETHEREUM")
        );
        assert!(cfg.networks[1].missing_endpoint().is_none());
    }

    #[test]
    fn rpc_override_replaces_infura_endpoint() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("NETWORKS", "arbitrum"),
            ("RPC_URL_ARBITRUM", "http://localhost:8545"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.networks[0].rpc_url.as_ref().unwrap().as_str(),
            "http://localhost:8545/"
        );
    }

    #[test]
    fn zero_durations_are_rejected() {
        for name in ["SCAN_INTERVAL_SECS", "HTTP_TIMEOUT_SECS"] {
            let err = AppConfig::from_lookup(lookup_from(&[("NETWORKS", "polygon"), (name, "0")]))
                .unwrap_err();
            assert!(matches!(err, AppError::Config(ref msg) if msg.contains(name)));
        }
    }

    #[test]
    fn settings_overrides_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("NETWORKS", "polygon"),
            ("SCAN_INTERVAL_SECS", "3"),
            ("MIN_PROFIT_PERCENT", "1.25"),
            ("MIN_BALANCE_WEI", "42"),
        ]))
        .unwrap();
        assert_eq!(cfg.settings.scan_interval, Duration::from_secs(3));
        assert_eq!(
            cfg.settings.min_profit_percent,
            BigDecimal::from_str("1.25").unwrap()
        );
        assert_eq!(cfg.settings.min_balance_wei, U256::from(42));
    }

    #[test]
    fn malformed_threshold_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("NETWORKS", "polygon"),
            ("MIN_PROFIT_PERCENT", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn tx_link_appends_hash() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("NETWORKS", "bsc")])).unwrap();
        assert_eq!(
            cfg.networks[0].tx_link(&"0xabc"),
            "https://bscscan.com/tx/0xabc"
        );
    }
}
