//! Miscellaneous helper utilities.

use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Scheme and host of an endpoint, without path or query.
///
/// RPC URLs can embed API keys in the path; only this form is logged.
pub fn redact_url(url: &Url) -> String {
    match url.host_str() {
        Some(host) => match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        },
        None => url.scheme().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redaction_drops_api_key_path() {
        let url = Url::parse("https://mainnet.infura.io/v3/secret-key").unwrap();
        assert_eq!(redact_url(&url), "https://mainnet.infura.io");
    }

    #[test]
    fn redaction_keeps_explicit_port() {
        let url = Url::parse("http://127.0.0.1:8545/").unwrap();
        assert_eq!(redact_url(&url), "http://127.0.0.1:8545");
    }
}
