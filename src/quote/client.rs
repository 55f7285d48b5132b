use super::QuoteSource;
use crate::errors::{QuoteError, Result};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const TO_TOKEN_AMOUNT: &str = "toTokenAmount";

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "toTokenAmount")]
    to_token_amount: Option<Value>,
}

/// HTTP client for a 1inch-style `/quote` endpoint.
#[derive(Clone, Debug)]
pub struct AggregatorClient {
    http: Client,
}

impl AggregatorClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl QuoteSource for AggregatorClient {
    async fn quote(
        &self,
        api_base: &Url,
        from: Address,
        to: Address,
        amount: U256,
    ) -> std::result::Result<U256, QuoteError> {
        let url = quote_url(api_base, from, to, amount)?;
        debug!(%url, "[QUOTE] requesting");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(QuoteError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        parse_quote_body(&body)
    }
}

/// `{api_base}/quote?fromTokenAddress=..&toTokenAddress=..&amount=..`
pub fn quote_url(
    api_base: &Url,
    from: Address,
    to: Address,
    amount: U256,
) -> std::result::Result<Url, QuoteError> {
    let mut url = Url::parse(&format!(
        "{}/quote",
        api_base.as_str().trim_end_matches('/')
    ))?;
    url.query_pairs_mut()
        .append_pair("fromTokenAddress", &format!("{from:?}"))
        .append_pair("toTokenAddress", &format!("{to:?}"))
        .append_pair("amount", &amount.to_string());
    Ok(url)
}

/// Extract the output amount from a quote body.
///
/// The amount may be a decimal string (1inch) or a plain JSON integer.
pub fn parse_quote_body(body: &str) -> std::result::Result<U256, QuoteError> {
    let parsed: QuoteResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::Malformed(e.to_string()))?;
    match parsed.to_token_amount {
        None | Some(Value::Null) => Err(QuoteError::MissingField(TO_TOKEN_AMOUNT)),
        Some(Value::String(raw)) => U256::from_dec_str(raw.trim())
            .map_err(|e| QuoteError::Malformed(format!("{TO_TOKEN_AMOUNT} `{raw}`: {e}"))),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| QuoteError::Malformed(format!("{TO_TOKEN_AMOUNT} {n} is not a whole amount"))),
        Some(other) => Err(QuoteError::Malformed(format!(
            "{TO_TOKEN_AMOUNT} has unexpected type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn url_carries_the_three_query_parameters() {
        let base = Url::parse("https://api.1inch.io/v5.0/137/").unwrap();
        let from = Address::from_str("0x0d500B1d8E8e7Ea892c3A0e7b8E464521b7cFd5d").unwrap();
        let to = Address::from_str("0x3813e82e6f7098b9583FC0F33a962D02018B6803").unwrap();
        let url = quote_url(&base, from, to, U256::exp10(18)).unwrap();

        assert_eq!(url.path(), "/v5.0/137/quote");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                (
                    "fromTokenAddress".to_string(),
                    "0x0d500b1d8e8e7ea892c3a0e7b8e464521b7cfd5d".to_string()
                ),
                (
                    "toTokenAddress".to_string(),
                    "0x3813e82e6f7098b9583fc0f33a962d02018b6803".to_string()
                ),
                ("amount".to_string(), "1000000000000000000".to_string()),
            ]
        );
    }

    #[test]
    fn parses_string_amount() {
        let body = r#"{"fromToken":{},"toTokenAmount":"820000000000000000","estimatedGas":150000}"#;
        assert_eq!(
            parse_quote_body(body).unwrap(),
            U256::from(820_000_000_000_000_000u64)
        );
    }

    #[test]
    fn parses_numeric_amount() {
        assert_eq!(
            parse_quote_body(r#"{"toTokenAmount": 805}"#).unwrap(),
            U256::from(805)
        );
    }

    #[test]
    fn missing_amount_is_reported() {
        let err = parse_quote_body(r#"{"statusCode":400,"error":"Bad Request"}"#).unwrap_err();
        assert!(matches!(err, QuoteError::MissingField("toTokenAmount")));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            parse_quote_body("<html>rate limited</html>"),
            Err(QuoteError::Malformed(_))
        ));
        assert!(matches!(
            parse_quote_body(r#"{"toTokenAmount":"12abc"}"#),
            Err(QuoteError::Malformed(_))
        ));
        assert!(matches!(
            parse_quote_body(r#"{"toTokenAmount":-5}"#),
            Err(QuoteError::Malformed(_))
        ));
    }
}
