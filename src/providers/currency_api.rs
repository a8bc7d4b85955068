//! Client for the fawazahmed0 currency API.
//!
//! One request per base currency: `GET <base>/{from}.json` returns a JSON
//! object keyed by the lowercase base code whose value maps lowercase
//! target codes to rates.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::rate_provider::RateProvider;

pub const DEFAULT_BASE_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct CurrencyApiProvider {
    base_url: String,
}

impl CurrencyApiProvider {
    pub fn new(base_url: &str) -> Self {
        CurrencyApiProvider {
            base_url: base_url.to_string(),
        }
    }

    /// Fetches every rate published for `from`, keyed by lowercase target
    /// code. The response also carries non-rate keys (e.g. a date stamp),
    /// hence the untyped decode.
    pub async fn fetch_rates(&self, from: &str) -> Result<HashMap<String, f64>> {
        let from_key = from.to_lowercase();
        let url = format!("{}/{}.json", self.base_url, from_key);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("curman/0.2")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency: {} URL: {}", e, from, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency: {}",
                response.status(),
                from
            ));
        }

        let text = response.text().await?;
        let data: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rates response for {}: {}", from, e))?;

        let rates = data
            .get(&from_key)
            .and_then(|v| v.as_object())
            .ok_or_else(|| anyhow!("Currency {} not found in rates response", from))?;

        Ok(rates
            .iter()
            .filter_map(|(code, rate)| rate.as_f64().map(|r| (code.clone(), r)))
            .collect())
    }
}

#[async_trait]
impl RateProvider for CurrencyApiProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let rates = self.fetch_rates(from).await?;
        rates
            .get(&to.to_lowercase())
            .copied()
            .ok_or_else(|| anyhow!("Exchange rate for {} not found", to))
    }
}
