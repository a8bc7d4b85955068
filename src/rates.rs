//! The `rates` command: prefetch and display rates for a base currency.

use anyhow::{Result, bail};
use comfy_table::Cell;
use tracing::debug;

use crate::config::AppConfig;
use crate::currencies;
use crate::providers::currency_api::CurrencyApiProvider;
use crate::ui;

const DEFAULT_TARGETS: &[&str] = &["EUR", "GBP", "JPY", "INR", "CAD", "AUD", "CHF", "CNY"];

pub async fn run_rates(
    from: &str,
    targets: &[String],
    provider: &CurrencyApiProvider,
    config: &AppConfig,
) -> Result<()> {
    // Unlike the parser, an explicit CLI argument should not silently
    // fall back to USD.
    let Some(from_code) =
        currencies::try_resolve_currency_code(from, &config.domain_mappings, None)
    else {
        bail!("Unknown currency: {from}");
    };

    let rates = provider.fetch_rates(&from_code).await?;
    debug!("Fetched {} rates for {from_code}", rates.len());

    let mut target_codes: Vec<String> = if targets.is_empty() {
        DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect()
    } else {
        targets.iter().map(|t| t.trim().to_uppercase()).collect()
    };
    let preferred = config.target_currency.to_uppercase();
    if !target_codes.contains(&preferred) {
        target_codes.insert(0, preferred);
    }
    target_codes.retain(|code| code != &from_code);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (1 {from_code})")),
    ]);

    for code in &target_codes {
        match rates.get(&code.to_lowercase()) {
            Some(rate) => table.add_row(vec![Cell::new(code), ui::rate_cell(*rate)]),
            None => table.add_row(vec![Cell::new(code), ui::na_cell()]),
        };
    }

    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_rates_command_with_mock_api() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "date": "2025-08-29",
            "usd": {"eur": 0.9213, "gbp": 0.7891, "jpy": 147.02}
        }"#;
        Mock::given(method("GET"))
            .and(path("/usd.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let provider = CurrencyApiProvider::new(&mock_server.uri());
        let config = AppConfig::default();

        // Symbol input resolves through the matcher before the fetch
        let result = run_rates("$", &[], &provider, &config).await;
        assert!(result.is_ok(), "rates failed: {:?}", result.err());
    }

    #[tokio::test]
    async fn test_unknown_base_currency_is_an_error() {
        let provider = CurrencyApiProvider::new("http://localhost:1");
        let config = AppConfig::default();

        let result = run_rates("notacurrency", &[], &provider, &config).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Unknown currency: notacurrency"
        );
    }
}
