//! Parse-and-convert orchestration and the `parse`/`convert` commands.

use anyhow::Result;
use tracing::debug;

use crate::config::AppConfig;
use crate::currencies::format_amount;
use crate::parser::{self, ParsedAmount};
use crate::rate_provider::RateProvider;
use crate::ui::{StyleType, style_text};

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub parsed: ParsedAmount,
    pub target_currency: String,
    pub rate: f64,
    pub converted: f64,
}

pub struct Converter<'a> {
    provider: &'a dyn RateProvider,
    config: &'a AppConfig,
}

impl<'a> Converter<'a> {
    pub fn new(provider: &'a dyn RateProvider, config: &'a AppConfig) -> Self {
        Converter { provider, config }
    }

    /// Detects an amount in `text` and converts it into the configured
    /// target currency. `Ok(None)` means the text holds no amount; a rate
    /// lookup failure is an error for the caller to surface.
    pub async fn convert_text(
        &self,
        text: &str,
        domain: Option<&str>,
    ) -> Result<Option<Conversion>> {
        let Some(parsed) = parser::parse_amount(text, &self.config.domain_mappings, domain) else {
            return Ok(None);
        };
        debug!("Parsed amount: {parsed:?}");

        let target = self.config.target_currency.to_uppercase();
        let rate = if parsed.currency_code == target {
            1.0
        } else {
            self.provider
                .get_rate(&parsed.currency_code, &target)
                .await?
        };

        Ok(Some(Conversion {
            converted: parsed.value * rate,
            parsed,
            target_currency: target,
            rate,
        }))
    }
}

/// The `parse` command: detection only, no network.
pub fn run_parse(text: &str, domain: Option<&str>, config: &AppConfig) {
    match parser::parse_amount(text, &config.domain_mappings, domain) {
        Some(parsed) => {
            println!(
                "{} {}",
                style_text(&parsed.currency_code, StyleType::Label),
                style_text(&parsed.value.to_string(), StyleType::Value),
            );
        }
        None => println!("{}", style_text("No currency amount found", StyleType::Subtle)),
    }
}

/// The `convert` command.
pub async fn run_convert(
    text: &str,
    domain: Option<&str>,
    provider: &dyn RateProvider,
    config: &AppConfig,
) -> Result<()> {
    let converter = Converter::new(provider, config);
    match converter.convert_text(text, domain).await? {
        Some(conversion) => {
            println!(
                "{} = {}",
                format_amount(&conversion.parsed.currency_code, conversion.parsed.value),
                style_text(
                    &format!("{:.2} {}", conversion.converted, conversion.target_currency),
                    StyleType::Value,
                ),
            );
            println!(
                "{}",
                style_text(
                    &format!(
                        "1 {} = {} {}",
                        conversion.parsed.currency_code,
                        conversion.rate,
                        conversion.target_currency
                    ),
                    StyleType::Subtle,
                ),
            );
        }
        None => println!("{}", style_text("No currency amount found", StyleType::Subtle)),
    }
    Ok(())
}
