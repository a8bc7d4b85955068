pub mod cache;
pub mod config;
pub mod convert;
pub mod currencies;
pub mod log;
pub mod parser;
pub mod providers;
pub mod rate_provider;
pub mod rates;
pub mod store;
pub mod ui;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::providers::caching::CachingRateProvider;
use crate::providers::currency_api::CurrencyApiProvider;

pub enum AppCommand {
    Parse {
        text: String,
        domain: Option<String>,
    },
    Convert {
        text: String,
        domain: Option<String>,
    },
    Rates {
        from: String,
        targets: Vec<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("curman starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Parse { text, domain } => {
            convert::run_parse(&text, domain.as_deref(), &config);
            Ok(())
        }
        AppCommand::Convert { text, domain } => {
            let provider = CurrencyApiProvider::new(config.rates_base_url());
            let provider = CachingRateProvider::new(provider, open_rate_cache());
            convert::run_convert(&text, domain.as_deref(), &provider, &config).await
        }
        AppCommand::Rates { from, targets } => {
            let provider = CurrencyApiProvider::new(config.rates_base_url());
            rates::run_rates(&from, &targets, &provider, &config).await
        }
    }
}

/// Persistent rate cache, or an in-memory one when the cache directory is
/// unavailable (conversion still works, rates are just re-fetched).
fn open_rate_cache() -> Arc<dyn cache::Cache<String, f64>> {
    match store::FjallCache::open_default() {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            debug!("Falling back to in-memory rate cache: {e}");
            Arc::new(cache::MemoryCache::new())
        }
    }
}
