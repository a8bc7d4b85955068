//! Exchange-rate lookup abstraction.

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Rate to multiply an amount in `from` by to express it in `to`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}
