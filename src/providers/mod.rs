//! Exchange-rate providers.

pub mod caching;
pub mod currency_api;
