use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::declare::{PriceRecord, SeriesSize};

/// Alpha Vantage
pub mod alpha_vantage;
/// 測試用的記憶體行情來源
#[cfg(test)]
pub(crate) mod fake;

/// 日線行情來源
///
/// Implementations return the records of a single symbol ordered by date,
/// newest first. Aggregations rely on that order and never re-sort.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_daily_series(&self, symbol: &str, size: SeriesSize)
        -> Result<Vec<PriceRecord>>;
}

/// Failures reported by a quote provider.
///
/// They are returned inside `anyhow::Error` and are not recovered from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("API key is not set")]
    MissingApiKey,
    #[error("{symbol}: request failed: {reason}")]
    Transport { symbol: String, reason: String },
    #[error("{symbol}: unexpected HTTP status {status}")]
    Status { symbol: String, status: u16 },
    #[error("{symbol}: rate limit exceeded: {message}")]
    RateLimited { symbol: String, message: String },
    #[error("{symbol}: API error: {message}")]
    Api { symbol: String, message: String },
    #[error("{symbol}: malformed payload: {reason}")]
    Malformed { symbol: String, reason: String },
}
