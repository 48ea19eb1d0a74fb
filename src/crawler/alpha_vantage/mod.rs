//! # Alpha Vantage 行情採集模組
//!
//! 透過 Alpha Vantage REST API 取得美股日線資料。
//!
//! ## 支援功能
//!
//! - **日線 (`daily`)**：`TIME_SERIES_DAILY`，可選 `compact`（約最近 100 個交易日）或 `full`。
//!
//! ## 站點資訊
//!
//! - 來源域名：`www.alphavantage.co`
//! - 存取方式：HTTP GET，API Key 以 query string 傳遞
//! - 免費方案限制：每分鐘 5 次

use crate::config;

/// 日線採集子模組
pub mod daily;

/// Alpha Vantage 行情採集器
pub struct AlphaVantage {
    base_url: String,
    api_key: String,
}

impl AlphaVantage {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        AlphaVantage {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl From<&config::AlphaVantage> for AlphaVantage {
    fn from(settings: &config::AlphaVantage) -> Self {
        AlphaVantage::new(settings.base_url.trim(), settings.api_key.trim())
    }
}
