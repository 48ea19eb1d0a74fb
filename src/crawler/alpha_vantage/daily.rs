use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use concat_string::concat_string;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{
    crawler::{alpha_vantage::AlphaVantage, ProviderError, QuoteProvider},
    declare::{PriceRecord, SeriesSize},
    logging,
    util::{self, datetime, text},
};

/// `TIME_SERIES_DAILY` 回應
///
/// 錯誤時不會有 `Time Series (Daily)`，而是 `Error Message`、`Note` 或 `Information` 其中之一。
#[derive(Deserialize, Debug)]
struct DailySeries {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, DailyBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// 單日資料，數值皆為字串
#[derive(Deserialize, Debug)]
struct DailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

impl AlphaVantage {
    fn daily_series_url(&self, symbol: &str, size: SeriesSize) -> String {
        concat_string!(
            self.base_url.trim_end_matches('/'),
            "/query?function=TIME_SERIES_DAILY&symbol=",
            urlencoding::encode(symbol),
            "&outputsize=",
            size.as_ref(),
            "&apikey=",
            urlencoding::encode(&self.api_key)
        )
    }
}

/// Converts a decoded payload into records ordered newest first.
fn into_records(symbol: &str, payload: DailySeries) -> Result<Vec<PriceRecord>, ProviderError> {
    if let Some(message) = payload.error_message {
        return Err(ProviderError::Api {
            symbol: symbol.to_string(),
            message,
        });
    }

    let time_series = match payload.time_series {
        Some(time_series) => time_series,
        None => {
            return Err(match payload.note.or(payload.information) {
                Some(message) => ProviderError::RateLimited {
                    symbol: symbol.to_string(),
                    message,
                },
                None => malformed(symbol, "missing \"Time Series (Daily)\""),
            })
        }
    };

    let mut records = Vec::with_capacity(time_series.len());
    for (date, bar) in time_series {
        let date = datetime::parse_date(&date).map_err(|why| malformed(symbol, why))?;
        let open_price = text::parse_decimal(&bar.open, None).map_err(|why| malformed(symbol, why))?;
        let close_price =
            text::parse_decimal(&bar.close, None).map_err(|why| malformed(symbol, why))?;
        let volume = text::parse_u64(&bar.volume, None).map_err(|why| malformed(symbol, why))?;

        records.push(PriceRecord::new(date, open_price, close_price, volume));
    }

    records.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(records)
}

fn malformed(symbol: &str, reason: impl ToString) -> ProviderError {
    ProviderError::Malformed {
        symbol: symbol.to_string(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantage {
    /// 取得指定股票的日線資料（未還原權息），日期由新到舊。
    ///
    /// 不重試；任何錯誤都以 `ProviderError` 回傳給呼叫端。
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        size: SeriesSize,
    ) -> Result<Vec<PriceRecord>> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey.into());
        }

        let url = self.daily_series_url(symbol, size);
        let res = util::http::get_response(&url, None)
            .await
            .map_err(|why| ProviderError::Transport {
                symbol: symbol.to_string(),
                reason: format!("{:#}", why),
            })?;

        match res.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProviderError::RateLimited {
                    symbol: symbol.to_string(),
                    message: "HTTP 429".to_string(),
                }
                .into())
            }
            status if !status.is_success() => {
                return Err(ProviderError::Status {
                    symbol: symbol.to_string(),
                    status: status.as_u16(),
                }
                .into())
            }
            _ => {}
        }

        let payload = util::http::json_body::<DailySeries>(res)
            .await
            .map_err(|why| malformed(symbol, format!("{:#}", why)))?;

        match into_records(symbol, payload) {
            Ok(records) => {
                logging::info_file_async(format!(
                    "alpha vantage {} {} returned {} daily records",
                    symbol,
                    size,
                    records.len()
                ));
                Ok(records)
            }
            Err(why) => {
                logging::error_file_async(format!(
                    "Failed to alpha_vantage::fetch_daily_series({}) because {}",
                    symbol, why
                ));
                Err(why.into())
            }
        }
    }
}
