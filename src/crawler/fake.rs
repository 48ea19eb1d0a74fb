use std::{collections::HashMap, sync::Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::time::Instant;

use crate::{
    crawler::{ProviderError, QuoteProvider},
    declare::{PriceRecord, SeriesSize},
};

/// In-memory provider serving canned newest-first series per symbol.
///
/// Every call is recorded so tests can check fetch counts and sizes.
#[derive(Default)]
pub(crate) struct FakeProvider {
    series: HashMap<String, Vec<PriceRecord>>,
    failures: HashMap<String, ProviderError>,
    calls: Mutex<Vec<(String, SeriesSize, Instant)>>,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn with_series(mut self, symbol: &str, records: Vec<PriceRecord>) -> Self {
        self.series.insert(symbol.to_string(), records);
        self
    }

    pub(crate) fn with_failure(mut self, symbol: &str, why: ProviderError) -> Self {
        self.failures.insert(symbol.to_string(), why);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, SeriesSize)> {
        self.calls
            .lock()
            .map(|calls| {
                calls
                    .iter()
                    .map(|(symbol, size, _)| (symbol.clone(), *size))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 每次呼叫時的 Tokio 時鐘
    pub(crate) fn call_times(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(_, _, at)| *at).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuoteProvider for FakeProvider {
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        size: SeriesSize,
    ) -> Result<Vec<PriceRecord>> {
        self.calls
            .lock()
            .map_err(|_| anyhow!("Failed to lock fake provider calls"))?
            .push((symbol.to_string(), size, Instant::now()));

        if let Some(why) = self.failures.get(symbol) {
            return Err(why.clone().into());
        }

        Ok(self.series.get(symbol).cloned().unwrap_or_default())
    }
}

pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builds a record with a given close; open is one below close.
pub(crate) fn close_on(date: NaiveDate, close: Decimal) -> PriceRecord {
    PriceRecord::new(date, close - Decimal::ONE, close, 0)
}

pub(crate) fn volume_on(date: NaiveDate, volume: u64) -> PriceRecord {
    PriceRecord::new(date, Decimal::ONE, Decimal::ONE, volume)
}
