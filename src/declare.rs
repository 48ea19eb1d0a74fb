use chrono::NaiveDate;
use rust_decimal::Decimal;
use strum::{AsRefStr, Display};

/// 單一交易日的行情
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open_price: Decimal,
    pub close_price: Decimal,
    pub volume: u64,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, open_price: Decimal, close_price: Decimal, volume: u64) -> Self {
        PriceRecord {
            date,
            open_price,
            close_price,
            volume,
        }
    }
}

/// 日線資料的取得範圍
///
/// `Compact` 大約是最近 100 個交易日，`Full` 為全部歷史資料。
#[derive(Debug, Copy, Clone, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SeriesSize {
    Compact,
    Full,
}
