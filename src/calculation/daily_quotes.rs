use std::fmt;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    calculation::{
        aggregate::{self, DailySpread},
        window::MonthWindow,
    },
    crawler::QuoteProvider,
    declare::SeriesSize,
    logging,
    util::datetime,
};

/// 平均成交量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AverageVolume {
    pub symbol: String,
    pub range_days: u32,
    pub average: u64,
}

impl fmt::Display for AverageVolume {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Average {} day volume for {}: {}",
            self.range_days, self.symbol, self.average
        )
    }
}

/// 區間最高收盤價
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighestClose {
    pub symbol: String,
    pub range_months: u32,
    pub max_close: Decimal,
}

impl fmt::Display for HighestClose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Maximum {} month closing price for {}: {}",
            self.range_months, self.symbol, self.max_close
        )
    }
}

impl fmt::Display for DailySpread {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "On {}, open/close variance was {}",
            datetime::to_short_date(self.date),
            self.spread
        )
    }
}

/// 報酬最高的股票，沒有任何報酬時為 `None`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestReturn {
    pub range_months: u32,
    pub leader: Option<(String, Decimal)>,
}

impl fmt::Display for BestReturn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.leader {
            Some((symbol, value)) => write!(
                f,
                "{} had the largest return for {} month with {}",
                symbol, self.range_months, value
            ),
            None => write!(f, "No symbol had a return for {} month", self.range_months),
        }
    }
}

/// Average volume over the latest `range_days` trading days up to `upper`.
///
/// Uses a compact fetch.
pub async fn average_volume(
    provider: &dyn QuoteProvider,
    symbol: &str,
    upper: NaiveDate,
    range_days: u32,
) -> Result<AverageVolume> {
    let records = provider
        .fetch_daily_series(symbol, SeriesSize::Compact)
        .await?;
    let average = aggregate::average_volume(&records, upper, range_days)?;

    Ok(AverageVolume {
        symbol: symbol.to_string(),
        range_days,
        average,
    })
}

/// Highest close over the trailing `range_months` calendar months.
///
/// Uses a full fetch.
pub async fn highest_closing_price(
    provider: &dyn QuoteProvider,
    symbol: &str,
    upper: NaiveDate,
    range_months: u32,
) -> Result<HighestClose> {
    let window = MonthWindow::trailing(upper, range_months)?;
    let records = provider
        .fetch_daily_series(symbol, SeriesSize::Full)
        .await?;

    Ok(HighestClose {
        symbol: symbol.to_string(),
        range_months,
        max_close: aggregate::highest_close(&records, &window),
    })
}

/// Daily close minus open over the trailing `range_months`, newest first.
///
/// Uses a full fetch.
pub async fn daily_price_diff(
    provider: &dyn QuoteProvider,
    symbol: &str,
    upper: NaiveDate,
    range_months: u32,
) -> Result<Vec<DailySpread>> {
    let window = MonthWindow::trailing(upper, range_months)?;
    let records = provider
        .fetch_daily_series(symbol, SeriesSize::Full)
        .await?;

    Ok(aggregate::daily_spreads(&records, &window))
}

/// Newest minus oldest close over the trailing `range_months`.
///
/// Uses a compact fetch. `None` when no record falls in the window.
pub async fn range_return(
    provider: &dyn QuoteProvider,
    symbol: &str,
    upper: NaiveDate,
    range_months: u32,
) -> Result<Option<Decimal>> {
    let window = MonthWindow::trailing(upper, range_months)?;
    let records = provider
        .fetch_daily_series(symbol, SeriesSize::Compact)
        .await?;

    Ok(aggregate::range_return(&records, &window))
}

/// Symbol with the largest range return among `symbols`.
///
/// Symbols are fetched one after another in the given order.
pub async fn max_month_return(
    provider: &dyn QuoteProvider,
    symbols: &[&str],
    upper: NaiveDate,
    range_months: u32,
) -> Result<BestReturn> {
    let mut returns = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let symbol_return = range_return(provider, symbol, upper, range_months).await?;
        logging::debug_file_async(format!(
            "{} return for {} month was {:?}",
            symbol, range_months, symbol_return
        ));
        returns.push((*symbol, symbol_return));
    }

    Ok(BestReturn {
        range_months,
        leader: aggregate::best_return(returns)
            .map(|(symbol, value)| (symbol.to_string(), value)),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::{
        crawler::{
            fake::{close_on, volume_on, ymd, FakeProvider},
            ProviderError,
        },
        declare::PriceRecord,
    };

    use super::*;

    fn today() -> NaiveDate {
        ymd(2020, 4, 4)
    }

    fn day(date: NaiveDate, open: &str, close: &str) -> PriceRecord {
        PriceRecord::new(date, open.parse().unwrap(), close.parse().unwrap(), 0)
    }

    #[tokio::test]
    async fn test_average_volume_compact_fetch() {
        let provider = FakeProvider::new().with_series(
            "MSFT",
            vec![
                volume_on(ymd(2020, 4, 3), 10),
                volume_on(ymd(2020, 4, 2), 20),
                volume_on(ymd(2020, 4, 1), 30),
                volume_on(ymd(2020, 3, 31), 40),
                volume_on(ymd(2020, 3, 30), 50),
            ],
        );

        let result = average_volume(&provider, "MSFT", today(), 7).await.unwrap();
        assert_eq!(result.average, 21);
        assert_eq!(result.to_string(), "Average 7 day volume for MSFT: 21");
        assert_eq!(
            provider.calls(),
            vec![("MSFT".to_string(), SeriesSize::Compact)]
        );
    }

    #[tokio::test]
    async fn test_average_volume_zero_days_propagates() {
        let provider =
            FakeProvider::new().with_series("MSFT", vec![volume_on(ymd(2020, 4, 3), 10)]);
        assert!(average_volume(&provider, "MSFT", today(), 0).await.is_err());
    }

    #[tokio::test]
    async fn test_highest_closing_price_full_fetch() {
        let provider = FakeProvider::new().with_series(
            "AAPL",
            vec![
                close_on(ymd(2020, 4, 3), dec!(241.41)),
                close_on(ymd(2020, 2, 12), dec!(327.20)),
                close_on(ymd(2019, 10, 4), dec!(227.01)),
                close_on(ymd(2019, 10, 3), dec!(500)),
            ],
        );

        let result = highest_closing_price(&provider, "AAPL", today(), 6)
            .await
            .unwrap();
        assert_eq!(result.max_close, dec!(327.20));
        assert_eq!(
            result.to_string(),
            "Maximum 6 month closing price for AAPL: 327.20"
        );
        assert_eq!(provider.calls(), vec![("AAPL".to_string(), SeriesSize::Full)]);
    }

    #[tokio::test]
    async fn test_daily_price_diff_lines() {
        let provider = FakeProvider::new().with_series(
            "BA",
            vec![
                day(ymd(2020, 4, 3), "120.00", "115.50"),
                day(ymd(2020, 3, 4), "300.00", "310.25"),
                day(ymd(2020, 3, 3), "1", "2"),
            ],
        );

        let lines: Vec<String> = daily_price_diff(&provider, "BA", today(), 1)
            .await
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                "On 4/3/2020, open/close variance was -4.50",
                "On 3/4/2020, open/close variance was 10.25",
            ]
        );
        assert_eq!(provider.calls(), vec![("BA".to_string(), SeriesSize::Full)]);
    }

    #[tokio::test]
    async fn test_range_return_empty_window() {
        let provider = FakeProvider::new();
        let result = range_return(&provider, "BA", today(), 1).await.unwrap();
        assert_eq!(result, None);
        assert_eq!(provider.calls(), vec![("BA".to_string(), SeriesSize::Compact)]);
    }

    #[tokio::test]
    async fn test_max_month_return_fetches_each_symbol_fresh() {
        let provider = FakeProvider::new()
            .with_series(
                "MSFT",
                vec![
                    close_on(ymd(2020, 4, 3), dec!(155)),
                    close_on(ymd(2020, 3, 4), dec!(150)),
                ],
            )
            .with_series(
                "AAPL",
                vec![
                    close_on(ymd(2020, 4, 3), dec!(245)),
                    close_on(ymd(2020, 3, 5), dec!(240)),
                ],
            )
            .with_series(
                "BA",
                vec![
                    close_on(ymd(2020, 4, 3), dec!(309)),
                    close_on(ymd(2020, 3, 6), dec!(300)),
                ],
            );

        let result = max_month_return(&provider, &["MSFT", "AAPL", "BA", "MSFT"], today(), 1)
            .await
            .unwrap();
        assert_eq!(result.leader, Some(("BA".to_string(), dec!(9))));
        assert_eq!(
            result.to_string(),
            "BA had the largest return for 1 month with 9"
        );
        assert_eq!(
            provider.calls(),
            vec![
                ("MSFT".to_string(), SeriesSize::Compact),
                ("AAPL".to_string(), SeriesSize::Compact),
                ("BA".to_string(), SeriesSize::Compact),
                ("MSFT".to_string(), SeriesSize::Compact),
            ]
        );
    }

    #[tokio::test]
    async fn test_max_month_return_no_winner() {
        let provider = FakeProvider::new();

        let result = max_month_return(&provider, &["MSFT", "AAPL"], today(), 1)
            .await
            .unwrap();
        assert_eq!(result.leader, None);
        assert_eq!(result.to_string(), "No symbol had a return for 1 month");

        let result = max_month_return(&provider, &[], today(), 1).await.unwrap();
        assert_eq!(result.leader, None);
    }

    #[tokio::test]
    async fn test_max_month_return_stops_on_provider_error() {
        let provider = FakeProvider::new().with_failure(
            "AAPL",
            ProviderError::RateLimited {
                symbol: "AAPL".to_string(),
                message: "Note".to_string(),
            },
        );

        let why = max_month_return(&provider, &["MSFT", "AAPL", "BA"], today(), 1)
            .await
            .unwrap_err();
        assert!(why.downcast_ref::<ProviderError>().is_some());
        assert_eq!(provider.calls().len(), 2);
    }
}
