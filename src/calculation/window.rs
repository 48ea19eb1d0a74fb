//! Record selection over a newest-first daily series.
//!
//! Both selections assume the input is ordered by date descending and rely
//! on that order to stop early; neither re-sorts nor validates it.

use anyhow::Result;
use chrono::NaiveDate;

use crate::{declare::PriceRecord, util::datetime};

/// Keeps the first `range_days` records dated on or before `upper`.
///
/// This counts available trading-day records, not calendar days. Scanning
/// stops as soon as the kept count equals `range_days` or the input runs out.
pub fn latest_trading_days(
    records: &[PriceRecord],
    upper: NaiveDate,
    range_days: usize,
) -> Vec<&PriceRecord> {
    let mut kept = Vec::with_capacity(range_days.min(records.len()));

    for record in records {
        if record.date <= upper {
            kept.push(record);
        }

        if kept.len() == range_days {
            break;
        }
    }

    kept
}

/// Calendar window `[lower, upper]`, where `lower` is `upper` minus a number
/// of calendar months.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    pub upper: NaiveDate,
    pub lower: NaiveDate,
}

impl MonthWindow {
    pub fn trailing(upper: NaiveDate, range_months: u32) -> Result<Self> {
        Ok(MonthWindow {
            upper,
            lower: datetime::months_before(upper, range_months)?,
        })
    }

    /// Yields records inside the window, newest first.
    ///
    /// The scan ends at the first record strictly older than `lower`;
    /// records newer than `upper` are skipped.
    pub fn select<'a>(
        &self,
        records: &'a [PriceRecord],
    ) -> impl Iterator<Item = &'a PriceRecord> + 'a {
        let MonthWindow { upper, lower } = *self;

        records
            .iter()
            .take_while(move |record| record.date >= lower)
            .filter(move |record| record.date <= upper)
    }
}

#[cfg(test)]
mod tests {
    use crate::crawler::fake::{volume_on, ymd};

    use super::*;

    fn series() -> Vec<PriceRecord> {
        vec![
            volume_on(ymd(2020, 4, 6), 60),
            volume_on(ymd(2020, 4, 3), 50),
            volume_on(ymd(2020, 4, 2), 40),
            volume_on(ymd(2020, 3, 5), 30),
            volume_on(ymd(2020, 3, 4), 20),
            volume_on(ymd(2020, 3, 3), 10),
        ]
    }

    #[test]
    fn test_latest_trading_days_skips_future_records() {
        let records = series();
        let kept = latest_trading_days(&records, ymd(2020, 4, 4), 3);
        let volumes: Vec<_> = kept.iter().map(|r| r.volume).collect();
        assert_eq!(volumes, vec![50, 40, 30]);
    }

    #[test]
    fn test_latest_trading_days_runs_out() {
        let records = series();
        let kept = latest_trading_days(&records, ymd(2020, 4, 4), 10);
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn test_latest_trading_days_zero() {
        let records = series();
        assert!(latest_trading_days(&records, ymd(2020, 4, 4), 0).is_empty());
    }

    #[test]
    fn test_month_window_bounds() {
        let window = MonthWindow::trailing(ymd(2020, 4, 4), 1).unwrap();
        assert_eq!(window.lower, ymd(2020, 3, 4));
        assert_eq!(window.upper, ymd(2020, 4, 4));
    }

    #[test]
    fn test_month_window_select_is_inclusive() {
        let records = series();
        let window = MonthWindow::trailing(ymd(2020, 4, 4), 1).unwrap();
        let dates: Vec<_> = window.select(&records).map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![ymd(2020, 4, 3), ymd(2020, 4, 2), ymd(2020, 3, 5), ymd(2020, 3, 4)]
        );
        assert!(dates
            .iter()
            .all(|d| *d >= window.lower && *d <= window.upper));
    }

    #[test]
    fn test_month_window_stops_at_first_older_record() {
        // 違反排序前提時，遇到第一筆早於下限的資料就停止
        let records = vec![
            volume_on(ymd(2020, 4, 3), 1),
            volume_on(ymd(2020, 1, 1), 2),
            volume_on(ymd(2020, 4, 1), 3),
        ];
        let window = MonthWindow::trailing(ymd(2020, 4, 4), 1).unwrap();
        assert_eq!(window.select(&records).count(), 1);
    }

    #[test]
    fn test_month_window_empty_series() {
        let window = MonthWindow::trailing(ymd(2020, 4, 4), 6).unwrap();
        assert_eq!(window.select(&[]).count(), 0);
    }
}
