use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    calculation::window::{self, MonthWindow},
    declare::PriceRecord,
};

/// Average volume of the latest `range_days` trading-day records.
///
/// The sum is divided by `range_days` even when fewer records were kept.
///
/// # Errors
///
/// A zero-day window has no divisor and fails.
pub fn average_volume(records: &[PriceRecord], upper: NaiveDate, range_days: u32) -> Result<u64> {
    let volume_sum: u64 = window::latest_trading_days(records, upper, range_days as usize)
        .iter()
        .map(|record| record.volume)
        .sum();

    volume_sum
        .checked_div(u64::from(range_days))
        .ok_or_else(|| anyhow!("Cannot average volume over a {}-day window", range_days))
}

/// Highest close inside the window, starting from zero.
pub fn highest_close(records: &[PriceRecord], window: &MonthWindow) -> Decimal {
    window
        .select(records)
        .fold(Decimal::ZERO, |max_close, record| {
            if record.close_price > max_close {
                record.close_price
            } else {
                max_close
            }
        })
}

/// 每日收盤價與開盤價的差
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySpread {
    pub date: NaiveDate,
    pub spread: Decimal,
}

/// Close minus open for every record in the window, newest first.
pub fn daily_spreads(records: &[PriceRecord], window: &MonthWindow) -> Vec<DailySpread> {
    window
        .select(records)
        .map(|record| DailySpread {
            date: record.date,
            spread: record.close_price - record.open_price,
        })
        .collect()
}

#[derive(Default)]
struct CloseFold {
    /// 第一筆（最新）收盤價，只寫一次
    first_seen: Option<Decimal>,
    /// 每筆都覆寫，最後留下最舊的收盤價
    last_written: Option<Decimal>,
}

/// First-seen close minus last-written close over the window.
///
/// Walking newest to oldest, that is the newest kept close minus the oldest
/// kept close. An empty window has no value.
pub fn range_return(records: &[PriceRecord], window: &MonthWindow) -> Option<Decimal> {
    let closes = window
        .select(records)
        .fold(CloseFold::default(), |mut fold, record| {
            fold.last_written = Some(record.close_price);
            if fold.first_seen.is_none() {
                fold.first_seen = Some(record.close_price);
            }
            fold
        });

    Some(closes.first_seen? - closes.last_written?)
}

/// Picks the symbol with the largest return, in input order.
///
/// Only a strictly greater return replaces the current best, so the
/// earliest symbol wins ties. Symbols without a value are never picked.
pub fn best_return<'a, I>(returns: I) -> Option<(&'a str, Decimal)>
where
    I: IntoIterator<Item = (&'a str, Option<Decimal>)>,
{
    let mut best: Option<(&'a str, Decimal)> = None;

    for (symbol, value) in returns {
        let Some(value) = value else {
            continue;
        };

        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((symbol, value)),
        }
    }

    best
}
