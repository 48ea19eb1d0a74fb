use std::{io::Write, time::Duration};

use anyhow::Result;
use chrono::NaiveDate;

use crate::{
    calculation::daily_quotes,
    config,
    crawler::{alpha_vantage::AlphaVantage, QuoteProvider},
    logging,
};

pub const MISSING_API_KEY_MESSAGE: &str =
    "Please add your API key to app.json (alpha_vantage.api_key) or set ALPHA_VANTAGE_API_KEY";

/// MSFT 最近 7 個交易日的平均成交量
const VOLUME_SYMBOL: &str = "MSFT";
const VOLUME_RANGE_DAYS: u32 = 7;
/// AAPL 最近 6 個月的最高收盤價
const HIGHEST_CLOSE_SYMBOL: &str = "AAPL";
const HIGHEST_CLOSE_RANGE_MONTHS: u32 = 6;
/// BA 最近 1 個月每日的開收盤差
const SPREAD_SYMBOL: &str = "BA";
const SPREAD_RANGE_MONTHS: u32 = 1;
/// 最近 1 個月報酬最高的股票
const RETURN_SYMBOLS: [&str; 3] = ["MSFT", "AAPL", "BA"];
const RETURN_RANGE_MONTHS: u32 = 1;

/// 沒有 API key 時只印出提示，不發出任何請求
pub async fn start<W: Write>(settings: &config::App, today: NaiveDate, out: &mut W) -> Result<()> {
    if !settings.has_api_key() {
        writeln!(out, "{}", MISSING_API_KEY_MESSAGE)?;
        return Ok(());
    }

    let provider = AlphaVantage::from(&settings.alpha_vantage);
    let pause = Duration::from_secs(settings.driver.rate_limit_pause_secs);

    run(&provider, today, pause, out).await
}

/// Runs the fixed report against `provider`, writing one line per statistic.
///
/// Every step runs after the previous one finished. `pause` is slept after
/// the first three steps so the per-symbol calls of the last step stay
/// under the provider's per-minute limit. Any failure ends the run.
pub async fn run<W: Write>(
    provider: &dyn QuoteProvider,
    today: NaiveDate,
    pause: Duration,
    out: &mut W,
) -> Result<()> {
    logging::info_file_async(format!("daily report for {} started", today));

    let volume =
        daily_quotes::average_volume(provider, VOLUME_SYMBOL, today, VOLUME_RANGE_DAYS).await?;
    writeln!(out, "{}", volume)?;

    let highest = daily_quotes::highest_closing_price(
        provider,
        HIGHEST_CLOSE_SYMBOL,
        today,
        HIGHEST_CLOSE_RANGE_MONTHS,
    )
    .await?;
    writeln!(out, "{}", highest)?;

    let spreads =
        daily_quotes::daily_price_diff(provider, SPREAD_SYMBOL, today, SPREAD_RANGE_MONTHS)
            .await?;
    for spread in &spreads {
        writeln!(out, "{}", spread)?;
    }

    // 前三個步驟已用掉 3 次呼叫，先休息再繼續
    logging::info_file_async(format!("pausing {:?} for the rate limit", pause));
    tokio::time::sleep(pause).await;

    let best =
        daily_quotes::max_month_return(provider, &RETURN_SYMBOLS, today, RETURN_RANGE_MONTHS)
            .await?;
    if best.leader.is_none() {
        logging::warn_file_async(format!("no return found for {:?}", RETURN_SYMBOLS));
    }
    writeln!(out, "{}", best)?;

    logging::info_file_async(format!("daily report for {} finished", today));

    Ok(())
}
