/// 依日期區間或交易日數篩選日線
pub mod window;
/// 成交量、收盤價、漲跌等統計
pub mod aggregate;
/// 從行情來源取得日線並統計
pub mod daily_quotes;
