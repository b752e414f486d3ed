//! News article port.

use crate::domain::sentiment::NewsFetch;
use chrono::NaiveDate;

/// A source of news articles. Failures are reported in the returned
/// [`NewsFetch`] rather than raised.
pub trait NewsPort {
    fn name(&self) -> &str;

    fn fetch_articles(&self, symbol: &str, start_date: NaiveDate, end_date: NaiveDate)
        -> NewsFetch;
}

/// Coin ticker used by news sources: `BTC-USD` -> `BTC`.
pub fn coin_of(symbol: &str) -> &str {
    symbol.split('-').next().unwrap_or(symbol)
}
