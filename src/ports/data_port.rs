//! Daily price data port.

use crate::domain::error::DcaError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` with `start_date <= date <= end_date`, sorted
    /// by date. An unknown symbol yields an empty vector.
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, DcaError>;
}
