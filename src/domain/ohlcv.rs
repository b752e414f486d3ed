//! Daily OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Price used for valuation: the adjusted close, or the raw close when the
    /// source carries no usable adjustment.
    pub fn price(&self) -> f64 {
        if self.adj_close.is_finite() && self.adj_close > 0.0 {
            self.adj_close
        } else {
            self.close
        }
    }
}
