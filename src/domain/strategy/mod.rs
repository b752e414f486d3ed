//! Strategy simulators.
//!
//! Each simulator consumes the ordered daily series and produces a
//! [`PortfolioState`], touching every trading day exactly once in date order.

pub mod rsi_dca;
pub mod sentiment_dca;
pub mod sip;

use crate::domain::daily::DailySeries;
use crate::domain::portfolio::PortfolioState;
use std::fmt;

pub use rsi_dca::{simulate_rsi_dca, RsiDcaParams};
pub use sentiment_dca::{simulate_sentiment_dca, SentimentDcaParams};
pub use sip::simulate_sip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Sip,
    RsiDca,
    SentimentDca,
}

impl StrategyKind {
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::Sip => "Benchmark SIP",
            StrategyKind::RsiDca => "RSI-Based DCA",
            StrategyKind::SentimentDca => "News Sentiment DCA",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buys `amounts[i]` at each day's close and records the day's value.
/// Buy-only strategies share this accumulation.
pub fn accumulate_buys(series: &DailySeries, amounts: &[f64]) -> PortfolioState {
    debug_assert_eq!(series.len(), amounts.len());
    let mut portfolio = PortfolioState::new();
    for (record, &amount) in series.records.iter().zip(amounts) {
        portfolio.buy(record.date, amount, record.close);
        portfolio.record_equity(record.date, record.close);
    }
    portfolio
}
