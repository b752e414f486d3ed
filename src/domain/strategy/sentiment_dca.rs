//! Sentiment-driven buy/hold/sell ("News Sentiment DCA").
//!
//! Daily weight: 2 when s > 0.3, 1 when 0 <= s <= 0.3, otherwise 0. Weights
//! are normalized per month onto the budget. Separately, on any day with
//! s < -0.3 a fraction of the held units is sold into a cash reserve. Days
//! without a score weigh 0 and never sell.

use crate::domain::budget::normalize_monthly;
use crate::domain::daily::DailySeries;
use crate::domain::portfolio::PortfolioState;

pub const AGGRESSIVE_BUY_THRESHOLD: f64 = 0.3;
pub const SELL_THRESHOLD: f64 = -0.3;
pub const DEFAULT_SELL_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentDcaParams {
    pub monthly_budget: f64,
    pub sell_fraction: f64,
}

impl SentimentDcaParams {
    pub fn new(monthly_budget: f64) -> Self {
        SentimentDcaParams {
            monthly_budget,
            sell_fraction: DEFAULT_SELL_FRACTION,
        }
    }
}

pub fn sentiment_weight(score: f64) -> f64 {
    if score > AGGRESSIVE_BUY_THRESHOLD {
        2.0
    } else if score >= 0.0 && score <= AGGRESSIVE_BUY_THRESHOLD {
        1.0
    } else {
        0.0
    }
}

pub fn simulate_sentiment_dca(series: &DailySeries, params: &SentimentDcaParams) -> PortfolioState {
    let weights: Vec<f64> = series
        .records
        .iter()
        .map(|r| r.sentiment.map_or(0.0, sentiment_weight))
        .collect();
    let amounts = normalize_monthly(&series.dates(), &weights, params.monthly_budget);

    let mut portfolio = PortfolioState::new();
    for (record, &amount) in series.records.iter().zip(&amounts) {
        portfolio.buy(record.date, amount, record.close);
        let bearish = record.sentiment.is_some_and(|s| s < SELL_THRESHOLD);
        if bearish && portfolio.units_held > 0.0 {
            portfolio.sell_fraction(record.date, params.sell_fraction, record.close);
        }
        portfolio.record_equity(record.date, record.close);
    }
    portfolio
}
