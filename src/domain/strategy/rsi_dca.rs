//! Oscillator-sized daily buy ("RSI-based DCA").
//!
//! | RSI            | raw buy   |
//! |----------------|-----------|
//! | < 30           | `buy_low` |
//! | 30 <= r < 40   | `buy_mid` |
//! | >= 40, > 70    | 0         |

use crate::domain::budget::normalize_monthly;
use crate::domain::daily::DailySeries;
use crate::domain::portfolio::PortfolioState;
use crate::domain::strategy::accumulate_buys;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_BUY_CEILING: f64 = 40.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RsiDcaParams {
    pub buy_low: f64,
    pub buy_mid: f64,
}

impl Default for RsiDcaParams {
    fn default() -> Self {
        RsiDcaParams {
            buy_low: 150.0,
            buy_mid: 100.0,
        }
    }
}

pub fn raw_buy_amount(rsi: f64, params: &RsiDcaParams) -> f64 {
    if rsi > RSI_OVERBOUGHT {
        0.0
    } else if rsi < RSI_OVERSOLD {
        params.buy_low
    } else if rsi >= RSI_OVERSOLD && rsi < RSI_BUY_CEILING {
        params.buy_mid
    } else {
        0.0
    }
}

pub fn raw_buy_amounts(series: &DailySeries, params: &RsiDcaParams) -> Vec<f64> {
    series
        .records
        .iter()
        .map(|r| raw_buy_amount(r.rsi, params))
        .collect()
}

/// With `monthly_budget` set, each month's raw amounts are rescaled so the
/// month spends exactly that budget.
pub fn simulate_rsi_dca(
    series: &DailySeries,
    params: &RsiDcaParams,
    monthly_budget: Option<f64>,
) -> PortfolioState {
    let raw = raw_buy_amounts(series, params);
    let amounts = match monthly_budget {
        Some(target) => normalize_monthly(&series.dates(), &raw, target),
        None => raw,
    };
    accumulate_buys(series, &amounts)
}
