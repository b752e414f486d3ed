//! RSI (Relative Strength Index) over the adjusted close.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are invalid (need n price changes to compute initial average).
//!
//! The SMA seed makes the first values after warm-up differ from an
//! exponentially weighted seed (pandas-style `rma`); the two converge as the
//! series lengthens.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let prices: Vec<f64> = bars.iter().map(OhlcvBar::price).collect();
    let values = rsi_values(&prices, period)
        .into_iter()
        .zip(bars)
        .map(|(value, bar)| IndicatorPoint {
            date: bar.date,
            valid: value.is_some(),
            value: value.unwrap_or(0.0),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

/// One entry per price; `None` throughout the warm-up.
pub fn rsi_values(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return values;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let gain = |c: f64| if c > 0.0 { c } else { 0.0 };
    let loss = |c: f64| if c < 0.0 { -c } else { 0.0 };

    let mut avg_gain = changes[..period].iter().copied().map(gain).sum::<f64>() / period as f64;
    let mut avg_loss = changes[..period].iter().copied().map(loss).sum::<f64>() / period as f64;
    values[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    let n = period as f64;
    for (i, &change) in changes.iter().enumerate().skip(period) {
        avg_gain = (avg_gain * (n - 1.0) + gain(change)) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss(change)) / n;
        values[i + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
