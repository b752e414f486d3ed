//! Daily records: the price, oscillator and sentiment of one trading day,
//! aligned into a single date-ordered series.

use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: f64,
    /// `None` until a score is attached, and for days the sentiment source
    /// could not score.
    pub sentiment: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct DailySeries {
    pub symbol: String,
    pub records: Vec<DailyRecord>,
}

impl DailySeries {
    /// Joins bars with their oscillator values, dropping every row whose
    /// oscillator is still warming up. Bars must be sorted by date.
    pub fn from_bars(symbol: &str, bars: &[OhlcvBar], rsi: &IndicatorSeries) -> Self {
        let records = bars
            .iter()
            .zip(&rsi.values)
            .filter_map(|(bar, point)| {
                let value = point.get()?;
                let close = bar.price();
                if !close.is_finite() || close <= 0.0 {
                    return None;
                }
                Some(DailyRecord {
                    date: bar.date,
                    close,
                    rsi: value,
                    sentiment: None,
                })
            })
            .collect();

        Self {
            symbol: symbol.to_string(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    /// Attaches one sentiment score per record, clamped to [-1, 1]. Missing
    /// and non-finite scores leave the day unscored.
    pub fn set_sentiment(&mut self, scores: &[Option<f64>]) {
        debug_assert_eq!(scores.len(), self.records.len());
        for (record, score) in self.records.iter_mut().zip(scores) {
            record.sentiment = score
                .filter(|s| s.is_finite())
                .map(|s| s.clamp(-1.0, 1.0));
        }
    }
}
