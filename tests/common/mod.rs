#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use dcatrader::domain::daily::{DailyRecord, DailySeries};
use dcatrader::domain::error::DcaError;
pub use dcatrader::domain::ohlcv::OhlcvBar;
use dcatrader::domain::sentiment::{Article, NewsFetch};
use dcatrader::ports::data_port::DataPort;
use dcatrader::ports::news_port::NewsPort;
use std::cell::Cell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, DcaError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DcaError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// News provider returning a fixed outcome and counting calls.
pub struct MockNewsPort {
    pub name: String,
    pub outcome: NewsFetch,
    pub calls: Cell<usize>,
}

impl MockNewsPort {
    pub fn new(name: &str, outcome: NewsFetch) -> Self {
        Self {
            name: name.to_string(),
            outcome,
            calls: Cell::new(0),
        }
    }
}

impl NewsPort for MockNewsPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_articles(&self, _symbol: &str, _start: NaiveDate, _end: NaiveDate) -> NewsFetch {
        self.calls.set(self.calls.get() + 1);
        self.outcome.clone()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn article(published: &str, title: &str) -> Article {
    Article {
        published: NaiveDateTime::parse_from_str(published, "%Y-%m-%d %H:%M:%S").unwrap(),
        title: title.to_string(),
        body: None,
        source: "mock".to_string(),
    }
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        adj_close: close,
        volume: 1000.0,
    }
}

/// Daily bars with a slow zig-zag so the oscillator visits every band.
pub fn generate_bars(symbol: &str, start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let wave = ((i as f64) / 9.0).sin() * start_price * 0.2;
            let close = start_price + i as f64 * 0.1 + wave;
            OhlcvBar {
                symbol: symbol.to_string(),
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                adj_close: close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Series built directly from `(date, close, rsi, sentiment)` rows.
pub fn daily_series(rows: &[(&str, f64, f64, f64)]) -> DailySeries {
    DailySeries {
        symbol: "BTC-USD".to_string(),
        records: rows
            .iter()
            .map(|&(d, close, rsi, sentiment)| DailyRecord {
                date: NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
                close,
                rsi,
                sentiment: Some(sentiment),
            })
            .collect(),
    }
}

pub fn daily_series_from(rows: &[(NaiveDate, f64, f64, f64)]) -> DailySeries {
    DailySeries {
        symbol: "BTC-USD".to_string(),
        records: rows
            .iter()
            .map(|&(date, close, rsi, sentiment)| DailyRecord {
                date,
                close,
                rsi,
                sentiment: Some(sentiment),
            })
            .collect(),
    }
}
