//! CSV file price adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row naming at
//! least `date,open,high,low,close,volume`. An `adj_close` column (also
//! accepted as `Adj Close` / `Adj_Close`) is optional; the close is used when
//! it is missing.

use crate::domain::error::DcaError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    adj_close: Option<usize>,
    volume: usize,
}

fn normalize_header(h: &str) -> String {
    h.chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DcaError> {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |name: &str| names.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| DcaError::DataSource {
                reason: format!("missing {} column", name),
            })
        };

        Ok(Columns {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            adj_close: find("adjclose"),
            volume: require("volume")?,
        })
    }
}

fn parse_f64(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, DcaError> {
    record
        .get(idx)
        .ok_or_else(|| DcaError::DataSource {
            reason: format!("missing {} value", name),
        })?
        .trim()
        .parse()
        .map_err(|e| DcaError::DataSource {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, DcaError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| DcaError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| DcaError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Columns::from_headers(headers)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| DcaError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(cols.date).ok_or_else(|| DcaError::DataSource {
                reason: "missing date value".into(),
            })?;
            // timestamps such as "2024-01-15 00:00:00+00:00" keep their date part
            let date_part = date_str.trim().get(..10).unwrap_or(date_str);
            let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
                DcaError::DataSource {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let close = parse_f64(&record, cols.close, "close")?;
            let adj_close = match cols.adj_close {
                Some(idx) => parse_f64(&record, idx, "adj_close")?,
                None => close,
            };

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open: parse_f64(&record, cols.open, "open")?,
                high: parse_f64(&record, cols.high, "high")?,
                low: parse_f64(&record, cols.low, "low")?,
                close,
                adj_close,
                volume: parse_f64(&record, cols.volume, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
