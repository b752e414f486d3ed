//! Technical indicator series.
//!
//! - `IndicatorPoint`: a single point in an indicator time series, flagged
//!   invalid during the indicator's warm-up
//! - `IndicatorSeries`: a named, date-ordered run of points

pub mod rsi;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn get(&self) -> Option<f64> {
        if self.valid && self.value.is_finite() {
            Some(self.value)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.get().is_some()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}
