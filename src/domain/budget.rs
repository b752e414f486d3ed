//! Calendar-month grouping and monthly budget normalization.
//!
//! Signal-driven strategies produce a raw amount per day. Normalizing rescales
//! each calendar month so its total equals a target budget:
//! - raw month total > 0: every day is multiplied by `target / total`
//! - raw month total == 0: the whole target goes to the month's first trading day

use chrono::{Datelike, NaiveDate};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Index ranges of consecutive dates sharing a calendar month. Dates must be
/// strictly increasing.
pub fn month_ranges(dates: &[NaiveDate]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for i in 1..=dates.len() {
        if i == dates.len() || MonthKey::of(dates[i]) != MonthKey::of(dates[start]) {
            if start < i {
                ranges.push(start..i);
            }
            start = i;
        }
    }
    ranges
}

/// True on the first trading day of each calendar month present.
pub fn first_trading_days(dates: &[NaiveDate]) -> Vec<bool> {
    let mut flags = vec![false; dates.len()];
    for range in month_ranges(dates) {
        flags[range.start] = true;
    }
    flags
}

pub fn normalize_monthly(dates: &[NaiveDate], raw: &[f64], target: f64) -> Vec<f64> {
    debug_assert_eq!(dates.len(), raw.len());
    let mut normalized = vec![0.0; raw.len()];

    for range in month_ranges(dates) {
        let total: f64 = raw[range.clone()].iter().sum();
        if total <= 0.0 {
            normalized[range.start] = target;
        } else {
            let scale = target / total;
            for i in range {
                normalized[i] = raw[i] * scale;
            }
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_ranges_split_on_calendar_month() {
        let dates = vec![d(2024, 1, 30), d(2024, 1, 31), d(2024, 2, 1), d(2024, 3, 4)];
        assert_eq!(month_ranges(&dates), vec![0..2, 2..3, 3..4]);
    }

    #[test]
    fn month_ranges_same_month_different_year() {
        let dates = vec![d(2023, 5, 2), d(2024, 5, 2)];
        assert_eq!(month_ranges(&dates), vec![0..1, 1..2]);
    }

    #[test]
    fn month_ranges_empty() {
        assert!(month_ranges(&[]).is_empty());
    }

    #[test]
    fn first_trading_days_marks_one_per_month() {
        // month starts on a weekend: the 3rd is the first trading day
        let dates = vec![d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 3), d(2024, 3, 4)];
        assert_eq!(first_trading_days(&dates), vec![true, false, true, false]);
    }

    #[test]
    fn normalize_scales_proportionally() {
        let dates = vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)];
        let out = normalize_monthly(&dates, &[150.0, 0.0, 100.0], 100.0);
        assert!((out[0] - 60.0).abs() < 1e-9);
        assert!(out[1].abs() < 1e-12);
        assert!((out[2] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_zero_month_puts_budget_on_first_day() {
        let dates = vec![d(2024, 1, 30), d(2024, 1, 31), d(2024, 2, 1), d(2024, 2, 2)];
        let out = normalize_monthly(&dates, &[50.0, 50.0, 0.0, 0.0], 100.0);
        assert_eq!(out, vec![50.0, 50.0, 100.0, 0.0]);
    }

    #[test]
    fn normalize_leaves_input_untouched() {
        let dates = vec![d(2024, 1, 2), d(2024, 1, 3)];
        let raw = vec![1.0, 3.0];
        let out = normalize_monthly(&dates, &raw, 8.0);
        assert_eq!(raw, vec![1.0, 3.0]);
        assert_eq!(out, vec![2.0, 6.0]);
    }
}
