//! Fixed-schedule monthly buy ("SIP").

use crate::domain::budget::first_trading_days;
use crate::domain::daily::DailySeries;
use crate::domain::portfolio::PortfolioState;
use crate::domain::strategy::accumulate_buys;

/// Buys `monthly_amount` on the first trading day of every calendar month in
/// the series and nothing on any other day.
pub fn simulate_sip(series: &DailySeries, monthly_amount: f64) -> PortfolioState {
    let amounts: Vec<f64> = first_trading_days(&series.dates())
        .into_iter()
        .map(|first| if first { monthly_amount } else { 0.0 })
        .collect();
    accumulate_buys(series, &amounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::test_support::series;
    use chrono::NaiveDate;

    #[test]
    fn three_day_scenario() {
        let s = series(&[
            ("2024-01-02", 100.0, 50.0, 0.0),
            ("2024-01-03", 110.0, 50.0, 0.0),
            ("2024-01-04", 105.0, 50.0, 0.0),
        ]);
        let portfolio = simulate_sip(&s, 100.0);

        assert!((portfolio.units_held - 1.0).abs() < 1e-12);
        assert!((portfolio.cash_invested - 100.0).abs() < 1e-12);
        let curve: Vec<f64> = portfolio.equity_curve.iter().map(|p| p.equity).collect();
        assert_eq!(curve, vec![100.0, 110.0, 105.0]);
    }

    #[test]
    fn one_buy_per_month_on_first_trading_day() {
        let s = series(&[
            ("2024-01-30", 10.0, 50.0, 0.0),
            ("2024-01-31", 10.0, 50.0, 0.0),
            ("2024-02-05", 20.0, 50.0, 0.0),
            ("2024-02-06", 20.0, 50.0, 0.0),
            ("2024-04-01", 40.0, 50.0, 0.0),
        ]);
        let portfolio = simulate_sip(&s, 100.0);

        let buy_dates: Vec<NaiveDate> = portfolio.buys().map(|b| b.date).collect();
        assert_eq!(
            buy_dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            ]
        );
        // March has no trading days and contributes no buy
        assert!((portfolio.cash_invested - 300.0).abs() < 1e-12);
        assert!((portfolio.units_held - (10.0 + 5.0 + 2.5)).abs() < 1e-12);
    }

    #[test]
    fn empty_series_invests_nothing() {
        let portfolio = simulate_sip(&DailySeries::default(), 100.0);
        assert_eq!(portfolio.cash_invested, 0.0);
        assert!(portfolio.equity_curve.is_empty());
    }
}
