//! Integration tests for the strategy simulators and the backtest
//! orchestrator, driven through mock data and news ports.

mod common;

use approx::assert_relative_eq;
use common::*;
use dcatrader::domain::backtest::{run_backtest, run_backtest_with_rng, BacktestConfig};
use dcatrader::domain::budget::MonthKey;
use dcatrader::domain::error::DcaError;
use dcatrader::domain::metrics::SummaryRow;
use dcatrader::domain::portfolio::CashFlowKind;
use dcatrader::domain::sentiment::{NewsFetch, SentimentOrigin, MOMENTUM_WINDOW};
use dcatrader::domain::strategy::{
    simulate_rsi_dca, simulate_sentiment_dca, simulate_sip, RsiDcaParams, SentimentDcaParams,
    StrategyKind,
};
use dcatrader::ports::news_port::NewsPort;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

fn config_for(symbol: &str) -> BacktestConfig {
    BacktestConfig {
        symbol: symbol.to_string(),
        lookback_years: 1.0,
        end_date: Some(date(2024, 1, 31)),
        equal_monthly_budget: true,
        sentiment_seed: Some(42),
        ..BacktestConfig::default()
    }
}

fn port_with_year_of_bars() -> MockDataPort {
    MockDataPort::new().with_bars("BTC-USD", generate_bars("BTC-USD", "2022-12-01", 450, 100.0))
}

fn months_in(dates: impl Iterator<Item = chrono::NaiveDate>) -> usize {
    let mut months: Vec<MonthKey> = dates.map(MonthKey::of).collect();
    months.dedup();
    months.len()
}

mod scenarios {
    use super::*;

    #[test]
    fn sip_three_day_month() {
        let series = daily_series(&[
            ("2024-03-04", 100.0, 50.0, 0.0),
            ("2024-03-05", 110.0, 50.0, 0.0),
            ("2024-03-06", 105.0, 50.0, 0.0),
        ]);
        let portfolio = simulate_sip(&series, 100.0);

        assert_relative_eq!(portfolio.units_held, 1.0);
        assert_relative_eq!(portfolio.cash_invested, 100.0);
        let equity: Vec<f64> = portfolio.equity_curve.iter().map(|p| p.equity).collect();
        assert_eq!(equity, vec![100.0, 110.0, 105.0]);

        let row = SummaryRow::compute(StrategyKind::Sip, &portfolio);
        assert_relative_eq!(row.roi_pct, 5.0);
        assert_relative_eq!(row.max_drawdown_pct, -4.55);
    }

    #[test]
    fn rsi_dca_month_normalized_to_budget() {
        let series = daily_series(&[
            ("2024-03-04", 100.0, 25.0, 0.0),
            ("2024-03-05", 100.0, 45.0, 0.0),
            ("2024-03-06", 100.0, 35.0, 0.0),
        ]);
        let portfolio = simulate_rsi_dca(&series, &RsiDcaParams::default(), Some(100.0));

        let amounts: Vec<f64> = portfolio.buys().map(|f| f.amount).collect();
        assert_eq!(amounts.len(), 2);
        assert_relative_eq!(amounts[0], 60.0, epsilon = 1e-9);
        assert_relative_eq!(amounts[1], 40.0, epsilon = 1e-9);
        assert_relative_eq!(portfolio.cash_invested, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn rsi_dca_raw_amounts_without_budget() {
        let series = daily_series(&[
            ("2024-03-04", 100.0, 25.0, 0.0),
            ("2024-03-05", 100.0, 45.0, 0.0),
            ("2024-03-06", 100.0, 35.0, 0.0),
        ]);
        let portfolio = simulate_rsi_dca(&series, &RsiDcaParams::default(), None);
        assert_relative_eq!(portfolio.cash_invested, 250.0);
        assert_relative_eq!(portfolio.units_held, 2.5);
    }

    #[test]
    fn sentiment_buy_sell_buy() {
        // weights [2, 0, 1] over a 150 budget: 100 on day 1, 50 on day 3
        let series = daily_series(&[
            ("2024-03-04", 50.0, 50.0, 0.5),
            ("2024-03-05", 100.0, 50.0, -0.5),
            ("2024-03-06", 100.0, 50.0, 0.1),
        ]);
        let portfolio = simulate_sentiment_dca(&series, &SentimentDcaParams::new(150.0));

        let buys: Vec<_> = portfolio.buys().collect();
        assert_eq!(buys.len(), 2);
        assert_eq!(buys[0].date, date(2024, 3, 4));
        assert_relative_eq!(buys[0].units, 2.0);
        assert_eq!(buys[1].date, date(2024, 3, 6));
        assert_relative_eq!(buys[1].amount, 50.0, epsilon = 1e-9);

        let sells: Vec<_> = portfolio.sells().collect();
        assert_eq!(sells.len(), 1);
        assert_eq!(sells[0].kind, CashFlowKind::Sell);
        assert_relative_eq!(sells[0].units, 0.4, epsilon = 1e-12);

        assert_relative_eq!(portfolio.cash_reserve, 40.0, epsilon = 1e-9);
        assert_relative_eq!(portfolio.cash_invested, 150.0, epsilon = 1e-9);
        assert_relative_eq!(portfolio.units_held, 2.1, epsilon = 1e-9);
    }
}

mod orchestrator {
    use super::*;

    #[test]
    fn full_run_with_simulated_sentiment() {
        let port = port_with_year_of_bars();
        let config = config_for("BTC-USD");
        let mut rng = StdRng::seed_from_u64(42);

        let result =
            run_backtest_with_rng(&port, &[], &config, date(2024, 6, 1), &mut rng).unwrap();

        assert_eq!(result.end_date, date(2024, 1, 31));
        assert_eq!(result.start_date, date(2023, 1, 26));
        let in_range = (result.end_date - result.start_date).num_days() as usize + 1;
        assert_eq!(result.series.len(), in_range - config.rsi_length);
        assert_eq!(result.sentiment_origin, Some(SentimentOrigin::Simulated));
        assert_eq!(result.summary.rows.len(), 3);

        let months = months_in(result.series.records.iter().map(|r| r.date)) as f64;
        assert_relative_eq!(result.sip.cash_invested, 100.0 * months, epsilon = 1e-6);
        assert_relative_eq!(result.rsi_dca.cash_invested, 100.0 * months, epsilon = 1e-6);
        let sentiment = result.sentiment.as_ref().unwrap();
        assert_relative_eq!(sentiment.cash_invested, 100.0 * months, epsilon = 1e-6);

        for portfolio in [&result.sip, &result.rsi_dca, sentiment] {
            assert_eq!(portfolio.equity_curve.len(), result.series.len());
            assert!(portfolio.units_held >= 0.0);
        }
        let (warm_up, scored) = result.series.records.split_at(MOMENTUM_WINDOW);
        assert!(warm_up.iter().all(|r| r.sentiment.is_none()));
        assert!(scored
            .iter()
            .all(|r| r.sentiment.is_some_and(|s| (-1.0..=1.0).contains(&s))));
    }

    #[test]
    fn equal_budget_spends_exactly_per_month() {
        let port = port_with_year_of_bars();
        let result = run_backtest(&port, &[], &config_for("BTC-USD"), date(2024, 6, 1)).unwrap();

        let mut per_month: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for flow in result.rsi_dca.buys() {
            *per_month.entry(MonthKey::of(flow.date)).or_default() += flow.amount;
        }
        assert!(!per_month.is_empty());
        for total in per_month.values() {
            assert_relative_eq!(*total, 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn same_seed_same_result() {
        let port = port_with_year_of_bars();
        let config = config_for("BTC-USD");
        let a = run_backtest(&port, &[], &config, date(2024, 6, 1)).unwrap();
        let b = run_backtest(&port, &[], &config, date(2024, 6, 1)).unwrap();
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.sentiment, b.sentiment);
    }

    #[test]
    fn today_used_without_end_date() {
        let port = port_with_year_of_bars();
        let config = BacktestConfig {
            end_date: None,
            ..config_for("BTC-USD")
        };
        let result = run_backtest(&port, &[], &config, date(2023, 12, 15)).unwrap();
        assert_eq!(result.end_date, date(2023, 12, 15));
        assert_eq!(result.series.last_date(), Some(date(2023, 12, 15)));
    }

    #[test]
    fn sentiment_can_be_disabled() {
        let port = port_with_year_of_bars();
        let config = BacktestConfig {
            include_sentiment: false,
            ..config_for("BTC-USD")
        };
        let result = run_backtest(&port, &[], &config, date(2024, 6, 1)).unwrap();
        assert!(result.sentiment.is_none());
        assert!(result.sentiment_origin.is_none());
        assert_eq!(result.summary.rows.len(), 2);
        assert!(result.summary.row(StrategyKind::SentimentDca).is_none());
    }

    #[test]
    fn unequal_budget_keeps_raw_amounts() {
        let port = port_with_year_of_bars();
        let config = BacktestConfig {
            equal_monthly_budget: false,
            ..config_for("BTC-USD")
        };
        let result = run_backtest(&port, &[], &config, date(2024, 6, 1)).unwrap();
        for flow in result.rsi_dca.buys() {
            assert!(flow.amount == 150.0 || flow.amount == 100.0);
        }
    }
}

mod news {
    use super::*;

    #[test]
    fn real_news_drives_sentiment() {
        let port = port_with_year_of_bars();
        let provider = MockNewsPort::new(
            "feed",
            NewsFetch::Articles(vec![
                article("2023-06-01 09:00:00", "Bitcoin rally hits record high"),
                article("2023-09-01 09:00:00", "Bitcoin crash deepens losses"),
            ]),
        );
        let config = BacktestConfig {
            use_real_news: true,
            ..config_for("BTC-USD")
        };
        let news: [&dyn NewsPort; 1] = [&provider];
        let result = run_backtest(&port, &news, &config, date(2024, 6, 1)).unwrap();

        assert_eq!(provider.calls.get(), 1);
        assert_eq!(
            result.sentiment_origin,
            Some(SentimentOrigin::News { articles: 2 })
        );
        let score_on = |d| {
            result
                .series
                .records
                .iter()
                .find(|r| r.date == d)
                .and_then(|r| r.sentiment)
                .unwrap()
        };
        assert_eq!(score_on(date(2023, 5, 31)), 0.0);
        assert!(score_on(date(2023, 6, 1)) > 0.3);
        assert_eq!(score_on(date(2023, 7, 15)), score_on(date(2023, 6, 1)));
        assert!(score_on(date(2023, 9, 2)) < -0.3);
        assert!(result.sentiment.unwrap().sells().count() > 0);
    }

    #[test]
    fn failing_provider_falls_back_to_simulation() {
        let port = port_with_year_of_bars();
        let provider = MockNewsPort::new(
            "broken",
            NewsFetch::Failed {
                reason: "timeout".into(),
            },
        );
        let config = BacktestConfig {
            use_real_news: true,
            ..config_for("BTC-USD")
        };
        let news: [&dyn NewsPort; 1] = [&provider];
        let result = run_backtest(&port, &news, &config, date(2024, 6, 1)).unwrap();

        assert_eq!(provider.calls.get(), 1);
        assert_eq!(result.sentiment_origin, Some(SentimentOrigin::Simulated));
        assert!(result.sentiment.is_some());
    }

    #[test]
    fn providers_ignored_unless_requested() {
        let port = port_with_year_of_bars();
        let provider = MockNewsPort::new("feed", NewsFetch::Empty);
        let news: [&dyn NewsPort; 1] = [&provider];
        let result = run_backtest(&port, &news, &config_for("BTC-USD"), date(2024, 6, 1)).unwrap();

        assert_eq!(provider.calls.get(), 0);
        assert_eq!(result.sentiment_origin, Some(SentimentOrigin::Simulated));
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_symbol_is_no_data() {
        let port = port_with_year_of_bars();
        let err = run_backtest(&port, &[], &config_for("DOGE-USD"), date(2024, 6, 1)).unwrap_err();
        match err {
            DcaError::NoData { symbol, start, end } => {
                assert_eq!(symbol, "DOGE-USD");
                assert_eq!(start, date(2023, 1, 26));
                assert_eq!(end, date(2024, 1, 31));
            }
            other => panic!("expected NoData, got {other:?}"),
        }
    }

    #[test]
    fn range_without_bars_is_no_data() {
        let port = port_with_year_of_bars();
        let config = BacktestConfig {
            end_date: Some(date(2015, 1, 1)),
            ..config_for("BTC-USD")
        };
        let err = run_backtest(&port, &[], &config, date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, DcaError::NoData { .. }));
    }

    #[test]
    fn warm_up_consumes_everything() {
        let port = MockDataPort::new()
            .with_bars("BTC-USD", generate_bars("BTC-USD", "2024-01-10", 10, 100.0));
        let err = run_backtest(&port, &[], &config_for("BTC-USD"), date(2024, 6, 1)).unwrap_err();
        assert!(matches!(
            err,
            DcaError::InsufficientData { bars: 10, minimum: 14, .. }
        ));
    }

    #[test]
    fn data_source_error_propagates() {
        let port = MockDataPort::new().with_error("BTC-USD", "disk on fire");
        let err = run_backtest(&port, &[], &config_for("BTC-USD"), date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, DcaError::DataSource { reason } if reason == "disk on fire"));
    }
}
