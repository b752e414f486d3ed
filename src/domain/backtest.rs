//! Backtest orchestration.
//!
//! Resolves the date range, pulls the daily series from the data port,
//! computes the oscillator, runs the strategy simulators and builds the
//! summary table.

use crate::domain::daily::DailySeries;
use crate::domain::error::DcaError;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::metrics::SummaryTable;
use crate::domain::portfolio::PortfolioState;
use crate::domain::sentiment::{resolve_sentiment, SentimentOrigin};
use crate::domain::strategy::{
    simulate_rsi_dca, simulate_sentiment_dca, simulate_sip, RsiDcaParams, SentimentDcaParams,
    StrategyKind,
};
use crate::domain::strategy::sentiment_dca::DEFAULT_SELL_FRACTION;
use crate::ports::data_port::DataPort;
use crate::ports::news_port::NewsPort;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Extra calendar days fetched on top of the lookback.
pub const LOOKBACK_BUFFER_DAYS: f64 = 5.0;

/// Longest lookback accepted from configuration or the command line.
pub const MAX_LOOKBACK_YEARS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub lookback_years: f64,
    pub rsi_length: usize,
    pub sip_amount: f64,
    pub rsi_dca: RsiDcaParams,
    pub sell_fraction: f64,
    pub equal_monthly_budget: bool,
    pub include_sentiment: bool,
    pub use_real_news: bool,
    pub include_news_body: bool,
    pub sentiment_seed: Option<u64>,
    pub end_date: Option<NaiveDate>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            symbol: "BTC-USD".to_string(),
            lookback_years: 10.0,
            rsi_length: 14,
            sip_amount: 100.0,
            rsi_dca: RsiDcaParams::default(),
            sell_fraction: DEFAULT_SELL_FRACTION,
            equal_monthly_budget: false,
            include_sentiment: true,
            use_real_news: false,
            include_news_body: false,
            sentiment_seed: None,
            end_date: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub series: DailySeries,
    pub summary: SummaryTable,
    pub sip: PortfolioState,
    pub rsi_dca: PortfolioState,
    pub sentiment: Option<PortfolioState>,
    pub sentiment_origin: Option<SentimentOrigin>,
}

impl BacktestResult {
    pub fn portfolios(&self) -> Vec<(StrategyKind, &PortfolioState)> {
        let mut out = vec![
            (StrategyKind::Sip, &self.sip),
            (StrategyKind::RsiDca, &self.rsi_dca),
        ];
        if let Some(ref sentiment) = self.sentiment {
            out.push((StrategyKind::SentimentDca, sentiment));
        }
        out
    }
}

/// `end - (years * 365 + buffer)` days, truncated to whole days. Lookbacks
/// that are negative, not finite or reach past the calendar are rejected.
pub fn resolve_date_range(
    end: NaiveDate,
    lookback_years: f64,
) -> Result<(NaiveDate, NaiveDate), DcaError> {
    let out_of_range = || DcaError::ConfigInvalid {
        section: "backtest".to_string(),
        key: "lookback_years".to_string(),
        reason: format!("lookback of {} years is out of range", lookback_years),
    };
    if !lookback_years.is_finite() || lookback_years < 0.0 {
        return Err(out_of_range());
    }
    let days = (lookback_years * 365.0 + LOOKBACK_BUFFER_DAYS) as i64;
    let start = Duration::try_days(days)
        .and_then(|span| end.checked_sub_signed(span))
        .ok_or_else(out_of_range)?;
    Ok((start, end))
}

/// Runs every configured strategy. Sentiment noise comes from
/// `config.sentiment_seed`, or from entropy when no seed is set.
pub fn run_backtest(
    data_port: &dyn DataPort,
    news_providers: &[&dyn NewsPort],
    config: &BacktestConfig,
    today: NaiveDate,
) -> Result<BacktestResult, DcaError> {
    let mut rng = match config.sentiment_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    run_backtest_with_rng(data_port, news_providers, config, today, &mut rng)
}

pub fn run_backtest_with_rng<R: Rng + ?Sized>(
    data_port: &dyn DataPort,
    news_providers: &[&dyn NewsPort],
    config: &BacktestConfig,
    today: NaiveDate,
    rng: &mut R,
) -> Result<BacktestResult, DcaError> {
    let (start_date, end_date) =
        resolve_date_range(config.end_date.unwrap_or(today), config.lookback_years)?;
    tracing::info!(
        symbol = %config.symbol,
        %start_date,
        %end_date,
        "fetching daily prices"
    );

    let mut bars = data_port.fetch_daily(&config.symbol, start_date, end_date)?;
    if bars.is_empty() {
        return Err(DcaError::NoData {
            symbol: config.symbol.clone(),
            start: start_date,
            end: end_date,
        });
    }
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    let rsi = calculate_rsi(&bars, config.rsi_length);
    let mut series = DailySeries::from_bars(&config.symbol, &bars, &rsi);
    if series.is_empty() {
        return Err(DcaError::InsufficientData {
            symbol: config.symbol.clone(),
            bars: bars.len(),
            minimum: config.rsi_length,
        });
    }
    tracing::debug!(
        bars = bars.len(),
        dropped = bars.len() - series.len(),
        indicator = %rsi.indicator_type,
        "dropped oscillator warm-up rows"
    );

    let sip = simulate_sip(&series, config.sip_amount);
    let rsi_budget = config.equal_monthly_budget.then_some(config.sip_amount);
    let rsi_dca = simulate_rsi_dca(&series, &config.rsi_dca, rsi_budget);

    let (sentiment, sentiment_origin) = if config.include_sentiment {
        let resolved = resolve_sentiment(
            &series,
            news_providers,
            config.use_real_news,
            config.include_news_body,
            rng,
        );
        series.set_sentiment(&resolved.scores);
        let params = SentimentDcaParams {
            monthly_budget: config.sip_amount,
            sell_fraction: config.sell_fraction,
        };
        (
            Some(simulate_sentiment_dca(&series, &params)),
            Some(resolved.origin),
        )
    } else {
        (None, None)
    };

    let mut result = BacktestResult {
        symbol: config.symbol.clone(),
        start_date,
        end_date,
        series,
        summary: SummaryTable::default(),
        sip,
        rsi_dca,
        sentiment,
        sentiment_origin,
    };
    result.summary = SummaryTable::build(&result.portfolios());
    tracing::info!(
        days = result.series.len(),
        strategies = result.summary.rows.len(),
        "backtest complete"
    );
    Ok(result)
}
