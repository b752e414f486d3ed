//! Performance metrics and the summary table.

use super::portfolio::{EquityPoint, PortfolioState};
use super::strategy::StrategyKind;
use serde::Serialize;
use std::fmt;

pub const CURRENCY_DECIMALS: i32 = 2;
pub const UNIT_DECIMALS: i32 = 8;

/// Deepest peak-to-trough decline as a percentage (<= 0). Points before the
/// curve first turns positive have no peak to fall from and count as 0.
pub fn max_drawdown_pct(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (point.equity - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd * 100.0
}

/// Return on invested cash in percent; 0 when nothing was invested.
pub fn roi_pct(final_value: f64, cash_invested: f64) -> f64 {
    if cash_invested > 0.0 {
        (final_value - cash_invested) / cash_invested * 100.0
    } else {
        0.0
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Strategy")]
    pub strategy: String,
    #[serde(rename = "Total Invested ($)")]
    pub total_invested: f64,
    #[serde(rename = "Units Accumulated")]
    pub units_accumulated: f64,
    #[serde(rename = "Current Value ($)")]
    pub current_value: f64,
    #[serde(rename = "ROI (%)")]
    pub roi_pct: f64,
    #[serde(rename = "Max Drawdown (%)")]
    pub max_drawdown_pct: f64,
}

impl SummaryRow {
    pub fn compute(kind: StrategyKind, portfolio: &PortfolioState) -> Self {
        let current_value = portfolio.final_value();
        SummaryRow {
            strategy: kind.label().to_string(),
            total_invested: round_to(portfolio.cash_invested, CURRENCY_DECIMALS),
            units_accumulated: round_to(portfolio.units_held, UNIT_DECIMALS),
            current_value: round_to(current_value, CURRENCY_DECIMALS),
            roi_pct: round_to(
                roi_pct(current_value, portfolio.cash_invested),
                CURRENCY_DECIMALS,
            ),
            max_drawdown_pct: round_to(
                max_drawdown_pct(&portfolio.equity_curve),
                CURRENCY_DECIMALS,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn build(portfolios: &[(StrategyKind, &PortfolioState)]) -> Self {
        SummaryTable {
            rows: portfolios
                .iter()
                .map(|(kind, portfolio)| SummaryRow::compute(*kind, portfolio))
                .collect(),
        }
    }

    pub fn row(&self, kind: StrategyKind) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.strategy == kind.label())
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:>16} {:>18} {:>16} {:>10} {:>17}",
            "Strategy",
            "Total Invested ($)",
            "Units Accumulated",
            "Current Value ($)",
            "ROI (%)",
            "Max Drawdown (%)"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<20} {:>18.2} {:>18.8} {:>17.2} {:>10.2} {:>17.2}",
                row.strategy,
                row.total_invested,
                row.units_accumulated,
                row.current_value,
                row.roi_pct,
                row.max_drawdown_pct
            )?;
        }
        Ok(())
    }
}
