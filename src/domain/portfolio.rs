//! Portfolio state and equity tracking for a single strategy run.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashFlowKind {
    Buy,
    Sell,
}

/// One buy or sell executed at the day's close.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub kind: CashFlowKind,
    pub amount: f64,
    pub units: f64,
    pub price: f64,
}

/// Accumulated state of one strategy. `cash_invested` counts gross
/// deployment and never decreases; sale proceeds go to `cash_reserve`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioState {
    pub cash_invested: f64,
    pub units_held: f64,
    pub cash_reserve: f64,
    pub cash_flows: Vec<CashFlow>,
    pub equity_curve: Vec<EquityPoint>,
}

impl PortfolioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spends `amount` at `price`. Non-positive amounts are ignored.
    pub fn buy(&mut self, date: NaiveDate, amount: f64, price: f64) {
        if amount <= 0.0 || price <= 0.0 {
            return;
        }
        let units = amount / price;
        self.units_held += units;
        self.cash_invested += amount;
        self.cash_flows.push(CashFlow {
            date,
            kind: CashFlowKind::Buy,
            amount,
            units,
            price,
        });
    }

    /// Sells `fraction` of the units held, moving the proceeds into the
    /// cash reserve. Returns the units sold.
    pub fn sell_fraction(&mut self, date: NaiveDate, fraction: f64, price: f64) -> f64 {
        if self.units_held <= 0.0 || fraction <= 0.0 {
            return 0.0;
        }
        let units = self.units_held * fraction.min(1.0);
        let proceeds = units * price;
        self.units_held -= units;
        self.cash_reserve += proceeds;
        self.cash_flows.push(CashFlow {
            date,
            kind: CashFlowKind::Sell,
            amount: proceeds,
            units,
            price,
        });
        units
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.units_held * price + self.cash_reserve
    }

    pub fn record_equity(&mut self, date: NaiveDate, price: f64) {
        let equity = self.market_value(price);
        self.equity_curve.push(EquityPoint { date, equity });
    }

    pub fn final_value(&self) -> f64 {
        self.equity_curve.last().map(|p| p.equity).unwrap_or(0.0)
    }

    pub fn buys(&self) -> impl Iterator<Item = &CashFlow> {
        self.cash_flows.iter().filter(|f| f.kind == CashFlowKind::Buy)
    }

    pub fn sells(&self) -> impl Iterator<Item = &CashFlow> {
        self.cash_flows.iter().filter(|f| f.kind == CashFlowKind::Sell)
    }
}
