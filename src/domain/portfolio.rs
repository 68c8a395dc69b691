//! Single-asset portfolio simulation and value tracking.
//!
//! The simulator replays a buy/sell signal pair over the price bars, trading
//! one share per signal. Buy is checked first; at most one action per bar.

use chrono::NaiveDate;

use super::error::SigtraderError;
use super::price_series::PriceSeries;
use super::signal::{SignalKind, Signals};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares: u64,
}

impl PortfolioState {
    /// Starting state: `initial_shares` held, plus cash equal to their value at `price`.
    pub fn new(initial_shares: u64, price: f64) -> Self {
        PortfolioState {
            cash: initial_shares as f64 * price,
            shares: initial_shares,
        }
    }

    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.shares as f64 * price
    }

    /// Buys one share if cash covers it.
    pub fn try_buy(&mut self, price: f64) -> bool {
        if self.cash >= price {
            self.shares += 1;
            self.cash -= price;
            true
        } else {
            false
        }
    }

    /// Sells one share if any are held.
    pub fn try_sell(&mut self, price: f64) -> bool {
        if self.shares > 0 {
            self.shares -= 1;
            self.cash += price;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub cash: f64,
    pub shares: u64,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub kind: SignalKind,
    pub price: f64,
    pub shares_after: u64,
    pub cash_after: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub final_state: PortfolioState,
}

impl SimulationResult {
    pub fn values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|p| p.equity).collect()
    }

    pub fn initial_value(&self) -> f64 {
        self.equity_curve.first().map(|p| p.equity).unwrap_or(0.0)
    }

    pub fn final_value(&self) -> f64 {
        self.equity_curve.last().map(|p| p.equity).unwrap_or(0.0)
    }
}

/// Runs the trade state machine over every bar in order.
pub fn simulate(
    series: &PriceSeries,
    signals: &Signals,
    initial_shares: u64,
) -> Result<SimulationResult, SigtraderError> {
    check_len("buy signals", series.len(), signals.buy.len())?;
    check_len("sell signals", series.len(), signals.sell.len())?;

    let bars = series.bars();
    let mut state = PortfolioState::new(initial_shares, bars[0].close);
    let mut equity_curve = Vec::with_capacity(bars.len());
    let mut trades = Vec::new();

    for (i, bar) in bars.iter().enumerate() {
        let price = bar.close;
        let executed = if signals.buy[i] && state.try_buy(price) {
            Some(SignalKind::Buy)
        } else if signals.sell[i] && state.try_sell(price) {
            Some(SignalKind::Sell)
        } else {
            None
        };

        if let Some(kind) = executed {
            trades.push(Trade {
                date: bar.date,
                kind,
                price,
                shares_after: state.shares,
                cash_after: state.cash,
            });
        }

        equity_curve.push(EquityPoint {
            date: bar.date,
            cash: state.cash,
            shares: state.shares,
            equity: state.value(price),
        });
    }

    Ok(SimulationResult {
        equity_curve,
        trades,
        final_state: state,
    })
}

/// Percentage change of each value relative to the first.
/// `None` when the first value is zero (nothing to grow from).
pub fn growth_pct(values: &[f64]) -> Option<Vec<f64>> {
    let base = *values.first()?;
    if base == 0.0 {
        return None;
    }
    Some(values.iter().map(|v| (v - base) / base * 100.0).collect())
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), SigtraderError> {
    if expected != actual {
        return Err(SigtraderError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
