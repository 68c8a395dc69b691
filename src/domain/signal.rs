//! Buy/sell signal derivation from indicator output.
//!
//! Each rule yields two boolean vectors aligned with the price bars. An
//! undefined indicator value at a bar always produces `false` for both sides.

use crate::domain::indicator::{IndicatorOutput, IndicatorSeries, Line};
use std::fmt;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const STOCH_OVERSOLD: f64 = 20.0;
pub const STOCH_OVERBOUGHT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Buy,
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "Buy"),
            SignalKind::Sell => write!(f, "Sell"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signals {
    pub buy: Vec<bool>,
    pub sell: Vec<bool>,
}

impl Signals {
    pub fn len(&self) -> usize {
        self.buy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buy.is_empty()
    }

    pub fn buy_count(&self) -> usize {
        self.buy.iter().filter(|&&b| b).count()
    }

    pub fn sell_count(&self) -> usize {
        self.sell.iter().filter(|&&s| s).count()
    }

    pub fn any(&self) -> bool {
        self.buy.iter().chain(&self.sell).any(|&s| s)
    }
}

/// Applies the rule matching the indicator that produced `series`.
pub fn generate_signals(series: &IndicatorSeries) -> Signals {
    match &series.output {
        IndicatorOutput::Rsi(rsi) => rsi_signals(rsi),
        IndicatorOutput::Macd { line, signal, .. } => macd_signals(line, signal),
        IndicatorOutput::Stochastic { k, d } => stochastic_signals(k, d),
    }
}

/// Level rule: buy while RSI < 30, sell while RSI > 70.
pub fn rsi_signals(rsi: &Line) -> Signals {
    let (buy, sell) = rsi
        .iter()
        .map(|value| match value {
            None => (false, false),
            Some(v) => (*v < RSI_OVERSOLD, *v > RSI_OVERBOUGHT),
        })
        .unzip();
    Signals { buy, sell }
}

/// Crossover rule: buy when MACD moves above its signal line, sell when it
/// moves below. Equality on the previous bar still counts as "not yet crossed".
pub fn macd_signals(line: &Line, signal: &Line) -> Signals {
    let n = line.len().min(signal.len());
    let mut buy = vec![false; n];
    let mut sell = vec![false; n];

    for i in 1..n {
        let (Some(m), Some(s), Some(prev_m), Some(prev_s)) =
            (line[i], signal[i], line[i - 1], signal[i - 1])
        else {
            continue;
        };
        buy[i] = m > s && prev_m <= prev_s;
        sell[i] = m < s && prev_m >= prev_s;
    }

    Signals { buy, sell }
}

/// Band rule: buy when %K is above %D inside the oversold band, sell when
/// %K is below %D inside the overbought band.
pub fn stochastic_signals(k: &Line, d: &Line) -> Signals {
    let (buy, sell) = k
        .iter()
        .zip(d)
        .map(|pair| match pair {
            (Some(k), Some(d)) => (k > d && *k < STOCH_OVERSOLD, k < d && *k > STOCH_OVERBOUGHT),
            _ => (false, false),
        })
        .unzip();
    Signals { buy, sell }
}
