//! Technical indicator implementations.
//!
//! This module provides types for representing indicator output:
//! - `IndicatorType`: indicator identity + parameters, resolved once from config
//! - `IndicatorOutput`: one or two aligned lines per indicator
//! - `IndicatorSeries`: output plus the dates it is aligned to
//!
//! Every line has one entry per price bar. Warm-up positions hold `None`.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod stochastic;

pub use ema::ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use stochastic::calculate_stochastic;

use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// One indicator line aligned to the price bars; `None` marks an undefined bar.
pub type Line = Vec<Option<f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi {
        window: usize,
    },
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        k_period: usize,
        d_period: usize,
    },
}

impl IndicatorType {
    pub const RSI_DEFAULT: IndicatorType = IndicatorType::Rsi {
        window: rsi::DEFAULT_WINDOW,
    };
    pub const MACD_DEFAULT: IndicatorType = IndicatorType::Macd {
        fast: macd::DEFAULT_FAST,
        slow: macd::DEFAULT_SLOW,
        signal: macd::DEFAULT_SIGNAL,
    };
    pub const STOCHASTIC_DEFAULT: IndicatorType = IndicatorType::Stochastic {
        k_period: stochastic::DEFAULT_K_PERIOD,
        d_period: stochastic::DEFAULT_D_PERIOD,
    };

    /// Name as written in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorType::Rsi { .. } => "RSI",
            IndicatorType::Macd { .. } => "MACD",
            IndicatorType::Stochastic { .. } => "Stochastic",
        }
    }

    /// Checks the parameter set, returning a reason on failure.
    pub fn check_params(&self) -> Result<(), String> {
        match *self {
            IndicatorType::Rsi { window } if window == 0 => {
                Err("RSI window must be at least 1".into())
            }
            IndicatorType::Macd { fast, slow, signal } => {
                if fast == 0 || slow == 0 || signal == 0 {
                    Err("MACD periods must be at least 1".into())
                } else if fast >= slow {
                    Err(format!("MACD fast period {fast} must be below slow period {slow}"))
                } else {
                    Ok(())
                }
            }
            IndicatorType::Stochastic { k_period, d_period } if k_period == 0 || d_period == 0 => {
                Err("Stochastic periods must be at least 1".into())
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for IndicatorType {
    type Err = String;

    /// Resolves an indicator name to its default parameter set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsi" => Ok(IndicatorType::RSI_DEFAULT),
            "macd" => Ok(IndicatorType::MACD_DEFAULT),
            "stochastic" | "stoch" => Ok(IndicatorType::STOCHASTIC_DEFAULT),
            other => Err(format!(
                "unknown indicator '{other}' (expected RSI, MACD or Stochastic)"
            )),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi { window } => write!(f, "RSI({})", window),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic { k_period, d_period } => {
                write!(f, "STOCHASTIC({},{})", k_period, d_period)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    Rsi(Line),
    Macd {
        line: Line,
        signal: Line,
        histogram: Line,
    },
    Stochastic {
        k: Line,
        d: Line,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub dates: Vec<NaiveDate>,
    pub output: IndicatorOutput,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Named lines in display order, for export and charts.
    pub fn columns(&self) -> Vec<(&'static str, &Line)> {
        match &self.output {
            IndicatorOutput::Rsi(values) => vec![("rsi", values)],
            IndicatorOutput::Macd {
                line,
                signal,
                histogram,
            } => vec![
                ("macd", line),
                ("macd_signal", signal),
                ("macd_histogram", histogram),
            ],
            IndicatorOutput::Stochastic { k, d } => vec![("stoch_k", k), ("stoch_d", d)],
        }
    }
}

/// Computes the selected indicator over a validated price series.
pub fn compute_indicator(series: &PriceSeries, indicator: IndicatorType) -> IndicatorSeries {
    let bars = series.bars();
    let output = match indicator {
        IndicatorType::Rsi { window } => IndicatorOutput::Rsi(calculate_rsi(bars, window)),
        IndicatorType::Macd { fast, slow, signal } => {
            let macd = calculate_macd(bars, fast, slow, signal);
            IndicatorOutput::Macd {
                line: macd.line,
                signal: macd.signal,
                histogram: macd.histogram,
            }
        }
        IndicatorType::Stochastic { k_period, d_period } => {
            let stoch = calculate_stochastic(bars, k_period, d_period);
            IndicatorOutput::Stochastic {
                k: stoch.k,
                d: stoch.d,
            }
        }
    };

    IndicatorSeries {
        indicator_type: indicator,
        dates: series.dates(),
        output,
    }
}
