//! Stochastic Oscillator.
//!
//! %K = (close - lowest low) / (highest high - lowest low) * 100 over k_period bars.
//! %D = simple mean of the last d_period %K values.
//! A flat window (highest high == lowest low) yields %K = 50.
//!
//! Warmup: %K undefined for the first k_period-1 bars, %D for k_period+d_period-2.

use crate::domain::indicator::Line;
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticLines {
    pub k: Line,
    pub d: Line,
}

pub fn calculate_stochastic(bars: &[OhlcvBar], k_period: usize, d_period: usize) -> StochasticLines {
    if k_period == 0 || d_period == 0 {
        return StochasticLines {
            k: vec![None; bars.len()],
            d: vec![None; bars.len()],
        };
    }

    let mut k_line: Line = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i + 1 < k_period {
            k_line.push(None);
            continue;
        }
        let window = &bars[i + 1 - k_period..=i];
        let low_min = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let high_max = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let range = high_max - low_min;

        let k = if range == 0.0 {
            50.0
        } else {
            ((bar.close - low_min) / range * 100.0).clamp(0.0, 100.0)
        };
        k_line.push(Some(k));
    }

    let d_line = k_line
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < d_period {
                return None;
            }
            let recent = &k_line[i + 1 - d_period..=i];
            let sum = recent.iter().copied().sum::<Option<f64>>()?;
            Some(sum / d_period as f64)
        })
        .collect();

    StochasticLines { k: k_line, d: d_line }
}
