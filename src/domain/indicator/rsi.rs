//! RSI (Relative Strength Index).
//!
//! Gains and losses of bar-over-bar close changes are each smoothed with the
//! recursive EMA (k = 2/(n+1)), seeded by the first change.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, or 50 when avg_gain is also 0.
//!
//! Bar 0 has no prior close and is undefined; all later bars are defined.

use crate::domain::indicator::{ema, Line};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_WINDOW: usize = 14;

pub fn calculate_rsi(bars: &[OhlcvBar], window: usize) -> Line {
    if window == 0 || bars.len() < 2 {
        return vec![None; bars.len()];
    }

    let mut gains = Vec::with_capacity(bars.len() - 1);
    let mut losses = Vec::with_capacity(bars.len() - 1);
    for pair in bars.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gain = ema(&gains, window);
    let avg_loss = ema(&losses, window);

    let mut values = Vec::with_capacity(bars.len());
    values.push(None);
    values.extend(
        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&gain, &loss)| Some(rsi_from_averages(gain, loss))),
    );
    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
