//! Exponential Moving Average.
//!
//! k = 2/(span+1), EMA[0] = x[0], then EMA[i] = x[i]*k + EMA[i-1]*(1-k).
//! No warmup: the first value seeds the recursion directly.

/// Recursive EMA over `values`. Returns an empty vector for `span == 0`.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);

    for &x in &values[1..] {
        prev = x * k + prev * (1.0 - k);
        out.push(prev);
    }

    out
}
