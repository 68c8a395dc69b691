//! One full pass over a price series: indicator, signals, simulation and the
//! latest signal eligible for notification.

use tracing::debug;

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{compute_indicator, IndicatorSeries, IndicatorType};
use crate::domain::novelty::{latest_signal, LatestSignal};
use crate::domain::portfolio::{growth_pct, simulate, SimulationResult};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{generate_signals, Signals};

pub const NOTIFY_SUBJECT: &str = "New Trading Signal";

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub indicators: IndicatorSeries,
    pub signals: Signals,
    pub simulation: SimulationResult,
    pub growth: Option<Vec<f64>>,
    pub latest: Option<LatestSignal>,
}

impl Analysis {
    pub fn final_growth(&self) -> Option<f64> {
        self.growth.as_ref().and_then(|g| g.last().copied())
    }
}

pub fn analyze(
    series: &PriceSeries,
    indicator: IndicatorType,
    initial_shares: u64,
) -> Result<Analysis, SigtraderError> {
    let indicators = compute_indicator(series, indicator);
    let signals = generate_signals(&indicators);
    debug!(
        indicator = %indicator,
        bars = series.len(),
        buys = signals.buy_count(),
        sells = signals.sell_count(),
        "signals generated"
    );

    let simulation = simulate(series, &signals, initial_shares)?;
    let growth = growth_pct(&simulation.values());
    let latest = latest_signal(&indicators.dates, &signals);

    Ok(Analysis {
        indicators,
        signals,
        simulation,
        growth,
        latest,
    })
}

/// Message body announcing a new signal.
pub fn signal_message(ticker: &str, signal: &LatestSignal) -> String {
    format!(
        "New signal: {}\nTicker: {}\nDate: {}",
        signal.kind,
        ticker,
        signal.date.format("%Y-%m-%d")
    )
}

/// Chart title naming the ticker, indicator and covered date range.
pub fn chart_title(ticker: &str, indicator: IndicatorType, series: &PriceSeries) -> String {
    format!(
        "{} with {} Indicator. Buy/Sell Signals ({} to {})",
        ticker,
        indicator.name(),
        series.first_date(),
        series.last_date()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use crate::domain::signal::SignalKind;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar::flat(start + chrono::Duration::days(i as i64), close))
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn analyze_rsi_reversal() {
        let series = make_series(&[10.0, 9.0, 8.0, 7.0, 12.0, 13.0, 14.0]);
        let analysis = analyze(&series, IndicatorType::Rsi { window: 3 }, 1).unwrap();

        assert_eq!(
            analysis.signals.buy,
            vec![false, true, true, true, false, false, false]
        );
        assert_eq!(
            analysis.signals.sell,
            vec![false, false, false, false, true, true, true]
        );
        let latest = analysis.latest.unwrap();
        assert_eq!(latest.kind, SignalKind::Sell);
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(analysis.simulation.equity_curve.len(), 7);
        assert!(analysis.growth.is_some());
    }

    #[test]
    fn analyze_is_deterministic() {
        let series = make_series(&[5.0, 6.0, 5.5, 7.0, 6.5, 8.0, 7.5, 9.0]);
        let a = analyze(&series, IndicatorType::MACD_DEFAULT, 2).unwrap();
        let b = analyze(&series, IndicatorType::MACD_DEFAULT, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn message_format() {
        let signal = LatestSignal {
            kind: SignalKind::Buy,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        };
        assert_eq!(
            signal_message("AAPL", &signal),
            "New signal: Buy\nTicker: AAPL\nDate: 2024-01-05"
        );
    }

    #[test]
    fn title_covers_range() {
        let series = make_series(&[1.0, 2.0]);
        assert_eq!(
            chart_title("MSFT", IndicatorType::STOCHASTIC_DEFAULT, &series),
            "MSFT with Stochastic Indicator. Buy/Sell Signals (2024-03-01 to 2024-03-02)"
        );
    }
}
