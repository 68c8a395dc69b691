//! Chart rendering port trait.

use crate::domain::error::SigtraderError;
use crate::domain::portfolio::EquityPoint;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::Signals;
use std::path::Path;

/// Everything a chart needs to draw one run.
pub struct ChartData<'a> {
    pub title: String,
    pub series: &'a PriceSeries,
    pub signals: &'a Signals,
    pub equity_curve: &'a [EquityPoint],
}

pub trait ChartPort {
    fn render(&self, chart: &ChartData<'_>, output_path: &Path) -> Result<(), SigtraderError>;
}
