//! Per-bar CSV export of an analysis run.
//!
//! Columns: `date`, `close`, one column per indicator line, `buy`, `sell`,
//! `shares`, `cash`, `value`, `growth_pct`. Undefined indicator values and
//! an undefined growth series are written as empty fields.

use crate::domain::analysis::Analysis;
use crate::domain::error::SigtraderError;
use crate::domain::price_series::PriceSeries;
use std::io::Write;
use std::path::Path;
use tracing::info;

fn export_err(e: impl std::fmt::Display) -> SigtraderError {
    SigtraderError::Data {
        reason: format!("export failed: {}", e),
    }
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn write_export<W: Write>(
    writer: W,
    series: &PriceSeries,
    analysis: &Analysis,
) -> Result<(), SigtraderError> {
    let columns = analysis.indicators.columns();
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["date", "close"];
    header.extend(columns.iter().map(|(name, _)| *name));
    header.extend(["buy", "sell", "shares", "cash", "value", "growth_pct"]);
    wtr.write_record(&header).map_err(export_err)?;

    for (i, bar) in series.bars().iter().enumerate() {
        let point = &analysis.simulation.equity_curve[i];
        let mut record = vec![bar.date.format("%Y-%m-%d").to_string(), bar.close.to_string()];
        record.extend(columns.iter().map(|(_, line)| opt(line[i])));
        record.push(analysis.signals.buy[i].to_string());
        record.push(analysis.signals.sell[i].to_string());
        record.push(point.shares.to_string());
        record.push(point.cash.to_string());
        record.push(point.equity.to_string());
        record.push(opt(analysis.growth.as_ref().map(|g| g[i])));
        wtr.write_record(&record).map_err(export_err)?;
    }

    wtr.flush().map_err(export_err)
}

pub fn export_csv(
    path: &Path,
    series: &PriceSeries,
    analysis: &Analysis,
) -> Result<(), SigtraderError> {
    let file = std::fs::File::create(path).map_err(|e| SigtraderError::Data {
        reason: format!("failed to create {}: {}", path.display(), e),
    })?;
    write_export(file, series, analysis)?;
    info!(path = %path.display(), rows = series.len(), "export written");
    Ok(())
}
