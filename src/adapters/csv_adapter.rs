//! CSV file price data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv`. Columns are matched by header name,
//! case-insensitively, so exports with extra columns (dividends, splits)
//! load unchanged.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

/// Accepts `YYYY-MM-DD` or any timestamp that starts with it.
fn parse_date(raw: &str) -> Result<NaiveDate, SigtraderError> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| SigtraderError::Data {
        reason: format!("invalid date '{}': {}", raw, e),
    })
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, SigtraderError> {
    record
        .get(index)
        .ok_or_else(|| SigtraderError::Data {
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e| SigtraderError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SigtraderError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| SigtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| SigtraderError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();

        let mut index = [0usize; 6];
        for (slot, name) in index.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| SigtraderError::Data {
                    reason: format!("{} has no '{}' column", path.display(), name),
                })?;
        }
        let [date_i, open_i, high_i, low_i, close_i, volume_i] = index;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| SigtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_i).ok_or_else(|| SigtraderError::Data {
                reason: "missing date column".into(),
            })?;
            let date = parse_date(date_str)?;
            if date < start_date {
                continue;
            }

            bars.push(OhlcvBar {
                date,
                open: parse_field(&record, open_i, "open")?,
                high: parse_field(&record, high_i, "high")?,
                low: parse_field(&record, low_i, "low")?,
                close: parse_field(&record, close_i, "close")?,
                volume: parse_field(&record, volume_i, "volume")?,
            });
        }

        if bars.is_empty() {
            return Err(SigtraderError::NoData {
                ticker: ticker.to_string(),
                start_date,
            });
        }

        debug!(ticker, bars = bars.len(), path = %path.display(), "loaded price history");
        Ok(bars)
    }
}
