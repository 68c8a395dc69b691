//! CSV-backed novelty store.
//!
//! One `date` column, one row per notified signal date. Appends rewrite the
//! whole file through a sibling temp file and a rename, so readers never see
//! a half-written store.

use crate::domain::error::SigtraderError;
use crate::ports::novelty_port::NoveltyStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct DateRow {
    date: String,
}

pub struct CsvNoveltyStore {
    path: PathBuf,
}

impl CsvNoveltyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every recorded date string, in file order. Missing, empty or
    /// header-less files read as no dates; malformed rows are skipped.
    pub fn load(&self) -> Result<Vec<String>, SigtraderError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SigtraderError::Store {
                    reason: format!("failed to read {}: {}", self.path.display(), e),
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let has_date = rdr
            .headers()
            .map_err(|e| SigtraderError::Store {
                reason: format!("CSV header error: {}", e),
            })?
            .iter()
            .any(|h| h == "date");
        if !has_date {
            return Ok(Vec::new());
        }

        let mut dates = Vec::new();
        for row in rdr.deserialize::<DateRow>() {
            match row {
                Ok(r) => dates.push(r.date),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "skipping malformed store row")
                }
            }
        }
        Ok(dates)
    }

    fn write_all(&self, dates: &[String]) -> Result<(), SigtraderError> {
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let store_err = |e: &dyn std::fmt::Display| SigtraderError::Store {
            reason: format!("failed to write {}: {}", self.path.display(), e),
        };

        let mut wtr = csv::Writer::from_path(&tmp_path).map_err(|e| store_err(&e))?;
        for date in dates {
            wtr.serialize(DateRow { date: date.clone() })
                .map_err(|e| store_err(&e))?;
        }
        wtr.flush().map_err(|e| store_err(&e))?;
        drop(wtr);

        fs::rename(&tmp_path, &self.path).map_err(|e| store_err(&e))
    }
}

impl NoveltyStore for CsvNoveltyStore {
    fn contains(&self, date: NaiveDate) -> Result<bool, SigtraderError> {
        let key = date.format("%Y-%m-%d").to_string();
        Ok(self.load()?.iter().any(|d| d.trim() == key))
    }

    fn append(&mut self, date: NaiveDate) -> Result<(), SigtraderError> {
        let mut dates = self.load()?;
        dates.push(date.format("%Y-%m-%d").to_string());
        self.write_all(&dates)?;
        debug!(path = %self.path.display(), %date, "recorded signal date");
        Ok(())
    }
}
