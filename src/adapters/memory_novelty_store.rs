//! In-process novelty store for dry runs and tests.

use crate::domain::error::SigtraderError;
use crate::ports::novelty_port::NoveltyStore;
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryNoveltyStore {
    dates: BTreeSet<NaiveDate>,
}

impl MemoryNoveltyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }
}

impl NoveltyStore for MemoryNoveltyStore {
    fn contains(&self, date: NaiveDate) -> Result<bool, SigtraderError> {
        Ok(self.dates.contains(&date))
    }

    fn append(&mut self, date: NaiveDate) -> Result<(), SigtraderError> {
        self.dates.insert(date);
        Ok(())
    }
}
