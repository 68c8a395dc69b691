//! Novelty store port trait.

use crate::domain::error::SigtraderError;
use chrono::NaiveDate;

/// Append-only record of signal dates that have already been notified.
/// A missing or empty store behaves as an empty set.
pub trait NoveltyStore {
    fn contains(&self, date: NaiveDate) -> Result<bool, SigtraderError>;
    fn append(&mut self, date: NaiveDate) -> Result<(), SigtraderError>;
}
