//! Validated, chronologically ordered price input.
//!
//! A `PriceSeries` is never empty, strictly ascending by date and holds only
//! finite, non-negative prices. Construction fails fast instead of repairing
//! the input; the provider is expected to hand over sorted, de-duplicated bars.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Result<Self, SigtraderError> {
        if bars.is_empty() {
            return Err(SigtraderError::EmptySeries);
        }

        for (i, bar) in bars.iter().enumerate() {
            if let Some((field, value)) = bar.invalid_field() {
                return Err(SigtraderError::InvalidBar {
                    date: bar.date,
                    field,
                    value,
                });
            }
            if i == 0 {
                continue;
            }
            let previous = bars[i - 1].date;
            if bar.date == previous {
                return Err(SigtraderError::DuplicateDate { date: bar.date });
            }
            if bar.date < previous {
                return Err(SigtraderError::UnsortedSeries {
                    index: i,
                    previous,
                    current: bar.date,
                });
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }
}
