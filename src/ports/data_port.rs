//! Price data access port trait.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `ticker` on or after `start_date`, in provider order.
    fn fetch_ohlcv(&self, ticker: &str, start_date: NaiveDate)
    -> Result<Vec<OhlcvBar>, SigtraderError>;
}
