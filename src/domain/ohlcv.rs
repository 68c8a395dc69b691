//! OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Bar with every price field set to `close`.
    pub fn flat(date: NaiveDate, close: f64) -> Self {
        OhlcvBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    /// First numeric field that is negative or not finite, if any.
    pub fn invalid_field(&self) -> Option<(&'static str, f64)> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite() || *v < 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn valid_bar_has_no_invalid_field() {
        assert_eq!(sample_bar().invalid_field(), None);
    }

    #[test]
    fn negative_low_is_reported() {
        let bar = OhlcvBar {
            low: -1.0,
            ..sample_bar()
        };
        assert_eq!(bar.invalid_field(), Some(("low", -1.0)));
    }

    #[test]
    fn nan_close_is_reported() {
        let bar = OhlcvBar {
            close: f64::NAN,
            ..sample_bar()
        };
        let (field, value) = bar.invalid_field().unwrap();
        assert_eq!(field, "close");
        assert!(value.is_nan());
    }

    #[test]
    fn flat_bar_copies_close() {
        let bar = OhlcvBar::flat(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 42.0);
        assert_eq!(bar.open, 42.0);
        assert_eq!(bar.high, 42.0);
        assert_eq!(bar.low, 42.0);
        assert_eq!(bar.volume, 0.0);
    }
}
