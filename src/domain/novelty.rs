//! Detection of signals that have not been notified yet.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::signal::{SignalKind, Signals};
use crate::ports::novelty_port::NoveltyStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestSignal {
    pub kind: SignalKind,
    pub date: NaiveDate,
}

/// Most recent bar carrying a buy or sell signal.
///
/// The latest buy date and latest sell date are compared; the strictly later
/// one wins and Buy wins a tie. Returns `None` when no signal fired at all.
pub fn latest_signal(dates: &[NaiveDate], signals: &Signals) -> Option<LatestSignal> {
    let last_true = |flags: &[bool]| {
        flags
            .iter()
            .zip(dates)
            .filter(|&(&flag, _)| flag)
            .map(|(_, &date)| date)
            .max()
    };

    match (last_true(signals.buy.as_slice()), last_true(signals.sell.as_slice())) {
        (None, None) => None,
        (Some(date), None) => Some(LatestSignal {
            kind: SignalKind::Buy,
            date,
        }),
        (None, Some(date)) => Some(LatestSignal {
            kind: SignalKind::Sell,
            date,
        }),
        (Some(buy), Some(sell)) if sell > buy => Some(LatestSignal {
            kind: SignalKind::Sell,
            date: sell,
        }),
        (Some(buy), Some(_)) => Some(LatestSignal {
            kind: SignalKind::Buy,
            date: buy,
        }),
    }
}

/// Checks the latest signal against a store of notified dates.
pub struct NoveltyTracker<S: NoveltyStore> {
    store: S,
}

impl<S: NoveltyStore> NoveltyTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Returns the signal to notify, recording its date, or `None` when the
    /// date was already seen or nothing fired.
    ///
    /// A store that cannot be read counts as empty. A failed append is logged
    /// and the signal is still reported.
    pub fn check(&mut self, latest: Option<LatestSignal>) -> Option<LatestSignal> {
        let latest = latest?;

        let seen = match self.store.contains(latest.date) {
            Ok(seen) => seen,
            Err(e) => {
                warn!(error = %e, "novelty store unreadable, treating as empty");
                false
            }
        };
        if seen {
            debug!(date = %latest.date, kind = %latest.kind, "signal already notified");
            return None;
        }

        if let Err(e) = self.store.append(latest.date) {
            warn!(error = %e, date = %latest.date, "failed to record signal date");
        }
        Some(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_novelty_store::MemoryNoveltyStore;
    use crate::domain::error::SigtraderError;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dates() -> Vec<NaiveDate> {
        vec![d("2024-01-02"), d("2024-01-03"), d("2024-01-04"), d("2024-01-05")]
    }

    fn signals(buy: &[bool], sell: &[bool]) -> Signals {
        Signals {
            buy: buy.to_vec(),
            sell: sell.to_vec(),
        }
    }

    #[test]
    fn latest_none_without_signals() {
        let s = signals(&[false; 4], &[false; 4]);
        assert_eq!(latest_signal(&dates(), &s), None);
    }

    #[test]
    fn latest_prefers_later_sell() {
        let s = signals(&[true, false, false, false], &[false, false, true, false]);
        assert_eq!(
            latest_signal(&dates(), &s),
            Some(LatestSignal {
                kind: SignalKind::Sell,
                date: d("2024-01-04")
            })
        );
    }

    #[test]
    fn latest_prefers_later_buy() {
        let s = signals(&[false, false, false, true], &[false, true, false, false]);
        let latest = latest_signal(&dates(), &s).unwrap();
        assert_eq!(latest.kind, SignalKind::Buy);
        assert_eq!(latest.date, d("2024-01-05"));
    }

    #[test]
    fn latest_tie_prefers_buy() {
        let s = signals(&[false, true, false, false], &[false, true, false, false]);
        let latest = latest_signal(&dates(), &s).unwrap();
        assert_eq!(latest.kind, SignalKind::Buy);
        assert_eq!(latest.date, d("2024-01-03"));
    }

    #[test]
    fn seen_date_is_not_novel() {
        let store = MemoryNoveltyStore::from_dates([d("2024-01-05")]);
        let mut tracker = NoveltyTracker::new(store);
        let latest = LatestSignal {
            kind: SignalKind::Buy,
            date: d("2024-01-05"),
        };
        assert_eq!(tracker.check(Some(latest)), None);
        assert_eq!(tracker.store().len(), 1);
    }

    #[test]
    fn new_date_is_novel_and_recorded() {
        let store = MemoryNoveltyStore::from_dates([d("2024-01-05")]);
        let mut tracker = NoveltyTracker::new(store);
        let latest = LatestSignal {
            kind: SignalKind::Sell,
            date: d("2024-01-06"),
        };
        assert_eq!(tracker.check(Some(latest)), Some(latest));
        assert!(tracker.store().contains(d("2024-01-06")).unwrap());

        // second check on the same date stays quiet
        assert_eq!(tracker.check(Some(latest)), None);
    }

    #[test]
    fn nothing_to_check() {
        let mut tracker = NoveltyTracker::new(MemoryNoveltyStore::new());
        assert_eq!(tracker.check(None), None);
        assert!(tracker.store().is_empty());
    }

    struct BrokenStore {
        appended: Vec<NaiveDate>,
    }

    impl NoveltyStore for BrokenStore {
        fn contains(&self, _date: NaiveDate) -> Result<bool, SigtraderError> {
            Err(SigtraderError::Store {
                reason: "corrupt".into(),
            })
        }

        fn append(&mut self, date: NaiveDate) -> Result<(), SigtraderError> {
            self.appended.push(date);
            Err(SigtraderError::Store {
                reason: "read-only".into(),
            })
        }
    }

    #[test]
    fn unreadable_store_counts_as_empty() {
        let mut tracker = NoveltyTracker::new(BrokenStore { appended: vec![] });
        let latest = LatestSignal {
            kind: SignalKind::Buy,
            date: d("2024-01-05"),
        };
        assert_eq!(tracker.check(Some(latest)), Some(latest));
        assert_eq!(tracker.into_store().appended, vec![d("2024-01-05")]);
    }
}
