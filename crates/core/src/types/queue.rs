//! Human-facing queue numbers and the yearly-resetting sequence behind them.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Prefix for every queue number handed to a customer.
const QUEUE_PREFIX: &str = "Q-";

/// Human-facing sequential order identifier, e.g. `Q-001`.
///
/// Unique within one calendar year (the sequence resets on rollover); not
/// required to be globally unique across resets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueNumber(String);

impl QueueNumber {
    /// Get the queue number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for QueueNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for QueueNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Process-wide counter behind queue number assignment.
///
/// Read-modify-write on every submission; safe only under the
/// single-writer-per-store model the counter service provides. The counter
/// resets whenever the observed calendar year differs from the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSequence {
    /// Calendar year the counter belongs to.
    pub year: i32,
    /// Last issued counter value within `year`; 0 means none issued yet.
    pub n: u32,
}

impl QueueSequence {
    /// Fresh sequence for the given instant, with no numbers issued.
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            year: now.year(),
            n: 0,
        }
    }

    /// Issue the next queue number, rolling the counter over to 1 when the
    /// observed year differs from the stored one.
    pub fn next(&mut self, now: DateTime<Utc>) -> QueueNumber {
        let year = now.year();
        if year != self.year {
            self.year = year;
            self.n = 0;
        }
        self.n += 1;
        QueueNumber(format!("{QUEUE_PREFIX}{:03}", self.n))
    }

    /// Reset the counter without issuing a number (used by store wipe).
    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::starting_at(now);
    }
}

impl Default for QueueSequence {
    fn default() -> Self {
        Self::starting_at(Utc::now())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_numbers_zero_padded_from_one() {
        let mut seq = QueueSequence::starting_at(at(2026));
        assert_eq!(seq.next(at(2026)).as_str(), "Q-001");
        assert_eq!(seq.next(at(2026)).as_str(), "Q-002");
    }

    #[test]
    fn test_numbers_strictly_increase_within_year() {
        let mut seq = QueueSequence::starting_at(at(2026));
        let mut prev = 0;
        for _ in 0..1200 {
            let n = seq.next(at(2026));
            let value: u32 = n.as_str().trim_start_matches("Q-").parse().unwrap();
            assert!(value > prev);
            prev = value;
        }
        // Padding is a minimum width, not a cap
        assert_eq!(seq.n, 1200);
        assert_eq!(prev, 1200);
    }

    #[test]
    fn test_year_rollover_resets_counter() {
        let mut seq = QueueSequence::starting_at(at(2026));
        seq.next(at(2026));
        seq.next(at(2026));
        let first_of_next_year = seq.next(at(2027));
        assert_eq!(first_of_next_year.as_str(), "Q-001");
        assert_eq!(seq.year, 2027);
    }

    #[test]
    fn test_reset_clears_counter() {
        let mut seq = QueueSequence::starting_at(at(2026));
        seq.next(at(2026));
        seq.reset(at(2026));
        assert_eq!(seq.next(at(2026)).as_str(), "Q-001");
    }
}
