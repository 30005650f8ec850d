//! Time sources
//!
//! Record defaults need "now" as a timestamp string. Taking the time from a
//! `Clock` keeps those defaults deterministic under test.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// Source of the current time
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current instant as an RFC 3339 timestamp string
    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

/// Formats an instant the way record timestamps are stored:
/// RFC 3339 with millisecond precision and a `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_uses_millis_and_z() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-01T12:30:00.000Z");
    }

    #[test]
    fn test_fixed_clock_timestamp() {
        let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let clock = FixedClock(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.timestamp(), "2023-12-31T23:59:59.000Z");
    }

    #[test]
    fn test_system_clock_timestamp_parses_back() {
        let stamp = SystemClock.timestamp();
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
