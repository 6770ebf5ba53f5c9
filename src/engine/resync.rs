//! Periodic full-resync scheduling
//!
//! Chats can be mutated or deleted out of cursor order upstream, so an
//! incremental cursor alone slowly drifts from the truth. When a resync
//! interval is configured, the whole collection is re-pulled from the
//! configured start date every N days.

use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// Decide whether this run must discard its incremental cursors and
/// re-pull from the configured start date
///
/// Always false when no interval is configured. True when no previous
/// full sync is recorded (the first run is the degenerate full sync),
/// or when the last one is at least `interval_days` old.
pub fn should_force_full_resync(
    interval_days: Option<i64>,
    last_full_sync: Option<&str>,
    now: DateTime<Utc>,
) -> Result<bool> {
    let Some(days) = interval_days else {
        return Ok(false);
    };
    let Some(last) = last_full_sync else {
        info!("running full sync of chats: no previous full sync recorded");
        return Ok(true);
    };
    let last_dt = DateTime::parse_from_rfc3339(last)?.with_timezone(&Utc);
    if last_dt + Duration::days(days) <= now {
        info!(
            "running full sync of chats: last full sync was {last}, \
             configured to run every {days} days"
        );
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_unset_interval_never_forces() {
        let now = ts("2021-01-01T00:00:00Z");
        assert!(!should_force_full_resync(None, None, now).unwrap());
        assert!(!should_force_full_resync(None, Some("1999-01-01T00:00:00Z"), now).unwrap());
    }

    #[test]
    fn test_missing_marker_forces() {
        let now = ts("2021-01-01T00:00:00Z");
        assert!(should_force_full_resync(Some(30), None, now).unwrap());
    }

    #[test_case("2020-12-01T00:00:00Z", 30, true; "exactly due")]
    #[test_case("2020-11-01T00:00:00Z", 30, true; "overdue")]
    #[test_case("2020-12-02T00:00:00Z", 30, false; "not yet due")]
    #[test_case("2020-12-31T23:59:59Z", 1, false; "one second short")]
    fn test_interval_truth_table(last: &str, days: i64, expected: bool) {
        let now = ts("2020-12-31T00:00:00Z");
        assert_eq!(
            should_force_full_resync(Some(days), Some(last), now).unwrap(),
            expected
        );
    }

    #[test]
    fn test_garbage_marker_is_an_error() {
        let now = ts("2021-01-01T00:00:00Z");
        assert!(should_force_full_resync(Some(30), Some("not a date"), now).is_err());
    }
}
