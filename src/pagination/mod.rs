//! Time-window partitioning for windowed search
//!
//! The upstream search endpoint paginates but caps out at a hard
//! page-count ceiling, so a wide time span plus high chat volume can
//! silently truncate results. Breaking the span into bounded intervals
//! is a correctness safeguard, not an optimization.

use chrono::{DateTime, Duration, Utc};

/// Break the span from `start` to `now` into contiguous day-sized
/// intervals
///
/// Produces `(begin, end)` pairs where the first `begin` is `start`,
/// each `end` is `min(begin + days, now)`, each subsequent `begin` is
/// the previous `end`, and the final `end` is exactly `now`. Empty when
/// `start >= now`.
pub fn break_into_intervals(
    days: i64,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let delta = Duration::days(days);
    let mut intervals = Vec::new();
    let mut begin = start;
    while begin < now {
        let end = std::cmp::min(begin + delta, now);
        intervals.push((begin, end));
        begin = end;
    }
    intervals
}
