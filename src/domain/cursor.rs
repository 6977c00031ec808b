//! Backfill cursor computation
//!
//! A backfill cursor is an opaque marker meaning "everything after this
//! point". The convention used across the backend endpoints is the creation
//! time of the newest item already on hand, nudged slightly forward so the
//! item itself is not returned again, formatted ISO-8601 with fractional
//! seconds.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::domain::item::Timestamped;

/// Formats a backfill cursor for items created after `newest`.
pub fn after_timestamp(newest: DateTime<Utc>) -> String {
    (newest + Duration::milliseconds(10)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Cursor for everything newer than the head of a newest-first list.
/// Returns None on an empty list, which callers pass through as "no cursor"
/// (fetch whatever is recent).
pub fn after_head<T: Timestamped>(items: &[T]) -> Option<String> {
    items.first().map(|item| after_timestamp(item.created_at()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    struct Stamp(DateTime<Utc>);

    impl Timestamped for Stamp {
        fn created_at(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_cursor_is_iso8601_with_fractional_seconds() {
        let ts = Utc.with_ymd_and_hms(2024, 9, 25, 12, 30, 45).unwrap();
        assert_eq!(after_timestamp(ts), "2024-09-25T12:30:45.010Z");
    }

    #[test]
    fn test_after_head_uses_newest_item() {
        let newest = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let items = vec![Stamp(newest), Stamp(older)];

        assert_eq!(after_head(&items), Some("2024-01-02T00:00:00.010Z".into()));
    }

    #[test]
    fn test_after_head_on_empty_list() {
        let items: Vec<Stamp> = vec![];
        assert_eq!(after_head(&items), None);
    }
}
