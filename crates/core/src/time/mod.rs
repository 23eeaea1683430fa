use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Calendar day that scopes notification keys. Always UTC, never the host zone.
pub fn scan_day(now_utc: DateTime<Utc>) -> NaiveDate {
    now_utc.date_naive()
}

/// ISO-8601 with microseconds and a `Z` suffix, e.g. `2026-01-05T08:00:00.000000Z`.
pub fn iso_utc(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
