// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Duration, Local, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 with millisecond precision and a `Z` suffix.
///
/// The output is fixed width, so string comparison matches chronological order.
/// Remote range queries rely on this.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Midnight of the local calendar day containing `now`, as a UTC instant.
pub fn start_of_local_day(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
    Local
        .from_local_datetime(&midnight)
        .earliest()
        // Midnight skipped by a DST jump; fall back to the instant itself.
        .unwrap_or(now)
        .with_timezone(&Utc)
}

/// Lower bound of a `days`-long history window ending at `now`.
///
/// Windows reaching past the representable range start at `MIN_UTC`.
pub fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_calendar_day(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Key for the mirror's per-day water map (`Thu Oct 15 2026`).
pub fn water_day_key(day: NaiveDate) -> String {
    day.format("%a %b %d %Y").to_string()
}

/// Calendar day in `YYYY-MM-DD` form, as stored on daily summaries.
pub fn calendar_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
