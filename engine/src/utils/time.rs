//! Time utility functions

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Longest DST gap we walk across when a local wall time does not exist
const MAX_GAP_MINUTES: i64 = 180;

/// Format a UTC instant as RFC 3339 with second precision and a `Z` suffix
pub fn to_rfc3339_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Format a UTC instant the way SQL aggregate tables store it (`YYYY-MM-DD HH:MM:SS`)
pub fn to_sql_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Resolve an IANA timezone name. Surrounding whitespace is ignored.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Map a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (DST fall-back) resolve to the earliest instant. Times inside
/// a DST gap (spring-forward) move forward minute by minute to the first wall
/// time that exists.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    let mut candidate = naive;
    for _ in 0..=MAX_GAP_MINUTES {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => candidate += Duration::minutes(1),
        }
    }
    tracing::warn!(%naive, tz = tz.name(), "Unresolvable local time, reading it as UTC");
    tz.from_utc_datetime(&naive)
}

/// Local midnight of `date` in `tz`
pub fn start_of_local_day(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Last representable instant (23:59:59.999999999) of `date` in `tz`
pub fn end_of_local_day(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let last = date
        .and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
    resolve_local(tz, last)
}

/// UTC midnight of a calendar date
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Truncate a UTC instant to the start of its hour
pub fn truncate_to_utc_hour(dt: DateTime<Utc>) -> DateTime<Utc> {
    let secs = dt.timestamp();
    let floored = secs - secs.rem_euclid(3600);
    DateTime::from_timestamp(floored, 0).unwrap_or(dt)
}
