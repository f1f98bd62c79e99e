//! Bucket sizes and the key formats shared by SQL and in-memory bucketing
//!
//! The format table in [`BucketSize::db_format`] is the single source for bucket
//! keys: the SQL dialects build their GROUP BY expressions from it and the
//! reference-point generator formats its keys with it. [`BucketSize::normalize_key`]
//! is the one routine that reconciles both sides.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike,
    Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::error::TimeFrameError;
use crate::core::constants::{DAY_BUCKET_MIN_DAYS, MONTH_BUCKET_MIN_DAYS, YEAR_BUCKET_MIN_DAYS};
use crate::utils::time::resolve_local;

/// Aggregation granularity of a time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketSize {
    Hour,
    Day,
    /// ISO week, starting Monday
    Week,
    Month,
    Year,
}

impl BucketSize {
    pub const ALL: [BucketSize; 5] = [
        BucketSize::Hour,
        BucketSize::Day,
        BucketSize::Week,
        BucketSize::Month,
        BucketSize::Year,
    ];

    /// Pick the bucket size for a UTC span, evaluated on whole days.
    ///
    /// | span            | bucket |
    /// |-----------------|--------|
    /// | >= 1825 days    | year   |
    /// | >= 90 days      | month  |
    /// | >= 2 days       | day    |
    /// | otherwise       | hour   |
    ///
    /// Week is never selected here; it is only reachable through
    /// [`TimeFrame::with_bucket_size`](super::TimeFrame::with_bucket_size).
    pub fn for_span(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        let days = (to - from).num_days();
        if days >= YEAR_BUCKET_MIN_DAYS {
            BucketSize::Year
        } else if days >= MONTH_BUCKET_MIN_DAYS {
            BucketSize::Month
        } else if days >= DAY_BUCKET_MIN_DAYS {
            BucketSize::Day
        } else {
            BucketSize::Hour
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketSize::Hour => "hour",
            BucketSize::Day => "day",
            BucketSize::Week => "week",
            BucketSize::Month => "month",
            BucketSize::Year => "year",
        }
    }

    /// strftime pattern of the bucket key
    ///
    /// Week keys are the date of the bucket's Monday, so they share the day pattern.
    pub const fn db_format(&self) -> &'static str {
        match self {
            BucketSize::Hour => "%Y-%m-%d %H",
            BucketSize::Day | BucketSize::Week => "%Y-%m-%d",
            BucketSize::Month => "%Y-%m",
            BucketSize::Year => "%Y",
        }
    }

    /// Length of a canonical key (`YYYY-MM-DD HH` is 13)
    pub const fn key_len(&self) -> usize {
        match self {
            BucketSize::Hour => 13,
            BucketSize::Day | BucketSize::Week => 10,
            BucketSize::Month => 7,
            BucketSize::Year => 4,
        }
    }

    /// Reduce a storage or reference key to its canonical prefix.
    ///
    /// Tolerates trailing precision (`2024-07-01 14:00:00` for an hour bucket)
    /// and an ISO `T` separator. Keys shorter than the prefix are kept whole.
    pub fn normalize_key(&self, raw: &str) -> String {
        let mut key: String = raw.trim().chars().take(self.key_len()).collect();
        if key.len() > 10 && key.as_bytes()[10] == b'T' {
            key.replace_range(10..11, " ");
        }
        key
    }

    /// Format the start of a bucket as its key
    pub fn format_key(&self, start: NaiveDateTime) -> String {
        start.format(self.db_format()).to_string()
    }

    /// First calendar date of the bucket containing `date`
    pub fn truncate_date(&self, date: NaiveDate) -> NaiveDate {
        match self {
            BucketSize::Hour | BucketSize::Day => date,
            BucketSize::Week => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(offset)).unwrap_or(date)
            }
            BucketSize::Month => date.with_day(1).unwrap_or(date),
            BucketSize::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Start of the bucket containing a wall-clock time
    pub fn truncate_naive(&self, local: NaiveDateTime) -> NaiveDateTime {
        let midnight = local.date().and_time(NaiveTime::MIN);
        match self {
            BucketSize::Hour => midnight + Duration::hours(i64::from(local.hour())),
            _ => self.truncate_date(local.date()).and_time(NaiveTime::MIN),
        }
    }

    /// Advance a wall-clock time by one bucket with calendar arithmetic.
    ///
    /// Returns `None` only when the result would leave chrono's date range.
    pub fn step(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            BucketSize::Hour => t.checked_add_signed(Duration::hours(1)),
            BucketSize::Day => t.checked_add_days(Days::new(1)),
            BucketSize::Week => t.checked_add_days(Days::new(7)),
            BucketSize::Month => t.checked_add_months(Months::new(1)),
            BucketSize::Year => t.checked_add_months(Months::new(12)),
        }
    }

    /// Last second of the viewer-local bucket that contains `instant`, in UTC.
    ///
    /// Truncates in the viewer's timezone, steps one bucket forward there and
    /// backs off one second. Truncating in UTC instead would move the end to the
    /// wrong local day for zones that are not aligned with UTC midnight.
    ///
    /// Hours are cut on the zoned instant. Re-resolving the next wall-clock hour
    /// would land an hour late inside the first pass of a repeated DST hour.
    pub fn end_of_local_bucket(&self, instant: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
        let zoned = instant.with_timezone(&tz);
        if *self == BucketSize::Hour {
            let into_hour = Duration::minutes(i64::from(zoned.minute()))
                + Duration::seconds(i64::from(zoned.second()))
                + Duration::nanoseconds(i64::from(zoned.nanosecond()));
            return instant - into_hour + Duration::hours(1) - Duration::seconds(1);
        }

        let start = self.truncate_naive(zoned.naive_local());
        match self.step(start) {
            Some(next) => resolve_local(tz, next).with_timezone(&Utc) - Duration::seconds(1),
            None => instant,
        }
    }
}

impl fmt::Display for BucketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BucketSize {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hour" => Ok(BucketSize::Hour),
            "day" => Ok(BucketSize::Day),
            "week" => Ok(BucketSize::Week),
            "month" => Ok(BucketSize::Month),
            "year" => Ok(BucketSize::Year),
            _ => Err(TimeFrameError::UnsupportedBucketSize(s.to_string())),
        }
    }
}
