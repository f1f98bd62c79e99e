//! The time frame value object

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::bucket::BucketSize;
use super::error::TimeFrameError;
use crate::core::constants::{DEFAULT_GROUP_BY_COLUMN, MAX_REFERENCE_POINTS};
use crate::data::sql::{SqlDialect, SqliteDialect};
use crate::utils::time::to_sql_timestamp;

/// A UTC window `[from, to]` with its bucket size and the viewer's timezone.
///
/// Immutable once built. The timezone only decides which calendar date a
/// bucket boundary falls on; it never shifts the stored UTC instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeFrame {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    bucket_size: BucketSize,
    timezone: Tz,
}

impl TimeFrame {
    /// Build a frame from raw UTC instants.
    ///
    /// Selects the bucket size from the span, then moves `to` to the end of the
    /// viewer-local bucket that contains it.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>, timezone: Tz) -> Self {
        Self::with_bucket_size(from, to, timezone, BucketSize::for_span(from, to))
    }

    /// Build a frame with an explicit bucket size
    pub fn with_bucket_size(
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        timezone: Tz,
        bucket_size: BucketSize,
    ) -> Self {
        let snapped = bucket_size.end_of_local_bucket(to, timezone);
        tracing::debug!(
            %from,
            to = %snapped,
            %bucket_size,
            timezone = timezone.name(),
            "Time frame resolved"
        );
        tracing::trace!(raw_to = %to, "Snapped end to local bucket boundary");
        Self {
            from,
            to: snapped,
            bucket_size,
            timezone,
        }
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    pub fn bucket_size(&self) -> BucketSize {
        self.bucket_size
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Start of the window in the viewer's timezone
    pub fn local_from(&self) -> DateTime<Tz> {
        self.from.with_timezone(&self.timezone)
    }

    /// End of the window in the viewer's timezone
    pub fn local_to(&self) -> DateTime<Tz> {
        self.to.with_timezone(&self.timezone)
    }

    /// Check the frame is usable by the query and reconciliation layers.
    ///
    /// Fails on an inverted window and on frames that would need more
    /// reference points than the generator emits.
    pub fn validate(&self) -> Result<(), TimeFrameError> {
        if self.from > self.to {
            return Err(TimeFrameError::InvalidRange {
                from: self.from,
                to: self.to,
            });
        }
        if self.bucket_count() > MAX_REFERENCE_POINTS {
            return Err(TimeFrameError::BucketLimitExceeded {
                limit: MAX_REFERENCE_POINTS,
                bucket_size: self.bucket_size,
            });
        }
        Ok(())
    }

    /// `from` and `to` as bind values for a text timestamp column
    pub fn sql_bounds(&self) -> (String, String) {
        (to_sql_timestamp(self.from), to_sql_timestamp(self.to))
    }

    /// GROUP BY expression for the SQLite aggregate tables (`hour` column)
    pub fn sqlite_group_by_expression(&self) -> String {
        self.group_by_expression(&SqliteDialect, DEFAULT_GROUP_BY_COLUMN)
    }

    /// GROUP BY expression for any dialect and timestamp column
    pub fn group_by_expression(&self, dialect: &dyn SqlDialect, column: &str) -> String {
        dialect.bucket_expression(self.bucket_size, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_new_selects_bucket_and_snaps_end() {
        let frame = TimeFrame::new(
            utc(2024, 7, 1, 0, 0, 0),
            utc(2024, 7, 3, 12, 0, 0),
            chrono_tz::UTC,
        );
        assert_eq!(frame.bucket_size(), BucketSize::Day);
        assert_eq!(frame.from(), utc(2024, 7, 1, 0, 0, 0));
        assert_eq!(frame.to(), utc(2024, 7, 3, 23, 59, 59));
    }

    #[test]
    fn test_new_hourly_snaps_to_end_of_hour() {
        let frame = TimeFrame::new(
            utc(2024, 7, 1, 0, 0, 0),
            utc(2024, 7, 1, 14, 7, 0),
            chrono_tz::UTC,
        );
        assert_eq!(frame.bucket_size(), BucketSize::Hour);
        assert_eq!(frame.to(), utc(2024, 7, 1, 14, 59, 59));
    }

    #[test]
    fn test_local_accessors() {
        let tz = chrono_tz::Europe::Madrid;
        let frame = TimeFrame::new(utc(2025, 10, 29, 23, 0, 0), utc(2025, 11, 29, 13, 7, 0), tz);
        assert_eq!(frame.timezone(), tz);
        assert_eq!(frame.local_from().to_rfc3339(), "2025-10-30T00:00:00+01:00");
        assert_eq!(frame.local_to().to_rfc3339(), "2025-11-29T23:59:59+01:00");
    }

    #[test]
    fn test_validate_ok() {
        let frame = TimeFrame::new(
            utc(2024, 7, 1, 0, 0, 0),
            utc(2024, 7, 3, 0, 0, 0),
            chrono_tz::UTC,
        );
        assert_eq!(frame.validate(), Ok(()));
    }

    #[test]
    fn test_validate_inverted_range() {
        let frame = TimeFrame::new(
            utc(2024, 7, 5, 0, 0, 0),
            utc(2024, 7, 3, 0, 0, 0),
            chrono_tz::UTC,
        );
        let err = frame.validate().unwrap_err();
        assert_eq!(err.code(), "INVALID_TIME_RANGE");
    }

    #[test]
    fn test_validate_bucket_limit() {
        // A forced hourly frame over 60 days needs 1440 points
        let from = utc(2024, 1, 1, 0, 0, 0);
        let frame = TimeFrame::with_bucket_size(
            from,
            from + Duration::days(60),
            chrono_tz::UTC,
            BucketSize::Hour,
        );
        assert_eq!(
            frame.validate(),
            Err(TimeFrameError::BucketLimitExceeded {
                limit: MAX_REFERENCE_POINTS,
                bucket_size: BucketSize::Hour,
            })
        );
    }

    #[test]
    fn test_sqlite_group_by_expression() {
        let frame = TimeFrame::new(
            utc(2024, 7, 1, 0, 0, 0),
            utc(2024, 7, 3, 0, 0, 0),
            chrono_tz::UTC,
        );
        assert_eq!(frame.sqlite_group_by_expression(), "strftime('%Y-%m-%d', hour)");
    }

    #[test]
    fn test_sql_bounds() {
        let frame = TimeFrame::new(
            utc(2024, 7, 1, 0, 0, 0),
            utc(2024, 7, 3, 12, 0, 0),
            chrono_tz::UTC,
        );
        assert_eq!(
            frame.sql_bounds(),
            (
                "2024-07-01 00:00:00".to_string(),
                "2024-07-03 23:59:59".to_string()
            )
        );
    }

    #[test]
    fn test_serialize() {
        let frame = TimeFrame::new(
            utc(2024, 7, 1, 0, 0, 0),
            utc(2024, 7, 3, 0, 0, 0),
            chrono_tz::Europe::Berlin,
        );
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["bucket_size"], "day");
        assert_eq!(json["timezone"], "Europe/Berlin");
        assert_eq!(json["from"], "2024-07-01T00:00:00Z");
    }
}
