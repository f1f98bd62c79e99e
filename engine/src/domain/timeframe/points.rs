//! Reference points: every bucket on the time axis of a frame

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::bucket::BucketSize;
use super::frame::TimeFrame;
use crate::core::constants::MAX_REFERENCE_POINTS;
use crate::utils::time::{truncate_to_utc_hour, utc_midnight};

/// One tick on the time axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketPoint {
    /// Key in the exact format the storage GROUP BY expression produces
    pub bucket_key: String,
    /// Instant that renders as the bucket's date or hour in any timezone.
    ///
    /// Calendar buckets use UTC midnight of the local calendar date, not the
    /// real instant of local midnight. Hour buckets use the real UTC hour.
    pub display_instant: DateTime<Utc>,
}

impl TimeFrame {
    /// Enumerate every bucket between `from` and `to`, inclusive, in order.
    ///
    /// Stops at `MAX_REFERENCE_POINTS`. Reaching the cap means the bucket size
    /// was wrong for the span; [`TimeFrame::validate`] reports it up front.
    pub fn generate_reference_points(&self) -> Vec<BucketPoint> {
        let points = match self.bucket_size() {
            BucketSize::Hour => self.hourly_points(),
            size => self.calendar_points(size),
        };
        tracing::trace!(
            bucket_size = %self.bucket_size(),
            count = points.len(),
            "Generated reference points"
        );
        points
    }

    /// Number of buckets between `from` and `to`, inclusive, without the cap
    pub fn bucket_count(&self) -> usize {
        let count = match self.bucket_size() {
            BucketSize::Hour => (self.to() - truncate_to_utc_hour(self.from())).num_hours() + 1,
            size => {
                let (first, last) = self.calendar_bounds(size);
                match size {
                    BucketSize::Week => (last - first).num_days() / 7 + 1,
                    BucketSize::Month => month_index(last) - month_index(first) + 1,
                    BucketSize::Year => i64::from(last.year() - first.year()) + 1,
                    _ => (last - first).num_days() + 1,
                }
            }
        };
        usize::try_from(count).unwrap_or(0)
    }

    fn hourly_points(&self) -> Vec<BucketPoint> {
        let mut points = Vec::new();
        let mut current = truncate_to_utc_hour(self.from());

        // Hour boundaries are the same instant everywhere, so compare raw instants
        while current <= self.to() {
            if points.len() >= MAX_REFERENCE_POINTS {
                self.report_cap();
                break;
            }
            points.push(BucketPoint {
                bucket_key: BucketSize::Hour.format_key(current.naive_utc()),
                display_instant: current,
            });
            current += Duration::hours(1);
        }
        points
    }

    fn calendar_points(&self, size: BucketSize) -> Vec<BucketPoint> {
        let mut points = Vec::new();
        let (first, last) = self.calendar_bounds(size);
        let mut current = Some(first);

        // Compare bucket starts, not instants, so the bucket holding `to` is
        // always emitted even when `to` is not on a boundary.
        while let Some(date) = current.filter(|d| *d <= last) {
            if points.len() >= MAX_REFERENCE_POINTS {
                self.report_cap();
                break;
            }
            points.push(BucketPoint {
                bucket_key: size.format_key(date.and_time(NaiveTime::MIN)),
                display_instant: utc_midnight(date),
            });
            current = size.step(date.and_time(NaiveTime::MIN)).map(|t| t.date());
        }
        points
    }

    /// Bucket starts containing `from` and `to`, as viewer-local calendar dates
    fn calendar_bounds(&self, size: BucketSize) -> (NaiveDate, NaiveDate) {
        (
            size.truncate_date(self.local_from().date_naive()),
            size.truncate_date(self.local_to().date_naive()),
        )
    }

    fn report_cap(&self) {
        tracing::error!(
            limit = MAX_REFERENCE_POINTS,
            bucket_size = %self.bucket_size(),
            from = %self.from(),
            to = %self.to(),
            "Reference point limit reached, bucket size does not fit the span"
        );
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

#[cfg(test)]
#[path = "points_tests.rs"]
mod tests;
