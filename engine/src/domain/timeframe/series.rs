//! Zero-filled time series from sparse GROUP BY results

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::frame::TimeFrame;
use crate::utils::time::to_rfc3339_utc;

/// A `(bucket key, count)` row as returned by storage.
///
/// `date` carries whatever precision the GROUP BY expression emitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, sqlx::FromRow)]
pub struct RawRow {
    pub date: String,
    pub count: i64,
}

impl RawRow {
    pub fn new(date: impl Into<String>, count: i64) -> Self {
        Self {
            date: date.into(),
            count,
        }
    }
}

/// One point of the merged, display-ready series
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SeriesPoint {
    /// RFC 3339 display instant with a `Z` suffix
    pub date: String,
    pub count: i64,
}

impl TimeFrame {
    /// Merge storage rows into the full axis of this frame.
    ///
    /// Output has exactly one point per reference point, in order, with `0`
    /// for buckets storage did not return. Rows outside the frame are ignored.
    /// When two rows normalize to the same key the last one wins.
    pub fn build_time_series_points(&self, rows: &[RawRow]) -> Vec<SeriesPoint> {
        let size = self.bucket_size();

        let mut counts: HashMap<String, i64> = HashMap::with_capacity(rows.len());
        for row in rows {
            let key = size.normalize_key(&row.date);
            if let Some(previous) = counts.insert(key, row.count) {
                tracing::warn!(
                    date = %row.date,
                    previous,
                    count = row.count,
                    "Duplicate bucket key from storage, keeping the last row"
                );
            }
        }

        self.generate_reference_points()
            .into_iter()
            .map(|point| {
                let key = size.normalize_key(&point.bucket_key);
                SeriesPoint {
                    date: to_rfc3339_utc(point.display_instant),
                    count: counts.get(&key).copied().unwrap_or(0),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    use crate::domain::timeframe::BucketSize;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn july_frame() -> TimeFrame {
        TimeFrame::new(
            utc(2024, 7, 1, 0, 0, 0),
            utc(2024, 7, 3, 23, 59, 59),
            chrono_tz::UTC,
        )
    }

    #[test]
    fn test_empty_rows_zero_fill() {
        let series = july_frame().build_time_series_points(&[]);
        assert_eq!(
            series,
            vec![
                SeriesPoint {
                    date: "2024-07-01T00:00:00Z".to_string(),
                    count: 0
                },
                SeriesPoint {
                    date: "2024-07-02T00:00:00Z".to_string(),
                    count: 0
                },
                SeriesPoint {
                    date: "2024-07-03T00:00:00Z".to_string(),
                    count: 0
                },
            ]
        );
    }

    #[test]
    fn test_sparse_rows_merged_in_order() {
        // Out of order and with trailing time precision
        let rows = vec![
            RawRow::new("2024-07-03 00:00:00", 7),
            RawRow::new("2024-07-01", 3),
        ];
        let series = july_frame().build_time_series_points(&rows);
        let counts: Vec<i64> = series.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![3, 0, 7]);
    }

    #[test]
    fn test_rows_outside_frame_ignored() {
        let rows = vec![
            RawRow::new("2024-06-30", 99),
            RawRow::new("2024-07-02", 5),
            RawRow::new("2024-07-04", 99),
        ];
        let series = july_frame().build_time_series_points(&rows);
        let total: i64 = series.iter().map(|p| p.count).sum();
        assert_eq!(total, 5);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let rows = vec![
            RawRow::new("2024-07-02 00:00:00", 1),
            RawRow::new("2024-07-02", 4),
        ];
        let series = july_frame().build_time_series_points(&rows);
        assert_eq!(series[1].count, 4);
    }

    #[test]
    fn test_hourly_series() {
        let frame = TimeFrame::new(
            utc(2024, 7, 1, 10, 0, 0),
            utc(2024, 7, 1, 12, 20, 0),
            chrono_tz::UTC,
        );
        assert_eq!(frame.bucket_size(), BucketSize::Hour);
        let rows = vec![
            RawRow::new("2024-07-01 11:00:00", 12),
            RawRow::new("2024-07-01T12:00:00Z", 2),
        ];
        let series = frame.build_time_series_points(&rows);
        assert_eq!(
            series
                .iter()
                .map(|p| (p.date.as_str(), p.count))
                .collect::<Vec<_>>(),
            vec![
                ("2024-07-01T10:00:00Z", 0),
                ("2024-07-01T11:00:00Z", 12),
                ("2024-07-01T12:00:00Z", 2),
            ]
        );
    }

    #[test]
    fn test_monthly_series_accepts_day_precision_rows() {
        let frame = TimeFrame::new(
            utc(2024, 1, 1, 0, 0, 0),
            utc(2024, 4, 30, 0, 0, 0),
            chrono_tz::UTC,
        );
        assert_eq!(frame.bucket_size(), BucketSize::Month);
        let rows = vec![RawRow::new("2024-02-01", 10), RawRow::new("2024-04", 1)];
        let series = frame.build_time_series_points(&rows);
        let counts: Vec<i64> = series.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![0, 10, 0, 1]);
        assert_eq!(series[1].date, "2024-02-01T00:00:00Z");
    }

    #[test]
    fn test_length_matches_reference_points() {
        let frames = [
            july_frame(),
            TimeFrame::new(
                utc(2024, 7, 1, 0, 0, 0),
                utc(2024, 7, 1, 18, 0, 0),
                chrono_tz::Asia::Kolkata,
            ),
            TimeFrame::new(
                utc(2023, 1, 1, 0, 0, 0),
                utc(2024, 7, 1, 0, 0, 0),
                chrono_tz::America::Chicago,
            ),
        ];
        let rows = vec![RawRow::new("garbage", 1), RawRow::new("", 2)];
        for frame in frames {
            let series = frame.build_time_series_points(&rows);
            assert_eq!(series.len(), frame.generate_reference_points().len());
            assert!(series.iter().all(|p| p.count == 0));
            assert!(series.iter().all(|p| p.date.ends_with('Z')));
        }
    }

    #[test]
    fn test_idempotent() {
        let frame = july_frame();
        let rows = vec![RawRow::new("2024-07-02", 8)];
        assert_eq!(
            frame.build_time_series_points(&rows),
            frame.build_time_series_points(&rows)
        );
    }

    #[test]
    fn test_series_point_serialize() {
        let point = SeriesPoint {
            date: "2024-07-01T00:00:00Z".to_string(),
            count: 3,
        };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"date":"2024-07-01T00:00:00Z","count":3}"#
        );
    }

    #[test]
    fn test_raw_row_deserialize() {
        let rows: Vec<RawRow> =
            serde_json::from_str(r#"[{"date":"2024-07-01 14","count":5}]"#).unwrap();
        assert_eq!(rows, vec![RawRow::new("2024-07-01 14", 5)]);
    }
}
