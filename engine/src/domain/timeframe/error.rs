//! Time frame error types

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::bucket::BucketSize;

/// Errors produced while resolving a time frame.
///
/// Every variant is a deterministic function of the request, so none is
/// retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeFrameError {
    #[error("Invalid timezone: '{0}'")]
    InvalidTimezone(String),

    #[error("Invalid {field} date '{value}': expected YYYY-MM-DD")]
    InvalidDateFormat { field: &'static str, value: String },

    #[error("Invalid range: from ({from}) is after to ({to})")]
    InvalidRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("Unsupported bucket size: '{0}'")]
    UnsupportedBucketSize(String),

    #[error("Time frame needs more than {limit} {bucket_size} buckets")]
    BucketLimitExceeded {
        limit: usize,
        bucket_size: BucketSize,
    },
}

impl TimeFrameError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTimezone(_) => "INVALID_TIMEZONE",
            Self::InvalidDateFormat { .. } => "INVALID_DATE_FORMAT",
            Self::InvalidRange { .. } => "INVALID_TIME_RANGE",
            Self::UnsupportedBucketSize(_) => "UNSUPPORTED_BUCKET_SIZE",
            Self::BucketLimitExceeded { .. } => "RANGE_TOO_LARGE",
        }
    }

    /// Whether the error stems from caller input rather than an engine defect
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::BucketLimitExceeded { .. })
    }
}
