// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "tickline";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".tickline";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "tickline.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TICKLINE_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TICKLINE_LOG";

/// Environment variable for the default viewer timezone
pub const ENV_TIMEZONE: &str = "TICKLINE_TIMEZONE";

/// Environment variable for the SQL dialect used by `group-by`
pub const ENV_DIALECT: &str = "TICKLINE_DIALECT";

/// Environment variable for the timestamp column used in GROUP BY expressions
pub const ENV_COLUMN: &str = "TICKLINE_COLUMN";

// =============================================================================
// Defaults
// =============================================================================

/// Default viewer timezone
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Timestamp column of the hourly aggregate tables
pub const DEFAULT_GROUP_BY_COLUMN: &str = "hour";

// =============================================================================
// Time Window
// =============================================================================

/// Tolerance added to "now" when a range ends today (clock skew, ingestion lag)
pub const TIME_WINDOW_BUFFER_MINUTES: i64 = 5;

/// Days looked back when no start date is given
pub const DEFAULT_LOOKBACK_DAYS: u64 = 30;

/// Hard cap on reference points emitted for a single time frame
pub const MAX_REFERENCE_POINTS: usize = 1000;

// =============================================================================
// Bucket Size Thresholds (span in whole days, first match wins)
// =============================================================================

/// Spans of at least five years are bucketed by year
pub const YEAR_BUCKET_MIN_DAYS: i64 = 1825;

/// Spans of at least three months are bucketed by month
pub const MONTH_BUCKET_MIN_DAYS: i64 = 90;

/// Spans of at least two days are bucketed by day, shorter ones by hour
pub const DAY_BUCKET_MIN_DAYS: i64 = 2;
