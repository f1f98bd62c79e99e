//! SQLite SQL dialect implementation

use super::SqlDialect;

/// SQLite SQL dialect
///
/// Timestamps are stored as `YYYY-MM-DD HH:MM:SS` text in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn format_timestamp(&self, col: &str, format: &str) -> String {
        format!("strftime('{}', {})", format, col)
    }

    fn week_start(&self, col: &str) -> String {
        // %w is 0 for Sunday; shift so Monday is 0
        format!(
            "date({}, '-' || ((CAST(strftime('%w', {}) AS INTEGER) + 6) % 7) || ' days')",
            col, col
        )
    }
}
