//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific
//! time bucketing SQL.

use crate::domain::timeframe::BucketSize;

/// SQL dialect trait for generating database-specific SQL
///
/// Every dialect must render bucket keys in the same text format the engine
/// uses for its reference points (see [`BucketSize::db_format`]), so rows from
/// any backend reconcile against the same axis.
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite/DuckDB/ClickHouse: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    /// Format a timestamp expression with a strftime pattern
    ///
    /// - SQLite: `strftime('%Y-%m-%d', col)`
    /// - PostgreSQL: `to_char(col, 'YYYY-MM-DD')`
    /// - DuckDB: `strftime(col, '%Y-%m-%d')`
    /// - ClickHouse: `formatDateTime(col, '%Y-%m-%d')`
    fn format_timestamp(&self, col: &str, format: &str) -> String;

    /// Truncate a timestamp expression to the Monday of its week
    ///
    /// - SQLite: `date(col, '-N days')` with N derived from `%w`
    /// - PostgreSQL/DuckDB: `date_trunc('week', col)`
    /// - ClickHouse: `toMonday(col)`
    fn week_start(&self, col: &str) -> String;

    /// GROUP BY expression bucketing `col` by `size`
    fn bucket_expression(&self, size: BucketSize, col: &str) -> String {
        match size {
            BucketSize::Week => self.format_timestamp(&self.week_start(col), size.db_format()),
            _ => self.format_timestamp(col, size.db_format()),
        }
    }

    /// WHERE clause keeping `col` inside `[from, to]`, bound at `first_index`
    /// and `first_index + 1`
    fn time_range_filter(&self, col: &str, first_index: usize) -> String {
        format!(
            "{} >= {} AND {} <= {}",
            col,
            self.placeholder(first_index),
            col,
            self.placeholder(first_index + 1)
        )
    }
}
