//! ClickHouse SQL dialect implementation

use super::SqlDialect;

/// ClickHouse SQL dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickhouseDialect;

impl SqlDialect for ClickhouseDialect {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn format_timestamp(&self, col: &str, format: &str) -> String {
        format!("formatDateTime({}, '{}')", col, format)
    }

    fn week_start(&self, col: &str) -> String {
        format!("toMonday({})", col)
    }
}
