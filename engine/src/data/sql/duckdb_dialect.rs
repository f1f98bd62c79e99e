//! DuckDB SQL dialect implementation

use super::SqlDialect;

/// DuckDB SQL dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckdbDialect;

impl SqlDialect for DuckdbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn format_timestamp(&self, col: &str, format: &str) -> String {
        // DuckDB takes the value first, unlike SQLite
        format!("strftime({}, '{}')", col, format)
    }

    fn week_start(&self, col: &str) -> String {
        format!("date_trunc('week', {})", col)
    }
}
