//! PostgreSQL SQL dialect implementation

use super::SqlDialect;

/// PostgreSQL SQL dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn format_timestamp(&self, col: &str, format: &str) -> String {
        format!("to_char({}, '{}')", col, to_char_pattern(format))
    }

    fn week_start(&self, col: &str) -> String {
        format!("date_trunc('week', {})", col)
    }
}

/// Translate the strftime subset used for bucket keys to a `to_char` template
fn to_char_pattern(format: &str) -> String {
    format
        .replace("%Y", "YYYY")
        .replace("%m", "MM")
        .replace("%d", "DD")
        .replace("%H", "HH24")
}
