use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_COLUMN, ENV_CONFIG, ENV_DIALECT, ENV_TIMEZONE};
use crate::data::sql::Backend;
use crate::domain::timeframe::BucketSize;

#[derive(Parser)]
#[command(name = "tickline")]
#[command(version, about = "Time bucketing for analytics charts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Viewer timezone (IANA name, e.g. Europe/Madrid)
    #[arg(long, short = 't', global = true, env = ENV_TIMEZONE)]
    pub timezone: Option<String>,

    /// SQL dialect (sqlite, postgres, duckdb, clickhouse)
    #[arg(long, short = 'd', global = true, env = ENV_DIALECT, value_parser = parse_backend)]
    pub dialect: Option<Backend>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

/// Parse SQL dialect from CLI/env string
fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse()
}

/// Parse bucket size from CLI string
fn parse_bucket_size(s: &str) -> Result<BucketSize, String> {
    s.parse::<BucketSize>().map_err(|e| e.to_string())
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Resolve a date range and print its reference points
    Points {
        /// Start date (YYYY-MM-DD), defaults to 30 days ago
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<String>,
    },
    /// Print the GROUP BY expression for a bucket size
    GroupBy {
        /// Bucket size (hour, day, week, month, year)
        #[arg(long, short = 'b', value_parser = parse_bucket_size)]
        bucket: BucketSize,
        /// Timestamp column to bucket
        #[arg(long, env = ENV_COLUMN)]
        column: Option<String>,
    },
    /// Merge storage rows into a zero-filled series
    Series {
        /// Start date (YYYY-MM-DD), defaults to 30 days ago
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<String>,
        /// JSON file with `[{"date", "count"}]` rows, `-` for stdin
        #[arg(long, short = 'r')]
        rows: PathBuf,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub timezone: Option<String>,
    pub dialect: Option<Backend>,
    pub column: Option<String>,
    pub pretty: bool,
}

impl Cli {
    /// Split parsed arguments into config overrides and the command to run
    pub fn into_parts(self) -> (CliConfig, Commands) {
        let column = match &self.command {
            Commands::GroupBy { column, .. } => column.clone(),
            _ => None,
        };
        let config = CliConfig {
            config: self.config,
            timezone: self.timezone,
            dialect: self.dialect,
            column,
            pretty: self.pretty,
        };
        (config, self.command)
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    Cli::parse().into_parts()
}
