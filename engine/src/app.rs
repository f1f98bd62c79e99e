//! Core application

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::domain::timeframe::{
    BucketPoint, BucketSize, Clock, RawRow, SeriesPoint, SystemClock, TimeFrame, TimeFrameParams,
    TimeFrameParser,
};

/// `points` output
#[derive(Debug, Serialize)]
struct PointsOutput<'a> {
    frame: &'a TimeFrame,
    points: Vec<BucketPoint>,
}

/// `group-by` output
#[derive(Debug, Serialize)]
struct GroupByOutput<'a> {
    dialect: &'a str,
    bucket_size: BucketSize,
    column: &'a str,
    expression: String,
}

/// `series` output
#[derive(Debug, Serialize)]
struct SeriesOutput<'a> {
    frame: &'a TimeFrame,
    series: Vec<SeriesPoint>,
}

pub struct CoreApp<C = SystemClock> {
    pub config: AppConfig,
    parser: TimeFrameParser<C>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config, SystemClock)?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        app.execute(command, &mut out)
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries the JSON output
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

impl<C: Clock> CoreApp<C> {
    pub fn init(cli: &CliConfig, clock: C) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Ok(Self::new(config, clock))
    }

    pub fn new(config: AppConfig, clock: C) -> Self {
        Self {
            config,
            parser: TimeFrameParser::new(clock),
        }
    }

    /// Run one command, writing its JSON result to `out`
    pub fn execute<W: Write>(&self, command: Commands, out: &mut W) -> Result<()> {
        match command {
            Commands::Points { from, to } => {
                let frame = self.frame(from, to)?;
                let points = frame.generate_reference_points();
                self.write_json(
                    out,
                    &PointsOutput {
                        frame: &frame,
                        points,
                    },
                )
            }
            Commands::GroupBy { bucket, .. } => {
                let dialect = self.config.dialect.dialect();
                let expression = dialect.bucket_expression(bucket, &self.config.column);
                self.write_json(
                    out,
                    &GroupByOutput {
                        dialect: dialect.name(),
                        bucket_size: bucket,
                        column: &self.config.column,
                        expression,
                    },
                )
            }
            Commands::Series { from, to, rows } => {
                let frame = self.frame(from, to)?;
                let rows = read_rows(&rows)?;
                tracing::debug!(rows = rows.len(), "Loaded storage rows");
                let series = frame.build_time_series_points(&rows);
                self.write_json(
                    out,
                    &SeriesOutput {
                        frame: &frame,
                        series,
                    },
                )
            }
        }
    }

    fn frame(&self, from: Option<String>, to: Option<String>) -> Result<TimeFrame> {
        let params = TimeFrameParams {
            from_date: from,
            to_date: to,
            timezone: self.config.timezone.clone(),
            first_event: None,
        };
        self.parser
            .parse_time_frame(&params)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, e.code()))
    }

    fn write_json<W: Write, T: Serialize>(&self, out: &mut W, value: &T) -> Result<()> {
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut *out, value)?;
        } else {
            serde_json::to_writer(&mut *out, value)?;
        }
        writeln!(out).context("Failed to write output")?;
        Ok(())
    }
}

/// Read `[{"date", "count"}]` rows from a file, or stdin for `-`
fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    if path == Path::new("-") {
        return serde_json::from_reader(io::stdin().lock())
            .context("Failed to parse rows from stdin");
    }
    let file = File::open(path)
        .with_context(|| format!("Failed to open rows file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse rows file: {}", path.display()))
}
