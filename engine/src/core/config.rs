use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_GROUP_BY_COLUMN, DEFAULT_TIMEZONE,
};
use crate::data::sql::Backend;
use crate::utils::time::parse_timezone;

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub timezone: Option<String>,
    pub dialect: Option<Backend>,
    pub column: Option<String>,
    pub pretty: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if other.timezone.is_some() {
            tracing::trace!(timezone = ?other.timezone, "Merging timezone");
            self.timezone = other.timezone;
        }
        if other.dialect.is_some() {
            tracing::trace!(dialect = ?other.dialect, "Merging dialect");
            self.dialect = other.dialect;
        }
        if other.column.is_some() {
            tracing::trace!(column = ?other.column, "Merging column");
            self.column = other.column;
        }
        if other.pretty.is_some() {
            self.pretty = other.pretty;
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Viewer timezone used when a request does not name one
    pub timezone: String,
    pub dialect: Backend,
    /// Timestamp column bucketed by `group-by`
    pub column: String,
    pub pretty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            dialect: Backend::default(),
            column: DEFAULT_GROUP_BY_COLUMN.to_string(),
            pretty: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.tickline/tickline.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        Self::load_with_profile(cli, get_profile_config_path().as_deref())
    }

    fn load_with_profile(cli: &CliConfig, profile_path: Option<&Path>) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Profile dir, skipped if missing
        if let Some(profile_path) = profile_path
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_home(path);
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        // 3. Layer configs: defaults -> file config -> CLI/env overrides
        let config = Self {
            timezone: cli
                .timezone
                .clone()
                .or(file_config.timezone)
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            dialect: cli.dialect.or(file_config.dialect).unwrap_or_default(),
            column: cli
                .column
                .clone()
                .or(file_config.column)
                .unwrap_or_else(|| DEFAULT_GROUP_BY_COLUMN.to_string()),
            // --pretty can only switch pretty printing on
            pretty: cli.pretty || file_config.pretty.unwrap_or(false),
        };

        config.validate()?;
        tracing::debug!(
            timezone = %config.timezone,
            dialect = %config.dialect,
            column = %config.column,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if parse_timezone(&self.timezone).is_none() {
            anyhow::bail!(
                "Configuration error: timezone '{}' is not a valid IANA timezone",
                self.timezone
            );
        }
        if self.column.trim().is_empty() {
            anyhow::bail!("Configuration error: column must not be empty");
        }
        Ok(())
    }
}

/// Get the profile config path (~/.tickline/tickline.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
