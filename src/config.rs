//! Configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for deployment-specific values like `PULSEBOARD_DATABASE_URL`.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The strategy whose performance is reported. Absent until the host
    /// application has imported one.
    #[serde(default)]
    pub strategy: Option<StrategyConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub paper_trade: PaperTradeConfig,
}

/// The running strategy's identity: its display name and the config file
/// path used as the report snapshot key.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    pub name: String,
    pub config_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (overridden by `RUST_LOG` when set).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Knobs for the background reporting loops.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// Seconds between performance report ticks.
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
    /// Seconds between status snapshot ticks.
    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: u64,
    /// Maximum lines per outbound status chunk.
    #[serde(default = "default_chunk_max_lines")]
    pub chunk_max_lines: usize,
    /// Seconds to wait between outbound chunk deliveries.
    #[serde(default = "default_drain_delay_secs")]
    pub drain_delay_secs: u64,
    /// Report lookback window in days; 0 means "since process start".
    #[serde(default)]
    pub lookback_days: f64,
    /// Decimal places for volume and P&L figures; unset keeps
    /// magnitude-based rounding.
    #[serde(default)]
    pub precision: Option<u32>,
    /// Markets reported with placeholder base-asset rows because their
    /// positions are margined.
    #[serde(default)]
    pub derivatives: Vec<String>,
}

fn default_report_interval_secs() -> u64 {
    3600
}

fn default_status_interval_secs() -> u64 {
    10
}

fn default_chunk_max_lines() -> usize {
    30
}

fn default_drain_delay_secs() -> u64 {
    1
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: default_report_interval_secs(),
            status_interval_secs: default_status_interval_secs(),
            chunk_max_lines: default_chunk_max_lines(),
            drain_delay_secs: default_drain_delay_secs(),
            lookback_days: 0.0,
            precision: None,
            derivatives: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database URL or file path.
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "pulseboard.sqlite".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Simulated balances for paper-trading venues, keyed by asset symbol.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaperTradeConfig {
    #[serde(default)]
    pub balances: HashMap<String, Decimal>,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Reads `.env` first so environment overrides apply, then validates.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        if let Ok(url) = std::env::var("PULSEBOARD_DATABASE_URL") {
            config.database.url = url;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(strategy) = &self.strategy {
            if strategy.name.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "strategy.name",
                }
                .into());
            }
            if strategy.config_path.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "strategy.config_path",
                }
                .into());
            }
        }
        if self.reporting.report_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reporting.report_interval_secs",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        if self.reporting.status_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reporting.status_interval_secs",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        if self.reporting.chunk_max_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reporting.chunk_max_lines",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize the tracing subscriber from the logging section.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: None,
            logging: LoggingConfig::default(),
            reporting: ReportingConfig::default(),
            database: DatabaseConfig::default(),
            paper_trade: PaperTradeConfig::default(),
        }
    }
}
