use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("trade lookup error: {0}")]
    Trades(String),

    #[error("balance lookup failed for {venue}: {reason}")]
    Balance { venue: String, reason: String },

    #[error("performance engine error: {0}")]
    Performance(String),

    #[error("delivery error: {0}")]
    Delivery(String),

    #[error("status error: {0}")]
    Status(String),
}

pub type Result<T> = std::result::Result<T, Error>;
