//! Error types for market data access
//!
//! Every failure here is recoverable: callers count it, fall back, or render it.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Error, Debug)]
pub enum MarketError {
    /// Network-level failure (DNS, TLS, timeout, connection reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request URL could not be built from the configured base
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-success HTTP status from the market API
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Payload was not the JSON we expected
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local key-value storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Neither the API nor the sample dataset knows this asset
    #[error("Asset not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        MarketError::Transport(err.to_string())
    }
}

impl From<sqlx::Error> for MarketError {
    fn from(err: sqlx::Error) -> Self {
        MarketError::Storage(err.to_string())
    }
}
