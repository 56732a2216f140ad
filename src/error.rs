//! Failures surfaced by the library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TempBoardError {
    /// Settings that cannot be used to build a client or the server
    #[error("Configuration error: {0}")]
    Config(String),

    /// NWS or Kalshi unreachable, non-success status, or an undecodable body
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl TempBoardError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text shown on the dashboard page and in `{"error": ...}` bodies
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => "Configuration error. Please check your config file.".to_string(),
            Self::Upstream(message) => format!("Failed to load weather data: {message}"),
            Self::Validation(message) => format!("Invalid input: {message}"),
        }
    }
}

impl From<reqwest::Error> for TempBoardError {
    fn from(err: reqwest::Error) -> Self {
        match err.url() {
            Some(url) => Self::upstream(format!("{url}: {err}")),
            None => Self::upstream(err.to_string()),
        }
    }
}
