//! Error types for wikiscout.

use thiserror::Error;

/// Errors that can occur while running agents and writing their results.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or missing command-line input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Agent result is not JSON at all
    #[error("Invalid JSON string: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Agent result is JSON but not the expected records
    #[error("Unexpected data format: {0}")]
    DataFormat(String),

    /// Writing an output file failed
    #[error("Error writing CSV: {0}")]
    Write(String),

    /// Reading a CSV input failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error outside of CSV writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The model backend throttled the request
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other model backend failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// An agent was asked to run on a session that was already released
    #[error("Browsing session is closed")]
    SessionClosed,
}

impl Error {
    /// Whether this failure carries the backend's rate-limit signature.
    pub fn is_rate_limit(&self) -> bool {
        self.to_string().contains("Rate limit")
    }
}

/// Result type for wikiscout operations.
pub type Result<T> = std::result::Result<T, Error>;
