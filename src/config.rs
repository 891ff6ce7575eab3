//! Runtime settings read from the environment.
//!
//! Values come from the process environment after an optional `.env` file in
//! the working directory has been loaded. Command-line flags override them.

use crate::error::{Error, Result};
use crate::llm::DEFAULT_BASE_URL;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Settings shared by all binaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub output_dir: PathBuf,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub max_steps: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gpt-4o".to_string(),
            output_dir: PathBuf::from("output"),
            max_attempts: 3,
            retry_delay: Duration::from_secs(60),
            max_steps: 10,
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and read settings from the environment.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("no .env file loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: get("WIKISCOUT_MODEL").unwrap_or(defaults.model),
            output_dir: get("WIKISCOUT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            max_attempts: parse(get("WIKISCOUT_MAX_ATTEMPTS"), "WIKISCOUT_MAX_ATTEMPTS")?
                .unwrap_or(defaults.max_attempts),
            retry_delay: parse(get("WIKISCOUT_RETRY_DELAY_SECS"), "WIKISCOUT_RETRY_DELAY_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.retry_delay),
            max_steps: parse(get("WIKISCOUT_MAX_STEPS"), "WIKISCOUT_MAX_STEPS")?
                .unwrap_or(defaults.max_steps),
        })
    }

    /// The API key, or a configuration error naming the missing variable.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OPENAI_API_KEY is not set".to_string()))
    }
}

fn parse<T: FromStr>(value: Option<String>, key: &str) -> Result<Option<T>> {
    value
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, v)))
        })
        .transpose()
}
