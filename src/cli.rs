//! Pieces shared by the command-line programs.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::runner::LlmAgentRunner;
use clap::Args;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Flags every program accepts.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Model to drive the agent with (defaults to WIKISCOUT_MODEL or gpt-4o)
    #[arg(long)]
    pub model: Option<String>,

    /// Log every agent step
    #[arg(short, long)]
    pub verbose: bool,
}

/// Retry flags for programs that summarize single articles.
#[derive(Args, Debug, Clone, Default)]
pub struct RetryArgs {
    /// Total attempts per article (defaults to WIKISCOUT_MAX_ATTEMPTS or 3)
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Seconds to wait between attempts (defaults to WIKISCOUT_RETRY_DELAY_SECS or 60)
    #[arg(long)]
    pub retry_delay_secs: Option<u64>,
}

impl RetryArgs {
    pub fn policy(&self, settings: &Settings) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts.unwrap_or(settings.max_attempts),
            self.retry_delay_secs
                .map(Duration::from_secs)
                .unwrap_or(settings.retry_delay),
        )
    }
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` when verbose.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Load settings and apply command-line overrides.
pub fn load_settings(common: &CommonArgs) -> Result<Settings> {
    let mut settings = Settings::from_env()?;
    if let Some(model) = &common.model {
        settings.model = model.clone();
    }
    Ok(settings)
}

/// Build the agent runner the programs use.
pub fn build_runner(settings: &Settings, common: &CommonArgs) -> Result<LlmAgentRunner> {
    Ok(LlmAgentRunner::from_settings(settings)?.verbose(common.verbose))
}

/// Print an agent result the way the programs report it.
pub fn print_result(result: Option<&str>) {
    match result {
        Some(result) => println!("{}", result),
        None => println!("None"),
    }
}

/// Turn an empty positional argument into a validation error early.
pub fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!("{} must not be empty", name)));
    }
    Ok(())
}
