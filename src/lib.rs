//! Wikiscout - agent pipelines for collecting and summarizing Wikipedia articles
//!
//! An agent is handed a natural-language task, talks to an OpenAI-compatible
//! chat model step by step, and reports a final result inside a `<finish>`
//! block. On top of that the crate offers a few ready-made pipelines:
//!
//! - [`find_topic_urls`]: ask for Reddit URLs for a list of topics
//! - [`summarize_csv`] / [`summarize_url`]: summarize articles
//! - [`chain_of_agents`]: two agents sharing one [`Session`]
//! - [`Pipeline`]: collect article URLs into a CSV file, then summarize them
//!   one by one with retries
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use wikiscout::{LlmAgentRunner, Pipeline, QueryType, Settings};
//!
//! #[tokio::main]
//! async fn main() -> wikiscout::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let runner = LlmAgentRunner::from_settings(&settings)?;
//!     let pipeline = Pipeline::new(Arc::new(runner), &settings.output_dir);
//!
//!     pipeline.process("Pericles, Plato", QueryType::Urls).await?;
//!     pipeline.process("", QueryType::Summary).await?;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
mod config;
pub mod csv_output;
mod error;
pub mod llm;
mod pipeline;
mod retry;
mod runner;
mod session;
pub mod tasks;
mod topics;

pub use agent::{Agent, AgentCallbacks, AgentConfig, AgentEvent, AgentHistory};
pub use config::Settings;
pub use csv_output::{LatestBy, QueryType};
pub use error::{Error, Result};
pub use llm::{ChatModel, Client};
pub use pipeline::{
    Pipeline, StageReport, chain_of_agents, find_topic_urls, summarize_csv, summarize_url,
};
pub use retry::RetryPolicy;
pub use runner::{AgentRunner, LlmAgentRunner, run_task};
pub use session::{Session, SessionEntry, SessionGuard};
pub use topics::validate_topics;
