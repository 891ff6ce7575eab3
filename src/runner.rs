//! The agent capability used by the pipelines.
//!
//! Pipelines only depend on [`AgentRunner`]; the shipped implementation
//! builds a fresh [`Agent`] per task on top of a chat model.

use crate::agent::{Agent, AgentConfig, AgentEvent, AgentHistory, EventCallback};
use crate::config::Settings;
use crate::error::Result;
use crate::llm::{ChatModel, Client};
use crate::session::Session;
use async_trait::async_trait;
use std::sync::Arc;

/// Runs a natural-language task and returns what the agent did.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, task: &str, session: &Session) -> Result<AgentHistory>;
}

/// [`AgentRunner`] backed by a chat model.
#[derive(Clone)]
pub struct LlmAgentRunner {
    model: Arc<dyn ChatModel>,
    config: AgentConfig,
    verbose: bool,
    on_event: Option<EventCallback>,
}

impl LlmAgentRunner {
    pub fn new(model: Arc<dyn ChatModel>, config: AgentConfig) -> Self {
        Self {
            model,
            config,
            verbose: false,
            on_event: None,
        }
    }

    /// Build a runner for the configured chat-completions endpoint.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::new(&settings.base_url, settings.require_api_key()?);
        let config = AgentConfig::new(&settings.model).max_steps(settings.max_steps);
        Ok(Self::new(Arc::new(client), config))
    }

    /// Log agent progress for every run.
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Observe every event of every run, alongside verbose logging.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentEvent) + Send + Sync + 'static,
    {
        self.on_event = Some(Arc::new(f));
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

#[async_trait]
impl AgentRunner for LlmAgentRunner {
    async fn run(&self, task: &str, session: &Session) -> Result<AgentHistory> {
        tracing::debug!(model = %self.config.model, "starting agent");
        let mut agent = Agent::new(self.model.clone(), self.config.clone()).verbose(self.verbose);
        if let Some(cb) = &self.on_event {
            let cb = cb.clone();
            agent = agent.on_event(move |e| cb(e));
        }
        agent.run(task, session).await
    }
}

/// Run one task in its own session, released on every exit path.
pub async fn run_task(runner: &dyn AgentRunner, task: &str) -> Result<AgentHistory> {
    let session = Session::scoped();
    runner.run(task, &session).await
}
