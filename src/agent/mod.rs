//! LLM-driven browsing agent.
//!
//! An agent takes one natural-language task, converses with the model until
//! the model returns a `<finish>` block, and records what it did in an
//! [`AgentHistory`]. Agents that share a [`Session`] see the results of the
//! tasks that ran before them.

mod config;
mod events;
mod history;
mod prompt;

pub use config::AgentConfig;
pub use events::{AgentCallbacks, AgentEvent, EventCallback};
pub use history::AgentHistory;

use crate::error::Result;
use crate::llm::{ChatModel, GenerateOptions, Message, Response};
use crate::session::Session;
use events::verbose_callbacks;
use prompt::{CONTINUE_PROMPT, DEFAULT_SYSTEM, SYSTEM_PROMPT_TEMPLATE};
use regex::Regex;
use std::sync::{Arc, Mutex};

/// A single-task agent backed by a chat model.
pub struct Agent {
    model: Arc<dyn ChatModel>,
    config: AgentConfig,
    messages: Vec<Message>,
    /// Regex to match <finish>...</finish> blocks
    finish_regex: Regex,
    /// Regex to unwrap a fenced block inside a finish block
    fence_regex: Regex,
    /// Callbacks for observability
    callbacks: AgentCallbacks,
}

impl Agent {
    /// Create a new agent that talks to `model` with the given configuration.
    pub fn new(model: Arc<dyn ChatModel>, config: AgentConfig) -> Self {
        Self {
            model,
            config,
            messages: Vec::new(),
            finish_regex: Regex::new(r"<finish>\s*([\s\S]*?)</finish>").unwrap(),
            fence_regex: Regex::new(r"^```[a-zA-Z]*\s*\n([\s\S]*?)\s*```$").unwrap(),
            callbacks: AgentCallbacks::default(),
        }
    }

    // =========================================================================
    // Builder methods for callbacks
    // =========================================================================

    /// Log step progress, model replies and the final result via `tracing`.
    pub fn verbose(mut self, enabled: bool) -> Self {
        if enabled {
            let captured = self.callbacks.captured_events.take();
            self.callbacks = verbose_callbacks();
            self.callbacks.captured_events = captured;
        }
        self
    }

    /// Set a callback for step start events.
    pub fn on_step_start<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_step_start = Some(Arc::new(f));
        self
    }

    /// Set a callback for finish events.
    pub fn on_finish<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_finish = Some(Arc::new(f));
        self
    }

    /// Set a callback for error events.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_error = Some(Arc::new(f));
        self
    }

    /// Set a catch-all callback for any event.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&AgentEvent) + Send + Sync + 'static,
    {
        self.callbacks.on_event = Some(Arc::new(f));
        self
    }

    /// Keep every emitted event for later inspection with [`Agent::take_events`].
    pub fn capture_events(mut self, enabled: bool) -> Self {
        self.callbacks.captured_events = enabled.then(|| Arc::new(Mutex::new(Vec::new())));
        self
    }

    /// Take the captured events.
    pub fn take_events(&mut self) -> Vec<AgentEvent> {
        if let Some(ref events) = self.callbacks.captured_events
            && let Ok(mut events) = events.lock()
        {
            return std::mem::take(&mut *events);
        }
        Vec::new()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the conversation history.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn emit(&self, event: AgentEvent) {
        self.callbacks.emit(&event);
    }

    fn system_prompt(&self) -> String {
        let system = self.config.system.as_deref().unwrap_or(DEFAULT_SYSTEM);
        SYSTEM_PROMPT_TEMPLATE.replace("{system}", system)
    }

    /// Prefix the task with what earlier agents in the session did.
    fn inject_session(&self, task: &str, session: &Session) -> String {
        match session.render() {
            Some(log) => format!("<session>\n{}\n</session>\n\n{}", log, task),
            None => task.to_string(),
        }
    }

    /// Extract the contents of a finish block, unwrapping a code fence if the
    /// model added one anyway.
    fn extract_finish(&self, text: &str) -> Option<String> {
        let content = self
            .finish_regex
            .captures(text)?
            .get(1)
            .map(|m| m.as_str().trim())
            .unwrap_or_default();

        let unfenced = self
            .fence_regex
            .captures(content)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or(content);

        Some(unfenced.to_string())
    }

    async fn call_llm(&self) -> Result<Response> {
        let options = GenerateOptions {
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        self.model
            .complete(&self.config.model, self.messages.clone(), options)
            .await
    }

    // =========================================================================
    // Main run loop
    // =========================================================================

    /// Run the agent on a task within a session.
    ///
    /// Returns the history of the run. When the step budget runs out before
    /// the model finishes, the history has no final result; this is not an
    /// error. Backend failures are returned as errors.
    pub async fn run(&mut self, task: &str, session: &Session) -> Result<AgentHistory> {
        session.ensure_open()?;

        self.messages.clear();
        self.messages.push(Message::system(self.system_prompt()));
        self.messages.push(Message::user(self.inject_session(task, session)));

        let mut history = AgentHistory::new(task);

        for step in 1..=self.config.max_steps {
            self.emit(AgentEvent::StepStart {
                step,
                max_steps: self.config.max_steps,
            });
            self.emit(AgentEvent::LlmRequest {
                message_count: self.messages.len(),
            });

            let response = match self.call_llm().await {
                Ok(response) => response,
                Err(e) => {
                    self.emit(AgentEvent::Error {
                        message: e.to_string(),
                    });
                    return Err(e);
                }
            };

            self.emit(AgentEvent::LlmResponse {
                content: response.text.clone(),
                tokens_used: response.tokens_used,
            });
            history.push_step(response.text.clone());

            let finish = self.extract_finish(&response.text);
            self.messages.push(Message::assistant(response.text));

            if let Some(result) = finish {
                self.emit(AgentEvent::Finish {
                    result: result.clone(),
                });
                session.record(task, Some(&result))?;
                history.finish(result);
                return Ok(history);
            }

            self.messages.push(Message::user(CONTINUE_PROMPT));
        }

        self.emit(AgentEvent::Error {
            message: format!("Max steps ({}) reached", self.config.max_steps),
        });
        session.record(task, None)?;
        Ok(history)
    }
}
