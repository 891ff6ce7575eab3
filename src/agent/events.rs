//! Agent events and callbacks for observability.

use std::sync::{Arc, Mutex};

/// Events emitted during agent execution for observability.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Starting a new step
    StepStart { step: usize, max_steps: usize },
    /// About to call the LLM
    LlmRequest { message_count: usize },
    /// LLM responded
    LlmResponse {
        content: String,
        tokens_used: Option<usize>,
    },
    /// Agent produced its final result
    Finish { result: String },
    /// An error occurred
    Error { message: String },
}

/// Type alias for event callbacks
pub type EventCallback = Arc<dyn Fn(&AgentEvent) + Send + Sync>;

/// Storage for agent callbacks
#[derive(Default, Clone)]
pub struct AgentCallbacks {
    pub on_step_start: Option<EventCallback>,
    pub on_llm_request: Option<EventCallback>,
    pub on_llm_response: Option<EventCallback>,
    pub on_finish: Option<EventCallback>,
    pub on_error: Option<EventCallback>,
    /// Catch-all callback for any event
    pub on_event: Option<EventCallback>,
    /// Captured events, kept for later inspection
    pub(crate) captured_events: Option<Arc<Mutex<Vec<AgentEvent>>>>,
}

impl AgentCallbacks {
    /// Emit an event to the appropriate callback(s)
    pub fn emit(&self, event: &AgentEvent) {
        if let Some(ref events) = self.captured_events
            && let Ok(mut events) = events.lock()
        {
            events.push(event.clone());
        }

        let specific = match event {
            AgentEvent::StepStart { .. } => &self.on_step_start,
            AgentEvent::LlmRequest { .. } => &self.on_llm_request,
            AgentEvent::LlmResponse { .. } => &self.on_llm_response,
            AgentEvent::Finish { .. } => &self.on_finish,
            AgentEvent::Error { .. } => &self.on_error,
        };

        if let Some(cb) = specific {
            cb(event);
        }

        if let Some(cb) = &self.on_event {
            cb(event);
        }
    }
}

fn preview(text: &str, limit: usize) -> String {
    let head: String = text.chars().take(limit).collect();
    let suffix = if text.chars().count() > limit { "..." } else { "" };
    format!("{}{}", head.replace('\n', "\\n"), suffix)
}

/// Create callbacks that log agent progress through `tracing`.
pub fn verbose_callbacks() -> AgentCallbacks {
    AgentCallbacks {
        on_step_start: Some(Arc::new(|e| {
            if let AgentEvent::StepStart { step, max_steps } = e {
                tracing::info!("Step {}/{}", step, max_steps);
            }
        })),
        on_llm_response: Some(Arc::new(|e| {
            if let AgentEvent::LlmResponse {
                content,
                tokens_used,
            } = e
            {
                tracing::debug!(tokens = ?tokens_used, "LLM: {}", preview(content, 100));
            }
        })),
        on_finish: Some(Arc::new(|e| {
            if let AgentEvent::Finish { result } = e {
                tracing::info!("Finish: {}", preview(result, 200));
            }
        })),
        on_error: Some(Arc::new(|e| {
            if let AgentEvent::Error { message } = e {
                tracing::warn!("Agent error: {}", message);
            }
        })),
        ..Default::default()
    }
}
