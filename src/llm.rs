//! Minimal client for OpenAI-compatible chat-completions endpoints.
//!
//! Requests are made with a blocking `ureq` agent; the async entry point
//! moves the call onto tokio's blocking pool.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default endpoint base used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling options for a single request.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Model reply.
#[derive(Debug, Clone)]
pub struct Response {
    pub text: String,
    pub tokens_used: Option<usize>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Anything that can answer a chat conversation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: GenerateOptions,
    ) -> Result<Response>;
}

/// Chat-completions client. Cloning is cheap.
#[derive(Clone)]
pub struct Client {
    http: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl Client {
    /// Create a client for the given endpoint base and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send a chat request and wait for the reply.
    pub fn generate_with(
        &self,
        model: &str,
        messages: &[Message],
        options: &GenerateOptions,
    ) -> Result<Response> {
        let request = ChatRequest {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let mut response = self
            .http
            .post(&self.endpoint())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send_json(&request)
            .map_err(|e| Error::Llm(format!("Request error: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::Llm(format!("Error reading response: {}", e)))?;

        if !(200..300).contains(&status) {
            return Err(status_error(status, &body));
        }
        parse_response(&body)
    }

    /// Async variant of [`Client::generate_with`].
    pub async fn agenerate_with(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: GenerateOptions,
    ) -> Result<Response> {
        let client = self.clone();
        let model = model.to_string();
        tokio::task::spawn_blocking(move || client.generate_with(&model, &messages, &options))
            .await
            .map_err(|e| Error::Llm(format!("Request task failed: {}", e)))?
    }
}

#[async_trait]
impl ChatModel for Client {
    async fn complete(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: GenerateOptions,
    ) -> Result<Response> {
        self.agenerate_with(model, messages, options).await
    }
}

/// Map a non-success HTTP status to an error, keeping the backend's message.
fn status_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    if status == 429 {
        Error::RateLimited(message)
    } else {
        Error::Llm(format!("HTTP error {}: {}", status, message))
    }
}

fn parse_response(body: &str) -> Result<Response> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::Llm(format!("Error parsing response: {}", e)))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| Error::Llm("Response contained no message".to_string()))?;

    Ok(Response {
        text,
        tokens_used: parsed.usage.map(|u| u.total_tokens),
    })
}
