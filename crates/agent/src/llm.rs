use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Sampling parameters sent with every completion.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stop: Option<Vec<String>>,
}

impl SamplingConfig {
    pub fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            max_tokens,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: None,
        }
    }

    /// Field extraction and user-story synthesis.
    pub fn form_assist() -> Self {
        Self::with_max_tokens(800)
    }

    pub fn fallback() -> Self {
        Self::with_max_tokens(1500)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub sampling: SamplingConfig,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, sampling: SamplingConfig) -> Self {
        Self { messages, sampling }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// Endpoint or key missing from configuration.
    NotConfigured,
    Network,
    RateLimit,
    ServerError,
    Auth,
    InvalidRequest,
    /// The service answered without any message content.
    EmptyResponse,
    Unknown,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::NotConfigured, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Network, message)
    }

    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::EmptyResponse, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Unknown, message)
    }

    /// Classification of a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::new(LlmErrorKind::Auth, format!("Authentication failed: {message}")),
            429 => Self::new(LlmErrorKind::RateLimit, format!("Rate limit exceeded: {message}")),
            400 | 404 => {
                Self::new(LlmErrorKind::InvalidRequest, format!("Invalid request: {message}"))
            }
            500..=599 => Self::new(LlmErrorKind::ServerError, format!("Server error: {message}")),
            _ => Self::unknown(format!("HTTP {status}: {message}")),
        }
    }
}

/// Text-completion service. Implementations return the first choice's
/// message content untouched.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Replays queued answers in order and records every request it receives.
/// Used by tests across the workspace in place of a live endpoint.
#[derive(Default)]
pub struct ScriptedLlmClient {
    answers: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let answers = answers.into_iter().map(|answer| Ok(answer.into())).collect();
        Self { answers: Mutex::new(answers), requests: Mutex::default() }
    }

    pub fn failing(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        let answers = VecDeque::from([Err(LlmError::new(kind, message))]);
        Self { answers: Mutex::new(answers), requests: Mutex::default() }
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().await.push(request);
        self.answers
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("scripted client has no answers left")))
    }
}
