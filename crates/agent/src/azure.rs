//! Azure OpenAI chat-completions adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use parley_core::config::LlmConfig;

use crate::llm::{ChatMessage, CompletionRequest, LlmClient, LlmError};

pub struct AzureOpenAiClient {
    client: Client,
    endpoint: Option<String>,
    api_key: Option<SecretString>,
    deployment: String,
    api_version: String,
}

impl AzureOpenAiClient {
    /// Builds the client even when the endpoint or key is missing; calls then
    /// fail with a not-configured error that handlers turn into an apology.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone().filter(|url| !url.trim().is_empty()),
            api_key: config.api_key.clone(),
            deployment: config.deployment.clone(),
            api_version: config.api_version.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some()
    }

    fn completions_url(&self, endpoint: &str) -> String {
        completions_url(endpoint, &self.deployment, &self.api_version)
    }
}

pub fn completions_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{deployment}/chat/completions?api-version={api_version}",
        endpoint.trim_end_matches('/')
    )
}

#[async_trait]
impl LlmClient for AzureOpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let (Some(endpoint), Some(api_key)) = (self.endpoint.as_deref(), self.api_key.as_ref())
        else {
            return Err(LlmError::not_configured("llm.endpoint and llm.api_key must both be set"));
        };

        let body = ChatCompletionRequest::from(&request);
        let response = self
            .client
            .post(self.completions_url(endpoint))
            .header("api-key", api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|parsed| parsed.error.message)
                .unwrap_or(text);
            return Err(LlmError::from_status(status.as_u16(), message));
        }

        first_choice_content(&text)
    }
}

/// Content of the first choice in a chat-completions response body.
pub fn first_choice_content(body: &str) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::unknown(format!("Failed to parse response: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::empty_response("response contained no message content"))
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stop: Option<&'a [String]>,
}

impl<'a> From<&'a CompletionRequest> for ChatCompletionRequest<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        let sampling = &request.sampling;
        Self {
            messages: &request.messages,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens: sampling.max_tokens,
            frequency_penalty: sampling.frequency_penalty,
            presence_penalty: sampling.presence_penalty,
            stop: sampling.stop.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use parley_core::config::AppConfig;

    use super::{completions_url, first_choice_content, AzureOpenAiClient, ChatCompletionRequest};
    use crate::llm::{
        ChatMessage, CompletionRequest, LlmClient, LlmErrorKind, SamplingConfig,
    };

    #[test]
    fn url_follows_deployment_shape() {
        assert_eq!(
            completions_url("https://acme.openai.azure.com/", "gpt-35-fallback", "2024-02-15-preview"),
            "https://acme.openai.azure.com/openai/deployments/gpt-35-fallback/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn request_body_carries_sampling() {
        let request = CompletionRequest::new(
            vec![ChatMessage::system("label it"), ChatMessage::user("hello")],
            SamplingConfig::fallback(),
        );
        let body = serde_json::to_value(ChatCompletionRequest::from(&request)).expect("json");

        assert_eq!(body["messages"][0], json!({"role": "system", "content": "label it"}));
        assert_eq!(body["max_tokens"], 1500);
        assert_eq!(body["stop"], serde_json::Value::Null);
        assert_eq!(body["frequency_penalty"], 0.0);
    }

    #[test]
    fn first_choice_is_extracted() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":" find_page "}}]}"#;
        assert_eq!(first_choice_content(body).expect("content"), " find_page ");

        let empty = first_choice_content(r#"{"choices":[]}"#).expect_err("no choices");
        assert_eq!(empty.kind, LlmErrorKind::EmptyResponse);

        let garbage = first_choice_content("<html>").expect_err("not json");
        assert_eq!(garbage.kind, LlmErrorKind::Unknown);
    }

    #[tokio::test]
    async fn unconfigured_client_fails_without_network() {
        let config = AppConfig::default();
        let client = AzureOpenAiClient::from_config(&config.llm).expect("client");
        assert!(!client.is_configured());

        let error = client
            .complete(CompletionRequest::new(vec![ChatMessage::user("hi")], SamplingConfig::fallback()))
            .await
            .expect_err("not configured");
        assert_eq!(error.kind, LlmErrorKind::NotConfigured);
    }
}
