//! OpenRouterApiAgent - Direct REST API implementation of the single-shot completion.
//!
//! Calls the OpenAI-compatible Chat Completions endpoint exposed by OpenRouter
//! with a fixed system prompt and the operator's query. Stateless: every call
//! is a fresh two-message conversation.

use async_trait::async_trait;
use duet_core::completion::CompletionPort;
use duet_core::config::CompletionConfig;
use duet_core::error::{Backend, DuetError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Completion agent that talks to the OpenRouter HTTP API.
#[derive(Clone)]
pub struct OpenRouterApiAgent {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    http_referer: String,
    x_title: String,
    max_tokens: Option<u32>,
    request_timeout: Duration,
}

impl OpenRouterApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            http_referer: duet_core::config::DEFAULT_HTTP_REFERER.to_string(),
            x_title: duet_core::config::DEFAULT_X_TITLE.to_string(),
            max_tokens: None,
            request_timeout: Duration::from_secs(
                duet_core::config::DEFAULT_COMPLETION_REQUEST_TIMEOUT_SECS,
            ),
        }
    }

    /// Builds an agent from resolved configuration.
    pub fn from_config(config: &CompletionConfig) -> Self {
        let agent = Self::new(&config.api_key, &config.base_url, &config.model)
            .with_attribution(&config.http_referer, &config.x_title)
            .with_request_timeout(config.request_timeout);
        match config.max_tokens {
            Some(max_tokens) => agent.with_max_tokens(max_tokens),
            None => agent,
        }
    }

    /// Sets the `HTTP-Referer` and `X-Title` headers OpenRouter uses for attribution.
    pub fn with_attribution(
        mut self,
        http_referer: impl Into<String>,
        x_title: impl Into<String>,
    ) -> Self {
        self.http_referer = http_referer.into();
        self.x_title = x_title.into();
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Bounds each completion request, from connect to the last body byte.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &ChatCompletionRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.http_referer)
            .header("X-Title", &self.x_title)
            .json(body)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenRouter error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                return self.transport_error(err);
            }
            DuetError::remote_call(
                Backend::Llm,
                None,
                format!("Failed to parse OpenRouter response: {err}"),
            )
        })?;

        extract_text_response(parsed)
    }

    fn transport_error(&self, err: reqwest::Error) -> DuetError {
        if err.is_timeout() {
            return DuetError::connection(
                Backend::Llm,
                format!(
                    "OpenRouter API request timed out after {}s",
                    self.request_timeout.as_secs_f64()
                ),
            );
        }
        DuetError::connection(Backend::Llm, format!("OpenRouter API request failed: {err}"))
    }
}

#[async_trait]
impl CompletionPort for OpenRouterApiAgent {
    async fn generate_completion(&self, system_prompt: &str, query: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
            max_tokens: self.max_tokens,
        };

        tracing::debug!(model = %self.model, "requesting traditional completion");
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    // OpenRouter can report upstream failures inside a 200 body.
    if let Some(error) = response.error {
        let status = error
            .code
            .as_ref()
            .and_then(serde_json::Value::as_u64)
            .and_then(|c| u16::try_from(c).ok());
        return Err(DuetError::remote_call(Backend::Llm, status, error.message));
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            DuetError::remote_call(
                Backend::Llm,
                None,
                "OpenRouter API returned no content in the response",
            )
        })
}

fn map_http_error(status: StatusCode, body: String) -> DuetError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    DuetError::remote_call(Backend::Llm, Some(status.as_u16()), message)
}
