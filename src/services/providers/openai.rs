/// OpenAI-compatible chat completion provider
///
/// Sends one fixed system message plus the built prompt to
/// `{api_url}/chat/completions` and returns the first choice's text.
/// Transient failures (429, 5xx, timeouts, connection errors) are retried
/// with exponential backoff up to `max_retries` times.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::providers::CompletionProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

pub const SYSTEM_PROMPT: &str = "You are a movie recommendation assistant. \
Reply with exactly one movie in the form Title (Year) and nothing else.";
pub const MAX_TOKENS: u32 = 50;
pub const TEMPERATURE: f64 = 0.7;

/// Backoff settings for transient completion failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Outcome of a single failed attempt
enum CallFailure {
    Retryable(String),
    Fatal(AppError),
}

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    model: String,
    retry: RetryPolicy,
}

impl OpenAiProvider {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.upstream_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: config.openai_api_key.clone(),
            api_url: config.openai_api_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
            retry: RetryPolicy {
                max_retries: config.completion_max_retries,
                ..RetryPolicy::default()
            },
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn send_once(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest<'_>,
    ) -> Result<String, CallFailure> {
        let url = format!("{}/chat/completions", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let message = format!("request to completion service failed: {}", e);
                if e.is_timeout() || e.is_connect() {
                    CallFailure::Retryable(message)
                } else {
                    CallFailure::Fatal(AppError::ProviderUnavailable(message))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("completion service returned status {}: {}", status, body);
            return if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                Err(CallFailure::Retryable(message))
            } else {
                Err(CallFailure::Fatal(AppError::ProviderUnavailable(message)))
            };
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            CallFailure::Fatal(AppError::ProviderUnavailable(format!(
                "failed to parse completion response: {}",
                e
            )))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CallFailure::Fatal(AppError::EmptyCompletion))
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    #[instrument(skip_all, fields(provider = "openai"))]
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("OPENAI_API_KEY is not set".to_string()))?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let mut backoff = self.retry.initial_backoff;
        let mut attempt = 0;

        loop {
            match self.send_once(api_key, &request).await {
                Ok(text) => {
                    tracing::info!(
                        model = %self.model,
                        attempts = attempt + 1,
                        provider = self.name(),
                        "Completion received"
                    );
                    return Ok(text);
                }
                Err(CallFailure::Retryable(message)) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %message,
                        "Transient completion failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(self.retry.max_backoff);
                }
                Err(CallFailure::Retryable(message)) => {
                    return Err(AppError::ProviderUnavailable(message));
                }
                Err(CallFailure::Fatal(e)) => return Err(e),
            }
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
