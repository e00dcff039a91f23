use crate::config::Settings;
use crate::domain::message::{Message, Role};
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::ChatCompletionClient;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Fixed for every report; callers cannot override either.
pub const COMPLETION_MODEL: &str = "gpt-3.5-turbo";
pub const COMPLETION_TEMPERATURE: f32 = 1.1;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_openai_api_key()?.to_string();
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        // No timeout unless one is configured; the transport default applies otherwise.
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_secs) = std::env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let http = builder.build().context("failed to build reqwest client")?;

        Ok(Self::new(http, api_key, base_url))
    }

    pub fn new(http: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            http,
            api_key,
            base_url,
        }
    }

    fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn create_chat_completion(
        &self,
        req: &ChatCompletionRequest<'_>,
    ) -> anyhow::Result<ChatCompletionResponse> {
        let res = self
            .http
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read OpenAI response body")?;
        if !status.is_success() {
            return Err(Self::http_error(status, &text).into());
        }

        serde_json::from_str::<ChatCompletionResponse>(&text)
            .with_context(|| format!("failed to decode OpenAI chat completion response: {text}"))
    }

    // Prefers the provider's `error.message`; otherwise keeps the raw body.
    fn http_error(status: reqwest::StatusCode, body: &str) -> LlmDiagnosticsError {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        let detail = if message.is_empty() {
            format!("status={status}")
        } else {
            format!("status={status}: {message}")
        };
        LlmDiagnosticsError {
            provider: PROVIDER,
            stage: "http",
            detail,
        }
    }

    fn top_choice(res: ChatCompletionResponse) -> anyhow::Result<Message> {
        let Some(choice) = res.choices.into_iter().next() else {
            return Err(LlmDiagnosticsError {
                provider: PROVIDER,
                stage: "decode",
                detail: "response contained no choices".to_string(),
            }
            .into());
        };

        let content = choice
            .message
            .content
            .context("OpenAI choice has no text content")?;
        Ok(Message {
            role: choice.message.role,
            content,
        })
    }
}

#[async_trait::async_trait]
impl ChatCompletionClient for OpenAiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, messages: Vec<Message>) -> anyhow::Result<Message> {
        let req = ChatCompletionRequest {
            model: COMPLETION_MODEL,
            messages: &messages,
            temperature: COMPLETION_TEMPERATURE,
        };

        let res = self.create_chat_completion(&req).await?;
        if let Some(usage) = &res.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }
        Self::top_choice(res)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'static str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    role: Role,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}
