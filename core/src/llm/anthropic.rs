//! Anthropic Messages API provider
//!
//! The Messages API keeps the system prompt out of the message list, so
//! the transcript's system message is lifted into the `system` field and
//! only user/assistant turns are sent as messages.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

use super::{
    chat::{Message, MessageRole},
    http_client, Provider, ProviderConfig,
};
use crate::error::ReagentError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    config: ProviderConfig,
    http: HttpClient,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        if config.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(ReagentError::MissingApiKey("anthropic".to_string()).into());
        }
        Ok(AnthropicProvider {
            config,
            http: http_client()?,
        })
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn generate(&self, messages: &[Message], temperature: f32) -> Result<String> {
        let url = format!("{}/v1/messages", self.config.base_url);

        let system = messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| m.content.clone());

        let turns: Vec<AnthropicMessage> = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| AnthropicMessage {
                role: match m.role {
                    MessageRole::Assistant => "assistant",
                    _ => "user",
                },
                content: &m.content,
            })
            .collect();

        let body = AnthropicRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system,
            messages: turns,
            temperature,
        };

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header("x-api-key", self.config.api_key.as_deref().unwrap_or(""))
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        match response.status() {
            StatusCode::OK => {
                let body: AnthropicResponse = response
                    .json()
                    .await
                    .context("Failed to parse Anthropic response")?;
                Ok(body
                    .content
                    .into_iter()
                    .find(|block| block.kind == "text")
                    .map(|block| block.text)
                    .unwrap_or_default())
            }
            StatusCode::UNAUTHORIZED => {
                bail!("Authentication failed. Check your API key.");
            }
            StatusCode::TOO_MANY_REQUESTS => {
                bail!("Rate limit exceeded. Please try again later.");
            }
            status => {
                let error_body: Option<serde_json::Value> = response.json().await.ok();
                let message = error_body
                    .as_ref()
                    .and_then(|v| v.get("error").and_then(|e| e.get("message")))
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown error")
                    .to_string();
                Err(ReagentError::Provider {
                    status: status.as_u16(),
                    message,
                }
                .into())
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}
