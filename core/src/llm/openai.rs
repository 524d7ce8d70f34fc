//! OpenAI-compatible provider
//!
//! Talks to any `/chat/completions` endpoint: OpenAI itself, Ollama,
//! LM Studio and other local servers. When no API key is configured the
//! Authorization header is omitted (local endpoints don't want one).

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, CONTENT_TYPE},
    Client as HttpClient, StatusCode,
};
use serde::{Deserialize, Serialize};

use super::{chat::Message, http_client, Provider, ProviderConfig};
use crate::error::ReagentError;

pub struct OpenAiProvider {
    config: ProviderConfig,
    http: HttpClient,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(OpenAiProvider {
            config,
            http: http_client()?,
        })
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        if let Some(api_key) = &self.config.api_key {
            if !api_key.is_empty() {
                headers.insert(
                    "Authorization",
                    format!("Bearer {}", api_key)
                        .parse()
                        .context("Invalid API key characters")?,
                );
            }
        }
        Ok(headers)
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn generate(&self, messages: &[Message], temperature: f32) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let body = OpenAiRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to OpenAI-compatible API")?;

        match response.status() {
            StatusCode::OK => {
                let body: OpenAiResponse = response
                    .json()
                    .await
                    .context("Failed to parse OpenAI response")?;
                Ok(body
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
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
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: String,
}
