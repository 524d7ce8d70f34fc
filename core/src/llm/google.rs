//! Google Generative AI (Gemini) provider
//!
//! Gemini has no system role; the system prompt is folded into the first
//! user turn. Assistant turns map to the "model" role.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};

use super::{
    chat::{Message, MessageRole},
    http_client, Provider, ProviderConfig,
};
use crate::error::ReagentError;

pub struct GoogleProvider {
    config: ProviderConfig,
    http: HttpClient,
}

impl GoogleProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        if config.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(ReagentError::MissingApiKey("google".to_string()).into());
        }
        Ok(GoogleProvider {
            config,
            http: http_client()?,
        })
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    async fn generate(&self, messages: &[Message], temperature: f32) -> Result<String> {
        let mut system = None;
        let mut contents: Vec<GeminiContent> = Vec::new();

        for msg in messages {
            match msg.role {
                MessageRole::System => system = Some(msg.content.clone()),
                MessageRole::User | MessageRole::Assistant => {
                    let role = if msg.role == MessageRole::Assistant {
                        "model"
                    } else {
                        "user"
                    };
                    contents.push(GeminiContent {
                        role: role.to_string(),
                        parts: vec![GeminiPart {
                            text: msg.content.clone(),
                        }],
                    });
                }
            }
        }

        if let Some(sys) = system {
            if let Some(first) = contents.first_mut() {
                first.parts[0].text = format!("System: {}\n\nUser: {}", sys, first.parts[0].text);
            } else {
                contents.push(GeminiContent {
                    role: "user".to_string(),
                    parts: vec![GeminiPart { text: sys }],
                });
            }
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url,
            self.config.model,
            self.config.api_key.as_deref().unwrap_or("")
        );

        let body = GeminiRequest {
            contents,
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature,
            },
        };

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        match response.status() {
            StatusCode::OK => {
                let body: GeminiResponse = response
                    .json()
                    .await
                    .context("Failed to parse Gemini response")?;
                Ok(body
                    .candidates
                    .into_iter()
                    .next()
                    .and_then(|c| c.content.parts.into_iter().next())
                    .map(|p| p.text)
                    .unwrap_or_default())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
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
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}
