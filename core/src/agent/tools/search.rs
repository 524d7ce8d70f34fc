//! Web search tool
//!
//! Queries the DuckDuckGo Instant Answer API - no API key required.
//! Network failures are reported as observation text so a flaky connection
//! does not abort the whole run.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::agent::tool::Tool;
use crate::llm::http_client;

const DUCKDUCKGO_API_URL: &str = "https://api.duckduckgo.com/";

pub struct SearchTool {
    http: reqwest::Client,
    max_results: usize,
}

impl SearchTool {
    pub fn new() -> Result<Self> {
        Ok(SearchTool {
            http: http_client()?,
            max_results: 5,
        })
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    async fn fetch(&self, query: &str) -> Result<String> {
        let url = format!(
            "{}?q={}&format=json&no_html=1&skip_disambig=1",
            DUCKDUCKGO_API_URL,
            urlencoding::encode(query)
        );

        let body: Value = self.http.get(&url).send().await?.json().await?;

        let mut results = Vec::new();

        let abstract_text = body
            .get("AbstractText")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if !abstract_text.is_empty() {
            let source = body.get("AbstractURL").and_then(|v| v.as_str()).unwrap_or("");
            results.push(format!("{}\n   URL: {}", abstract_text, source));
        }

        if let Some(topics) = body.get("RelatedTopics").and_then(|v| v.as_array()) {
            for topic in topics {
                if results.len() >= self.max_results {
                    break;
                }
                let text = topic.get("Text").and_then(|v| v.as_str()).unwrap_or("");
                if text.is_empty() {
                    continue;
                }
                let url = topic.get("FirstURL").and_then(|v| v.as_str()).unwrap_or("");
                results.push(format!("{}\n   URL: {}", text, url));
            }
        }

        if results.is_empty() {
            return Ok("No results found.".to_string());
        }

        Ok(results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {}", i + 1, r))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Searches the internet for information. Input: the search query"
    }

    async fn call(&self, input: &str) -> Result<String> {
        match self.fetch(input).await {
            Ok(results) => Ok(results),
            Err(e) => Ok(format!("Search error: {}", e)),
        }
    }
}
