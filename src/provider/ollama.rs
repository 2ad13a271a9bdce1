use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{error_message, Provider};
use crate::config::ApiKey;
use crate::wire::GenerationRequest;

/// Local Ollama server. It takes no credential.
pub struct Ollama {
    pub model: String,
    pub url: String,
    client: Client,
}

impl Ollama {
    pub fn new(model: String, url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { model, url, client })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

#[async_trait]
impl Provider for Ollama {
    async fn complete(&self, req: &GenerationRequest, _api_key: &ApiKey) -> Result<String> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Msg { role: "user", content: &req.prompt }],
            stream: false,
            options: OllamaOptions {
                temperature: req.temperature,
                num_predict: req.max_output_tokens,
            },
        };

        debug!(%url, model = %self.model, "ollama: POST");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("ollama read body failed")?;
        debug!(%status, bytes = text.len(), "ollama: response received");

        if !status.is_success() {
            return Err(anyhow!("ollama error ({}): {}", status, error_message(&text)));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("failed to parse ollama response: {e}"))?;
        if parsed.message.content.is_empty() {
            return Err(anyhow!("ollama returned no lesson plan"));
        }
        Ok(parsed.message.content)
    }
}
