use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace};

use super::{error_message, Provider};
use crate::config::ApiKey;
use crate::wire::GenerationRequest;

/// OpenAI chat completions adapter. The prompt goes out as a single user
/// message with no system scaffolding.
pub struct OpenAIProvider {
    model: String,
    api_base: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(model: String, api_base: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { model, api_base, client })
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn complete(&self, req: &GenerationRequest, api_key: &ApiKey) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": req.prompt }
            ],
            "temperature": req.temperature,
            "max_tokens": req.max_output_tokens,
        });

        debug!(%url, model = %self.model, "openai: POST chat/completions");
        trace!(prompt = %req.prompt, "openai: request prompt");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose())
            .json(&body)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("OpenAI read body failed")?;
        debug!(%status, bytes = text.len(), "openai: response received");

        if !status.is_success() {
            return Err(anyhow!("OpenAI API error ({}): {}", status, error_message(&text)));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse OpenAI response: {e}"))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| anyhow!("OpenAI returned no lesson plan"))
    }
}
