use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{error_message, Provider};
use crate::config::ApiKey;
use crate::wire::GenerationRequest;

/// Google Gemini `generateContent` adapter.
pub struct GeminiProvider {
    model: String,
    api_base: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(model: String, api_base: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { model, api_base, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<PartIn<'a>>,
}

#[derive(Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Concatenates the first candidate's text parts.
fn extract_text(parsed: GenerateResponse) -> Result<String> {
    let Some(candidate) = parsed.candidates.into_iter().next() else {
        let reason = parsed
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".into());
        return Err(anyhow!("Gemini returned no lesson plan: {reason}"));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "empty content".into());
        return Err(anyhow!("Gemini returned no lesson plan: {reason}"));
    }
    Ok(text)
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(&self, req: &GenerationRequest, api_key: &ApiKey) -> Result<String> {
        let url = self.url();
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![PartIn { text: &req.prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: req.temperature,
                max_output_tokens: req.max_output_tokens,
            },
        };

        debug!(%url, model = %self.model, "gemini: POST generateContent");
        trace!(prompt = %req.prompt, "gemini: request prompt");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose())
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("Gemini read body failed")?;
        debug!(%status, bytes = text.len(), "gemini: response received");

        if !status.is_success() {
            return Err(anyhow!("Gemini API error ({}): {}", status, error_message(&text)));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse Gemini response: {e}"))?;
        extract_text(parsed)
    }
}
