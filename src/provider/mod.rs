use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{ApiKey, ProviderKind};
use crate::wire::GenerationRequest;

pub mod gemini;
pub mod ollama;
pub mod openai;

/// A text-generation service. One call, one completion; no retries.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, req: &GenerationRequest, api_key: &ApiKey) -> Result<String>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(
    kind: ProviderKind,
    model: String,
    api_base: String,
    timeout: Duration,
) -> Result<DynProvider> {
    match kind {
        ProviderKind::Gemini => Ok(Box::new(gemini::GeminiProvider::new(model, api_base, timeout)?)),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(model, api_base, timeout)?)),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama::new(model, api_base, timeout)?)),
    }
}

/// Pulls `error.message` out of a JSON error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error").and_then(|e| match e {
                serde_json::Value::String(s) => Some(s.clone()),
                other => other.get("message").and_then(|m| m.as_str()).map(str::to_string),
            })
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_structured_message() {
        assert_eq!(
            error_message(r#"{"error":{"code":429,"message":"rate limit exceeded","status":"RESOURCE_EXHAUSTED"}}"#),
            "rate limit exceeded"
        );
        assert_eq!(error_message(r#"{"error":"model not found"}"#), "model not found");
        assert_eq!(error_message("  bad gateway \n"), "bad gateway");
    }

    #[test]
    fn make_provider_builds_every_kind() {
        for kind in [ProviderKind::Gemini, ProviderKind::OpenAI, ProviderKind::Ollama] {
            make_provider(
                kind,
                kind.default_model().into(),
                kind.default_api_base().into(),
                Duration::from_secs(5),
            )
            .expect("provider should build");
        }
    }
}
