use serde::{Deserialize, Serialize};

/// Output cap sent with every request, in the service's generation units.
pub const MAX_OUTPUT_TOKENS: u32 = 2000;

pub const PLAIN_TEXT_MIME: &str = "text/plain";

/// Provider-agnostic generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn new(prompt: String, temperature: f32) -> Self {
        Self {
            prompt,
            temperature,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Outcome of one submission. Failures carry the user-visible description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { text: String },
    Failure { message: String },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationResult::Success { text } => Some(text),
            GenerationResult::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            GenerationResult::Success { .. } => None,
            GenerationResult::Failure { message } => Some(message),
        }
    }
}

/// The downloadable copy of a generated plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub content: String,
}
