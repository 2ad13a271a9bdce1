use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::config::GenerationConfig;
use crate::errors::PlannerError;
use crate::form::LessonRequest;
use crate::prompt;
use crate::provider::Provider;
use crate::wire::{DownloadArtifact, GenerationRequest, GenerationResult, PLAIN_TEXT_MIME};

/// Run one submission: guard the credential, build the prompt, call the
/// provider exactly once and fold the outcome into a `GenerationResult`.
///
/// Never returns an error; every failure becomes `GenerationResult::Failure`.
pub async fn generate(
    request: &LessonRequest,
    config: &GenerationConfig,
    provider: &dyn Provider,
) -> GenerationResult {
    let submission = Uuid::new_v4();
    let span = tracing::info_span!("submission", %submission, subject = %request.subject());

    async move {
        if config.api_key.is_empty() {
            warn!("no credential supplied; skipping generation");
            return failure(PlannerError::MissingCredential);
        }

        let req = GenerationRequest::new(prompt::build_prompt(request), config.temperature.value());
        info!(
            temperature = req.temperature,
            max_output_tokens = req.max_output_tokens,
            prompt_len = req.prompt.len(),
            "requesting lesson plan"
        );

        match provider.complete(&req, &config.api_key).await {
            Ok(text) => {
                info!(text_len = text.len(), "lesson plan generated");
                GenerationResult::Success { text }
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "generation failed");
                failure(PlannerError::GenerationService(format!("{e:#}")))
            }
        }
    }
    .instrument(span)
    .await
}

fn failure(err: PlannerError) -> GenerationResult {
    GenerationResult::Failure { message: err.to_string() }
}

/// `Special_Ed_Lesson_Plan_<Subject>_<YYYY-MM-DD>.txt`
pub fn suggested_file_name(request: &LessonRequest) -> String {
    format!(
        "Special_Ed_Lesson_Plan_{}_{}.txt",
        request.subject(),
        request.lesson_date().format("%Y-%m-%d")
    )
}

/// The download artifact for a successful result; `None` for failures.
pub fn download_artifact(request: &LessonRequest, result: &GenerationResult) -> Option<DownloadArtifact> {
    result.text().map(|text| DownloadArtifact {
        file_name: suggested_file_name(request),
        mime: PLAIN_TEXT_MIME,
        content: text.to_string(),
    })
}
