//! Feedback generation — one schema-constrained call per submission.
//!
//! Flow: build_prompt → LlmClient::call_json → FeedbackResult.
//! No retry, no caching: the caller owns every side effect of the result.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::feedback::builder::build_prompt;
use crate::feedback::models::{FeedbackRequest, FeedbackResult};
use crate::feedback::prompts::WORD_BUDGET;
use crate::llm_client::{LlmClient, LlmError};

const GENERATION_FAILED: &str = "Une erreur est survenue lors de la génération du feedback";

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The remote call failed: transport, auth, quota or non-success status.
    #[error("Generation service error: {0}")]
    Service(String),

    /// The call succeeded but the payload did not match `FeedbackResult`.
    #[error("Generation parse error: {0}")]
    Parse(String),
}

impl GenerationError {
    /// Message shown to the user. Both variants read the same way: the only
    /// remedy is a new submission.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::Service(message) => format!("{GENERATION_FAILED}: {message}"),
            GenerationError::Parse(_) => {
                format!("{GENERATION_FAILED}: la réponse du service est invalide.")
            }
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) => GenerationError::Service(e.to_string()),
            LlmError::Api { message, .. } => GenerationError::Service(message),
            LlmError::Parse(e) => GenerationError::Parse(e.to_string()),
            LlmError::EmptyContent => GenerationError::Parse(err.to_string()),
        }
    }
}

/// The feedback generator trait. The HTTP layer only knows this seam.
///
/// Carried in `AppState` as `Arc<dyn FeedbackGenerator>`.
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    async fn generate(&self, request: &FeedbackRequest) -> Result<FeedbackResult, GenerationError>;
}

/// Generator backed by the Gemini API through `LlmClient`.
pub struct GeminiFeedbackGenerator {
    llm: LlmClient,
}

impl GeminiFeedbackGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl FeedbackGenerator for GeminiFeedbackGenerator {
    async fn generate(&self, request: &FeedbackRequest) -> Result<FeedbackResult, GenerationError> {
        let prompt = build_prompt(request);

        info!(
            "Generating feedback: level={}, tone={}, text_chars={}",
            request.level.as_str(),
            request.tone.as_str(),
            request.text.chars().count()
        );

        let result: FeedbackResult = self
            .llm
            .call_json(
                &prompt.user_prompt,
                prompt.system_instruction,
                &prompt.response_schema,
            )
            .await
            .map_err(|e| {
                warn!("Feedback generation failed: {e}");
                GenerationError::from(e)
            })?;

        // The budget is only requested from the model; log drift, never reject.
        let words = result.word_count();
        if words > WORD_BUDGET + WORD_BUDGET / 5 {
            warn!("Feedback exceeds word budget: {words} words (budget ~{WORD_BUDGET})");
        }

        Ok(result)
    }
}
