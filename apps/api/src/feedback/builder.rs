//! Feedback Request Builder — turns a `FeedbackRequest` into everything the
//! generation call needs. Pure: no I/O, no hidden state.

use serde_json::Value;

use crate::feedback::models::FeedbackRequest;
use crate::feedback::prompts::{feedback_schema, FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM};
use crate::feedback::tone::tone_phrase;

/// The three parts of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPrompt {
    pub system_instruction: &'static str,
    pub user_prompt: String,
    pub response_schema: Value,
}

pub fn build_prompt(request: &FeedbackRequest) -> FeedbackPrompt {
    FeedbackPrompt {
        system_instruction: FEEDBACK_SYSTEM,
        user_prompt: build_user_prompt(request),
        response_schema: feedback_schema(),
    }
}

/// Fills the prompt template. The learner text is substituted last so that
/// placeholder-like sequences inside it are left untouched.
pub fn build_user_prompt(request: &FeedbackRequest) -> String {
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{level}", request.level.prompt_label())
        .replace("{tone}", tone_phrase(request.tone))
        .replace("{text}", &request.text)
}
