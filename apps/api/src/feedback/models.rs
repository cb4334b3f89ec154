//! Value objects exchanged between the form, the prompt builder and the generator.

use serde::{Deserialize, Serialize};

/// Proficiency level of the learner whose text is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearnerLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl LearnerLevel {
    pub const ALL: [LearnerLevel; 3] = [
        LearnerLevel::Beginner,
        LearnerLevel::Intermediate,
        LearnerLevel::Advanced,
    ];

    /// Form value, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            LearnerLevel::Beginner => "beginner",
            LearnerLevel::Intermediate => "intermediate",
            LearnerLevel::Advanced => "advanced",
        }
    }

    /// Literal level written into the user prompt.
    pub fn prompt_label(self) -> &'static str {
        match self {
            LearnerLevel::Beginner => "débutant",
            LearnerLevel::Intermediate => "intermédiaire",
            LearnerLevel::Advanced => "avancé",
        }
    }
}

/// Desired tone of the feedback. Only ever reaches the model as a phrase
/// inside the prompt, see [`crate::feedback::tone::tone_phrase`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackTone {
    Neutral,
    #[default]
    Benevolent,
    Encouraging,
}

impl FeedbackTone {
    pub const ALL: [FeedbackTone; 3] = [
        FeedbackTone::Neutral,
        FeedbackTone::Benevolent,
        FeedbackTone::Encouraging,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackTone::Neutral => "neutral",
            FeedbackTone::Benevolent => "benevolent",
            FeedbackTone::Encouraging => "encouraging",
        }
    }
}

/// One submission: built fresh from the form values each time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub level: LearnerLevel,
    #[serde(default)]
    pub tone: FeedbackTone,
    pub text: String,
}

/// Structured feedback returned by the generation service.
///
/// Every field is required on the wire: a payload missing one of them fails
/// deserialization instead of producing a partial result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResult {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub suggestions: Vec<String>,
    pub final_message: String,
}

impl FeedbackResult {
    /// Total whitespace-separated words across all four sections.
    pub fn word_count(&self) -> usize {
        self.strengths
            .iter()
            .chain(&self.areas_for_improvement)
            .chain(&self.suggestions)
            .chain(std::iter::once(&self.final_message))
            .map(|s| s.split_whitespace().count())
            .sum()
    }
}
