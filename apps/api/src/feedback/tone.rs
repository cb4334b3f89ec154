//! Tone calibration — maps the requested feedback tone to the phrase written
//! into the prompt, and holds the labels shown by the form.
//!
//! Every table here is an exhaustive `match`: adding a variant to
//! `FeedbackTone` or `LearnerLevel` without a phrase does not compile.

use crate::feedback::models::{FeedbackTone, LearnerLevel};

/// Label and caption of one selectable form option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOption {
    pub value: &'static str,
    pub label: &'static str,
    pub caption: Option<&'static str>,
}

/// Returns the tone description inserted into the user prompt.
pub fn tone_phrase(tone: FeedbackTone) -> &'static str {
    match tone {
        FeedbackTone::Neutral => "neutre professionnel",
        FeedbackTone::Benevolent => "bienveillant",
        FeedbackTone::Encouraging => "très bienveillant et encourageant",
    }
}

pub fn tone_option(tone: FeedbackTone) -> FormOption {
    let (label, caption) = match tone {
        FeedbackTone::Neutral => ("Neutre", "Professionnel et direct."),
        FeedbackTone::Benevolent => ("Bienveillant", "Constructif et positif."),
        FeedbackTone::Encouraging => ("Encourageant", "Très positif et motivant."),
    };
    FormOption {
        value: tone.as_str(),
        label,
        caption: Some(caption),
    }
}

pub fn level_option(level: LearnerLevel) -> FormOption {
    let label = match level {
        LearnerLevel::Beginner => "Débutant",
        LearnerLevel::Intermediate => "Intermédiaire",
        LearnerLevel::Advanced => "Avancé",
    };
    FormOption {
        value: level.as_str(),
        label,
        caption: None,
    }
}
