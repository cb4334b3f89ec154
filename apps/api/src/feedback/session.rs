//! Application state controller — one interactive session's form values and
//! request state.
//!
//! `RequestState` is a tagged union, so "loading", "success" and "failure"
//! are mutually exclusive by construction. Submissions are tracked by ticket:
//! a result arriving for an outdated ticket (superseded or abandoned session)
//! is dropped instead of being written into the state.

use thiserror::Error;
use tracing::{debug, warn};

use crate::feedback::generator::{FeedbackGenerator, GenerationError};
use crate::feedback::models::{FeedbackRequest, FeedbackResult, FeedbackTone, LearnerLevel};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Submitting,
    Success(FeedbackResult),
    Failed(String),
}

/// Identifies one submission of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Le texte à évaluer est vide.")]
    EmptyText,

    #[error("Une génération est déjà en cours.")]
    InFlight,
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackSession {
    pub level: LearnerLevel,
    pub tone: FeedbackTone,
    pub text: String,
    state: RequestState,
    generation: u64,
}

impl FeedbackSession {
    pub fn new(level: LearnerLevel, tone: FeedbackTone, text: impl Into<String>) -> Self {
        Self {
            level,
            tone,
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, RequestState::Submitting)
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && !self.text.trim().is_empty()
    }

    /// Enters `Submitting`, clearing any previous result or error, and hands
    /// back the request to send. Nothing is sent when this fails.
    pub fn begin_submit(&mut self) -> Result<(SubmissionTicket, FeedbackRequest), SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        if self.text.trim().is_empty() {
            return Err(SubmitError::EmptyText);
        }

        self.generation += 1;
        self.state = RequestState::Submitting;

        let request = FeedbackRequest {
            level: self.level,
            tone: self.tone,
            text: self.text.clone(),
        };
        Ok((SubmissionTicket(self.generation), request))
    }

    /// `Submitting → Success`. Returns false when the ticket is outdated.
    pub fn resolve(&mut self, ticket: SubmissionTicket, result: FeedbackResult) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.state = RequestState::Success(result);
        true
    }

    /// `Submitting → Failed` with the user-facing message of `error`.
    pub fn reject(&mut self, ticket: SubmissionTicket, error: &GenerationError) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.state = RequestState::Failed(error.user_message());
        true
    }

    /// Tears the session down. Any in-flight submission's outcome is ignored.
    #[allow(dead_code)]
    pub fn abandon(&mut self) {
        self.generation += 1;
        self.state = RequestState::Idle;
    }

    /// Runs one full submission against `generator`.
    pub async fn submit(&mut self, generator: &dyn FeedbackGenerator) -> Result<(), SubmitError> {
        let (ticket, request) = self.begin_submit()?;

        match generator.generate(&request).await {
            Ok(result) => {
                self.resolve(ticket, result);
            }
            Err(e) => {
                warn!("Submission failed: {e}");
                self.reject(ticket, &e);
            }
        }
        Ok(())
    }

    fn accepts(&self, ticket: SubmissionTicket) -> bool {
        let current = ticket.0 == self.generation && self.is_submitting();
        if !current {
            debug!("Dropping outcome of outdated submission {}", ticket.0);
        }
        current
    }
}
