use std::sync::Arc;

use crate::feedback::generator::FeedbackGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable: per-submission state lives in a `FeedbackSession` owned by the handler.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generator. Default: GeminiFeedbackGenerator.
    pub generator: Arc<dyn FeedbackGenerator>,
}
