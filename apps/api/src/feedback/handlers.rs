//! Axum route handlers for the feedback page and the JSON API.

use axum::{
    extract::State,
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::feedback::models::{FeedbackRequest, FeedbackResult, FeedbackTone, LearnerLevel};
use crate::feedback::session::FeedbackSession;
use crate::feedback::view::{clipboard_text, render_page, CopyAcknowledgement};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Urlencoded body posted by the page's form.
#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub level: LearnerLevel,
    #[serde(default)]
    pub tone: FeedbackTone,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub feedback: FeedbackResult,
    pub clipboard_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Renders the form with default level and tone and the empty result panel.
pub async fn handle_index() -> Html<String> {
    Html(render_page(
        &FeedbackSession::default(),
        &CopyAcknowledgement::default(),
    ))
}

/// POST /feedback
///
/// Runs one submission for the posted form and renders the page in its
/// resulting state. Blank text re-renders the form without calling the service.
pub async fn handle_submit_form(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> Html<String> {
    let mut session = FeedbackSession::new(form.level, form.tone, form.text);

    if let Err(e) = session.submit(state.generator.as_ref()).await {
        info!("Form submission rejected: {e}");
    }

    Html(render_page(&session, &CopyAcknowledgement::default()))
}

/// POST /api/v1/feedback
///
/// JSON variant of the form submission. Returns the structured feedback and
/// its clipboard text.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let mut session = FeedbackSession::new(request.level, request.tone, request.text);
    let (_, request) = session.begin_submit()?;

    let feedback = state.generator.generate(&request).await?;

    Ok(Json(FeedbackResponse {
        clipboard_text: clipboard_text(&feedback),
        feedback,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::feedback::session::test_support::{sample_result, ScriptedGenerator};
    use crate::routes::build_router;
    use crate::state::AppState;

    fn app(generator: Arc<ScriptedGenerator>) -> Router {
        build_router(AppState { generator })
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::post("/feedback")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_request(body: Value) -> Request<Body> {
        Request::post("/api/v1/feedback")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_idle_page() {
        let generator = Arc::new(ScriptedGenerator::succeeding(sample_result()));
        let response = app(generator.clone())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("En attente d'une analyse"));
        assert!(html.contains("value=\"intermediate\" checked"));
        assert!(html.contains("value=\"benevolent\" checked"));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_form_submission_renders_feedback() {
        let generator = Arc::new(ScriptedGenerator::succeeding(sample_result()));
        let response = app(generator.clone())
            .oneshot(form_request("level=advanced&tone=neutral&text=Bonjour+le+monde"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Feedback Détaillé"));
        assert!(html.contains("<li>a</li>"));
        assert!(html.contains("Bonjour le monde"));
        assert!(html.contains("value=\"advanced\" checked"));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_form_submission_skips_generation() {
        let generator = Arc::new(ScriptedGenerator::succeeding(sample_result()));
        let response = app(generator.clone())
            .oneshot(form_request("level=beginner&tone=neutral&text=+++"))
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("En attente d'une analyse"));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_form_submission_failure_renders_error_panel() {
        let generator = Arc::new(ScriptedGenerator::failing("quota exceeded"));
        let response = app(generator)
            .oneshot(form_request("text=Un+texte"))
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("Erreur de Génération"));
        assert!(html.contains("quota exceeded"));
        assert!(!html.contains("Feedback Détaillé"));
    }

    #[tokio::test]
    async fn test_api_returns_feedback_and_clipboard_text() {
        let generator = Arc::new(ScriptedGenerator::succeeding(sample_result()));
        let response = app(generator)
            .oneshot(json_request(json!({
                "level": "beginner",
                "tone": "encouraging",
                "text": "Mon texte"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["feedback"]["suggestions"], json!(["b", "c"]));
        assert_eq!(body["feedback"]["finalMessage"], "Good job");
        assert!(body["clipboardText"]
            .as_str()
            .unwrap()
            .starts_with("POINTS FORTS :"));
    }

    #[tokio::test]
    async fn test_api_rejects_blank_text() {
        let generator = Arc::new(ScriptedGenerator::succeeding(sample_result()));
        let response = app(generator.clone())
            .oneshot(json_request(json!({ "text": "" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_api_generation_failure_is_bad_gateway() {
        let generator = Arc::new(ScriptedGenerator::failing("HTTP 500"));
        let response = app(generator)
            .oneshot(json_request(json!({ "text": "Mon texte" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_health() {
        let generator = Arc::new(ScriptedGenerator::succeeding(sample_result()));
        let response = app(generator)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
