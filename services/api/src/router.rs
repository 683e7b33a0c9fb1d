//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the capability endpoints and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ErrorResponse, EvaluationPayload, SpeechPayload, SpeechResponse, SuggestionPayload,
        SuggestionResponse,
    },
    state::AppState,
};

use axum::{Router, routing::post};
use reading_coach_core::{ReadingError, ReadingErrorKind, ReadingResult, ScoreSet};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::synthesize_speech,
        handlers::evaluate_reading,
        handlers::suggest_lesson,
    ),
    components(
        schemas(
            SpeechPayload, SpeechResponse, EvaluationPayload, SuggestionPayload,
            SuggestionResponse, ErrorResponse, ReadingResult, ScoreSet, ReadingError,
            ReadingErrorKind
        )
    ),
    tags(
        (name = "Reading Coach API", description = "AI speech synthesis, reading evaluation and lesson suggestions")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/speech", post(handlers::synthesize_speech))
        .route("/evaluations", post(handlers::evaluate_reading))
        .route("/suggestions", post(handlers::suggest_lesson))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_capability() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| *p == "/speech"));
        assert!(paths.iter().any(|p| *p == "/evaluations"));
        assert!(paths.iter().any(|p| *p == "/suggestions"));
    }

    #[test]
    fn test_openapi_describes_reading_result() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("\"ReadingResult\""));
        assert!(json.contains("overallFeedback"));
        assert!(json.contains("contextSentence"));
    }
}
