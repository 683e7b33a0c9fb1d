//! Axum Handlers for the REST API
//!
//! One handler per capability. The handlers only adapt HTTP to the
//! `ReadingCoach` façade: model failures never become HTTP errors, they come
//! back as degraded bodies with a 200 status.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use reading_coach_core::{Credential, ReadingResult};
use std::sync::Arc;
use tracing::warn;

use crate::{
    models::{
        ErrorResponse, EvaluationPayload, SpeechPayload, SpeechResponse, SuggestionPayload,
        SuggestionResponse,
    },
    state::AppState,
};

/// Header carrying a caller's personal model API key.
pub const API_KEY_HEADER: &str = "x-api-key";

pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                warn!(%message, "Rejected request");
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
        }
    }
}

/// The per-call credential override, if the caller sent a non-blank one.
fn credential_override(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(Credential::new)
}

/// Synthesize a passage read aloud in the coach voice.
#[utoipa::path(
    post,
    path = "/speech",
    request_body = SpeechPayload,
    responses(
        (status = 200, description = "Synthesized audio, or null when synthesis failed", body = SpeechResponse),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    params(
        ("x-api-key" = Option<String>, Header, description = "Personal model API key overriding the server default")
    )
)]
pub async fn synthesize_speech(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SpeechPayload>,
) -> Result<Json<SpeechResponse>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    let credential = credential_override(&headers);
    let audio = state
        .coach
        .synthesize_speech(&payload.text, credential.as_ref())
        .await;
    Ok(Json(SpeechResponse::from(audio)))
}

/// Evaluate a child's reading of a passage.
///
/// Always answers 200. When the model is unavailable the result is
/// zero-scored and its feedback explains why.
#[utoipa::path(
    post,
    path = "/evaluations",
    request_body = EvaluationPayload,
    responses(
        (status = 200, description = "Evaluation result, possibly degraded", body = ReadingResult)
    ),
    params(
        ("x-api-key" = Option<String>, Header, description = "Personal model API key overriding the server default")
    )
)]
pub async fn evaluate_reading(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<EvaluationPayload>,
) -> Json<ReadingResult> {
    let credential = credential_override(&headers);
    let result = state
        .coach
        .evaluate_reading(
            &payload.original_text,
            &payload.student_transcript,
            credential.as_ref(),
        )
        .await;
    Json(result)
}

/// Suggest one lesson from a list of candidates.
#[utoipa::path(
    post,
    path = "/suggestions",
    request_body = SuggestionPayload,
    responses(
        (status = 200, description = "A one-sentence suggestion", body = SuggestionResponse),
        (status = 400, description = "Bad request", body = ErrorResponse)
    ),
    params(
        ("x-api-key" = Option<String>, Header, description = "Personal model API key overriding the server default")
    )
)]
pub async fn suggest_lesson(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SuggestionPayload>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    if payload.candidate_titles.is_empty() {
        return Err(ApiError::BadRequest(
            "candidateTitles must not be empty".to_string(),
        ));
    }
    let credential = credential_override(&headers);
    let suggestion = state
        .coach
        .suggest_lesson(
            &payload.learner_name,
            &payload.candidate_titles,
            credential.as_ref(),
        )
        .await;
    Ok(Json(SuggestionResponse { suggestion }))
}
