//! Reading Coach Service
//!
//! The three public capabilities: speech synthesis, reading evaluation and
//! lesson suggestion. Each call resolves a credential, builds its prompt,
//! issues exactly one model request and validates the answer. Every call
//! completes with a well-formed value; failures are logged and degraded,
//! never returned as errors.

use crate::audio::AudioPayload;
use crate::config::{CoachConfig, ModelIds};
use crate::credential::{Credential, CredentialResolver};
use crate::model_client::{GeminiClient, GenerativeModel};
use crate::prompt;
use crate::reading::ReadingResult;
use crate::schema::{GenerateContentRequest, evaluation_schema};
use crate::validate::{self, EvaluationDecodeError, FailureKind};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// The capability façade shared by every caller of the pipeline.
///
/// Holds no mutable state, so one instance can serve concurrent calls
/// behind an `Arc`.
pub struct ReadingCoach {
    model: Arc<dyn GenerativeModel>,
    credentials: CredentialResolver,
    models: ModelIds,
    voice: String,
}

impl ReadingCoach {
    /// Creates a coach that talks to `model`.
    pub fn new(config: CoachConfig, model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            credentials: CredentialResolver::new(config.default_credential),
            models: config.models,
            voice: config.voice,
        }
    }

    /// Creates a coach backed by the Gemini REST API at `config.api_base`.
    pub fn with_gemini(config: CoachConfig) -> Self {
        let client = Arc::new(GeminiClient::new(config.api_base.clone()));
        Self::new(config, client)
    }

    /// Synthesizes `text` read aloud in the configured voice.
    ///
    /// Returns `None` when no credential is available, the call fails, or the
    /// response carries no decodable audio.
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub async fn synthesize_speech(
        &self,
        text: &str,
        credential_override: Option<&Credential>,
    ) -> Option<AudioPayload> {
        let Some(credential) = self.credentials.resolve(credential_override) else {
            error!("API key is not available for speech synthesis.");
            return None;
        };

        let request = GenerateContentRequest::speech(prompt::speech_prompt(text), &self.voice);
        match self
            .model
            .generate_content(credential, &self.models.speech, &request)
            .await
        {
            Ok(response) => {
                let audio = validate::validate_audio(response.inline_data());
                if audio.is_some() {
                    info!("Speech synthesized");
                }
                audio
            }
            Err(e) => {
                error!(error = %e, "Error generating speech");
                None
            }
        }
    }

    /// Grades a child's reading of `original_text` from its transcript.
    ///
    /// Always returns a complete `ReadingResult`; on any failure it is
    /// zero-scored and carries a message explaining what went wrong.
    #[instrument(skip_all, fields(
        original_chars = original_text.chars().count(),
        transcript_chars = student_transcript.chars().count(),
    ))]
    pub async fn evaluate_reading(
        &self,
        original_text: &str,
        student_transcript: &str,
        credential_override: Option<&Credential>,
    ) -> ReadingResult {
        let Some(credential) = self.credentials.resolve(credential_override) else {
            error!("API key is not available for analysis.");
            return FailureKind::CredentialMissing.degraded_result();
        };

        let request = GenerateContentRequest::structured(
            prompt::evaluation_prompt(original_text, student_transcript),
            evaluation_schema(),
        );
        let response = match self
            .model
            .generate_content(credential, &self.models.evaluation, &request)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let kind = FailureKind::from(&e);
                error!(error = %e, ?kind, "Error analyzing reading");
                return kind.degraded_result();
            }
        };

        let text = response.text().unwrap_or_default();
        match validate::decode_evaluation(&text) {
            Ok(result) => {
                info!(
                    overall = result.scores.overall,
                    errors = result.errors.len(),
                    "Reading evaluated"
                );
                result
            }
            Err(e) => {
                if matches!(e, EvaluationDecodeError::Empty) {
                    let finish_reason = response
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.as_deref());
                    warn!(?finish_reason, "Evaluation came back empty");
                }
                error!(error = %e, "Error analyzing reading");
                FailureKind::SchemaViolation.degraded_result()
            }
        }
    }

    /// Asks the model to recommend one of `candidate_titles` to `learner_name`.
    ///
    /// Always returns a non-empty sentence, falling back to a canned message.
    #[instrument(skip_all, fields(candidates = candidate_titles.len()))]
    pub async fn suggest_lesson(
        &self,
        learner_name: &str,
        candidate_titles: &[String],
        credential_override: Option<&Credential>,
    ) -> String {
        let Some(credential) = self.credentials.resolve(credential_override) else {
            error!("API key is not available for suggestion.");
            return FailureKind::CredentialMissing.suggestion_text().to_string();
        };
        if candidate_titles.is_empty() {
            warn!("No lessons to choose from; skipping suggestion request.");
            return validate::SUGGESTION_FALLBACK.to_string();
        }

        let request =
            GenerateContentRequest::text(prompt::suggestion_prompt(learner_name, candidate_titles));
        let response = match self
            .model
            .generate_content(credential, &self.models.suggestion, &request)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Error getting quick suggestion");
                return FailureKind::from(&e).suggestion_text().to_string();
            }
        };

        match response.text().as_deref().and_then(validate::normalize_suggestion) {
            Some(suggestion) => {
                if validate::suggested_title(&suggestion, candidate_titles).is_none() {
                    warn!("Suggestion does not bold any of the candidate lessons");
                }
                suggestion
            }
            None => {
                error!("Model returned an empty suggestion");
                FailureKind::SchemaViolation.suggestion_text().to_string()
            }
        }
    }
}
