//! API Models
//!
//! Request and response bodies of the HTTP surface, annotated for OpenAPI
//! generation with `utoipa`. Evaluation results reuse the core types directly.

use reading_coach_core::AudioPayload;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema, Debug)]
pub struct SpeechPayload {
    #[schema(example = "Mẹ đi chợ mua cho bé một quả cam.")]
    pub text: String,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    /// Base64-encoded mono PCM16, or `null` when synthesis failed.
    #[schema(value_type = Option<String>)]
    pub audio: Option<AudioPayload>,
    /// Sample rate of `audio` in Hz, present whenever `audio` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 24000)]
    pub sample_rate: Option<u32>,
}

impl From<Option<AudioPayload>> for SpeechResponse {
    fn from(audio: Option<AudioPayload>) -> Self {
        Self {
            sample_rate: audio.as_ref().map(AudioPayload::sample_rate),
            audio,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationPayload {
    #[schema(example = "Bé chơi bi với bạn.")]
    pub original_text: String,
    #[schema(example = "Bé chơi với bạn.")]
    pub student_transcript: String,
}

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionPayload {
    #[schema(example = "Lan")]
    pub learner_name: String,
    #[schema(example = json!(["Mèo con đi học", "Cây dừa"]))]
    pub candidate_titles: Vec<String>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
