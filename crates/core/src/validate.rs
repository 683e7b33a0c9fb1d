//! Response Validation & Normalization
//!
//! Turns raw model output into the typed results handed back to callers, and
//! turns every failure into a degraded but well-formed value. Nothing in this
//! module returns an error to the façade's caller.

use crate::audio::AudioPayload;
use crate::model_client::ModelError;
use crate::reading::{ReadingError, ReadingErrorKind, ReadingResult, ScoreSet};
use crate::schema::InlineData;
use serde::Deserialize;
use tracing::warn;

/// Evaluation feedback when no API key is available.
pub const MISSING_KEY_FEEDBACK: &str =
    "Không thể chấm bài vì thiếu API Key. Vui lòng cung cấp API Key cá nhân ở màn hình đăng nhập.";
/// Evaluation feedback when the model call itself failed.
pub const EVALUATION_FAILED_FEEDBACK: &str =
    "Rất tiếc, đã có lỗi xảy ra khi AI chấm điểm. Con vui lòng thử lại nhé.";
/// Evaluation feedback when the model answered with something unusable.
pub const MALFORMED_RESPONSE_FEEDBACK: &str =
    "AI đã trả về một phản hồi không mong muốn. Vui lòng thử lại lần nữa.";
/// Suggestion text when no API key is available.
pub const SUGGESTION_MISSING_KEY: &str = "Không thể lấy gợi ý vì thiếu API Key.";
/// Suggestion text for every other failure.
pub const SUGGESTION_FALLBACK: &str =
    "Gợi ý của AI đang gặp lỗi. Con hãy tự chọn một bài đọc thú vị nhé!";

/// Why a capability call ended in a degraded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No credential could be resolved; the network was never touched.
    CredentialMissing,
    /// The call to the model service failed.
    Transport,
    /// The model answered, but not in the contracted shape.
    SchemaViolation,
}

impl FailureKind {
    pub fn evaluation_feedback(self) -> &'static str {
        match self {
            FailureKind::CredentialMissing => MISSING_KEY_FEEDBACK,
            FailureKind::Transport => EVALUATION_FAILED_FEEDBACK,
            FailureKind::SchemaViolation => MALFORMED_RESPONSE_FEEDBACK,
        }
    }

    pub fn suggestion_text(self) -> &'static str {
        match self {
            FailureKind::CredentialMissing => SUGGESTION_MISSING_KEY,
            FailureKind::Transport | FailureKind::SchemaViolation => SUGGESTION_FALLBACK,
        }
    }

    /// The zero-scored evaluation result for this failure.
    pub fn degraded_result(self) -> ReadingResult {
        ReadingResult::degraded(self.evaluation_feedback())
    }
}

impl From<&ModelError> for FailureKind {
    fn from(err: &ModelError) -> Self {
        if err.is_malformed_response() {
            FailureKind::SchemaViolation
        } else {
            FailureKind::Transport
        }
    }
}

/// Why an evaluation payload could not be accepted.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationDecodeError {
    #[error("Model returned no text for the evaluation")]
    Empty,
    #[error("Evaluation payload does not match the contract: {0}")]
    Contract(#[from] serde_json::Error),
}

// Decoding target. `type` stays a string here so that one unknown error kind
// drops that item instead of the whole evaluation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvaluation {
    overall_feedback: String,
    scores: ScoreSet,
    errors: Vec<RawReadingError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReadingError {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    original_word: Option<String>,
    #[serde(default)]
    student_word: Option<String>,
    context_sentence: String,
}

impl RawReadingError {
    fn normalize(self) -> Option<ReadingError> {
        let kind = match self.kind.parse::<ReadingErrorKind>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(error = %e, "Dropping reading error with unknown type");
                return None;
            }
        };

        let mut error = ReadingError {
            kind,
            original_word: self.original_word,
            student_word: self.student_word,
            context_sentence: self.context_sentence,
        };
        let contradicting = match kind {
            ReadingErrorKind::Added => error.original_word.take(),
            ReadingErrorKind::Skipped => error.student_word.take(),
            ReadingErrorKind::Mispronounced => None,
        };
        if contradicting.is_some() {
            warn!(%kind, "Cleared a word field that contradicts the reading error type");
        }
        Some(error)
    }
}

/// Strips a surrounding markdown code fence (```json ... ```), if any.
fn unwrap_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json"), whether or not a newline follows it.
    let body = inner.trim_start_matches(|c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')
    });
    body.trim()
}

/// Decodes the model's evaluation text into a `ReadingResult`.
///
/// Fields of the wrong type are a contract violation. Unknown error kinds are
/// dropped, word fields that contradict the error kind are cleared, and
/// out-of-range scores are passed through unchanged but logged.
pub fn decode_evaluation(raw: &str) -> Result<ReadingResult, EvaluationDecodeError> {
    let payload = unwrap_code_fence(raw);
    if payload.is_empty() {
        return Err(EvaluationDecodeError::Empty);
    }

    let decoded: RawEvaluation = serde_json::from_str(payload)?;

    let anomalies = decoded.scores.out_of_range();
    if !anomalies.is_empty() {
        warn!(axes = ?anomalies, scores = ?decoded.scores, "Model returned scores outside 0-10");
    }

    Ok(ReadingResult {
        scores: decoded.scores,
        overall_feedback: decoded.overall_feedback,
        errors: decoded
            .errors
            .into_iter()
            .filter_map(RawReadingError::normalize)
            .collect(),
    })
}

/// Accepts a synthesized audio part if it is present and decodable, keeping
/// the sample rate its mime type declares.
pub fn validate_audio(blob: Option<&InlineData>) -> Option<AudioPayload> {
    let blob = blob?;
    let Some(payload) = AudioPayload::from_base64(blob.data.as_str()) else {
        warn!(bytes = blob.data.len(), "Discarding empty or undecodable audio payload");
        return None;
    };
    Some(payload.with_mime_type(blob.mime_type.as_deref()))
}

const QUOTE_PAIRS: [(char, char); 2] = [('"', '"'), ('\u{201C}', '\u{201D}')];

/// Trims a suggestion and removes one pair of wrapping quote characters.
///
/// Returns `None` when nothing is left, so callers can fall back.
pub fn normalize_suggestion(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = QUOTE_PAIRS
        .iter()
        .find_map(|&(open, close)| {
            trimmed
                .strip_prefix(open)
                .and_then(|rest| rest.strip_suffix(close))
        })
        .unwrap_or(trimmed);

    if unquoted.trim().is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

/// The first `**bold**` title in `suggestion`, if it names one of `candidates`.
pub fn suggested_title<'a>(suggestion: &str, candidates: &'a [String]) -> Option<&'a str> {
    suggestion
        .split("**")
        .skip(1)
        .step_by(2)
        .map(str::trim)
        .find_map(|bold| {
            candidates
                .iter()
                .find(|candidate| candidate.trim() == bold)
                .map(String::as_str)
        })
}
