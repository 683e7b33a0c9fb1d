use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive range the rubric asks the model to score in.
pub const SCORE_RANGE: std::ops::RangeInclusive<i32> = 0..=10;

/// The four rubric axes of an evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScoreSet {
    pub accuracy: i32,
    pub fluency: i32,
    pub pronunciation: i32,
    pub overall: i32,
}

impl ScoreSet {
    /// All four scores at zero, used by every degraded result.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Names of the axes whose score falls outside [`SCORE_RANGE`].
    pub fn out_of_range(&self) -> Vec<&'static str> {
        [
            ("accuracy", self.accuracy),
            ("fluency", self.fluency),
            ("pronunciation", self.pronunciation),
            ("overall", self.overall),
        ]
        .into_iter()
        .filter(|(_, score)| !SCORE_RANGE.contains(score))
        .map(|(axis, _)| axis)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ReadingErrorKind {
    Mispronounced,
    Skipped,
    Added,
}

impl fmt::Display for ReadingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingErrorKind::Mispronounced => write!(f, "mispronounced"),
            ReadingErrorKind::Skipped => write!(f, "skipped"),
            ReadingErrorKind::Added => write!(f, "added"),
        }
    }
}

impl FromStr for ReadingErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mispronounced" => Ok(Self::Mispronounced),
            "skipped" => Ok(Self::Skipped),
            "added" => Ok(Self::Added),
            other => Err(format!("Unknown reading error type: '{}'", other)),
        }
    }
}

/// A single word-level mistake in the child's reading.
///
/// An `Added` error has no `original_word`, a `Skipped` error has no
/// `student_word`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReadingError {
    #[serde(rename = "type")]
    pub kind: ReadingErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_word: Option<String>,
    pub context_sentence: String,
}

/// The outcome of one reading evaluation. Always produced, even on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReadingResult {
    pub scores: ScoreSet,
    pub overall_feedback: String,
    pub errors: Vec<ReadingError>,
}

impl ReadingResult {
    /// A zero-scored result carrying only an explanatory message.
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            scores: ScoreSet::zero(),
            overall_feedback: message.into(),
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_axes() {
        let scores = ScoreSet {
            accuracy: 11,
            fluency: 5,
            pronunciation: -1,
            overall: 10,
        };
        assert_eq!(scores.out_of_range(), vec!["accuracy", "pronunciation"]);
        assert!(ScoreSet::zero().out_of_range().is_empty());
    }

    #[test]
    fn test_error_kind_parsing() {
        assert_eq!(
            "skipped".parse::<ReadingErrorKind>().unwrap(),
            ReadingErrorKind::Skipped
        );
        assert_eq!(
            " Added ".parse::<ReadingErrorKind>().unwrap(),
            ReadingErrorKind::Added
        );
        assert_eq!(
            "MISPRONOUNCED".parse::<ReadingErrorKind>().unwrap(),
            ReadingErrorKind::Mispronounced
        );
        assert!("repeated".parse::<ReadingErrorKind>().is_err());
    }

    #[test]
    fn test_absent_words_are_omitted_from_json() {
        let error = ReadingError {
            kind: ReadingErrorKind::Skipped,
            original_word: Some("bi".to_string()),
            student_word: None,
            context_sentence: "Bé chơi bi.".to_string(),
        };

        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["type"], "skipped");
        assert_eq!(json["originalWord"], "bi");
        assert!(json.get("studentWord").is_none());
        assert_eq!(json["contextSentence"], "Bé chơi bi.");
    }

    #[test]
    fn test_degraded_result() {
        let result = ReadingResult::degraded("thử lại nhé");
        assert_eq!(result.scores, ScoreSet::zero());
        assert!(result.errors.is_empty());
        assert_eq!(result.overall_feedback, "thử lại nhé");
    }
}
