//! Schema Contract
//!
//! Typed shapes of the `generateContent` request and response, plus the
//! structured-output schema the evaluation capability constrains the model to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- Request ---

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<ResponseModality>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Schema>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseModality {
    Audio,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

/// The OpenAPI-subset schema object accepted as `responseSchema`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
}

impl Schema {
    fn scalar(kind: SchemaType) -> Self {
        Self {
            kind,
            properties: None,
            items: None,
            required: None,
        }
    }

    pub fn string() -> Self {
        Self::scalar(SchemaType::String)
    }

    pub fn integer() -> Self {
        Self::scalar(SchemaType::Integer)
    }

    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::scalar(SchemaType::Array)
        }
    }

    pub fn object(properties: Vec<(&str, Schema)>, required: &[&str]) -> Self {
        Self {
            properties: Some(
                properties
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
            required: Some(required.iter().map(|r| r.to_string()).collect()),
            ..Self::scalar(SchemaType::Object)
        }
    }
}

/// The structured-output contract for a reading evaluation.
pub fn evaluation_schema() -> Schema {
    let scores = Schema::object(
        vec![
            ("fluency", Schema::integer()),
            ("pronunciation", Schema::integer()),
            ("accuracy", Schema::integer()),
            ("overall", Schema::integer()),
        ],
        &["fluency", "pronunciation", "accuracy", "overall"],
    );
    let error = Schema::object(
        vec![
            ("type", Schema::string()),
            ("originalWord", Schema::string()),
            ("studentWord", Schema::string()),
            ("contextSentence", Schema::string()),
        ],
        &["type", "contextSentence"],
    );
    Schema::object(
        vec![
            ("overallFeedback", Schema::string()),
            ("scores", scores),
            ("errors", Schema::array(error)),
        ],
        &["overallFeedback", "scores", "errors"],
    )
}

impl GenerateContentRequest {
    fn from_prompt(prompt: String, generation_config: Option<GenerationConfig>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        }
    }

    /// Audio output spoken by one prebuilt voice.
    pub fn speech(prompt: String, voice_name: &str) -> Self {
        Self::from_prompt(
            prompt,
            Some(GenerationConfig {
                response_modalities: Some(vec![ResponseModality::Audio]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice_name.to_string(),
                        },
                    },
                }),
                ..Default::default()
            }),
        )
    }

    /// JSON output forced to conform to `schema`.
    pub fn structured(prompt: String, schema: Schema) -> Self {
        Self::from_prompt(
            prompt,
            Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
                ..Default::default()
            }),
        )
    }

    /// Free text, no output constraints.
    pub fn text(prompt: String) -> Self {
        Self::from_prompt(prompt, None)
    }
}

// --- Response ---

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// A response carrying a single text part. Handy for stubs and tests.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_part(ResponsePart {
            text: Some(text.into()),
            inline_data: None,
        })
    }

    /// A response carrying a single inline binary part.
    pub fn from_inline_data(mime_type: &str, data: impl Into<String>) -> Self {
        Self::from_part(ResponsePart {
            text: None,
            inline_data: Some(InlineData {
                mime_type: Some(mime_type.to_string()),
                data: data.into(),
            }),
        })
    }

    fn from_part(part: ResponsePart) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent { parts: vec![part] }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        }
    }

    fn first_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated text of the first candidate, if it has any text parts.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    /// The first inline binary part of the first candidate.
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.first_parts()
            .iter()
            .find_map(|p| p.inline_data.as_ref())
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}
