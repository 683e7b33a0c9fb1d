use crate::credential::Credential;
use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_EVALUATION_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_SUGGESTION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_VOICE: &str = "Kore";

/// Model identifiers, one per capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelIds {
    pub speech: String,
    pub evaluation: String,
    pub suggestion: String,
}

impl Default for ModelIds {
    fn default() -> Self {
        Self {
            speech: DEFAULT_TTS_MODEL.to_string(),
            evaluation: DEFAULT_EVALUATION_MODEL.to_string(),
            suggestion: DEFAULT_SUGGESTION_MODEL.to_string(),
        }
    }
}

/// Everything the reading coach needs, read once at process start.
#[derive(Clone, Debug)]
pub struct CoachConfig {
    /// Process-wide default credential. Per-call overrides take precedence.
    pub default_credential: Option<Credential>,
    pub api_base: String,
    pub models: ModelIds,
    pub voice: String,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            default_credential: None,
            api_base: DEFAULT_API_BASE.to_string(),
            models: ModelIds::default(),
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

impl CoachConfig {
    /// Loads configuration from environment variables.
    ///
    /// A missing API key is not an error: it is logged once here and every
    /// capability degrades until the caller supplies a key per call.
    pub fn from_env() -> Self {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let default_credential = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .and_then(Credential::new);
        if default_credential.is_none() {
            warn!(
                "GEMINI_API_KEY environment variable not set. Callers must provide a personal API key."
            );
        }

        let var_or = |name: &str, default: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            default_credential,
            api_base: var_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            models: ModelIds {
                speech: var_or("TTS_MODEL", DEFAULT_TTS_MODEL),
                evaluation: var_or("EVALUATION_MODEL", DEFAULT_EVALUATION_MODEL),
                suggestion: var_or("SUGGESTION_MODEL", DEFAULT_SUGGESTION_MODEL),
            },
            voice: var_or("TTS_VOICE", DEFAULT_VOICE),
        }
    }

    pub fn with_default_credential(mut self, credential: Option<Credential>) -> Self {
        self.default_credential = credential;
        self
    }
}
