use crate::credential::Credential;
use crate::schema::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Why a call to the model service did not produce a usable envelope.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The request never completed (DNS, TLS, connection reset, ...).
    #[error("Request to model service failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The service answered with a non-success status (bad key, quota, ...).
    #[error("Model service rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    /// The service answered 2xx but the body is not a `generateContent` response.
    #[error("Model service returned an unreadable response: {0}")]
    Envelope(#[source] serde_json::Error),
    /// The prompt was refused before any candidate was generated.
    #[error("Model refused the prompt: {0}")]
    Blocked(String),
}

impl ModelError {
    /// Whether the service said something we could not decode, as opposed
    /// to the call failing outright.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, ModelError::Envelope(_))
    }
}

/// A generic client for a generative model service.
///
/// One call is one request: implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_content(
        &self,
        credential: &Credential,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError>;
}

/// An implementation of `GenerativeModel` for the Gemini REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
}

impl GeminiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `api_base` - Base URL up to and including the API version,
    ///   e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model.trim_start_matches("models/")
        )
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pulls the human-readable message out of a Google API error body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    #[instrument(name = "generate_content", skip(self, credential, request), fields(model = %model))]
    async fn generate_content(
        &self,
        credential: &Credential,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError> {
        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", credential.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Model service responded");

        if !status.is_success() {
            return Err(ModelError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(ModelError::Envelope)?;
        if let Some(reason) = parsed.block_reason() {
            return Err(ModelError::Blocked(reason.to_string()));
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_building() {
        let client = GeminiClient::new("https://example.test/v1beta/");
        assert_eq!(
            client.endpoint("gemini-2.5-pro"),
            "https://example.test/v1beta/models/gemini-2.5-pro:generateContent"
        );
        assert_eq!(
            client.endpoint("models/gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_rejection_message_from_google_error() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            rejection_message(body),
            "API key not valid. Please pass a valid API key."
        );
        assert_eq!(rejection_message(" upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_error_classification() {
        let envelope = ModelError::Envelope(serde_json::from_str::<u8>("nope").unwrap_err());
        assert!(envelope.is_malformed_response());

        let rejected = ModelError::Rejected {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert!(!rejected.is_malformed_response());
        assert!(!ModelError::Blocked("SAFETY".to_string()).is_malformed_response());
    }

    #[test]
    fn test_error_display() {
        let rejected = ModelError::Rejected {
            status: 429,
            message: "Resource exhausted".to_string(),
        };
        assert_eq!(
            rejected.to_string(),
            "Model service rejected the request with status 429: Resource exhausted"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_network_error() {
        let client = GeminiClient::new("http://127.0.0.1:9/v1beta");
        let credential = Credential::new("key").unwrap();
        let request = GenerateContentRequest::text("hi".to_string());

        let err = client
            .generate_content(&credential, "gemini-2.5-flash", &request)
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Network(_)));
    }
}
