//! Google Gemini content generation client.
//!
//! Sends one `generateContent` request per recipe with JSON output forced
//! through `responseMimeType` and `responseSchema`.

use ocra_core::GenerationConfig;
use ocra_core::error::{AppError, GeminiErrorDetails, GeminiErrorKind};
use ocra_core::traits::GenerativeBackend;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP client for Google's Gemini `generateContent` API.
///
/// # Security
///
/// The API key is transmitted via the `x-goog-api-key` HTTP header,
/// not in the URL, to prevent accidental exposure in logs and proxies.
///
/// # Examples
///
/// ```no_run
/// use ocra_client::GeminiClient;
/// use ocra_core::traits::GenerativeBackend;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClient::new("your-api-key")?;
/// let schema = ocra_core::generation::recipe_schema();
/// let text = client.generate_json("A recipe for toast", &schema).await?;
/// println!("{}", text);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
    timeout_secs: u64,
}

/// Request body for `generateContent`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationSettings<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

/// Response from `generateContent`.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Error response from Gemini API
#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[allow(dead_code)]
    status: Option<String>,
}

/// Classify Gemini API error based on status code and message
fn classify_gemini_error(status_code: u16, message: &str) -> GeminiErrorKind {
    match status_code {
        401 | 403 => GeminiErrorKind::Authentication,
        429 => {
            if message.contains("insufficient_quota") || message.contains("quota") {
                GeminiErrorKind::QuotaExceeded
            } else {
                GeminiErrorKind::RateLimit
            }
        }
        500..=599 => GeminiErrorKind::ServerError,
        _ => {
            if message.contains("API key") || message.contains("Unauthorized") {
                GeminiErrorKind::Authentication
            } else if message.contains("rate") {
                GeminiErrorKind::RateLimit
            } else if message.contains("quota") {
                GeminiErrorKind::QuotaExceeded
            } else {
                GeminiErrorKind::Unknown
            }
        }
    }
}

impl GenerateResponse {
    /// Concatenates the text parts of the first candidate.
    ///
    /// A blocked prompt or a candidate stopped by the safety filters is an
    /// error even when some text came back.
    fn into_text(self) -> Result<String, AppError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(blocked(reason));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(AppError::EmptyResponse)?;

        if let Some(reason) = candidate
            .finish_reason
            .filter(|r| r == "SAFETY" || r == "PROHIBITED_CONTENT" || r == "BLOCKLIST")
        {
            return Err(blocked(reason));
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::EmptyResponse);
        }
        Ok(text)
    }
}

fn blocked(reason: String) -> AppError {
    AppError::GeminiError(GeminiErrorDetails::new(GeminiErrorKind::Blocked, reason, 200))
}

impl GeminiClient {
    /// Creates a client for the default model and timeout.
    pub fn new(api_key: &str) -> Result<Self, AppError> {
        Self::with_config(api_key, &GenerationConfig::default())
    }

    /// Creates a client for the model, API root and timeout in `config`.
    pub fn with_config(api_key: &str, config: &GenerationConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.http.timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            timeout_secs: config.http.timeout.as_secs(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    /// Sends one `generateContent` request and returns the answer text.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Timeout` if the request exceeds the configured
    /// timeout, `AppError::GeminiError` for API errors and blocked answers,
    /// and `AppError::EmptyResponse` when no candidate text came back.
    pub async fn generate_content(&self, prompt: &str, schema: &Value) -> Result<String, AppError> {
        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationSettings {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        tracing::debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    AppError::GeminiError(GeminiErrorDetails::new(
                        GeminiErrorKind::NetworkError,
                        format!("Connection failed: {}", e),
                        0, // No HTTP status for connection failures
                    ))
                } else {
                    AppError::ClientError(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();

            let message = if let Ok(gemini_error) = serde_json::from_str::<GeminiError>(&error_text)
            {
                gemini_error.error.message
            } else {
                format!("HTTP {}: {}", status_code, error_text)
            };

            let kind = classify_gemini_error(status_code, &message);

            return Err(AppError::GeminiError(GeminiErrorDetails::new(
                kind,
                message,
                status_code,
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else {
                AppError::ClientError(format!("Failed to parse response: {}", e))
            }
        })?;

        body.into_text()
    }
}

// =============================================================================
// Trait Implementation: GenerativeBackend
// =============================================================================

impl GenerativeBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, AppError> {
        self.generate_content(prompt, schema).await
    }
}
