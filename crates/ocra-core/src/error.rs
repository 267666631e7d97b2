use thiserror::Error;

/// Gemini API error classification.
///
/// Failures from the generative backend are sorted into these categories so
/// the CLI can print an actionable hint instead of a raw HTTP body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeminiErrorKind {
    /// Authentication failure (401, invalid API key)
    Authentication,
    /// Rate limit exceeded (429)
    RateLimit,
    /// Quota exceeded (insufficient_quota)
    QuotaExceeded,
    /// Prompt or response blocked by the safety filters
    Blocked,
    /// Server error (5xx)
    ServerError,
    /// Network/connection error
    NetworkError,
    /// Unknown or unclassified error
    Unknown,
}

/// Structured error details from the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiErrorDetails {
    /// The specific error category
    pub kind: GeminiErrorKind,
    /// Human-readable error message from the API
    pub message: String,
    /// HTTP status code (0 when the request never got a response)
    pub status_code: u16,
}

impl GeminiErrorDetails {
    /// Create a new GeminiErrorDetails
    pub fn new(kind: GeminiErrorKind, message: String, status_code: u16) -> Self {
        Self {
            kind,
            message,
            status_code,
        }
    }
}

impl std::fmt::Display for GeminiErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Gemini API error (HTTP {}): {}",
            self.status_code, self.message
        )
    }
}

/// Infrastructure errors raised by OCRA components.
///
/// These cover everything below the recipe domain: the HTTP transport, the
/// local key-value store, configuration files and host actions such as the
/// clipboard. The recipe generation service converts them into a
/// [`GenerationError`] before they reach the search session.
///
/// # Error Conversion
///
/// `serde_json::Error` converts automatically into
/// `AppError::SerializationError` through `#[from]`.
///
/// # Examples
///
/// ```
/// use ocra_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::StorageError("store unavailable".to_string()))
/// }
/// assert!(example().is_err());
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP client request failed.
    ///
    /// This error occurs when the request could not be built or sent, or the
    /// response body could not be read.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// Gemini API call failed.
    ///
    /// Contains structured error information (category, message, status).
    #[error("Gemini error: {0}")]
    GeminiError(GeminiErrorDetails),

    /// JSON serialization or deserialization failed.
    ///
    /// Raised when the backend text is not a valid recipe document or a stored
    /// blob cannot be encoded.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// API response contained no data.
    ///
    /// The backend answered successfully but returned no candidate text.
    #[error("Empty response from API")]
    EmptyResponse,

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Local key-value store could not be read or written, or holds a
    /// corrupt blob.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Star rating outside the accepted 1-5 range.
    #[error("Invalid rating: {0} (expected 1 to 5 stars)")]
    InvalidRating(u8),

    /// Writing to the system clipboard failed.
    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    /// The platform share mechanism reported a failure.
    #[error("Share error: {0}")]
    ShareError(String),

    /// Generic application error for cases not covered by specific variants.
    ///
    /// Use this sparingly - prefer creating specific error variants.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ClientError(msg) => {
                if msg.contains("timeout") || msg.contains("timed out") {
                    "Request timed out. The AI backend may be slow or unreachable.\n   Try again later.".to_string()
                } else if msg.contains("connect") {
                    format!(
                        "Cannot reach the AI backend: {}\n   Check your internet connection.",
                        msg
                    )
                } else {
                    format!("API error: {}", msg)
                }
            }
            AppError::GeminiError(details) => match details.kind {
                GeminiErrorKind::Authentication => {
                    "Invalid Gemini API key.\n   Check your GEMINI_API_KEY environment variable."
                        .to_string()
                }
                GeminiErrorKind::RateLimit => {
                    "Gemini rate limit reached.\n   Wait a moment and search again.".to_string()
                }
                GeminiErrorKind::QuotaExceeded => {
                    "Gemini quota exceeded.\n   Check your Google account billing.".to_string()
                }
                GeminiErrorKind::Blocked => {
                    format!(
                        "Gemini refused to answer: {}\n   Try a different dish name.",
                        details.message
                    )
                }
                GeminiErrorKind::ServerError => {
                    format!(
                        "Gemini server error (HTTP {}).\n   Please try again later.",
                        details.status_code
                    )
                }
                GeminiErrorKind::NetworkError => {
                    format!(
                        "Network error connecting to Gemini: {}\n   Check your internet connection.",
                        details.message
                    )
                }
                GeminiErrorKind::Unknown => {
                    format!("Gemini error: {}", details.message)
                }
            },
            AppError::Timeout(secs) => {
                format!(
                    "Request timed out after {} seconds.\n   Raise OCRA_TIMEOUT_SECS or try again later.",
                    secs
                )
            }
            AppError::EmptyResponse => {
                "The AI backend returned no recipe. Try searching again.".to_string()
            }
            AppError::StorageError(msg) => {
                format!(
                    "Could not access saved recipes: {}\n   Check OCRA_DATA_DIR permissions.",
                    msg
                )
            }
            AppError::ConfigError(msg) => {
                format!(
                    "Configuration error: {}\n   Check your configuration file.",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Failure of a single recipe generation request.
///
/// The display text is exactly what the search session shows the user, so
/// both variants carry the fixed wording of the recipe page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The backend call or the parse of its answer failed.
    #[error("Failed to generate recipe from AI: {0}")]
    Backend(String),

    /// The request ended without a describable error.
    #[error("An unknown error occurred while generating the recipe.")]
    Unknown,
}

impl From<AppError> for GenerationError {
    fn from(err: AppError) -> Self {
        match &err {
            AppError::Generic(msg) if msg.trim().is_empty() => GenerationError::Unknown,
            AppError::GeminiError(details) if details.message.trim().is_empty() => {
                GenerationError::Unknown
            }
            _ => GenerationError::Backend(err.to_string()),
        }
    }
}
