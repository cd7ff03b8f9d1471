//! Error types for the card builder.

use std::fmt;

/// Longest backend body (in chars) carried inside an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// A local precondition that blocked an operation before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The background prompt was empty or whitespace.
    EmptyPrompt,
    /// The card message was empty or whitespace.
    EmptyMessage,
    /// No background has been generated in this session.
    MissingBackground,
    /// No finished card is displayed.
    NoCard,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptyPrompt => "Please describe the card background first.",
            Self::EmptyMessage => "Please enter a card message first.",
            Self::MissingBackground => "Generate a background first.",
            Self::NoCard => "There is no finished card to download yet.",
        };
        f.write_str(text)
    }
}

/// Which user-visible category an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Blocked locally, no network call was made.
    Validation,
    /// The backend answered but reported failure.
    Failure,
    /// The call itself failed (transport, decoding, local I/O).
    Error,
}

/// Errors that can occur while building a card.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// Input or session state rejected before any request.
    #[error("{0}")]
    Validation(ValidationError),

    /// Backend responded with `success: false`; carries its error text verbatim.
    #[error("{0}")]
    Service(String),

    /// Backend returned a non-success status without a readable JSON body.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode an inline image reference.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// The reference cannot be saved without fetching it.
    #[error("cannot save remote reference locally: {0}")]
    UnsupportedReference(String),

    /// I/O error (e.g., saving file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client configuration (e.g., malformed base URL).
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CardError {
    /// Returns the user-visible category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Service(_) => ErrorKind::Failure,
            _ => ErrorKind::Error,
        }
    }

    /// Returns true if the operation was blocked before any network call.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl From<ValidationError> for CardError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// Result type alias for card builder operations.
pub type Result<T> = std::result::Result<T, CardError>;

/// Trims a backend body down to something fit for an error message.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "empty response body".into();
    }
    if text.chars().count() <= MAX_ERROR_BODY_CHARS {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push_str("...");
    truncated
}
