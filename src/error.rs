use reqwest::StatusCode;
use thiserror::Error;

pub const CONFIG_ERROR_MESSAGE: &str = "Server configuration error.";
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid request format.";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: title, status.";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate description.";

/// Failures of the search collaborator. Never reaches the caller; the describer
/// degrades to a prompt without search context instead.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("search api returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("malformed search response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        // the url carries the api key
        SearchError::Http(e.without_url())
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation api returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("malformed generation response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("response was blocked: {0}")]
    Blocked(String),

    #[error("model returned no text")]
    EmptyResponse,
}

impl GenerationError {
    /// A message that is safe to hand back to the caller, when the upstream gave one.
    pub fn user_message(&self) -> Option<String> {
        match self {
            GenerationError::Api {
                message: Some(message),
                ..
            } => Some(message.clone()),
            GenerationError::Blocked(reason) => Some(format!("response was blocked ({reason})")),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("GEMINI_API_KEY is not configured")]
    Configuration,

    #[error("failed to parse request payload: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("missing required fields: title or status")]
    MissingFields,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl DescribeError {
    /// The text placed in the envelope's `error` field.
    pub fn public_message(&self) -> String {
        match self {
            DescribeError::Configuration => CONFIG_ERROR_MESSAGE.to_string(),
            DescribeError::InvalidFormat(_) => INVALID_FORMAT_MESSAGE.to_string(),
            DescribeError::MissingFields => MISSING_FIELDS_MESSAGE.to_string(),
            DescribeError::Generation(e) => match e.user_message() {
                Some(msg) => format!("Failed to generate description: {msg}"),
                None => GENERATION_FAILED_MESSAGE.to_string(),
            },
        }
    }
}
