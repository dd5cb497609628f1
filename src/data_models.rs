use serde::{Deserialize, Serialize};

/// Inbound body as sent by callers. Every field is optional on the wire so that
/// missing fields can be reported separately from malformed JSON.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ComicRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComicPayload {
    pub title: String,
    pub status: String,
    /// Only kept when strictly positive.
    pub rating: Option<f64>,
}

impl ComicRequest {
    /// Returns `None` when title or status is absent or blank.
    pub fn validate(self) -> Option<ComicPayload> {
        let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        let title = non_blank(self.title)?;
        let status = non_blank(self.status)?;
        Some(ComicPayload {
            title,
            status,
            rating: self.rating.filter(|r| *r > 0.0),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// The envelope every caller gets back, success or failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DescriptionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DescriptionResponse {
    pub fn success(description: String) -> DescriptionResponse {
        DescriptionResponse {
            success: true,
            description: Some(description),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> DescriptionResponse {
        DescriptionResponse {
            success: false,
            description: None,
            error: Some(error.into()),
        }
    }
}
