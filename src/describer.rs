use std::sync::Arc;

use crate::config::Config;
use crate::data_models::{ComicPayload, ComicRequest, DescriptionResponse, SearchSnippet};
use crate::error::DescribeError;
use crate::gemini::{GeminiClient, TextGenerator};
use crate::prompt::build_prompt;
use crate::search::{GoogleSearch, MAX_SNIPPETS, WebSearch};

/// Outcome of the best-effort search step.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    /// Search is not configured.
    Skipped,
    Found(Vec<SearchSnippet>),
    /// Search failed; the prompt goes out without context.
    Degraded(String),
}

impl Enrichment {
    pub fn snippets(&self) -> &[SearchSnippet] {
        match self {
            Enrichment::Found(snippets) => snippets,
            Enrichment::Skipped | Enrichment::Degraded(_) => &[],
        }
    }
}

/// Turns a raw request body into a response envelope.
pub struct Describer {
    model: String,
    generator: Option<Arc<dyn TextGenerator>>,
    search: Option<Arc<dyn WebSearch>>,
}

impl Describer {
    pub fn new(
        model: impl Into<String>,
        generator: Option<Arc<dyn TextGenerator>>,
        search: Option<Arc<dyn WebSearch>>,
    ) -> Describer {
        Describer {
            model: model.into(),
            generator,
            search,
        }
    }

    pub fn from_config(config: &Config) -> Describer {
        let generator = config.gemini_api_key.as_ref().map(|key| {
            Arc::new(GeminiClient::new(key.clone(), config.gemini_base_url.clone()))
                as Arc<dyn TextGenerator>
        });
        if generator.is_none() {
            log::error!("FATAL: GEMINI_API_KEY environment variable not set.");
        }
        let search = config
            .search
            .clone()
            .map(|s| Arc::new(GoogleSearch::new(s)) as Arc<dyn WebSearch>);

        Describer::new(config.gemini_model.clone(), generator, search)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn search_enabled(&self) -> bool {
        self.search.is_some()
    }

    pub fn generation_configured(&self) -> bool {
        self.generator.is_some()
    }

    /// Never fails: every error becomes a `success: false` envelope.
    pub async fn describe(&self, body: &str) -> DescriptionResponse {
        match self.try_describe(body).await {
            Ok(description) => DescriptionResponse::success(description),
            Err(e) => {
                log::error!("describe failed: {:#}", e);
                DescriptionResponse::failure(e.public_message())
            }
        }
    }

    async fn try_describe(&self, body: &str) -> Result<String, DescribeError> {
        let generator = self.generator.as_ref().ok_or(DescribeError::Configuration)?;

        let payload = parse_payload(body)?;

        let enrichment = self.enrich(&payload).await;
        let prompt = build_prompt(&payload, enrichment.snippets());

        log::info!("generating description for: {:?}", payload.title);
        let description = generator.generate(&self.model, &prompt).await?;
        log::info!("generated description successfully: {description}");

        Ok(description)
    }

    /// Runs the search collaborator if configured. Errors are logged and absorbed.
    pub async fn enrich(&self, payload: &ComicPayload) -> Enrichment {
        let Some(search) = &self.search else {
            return Enrichment::Skipped;
        };

        let query = format!("{} comic book", payload.title);
        match search.search(&query).await {
            Ok(mut snippets) => {
                snippets.truncate(MAX_SNIPPETS);
                log::info!("search returned {} results: {:?}", snippets.len(), snippets);
                Enrichment::Found(snippets)
            }
            Err(e) => {
                log::error!("search failed for {query:?}, continuing without context: {:#}", e);
                Enrichment::Degraded(e.to_string())
            }
        }
    }
}

fn parse_payload(body: &str) -> Result<ComicPayload, DescribeError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    log::info!("received payload: {value}");
    if !value.is_object() {
        return Err(DescribeError::InvalidFormat(serde::de::Error::custom(
            "request body must be a JSON object",
        )));
    }
    let request: ComicRequest = serde_json::from_value(value)?;
    request.validate().ok_or(DescribeError::MissingFields)
}
