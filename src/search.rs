use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::data_models::SearchSnippet;
use crate::error::SearchError;

pub const MAX_SNIPPETS: usize = 3;

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, SearchError>;
}

/// Google Custom Search JSON API.
pub struct GoogleSearch {
    config: SearchConfig,
    client: Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchSnippet>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GoogleSearch {
    pub fn new(config: SearchConfig) -> GoogleSearch {
        GoogleSearch {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl WebSearch for GoogleSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, SearchError> {
        let num = MAX_SNIPPETS.to_string();
        let res = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("cx", self.config.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(SearchError::Api { status, message });
        }

        let parsed: SearchResponse = serde_json::from_str(&body).map_err(SearchError::Decode)?;
        Ok(parsed.items.into_iter().take(MAX_SNIPPETS).collect())
    }
}
