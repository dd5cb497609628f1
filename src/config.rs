use std::env;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Process configuration, read once at startup and handed to the describer.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `None` when `GEMINI_API_KEY` is unset; every request then fails with a
    /// configuration error.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub search: Option<SearchConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub api_key: String,
    pub engine_id: String,
    pub base_url: String,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Config {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let search = match (get("GOOGLE_SEARCH_API_KEY"), get("GOOGLE_SEARCH_ENGINE_ID")) {
            (Some(api_key), Some(engine_id)) => Some(SearchConfig {
                api_key,
                engine_id,
                base_url: get("GOOGLE_SEARCH_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SEARCH_BASE_URL.to_string()),
            }),
            (None, None) => None,
            (Some(_), None) => {
                log::warn!("GOOGLE_SEARCH_API_KEY is set without GOOGLE_SEARCH_ENGINE_ID, search disabled");
                None
            }
            (None, Some(_)) => {
                log::warn!("GOOGLE_SEARCH_ENGINE_ID is set without GOOGLE_SEARCH_API_KEY, search disabled");
                None
            }
        };

        Config {
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: get("GEMINI_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            search,
        }
    }
}
