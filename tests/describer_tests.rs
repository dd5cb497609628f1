use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use comic_blurb::config::Config;
use comic_blurb::data_models::{ComicPayload, DescriptionResponse, SearchSnippet};
use comic_blurb::describer::{Describer, Enrichment};
use comic_blurb::error::{GenerationError, SearchError};
use comic_blurb::gemini::TextGenerator;
use comic_blurb::search::WebSearch;

mod test_helpers {
    use super::*;

    /// Returns a canned reply (or API error) and records every prompt it saw.
    pub struct FakeGenerator {
        pub reply: Result<String, Option<String>>,
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
        pub models: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        pub fn replying(text: &str) -> Arc<FakeGenerator> {
            Arc::new(FakeGenerator {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                models: Mutex::new(Vec::new()),
            })
        }

        pub fn failing(message: Option<&str>) -> Arc<FakeGenerator> {
            Arc::new(FakeGenerator {
                reply: Err(message.map(str::to_string)),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                models: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.models.lock().unwrap().push(model.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(GenerationError::Api {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: message.clone(),
                }),
            }
        }
    }

    pub struct FakeSearch {
        pub results: Option<Vec<SearchSnippet>>,
        pub calls: AtomicUsize,
        pub queries: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        pub fn returning(results: Vec<SearchSnippet>) -> Arc<FakeSearch> {
            Arc::new(FakeSearch {
                results: Some(results),
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            })
        }

        pub fn failing() -> Arc<FakeSearch> {
            Arc::new(FakeSearch {
                results: None,
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WebSearch for FakeSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            match &self.results {
                Some(results) => Ok(results.clone()),
                None => Err(SearchError::Api {
                    status: StatusCode::FORBIDDEN,
                    message: "quota exceeded".to_string(),
                }),
            }
        }
    }

    pub fn snippet(title: &str, text: &str) -> SearchSnippet {
        SearchSnippet {
            title: title.to_string(),
            snippet: text.to_string(),
            link: None,
        }
    }

    pub fn describer(
        generator: Option<Arc<FakeGenerator>>,
        search: Option<Arc<FakeSearch>>,
    ) -> Describer {
        Describer::new(
            "gemini-pro",
            generator.map(|g| g as Arc<dyn TextGenerator>),
            search.map(|s| s as Arc<dyn WebSearch>),
        )
    }
}

use test_helpers::*;

const WATCHMEN: &str = r#"{"title":"Watchmen","status":"completed","rating":5}"#;

#[tokio::test]
async fn test_generates_description() {
    let generator = FakeGenerator::replying("A gritty deconstruction of superheroes.");
    let describer = describer(Some(generator.clone()), None);

    let response = describer.describe(WATCHMEN).await;

    assert_eq!(
        response,
        DescriptionResponse::success("A gritty deconstruction of superheroes.".to_string())
    );
    assert_eq!(generator.calls(), 1);
    assert_eq!(generator.models.lock().unwrap()[0], "gemini-pro");

    let prompt = generator.last_prompt();
    assert!(prompt.contains("Title: Watchmen"));
    assert!(prompt.contains("Status: completed"));
    assert!(prompt.contains("Rating: 5"));
    assert!(!prompt.contains("real information"));
}

#[tokio::test]
async fn test_missing_fields_make_no_calls() {
    let generator = FakeGenerator::replying("unused");
    let search = FakeSearch::returning(vec![]);
    let describer = describer(Some(generator.clone()), Some(search.clone()));

    let bodies = [
        r#"{"status":"ongoing"}"#,
        r#"{"title":"Saga"}"#,
        r#"{"title":"","status":"ongoing"}"#,
        r#"{"title":"Saga","status":"   "}"#,
        r#"{"title":null,"status":"ongoing"}"#,
        r#"{}"#,
    ];
    for body in bodies {
        let response = describer.describe(body).await;
        assert_eq!(
            response,
            DescriptionResponse::failure("Missing required fields: title, status."),
            "body: {body}"
        );
    }
    assert_eq!(generator.calls(), 0);
    assert_eq!(search.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_invalid_format() {
    let generator = FakeGenerator::replying("unused");
    let describer = describer(Some(generator.clone()), None);

    let bodies = [
        "",
        "{",
        "not json",
        r#"["Saga","ongoing"]"#,
        "null",
        r#"{"title":5,"status":"ongoing"}"#,
        r#"{"title":"Saga","status":"ongoing","rating":"high"}"#,
    ];
    for body in bodies {
        let response = describer.describe(body).await;
        assert_eq!(
            response,
            DescriptionResponse::failure("Invalid request format."),
            "body: {body}"
        );
    }
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_missing_config_wins_over_payload() {
    let search = FakeSearch::returning(vec![]);
    let describer = describer(None, Some(search.clone()));

    for body in [WATCHMEN, "{", r#"{"status":"ongoing"}"#] {
        let response = describer.describe(body).await;
        assert_eq!(
            response,
            DescriptionResponse::failure("Server configuration error.")
        );
    }
    assert_eq!(search.calls(), 0);
}

#[tokio::test]
async fn test_search_context_reaches_prompt() {
    let generator = FakeGenerator::replying("Space opera.");
    let search = FakeSearch::returning(vec![
        snippet("Saga (comics)", "By Brian K. Vaughan and Fiona Staples."),
        snippet("Saga review", "A modern classic."),
    ]);
    let describer = describer(Some(generator.clone()), Some(search.clone()));

    let response = describer
        .describe(r#"{"title":"Saga","status":"ongoing"}"#)
        .await;

    assert!(response.success);
    assert_eq!(search.calls(), 1);
    assert_eq!(search.queries.lock().unwrap()[0], "Saga comic book");

    let prompt = generator.last_prompt();
    assert!(prompt.contains("real information"));
    assert!(prompt.contains("- Saga (comics): By Brian K. Vaughan and Fiona Staples."));
    assert!(prompt.contains("- Saga review: A modern classic."));
    assert!(!prompt.contains("Rating"));
}

#[tokio::test]
async fn test_search_failure_degrades_gracefully() {
    let generator = FakeGenerator::replying("Still works.");
    let search = FakeSearch::failing();
    let describer = describer(Some(generator.clone()), Some(search.clone()));

    let response = describer.describe(WATCHMEN).await;

    assert_eq!(response, DescriptionResponse::success("Still works.".to_string()));
    assert_eq!(search.calls(), 1);
    assert!(!generator.last_prompt().contains("real information"));
}

#[tokio::test]
async fn test_enrichment_outcomes() {
    let payload = ComicPayload {
        title: "Saga".to_string(),
        status: "ongoing".to_string(),
        rating: None,
    };

    let no_search = describer(Some(FakeGenerator::replying("x")), None);
    assert_eq!(no_search.enrich(&payload).await, Enrichment::Skipped);

    let found = describer(
        Some(FakeGenerator::replying("x")),
        Some(FakeSearch::returning(vec![snippet("a", "b")])),
    );
    let enrichment = found.enrich(&payload).await;
    assert_eq!(enrichment.snippets(), &[snippet("a", "b")]);

    let degraded = describer(Some(FakeGenerator::replying("x")), Some(FakeSearch::failing()));
    let enrichment = degraded.enrich(&payload).await;
    assert!(matches!(enrichment, Enrichment::Degraded(ref reason) if reason.contains("quota exceeded")));
    assert!(enrichment.snippets().is_empty());
}

#[tokio::test]
async fn test_generation_failure() {
    let handler = describer(Some(FakeGenerator::failing(None)), None);
    let response = handler.describe(WATCHMEN).await;
    assert_eq!(
        response,
        DescriptionResponse::failure("Failed to generate description.")
    );
    assert!(response.description.is_none());

    let handler = describer(Some(FakeGenerator::failing(Some("model overloaded"))), None);
    let response = handler.describe(WATCHMEN).await;
    assert!(!response.success);
    assert!(response.description.is_none());
    assert_eq!(
        response.error.as_deref(),
        Some("Failed to generate description: model overloaded")
    );
}

#[tokio::test]
async fn test_search_results_capped_at_three() {
    let generator = FakeGenerator::replying("Capped.");
    let search = FakeSearch::returning(vec![
        snippet("one", "first"),
        snippet("two", "second"),
        snippet("three", "third"),
        snippet("four", "fourth"),
        snippet("five", "fifth"),
    ]);
    let handler = describer(Some(generator.clone()), Some(search));

    let response = handler.describe(WATCHMEN).await;
    assert!(response.success);

    let prompt = generator.last_prompt();
    let snippet_lines: Vec<&str> = prompt.lines().filter(|l| l.starts_with("- ")).collect();
    assert_eq!(
        snippet_lines,
        vec!["- one: first", "- two: second", "- three: third"]
    );

    let payload = ComicPayload {
        title: "Watchmen".to_string(),
        status: "completed".to_string(),
        rating: None,
    };
    assert_eq!(handler.enrich(&payload).await.snippets().len(), 3);
}

#[tokio::test]
async fn test_from_config_without_api_key() {
    let config = Config::from_lookup(|key| match key {
        "GOOGLE_SEARCH_API_KEY" => Some("search-key".to_string()),
        "GOOGLE_SEARCH_ENGINE_ID" => Some("engine".to_string()),
        _ => None,
    });
    let handler = Describer::from_config(&config);

    assert!(!handler.generation_configured());
    assert!(handler.search_enabled());
    assert_eq!(handler.model(), "gemini-pro");
    assert_eq!(
        handler.describe(WATCHMEN).await,
        DescriptionResponse::failure("Server configuration error.")
    );
}

#[tokio::test]
async fn test_identical_inputs_give_identical_envelopes() {
    let generator = FakeGenerator::replying("Same every time.");
    let search = FakeSearch::returning(vec![snippet("Watchmen", "Alan Moore.")]);
    let describer = describer(Some(generator.clone()), Some(search));

    let first = describer.describe(WATCHMEN).await;
    let second = describer.describe(WATCHMEN).await;

    assert_eq!(first, second);
    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts[0], prompts[1]);
}
