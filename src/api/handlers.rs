use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::DescriptionResponse;
use crate::describer::Describer;

use super::models::HealthResponse;

/// Always answers 200; failures are carried in the envelope.
pub async fn describe_handler(
    State(describer): State<Arc<Describer>>,
    body: String,
) -> Json<DescriptionResponse> {
    let start = Instant::now();
    let response = describer.describe(&body).await;
    log::info!(
        "describe finished in {}ms, success: {}",
        start.elapsed().as_millis(),
        response.success
    );
    Json(response)
}

pub async fn health_handler(State(describer): State<Arc<Describer>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: describer.model().to_string(),
        search_enabled: describer.search_enabled(),
        generation_configured: describer.generation_configured(),
    })
}
