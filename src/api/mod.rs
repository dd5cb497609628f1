use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::describer::Describer;

pub mod handlers;
pub mod models;

pub fn create_router(describer: Arc<Describer>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", post(handlers::describe_handler))
        .route("/api/describe", post(handlers::describe_handler))
        .route("/api/health", get(handlers::health_handler))
        .with_state(describer)
        .layer(ServiceBuilder::new().layer(cors))
}
