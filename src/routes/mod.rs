//! Application routes configuration
use crate::config::CorsConfig;
use crate::handlers::{
    get_launch, get_launch_stats, health, list_failed_launches, list_launches,
    list_launches_by_rocket, list_launches_by_status, list_launches_paginated,
    list_successful_launches, AppState,
};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the application router with all routes
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let launches = Router::new()
        .route("/", get(list_launches))
        .route("/paginated", get(list_launches_paginated))
        .route("/status/:status", get(list_launches_by_status))
        .route("/rocket/:rocket_id", get(list_launches_by_rocket))
        .route("/successful", get(list_successful_launches))
        .route("/failed", get(list_failed_launches))
        .route("/stats", get(get_launch_stats))
        .route("/:id", get(get_launch));

    Router::new()
        .route("/health", get(health))
        .nest("/launches", launches)
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    match cors {
        CorsConfig::AnyOrigin => layer.allow_origin(Any),
        CorsConfig::Origins(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
    }
}
