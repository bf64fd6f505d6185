//! Router construction for the temperament server.

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Extension, Router,
};
use temperament_core::ReportService;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => cors.allow_origin(origin),
        None => cors.allow_origin(Any),
    }
}

/// Build the full axum router with all routes and middleware.
pub fn build_router(service: Arc<ReportService>, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/salvar-resultado",
            post(handlers::submit::submit_result),
        )
        .route("/gerar-pdf/:id", get(handlers::report::render_pdf))
        .route("/gerar-pdf/:id/layout", get(handlers::report::draw_plan))
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
}
