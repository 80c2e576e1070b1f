//! Router configuration for the web server.

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;
use crate::utils::MAX_UPLOAD_BYTES;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Main pages
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route("/contact", get(handlers::contact))
        // Prediction API
        .route("/predict", post(handlers::predict_and_record))
        .route("/classify", post(handlers::classify_image))
        // Prediction history
        .route("/result/:prediction_id", get(handlers::prediction_result))
        .route("/dashboard", get(handlers::dashboard))
        // Catalog
        .route("/crops", get(handlers::crops_list))
        .route("/crops/:crop_id", get(handlers::crop_detail))
        .route("/diseases", get(handlers::diseases_list))
        .route("/diseases/:disease_id", get(handlers::disease_detail))
        // Stored upload serving
        .route("/uploads/*path", get(handlers::serve_upload))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/app.js", get(handlers::serve_js))
        // Health check
        .route("/api/health", get(handlers::health))
        // Allow the 10MB contract plus multipart framing overhead; the
        // handler enforces the exact limit with a JSON error.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
