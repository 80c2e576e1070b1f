//! Web server for crop disease detection.
//!
//! Serves the upload/diagnosis API, the prediction history dashboard, and
//! the crop/disease catalog pages.

mod assets;
mod handlers;
mod routes;
mod template_structs;

pub use routes::create_router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::classify::LeafClassifier;
use crate::config::Settings;
use crate::repository::{CropRepository, DbContext, DiseaseRepository, PredictionRepository};

/// Shared state for the web server.
///
/// The classifier is the one frozen model instance for the process
/// lifetime; inference takes `&self`, so concurrent requests share it
/// without locking.
#[derive(Clone)]
pub struct AppState {
    pub crop_repo: Arc<CropRepository>,
    pub disease_repo: Arc<DiseaseRepository>,
    pub prediction_repo: Arc<PredictionRepository>,
    pub classifier: Arc<LeafClassifier>,
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(ctx: &DbContext, classifier: Arc<LeafClassifier>, uploads_dir: PathBuf) -> Self {
        Self {
            crop_repo: Arc::new(ctx.crops()),
            disease_repo: Arc::new(ctx.diseases()),
            prediction_repo: Arc::new(ctx.predictions()),
            classifier,
            uploads_dir,
        }
    }
}

/// Start the web server.
///
/// Loads the frozen model first; a load failure aborts startup, there is
/// no degraded mode without a classifier.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    settings.ensure_dirs()?;

    let ctx = settings.create_db_context();
    ctx.init_schema().await?;

    let classifier = LeafClassifier::from_model_file(&settings.model_path)
        .with_context(|| format!("cannot load model from {}", settings.model_path.display()))?;

    let state = AppState::new(&ctx, Arc::new(classifier), settings.uploads_dir.clone());
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::classify::{ClassifierBackend, ClassifyError};
    use crate::models::{Crop, CropTip, TipCategory};
    use crate::taxonomy::NUM_CLASSES;
    use rten_tensor::NdTensor;

    /// Deterministic stand-in for the frozen model.
    struct FixedBackend {
        probs: Vec<f32>,
    }

    impl FixedBackend {
        fn with_winner(index: usize, p: f32) -> Self {
            let mut probs = vec![(1.0 - p) / (NUM_CLASSES - 1) as f32; NUM_CLASSES];
            probs[index] = p;
            Self { probs }
        }
    }

    impl ClassifierBackend for FixedBackend {
        fn probabilities(&self, _input: NdTensor<f32, 4>) -> Result<Vec<f32>, ClassifyError> {
            Ok(self.probs.clone())
        }
    }

    async fn setup_test_app(backend: FixedBackend) -> (axum::Router, AppState, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let uploads_dir = dir.path().join("uploads");
        std::fs::create_dir_all(&uploads_dir).unwrap();

        let ctx = DbContext::from_sqlite_path(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();

        let state = AppState::new(
            &ctx,
            Arc::new(LeafClassifier::new(Box::new(backend))),
            uploads_dir,
        );
        let app = create_router(state.clone());
        (app, state, dir)
    }

    fn leaf_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(96, 96, image::Rgb([70, 130, 60]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    const BOUNDARY: &str = "agrodoctor-test-boundary";

    fn multipart_upload(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn with_uri(mut request: Request<Body>, uri: &str) -> Request<Body> {
        *request.uri_mut() = uri.parse().unwrap();
        request
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_predict_healthy_apple() {
        let (app, state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let response = app
            .oneshot(multipart_upload("image", "leaf.png", &leaf_png()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["prediction"]["crop"], "Apple");
        assert_eq!(json["prediction"]["disease"], "healthy");
        assert!(json["prediction"]["confidence"].as_f64().unwrap() >= 60.0);
        assert!(json["prediction"]["prediction_id"].as_i64().unwrap() > 0);

        let treatments = json["treatments"].as_array().unwrap();
        assert_eq!(treatments.len(), 1);
        assert_eq!(
            treatments[0]["instructions"],
            "No action required. The plant is healthy."
        );

        assert_eq!(state.prediction_repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_predict_low_confidence_is_unknown() {
        let (app, state, _dir) = setup_test_app(FixedBackend::with_winner(30, 0.41)).await;

        let response = app
            .oneshot(multipart_upload("image", "mystery.png", &leaf_png()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["prediction"]["crop"], "Unknown");
        assert_eq!(json["prediction"]["disease"], "Unknown");
        assert_eq!(json["prediction"]["class_name"], "Uncertain / Not in dataset");

        // Low confidence is a valid outcome and still recorded.
        assert_eq!(state.prediction_repo.count().await.unwrap(), 1);
        let stored = state.prediction_repo.recent(1, 0).await.unwrap();
        assert_eq!(stored[0].predicted_crop, "Unknown");
    }

    #[tokio::test]
    async fn test_predict_confidence_stored_verbatim() {
        let (app, state, _dir) = setup_test_app(FixedBackend::with_winner(30, 0.87654)).await;

        let response = app
            .oneshot(multipart_upload("image", "leaf.png", &leaf_png()))
            .await
            .unwrap();
        let json = json_body(response).await;

        let reported = json["prediction"]["confidence"].as_f64().unwrap();
        assert_eq!(reported, 87.65);

        let stored = state.prediction_repo.recent(1, 0).await.unwrap();
        assert_eq!(stored[0].confidence_score, reported);
    }

    #[tokio::test]
    async fn test_predict_missing_image_field() {
        let (app, state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let response = app
            .oneshot(multipart_upload("attachment", "leaf.png", &leaf_png()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "No image uploaded");

        assert_eq!(state.prediction_repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_predict_rejects_non_image_bytes() {
        let (app, state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let response = app
            .oneshot(multipart_upload("image", "notes.txt", b"just some text"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(
            json["error"],
            "Invalid file type. Please upload an image (JPEG, PNG, GIF)"
        );
        assert_eq!(state.prediction_repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_predict_links_catalog_rows() {
        let (app, state, dir) = setup_test_app(FixedBackend::with_winner(30, 0.9)).await;

        let ctx = DbContext::from_sqlite_path(&dir.path().join("test.db"));
        crate::cli::seed_catalog(&ctx).await.unwrap();

        let response = app
            .oneshot(multipart_upload("image", "leaf.png", &leaf_png()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stored = state.prediction_repo.recent(1, 0).await.unwrap();
        assert_eq!(stored[0].predicted_crop, "Tomato");
        assert!(stored[0].crop_id.is_some());
        assert!(stored[0].disease_id.is_some());
        assert!(stored[0].treatment_id.is_some());
    }

    #[tokio::test]
    async fn test_classify_does_not_persist_and_returns_tips() {
        let (app, state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let crop_id = state
            .crop_repo
            .insert(&Crop::new("apple".to_string(), String::new(), String::new()))
            .await
            .unwrap();
        state
            .crop_repo
            .insert_tip(&CropTip::new(
                crop_id,
                "Water deeply".to_string(),
                "Water at the base once a week in dry spells.".to_string(),
                TipCategory::Watering,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(with_uri(
                multipart_upload("image", "leaf.png", &leaf_png()),
                "/classify",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["prediction"]["crop"], "Apple");

        let tips = json["crop_tips"].as_array().unwrap();
        assert_eq!(tips.len(), 1);
        assert_eq!(tips[0]["title"], "Water deeply");
        assert_eq!(tips[0]["tip_type"], "watering");

        // Classify-only never records history.
        assert_eq!(state.prediction_repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_classify_missing_image() {
        let (app, _state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let response = app
            .oneshot(with_uri(
                multipart_upload("other", "leaf.png", &leaf_png()),
                "/classify",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No image uploaded");
    }

    #[tokio::test]
    async fn test_uploaded_image_is_served_back() {
        let (app, state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let response = app
            .clone()
            .oneshot(multipart_upload("image", "leaf.png", &leaf_png()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stored = state.prediction_repo.recent(1, 0).await.unwrap();
        let image_path = stored[0].image_path.clone().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/uploads/{}", image_path))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert!(content_type.contains("image/png"));
    }

    #[tokio::test]
    async fn test_upload_path_traversal_is_blocked() {
        let (app, _state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/uploads/../test.db")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_home_page() {
        let (app, _state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<!DOCTYPE html>") || html.contains("<html"));
        assert!(html.contains("AgroDoctor"));
    }

    #[tokio::test]
    async fn test_dashboard_shows_accuracy() {
        let (app, state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let id = state
            .prediction_repo
            .insert(&crate::models::Prediction::new(
                None,
                "Apple".to_string(),
                "healthy".to_string(),
                93.0,
            ))
            .await
            .unwrap();
        state
            .prediction_repo
            .record_ground_truth(id, "Apple", "healthy", true)
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("100.00"));
    }

    #[tokio::test]
    async fn test_crop_detail_not_found_redirects() {
        let (app, _state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/crops/9999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(location.starts_with("/crops"));
        assert!(location.contains("flash="));
    }

    #[tokio::test]
    async fn test_diseases_page_with_search() {
        let (app, state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let crop_id = state
            .crop_repo
            .insert(&Crop::new("Tomato".to_string(), String::new(), String::new()))
            .await
            .unwrap();
        state
            .disease_repo
            .insert(&crate::models::Disease::new(crop_id, "Early_blight".to_string()))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/diseases?search=blight")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Early_blight"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _state, _dir) = setup_test_app(FixedBackend::with_winner(3, 0.93)).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
