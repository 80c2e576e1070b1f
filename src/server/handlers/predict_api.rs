//! JSON prediction endpoints.
//!
//! Both endpoints accept a multipart upload under the field name `image`,
//! validate it before the pipeline runs, and answer with the decoded
//! diagnosis plus taxonomy treatment advice. `/predict` additionally
//! stores one history row per request; `/classify` is stateless and adds
//! care tips for the matched crop.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::super::AppState;
use crate::classify::Diagnosis;
use crate::models::Prediction;
use crate::taxonomy;
use crate::utils::{accepted_image_type, MAX_UPLOAD_BYTES};

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// A validated upload: raw bytes plus sniffed MIME type.
struct Upload {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

/// Upload validation failures, each with its client-facing message.
enum UploadError {
    Missing,
    InvalidType,
    TooLarge,
}

impl UploadError {
    fn message(&self) -> &'static str {
        match self {
            Self::Missing => "No image uploaded",
            Self::InvalidType => "Invalid file type. Please upload an image (JPEG, PNG, GIF)",
            Self::TooLarge => "File size too large. Please upload an image smaller than 10MB",
        }
    }
}

fn error_json(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "success": false, "error": message }))).into_response()
}

fn validation_error(err: UploadError) -> Response {
    error_json(StatusCode::BAD_REQUEST, err.message())
}

/// Pull the `image` field out of the multipart body and validate it.
///
/// Validation happens before the pipeline: accepted types are JPEG/PNG/GIF
/// (decided by sniffing the bytes, not the client's content type) and the
/// size cap is 10MB.
async fn read_image_field(multipart: &mut Multipart) -> Result<Upload, UploadError> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("image") {
            continue;
        }
        let bytes = field.bytes().await.map_err(|_| UploadError::TooLarge)?;
        if bytes.is_empty() {
            return Err(UploadError::Missing);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge);
        }
        let mime_type = accepted_image_type(&bytes).ok_or(UploadError::InvalidType)?;
        return Ok(Upload {
            bytes: bytes.to_vec(),
            mime_type,
        });
    }
    Err(UploadError::Missing)
}

/// Serialize treatment advice for the response body.
fn treatments_json(crop: &str, disease: &str) -> Vec<serde_json::Value> {
    taxonomy::recommendations_for(crop, disease)
        .into_iter()
        .map(|t| {
            json!({
                "title": t.title,
                "description": t.description,
                "treatment_type": t.treatment_type,
                "effectiveness": t.effectiveness,
                "instructions": t.instructions,
            })
        })
        .collect()
}

/// Resolve catalog links for a decoded diagnosis.
///
/// Lookups are best-effort: a missing row (or a read error) just leaves
/// the link empty, it never fails the request.
async fn resolve_catalog_links(
    state: &AppState,
    diagnosis: &Diagnosis,
) -> (Option<i64>, Option<i64>, Option<i64>) {
    let Ok(Some(crop)) = state.crop_repo.find_by_name(&diagnosis.crop).await else {
        return (None, None, None);
    };

    let disease = match state
        .disease_repo
        .find_by_name(crop.id, &diagnosis.disease)
        .await
    {
        Ok(found) => found,
        Err(_) => None,
    };

    let treatment_id = match &disease {
        Some(d) => state
            .disease_repo
            .treatments_for(d.id)
            .await
            .ok()
            .and_then(|list| list.first().map(|t| t.id)),
        None => None,
    };

    (Some(crop.id), disease.map(|d| d.id), treatment_id)
}

/// Handle image upload and disease prediction, recording the result.
pub async fn predict_and_record(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let upload = match read_image_field(&mut multipart).await {
        Ok(upload) => upload,
        Err(err) => return validation_error(err),
    };

    let diagnosis = match state.classifier.predict(&upload.bytes) {
        Ok(diagnosis) => diagnosis,
        Err(e) => {
            tracing::error!(error = %e, "prediction failed");
            return error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred during prediction. Please try again.",
            );
        }
    };

    let image_path =
        match crate::storage::save_upload(&state.uploads_dir, &upload.bytes, upload.mime_type) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!(error = %e, "failed to store upload");
                return error_json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during prediction. Please try again.",
                );
            }
        };

    let (crop_id, disease_id, treatment_id) = resolve_catalog_links(&state, &diagnosis).await;

    let mut prediction = Prediction::new(
        image_path,
        diagnosis.crop.clone(),
        diagnosis.disease.clone(),
        diagnosis.confidence,
    );
    prediction.crop_id = crop_id;
    prediction.disease_id = disease_id;
    prediction.treatment_id = treatment_id;

    let prediction_id = match state.prediction_repo.insert(&prediction).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "failed to record prediction");
            return error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred during prediction. Please try again.",
            );
        }
    };

    tracing::info!(
        prediction_id,
        crop = %diagnosis.crop,
        disease = %diagnosis.disease,
        confidence = diagnosis.confidence,
        "recorded prediction"
    );

    axum::Json(json!({
        "success": true,
        "prediction": {
            "class_name": diagnosis.class_name,
            "crop": diagnosis.crop,
            "disease": diagnosis.disease,
            "confidence": diagnosis.confidence,
            "prediction_id": prediction_id,
        },
        "treatments": treatments_json(&diagnosis.crop, &diagnosis.disease),
    }))
    .into_response()
}

/// Classify an image without recording it, including care tips for the
/// matched crop.
pub async fn classify_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = match read_image_field(&mut multipart).await {
        Ok(upload) => upload,
        Err(err) => return validation_error(err),
    };

    let diagnosis = match state.classifier.predict(&upload.bytes) {
        Ok(diagnosis) => diagnosis,
        Err(e) => {
            tracing::error!(error = %e, "classification failed");
            return error_json(StatusCode::INTERNAL_SERVER_ERROR, "Failed to predict");
        }
    };

    // Case-insensitive exact match against the catalog; no match just
    // means no tips.
    let crop_tips: Vec<serde_json::Value> =
        match state.crop_repo.find_by_name(&diagnosis.crop).await {
            Ok(Some(crop)) => state
                .crop_repo
                .tips_for(crop.id)
                .await
                .unwrap_or_default()
                .into_iter()
                .map(|tip| {
                    json!({
                        "title": tip.title,
                        "content": tip.content,
                        "tip_type": tip.tip_type.as_str(),
                        "season": tip.season.as_str(),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };

    axum::Json(json!({
        "success": true,
        "prediction": {
            "class_name": diagnosis.class_name,
            "crop": diagnosis.crop,
            "disease": diagnosis.disease,
            "confidence": diagnosis.confidence,
        },
        "treatments": treatments_json(&diagnosis.crop, &diagnosis.disease),
        "crop_tips": crop_tips,
    }))
    .into_response()
}
