//! Prediction history handlers: dashboard and stored result pages.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::super::template_structs::{
    DashboardTemplate, PredictionResultTemplate, PredictionRow, TipRow, TreatmentRow,
};
use super::super::AppState;
use super::helpers::{page_count, paginate};
use crate::taxonomy;

/// History rows per dashboard page.
const PER_PAGE: usize = 10;

/// Query params for the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub page: Option<usize>,
}

/// Dashboard showing prediction history and aggregate accuracy.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> impl IntoResponse {
    let (page, limit, offset) = paginate(params.page, PER_PAGE);

    let predictions = state
        .prediction_repo
        .recent(limit, offset)
        .await
        .unwrap_or_default();
    let stats = state.prediction_repo.stats().await.unwrap_or_default();
    let total_pages = page_count(stats.total, PER_PAGE);

    let rows: Vec<_> = predictions.iter().map(PredictionRow::from_prediction).collect();

    let template = DashboardTemplate {
        title: "Dashboard",
        has_predictions: !rows.is_empty(),
        predictions: rows,
        total_predictions: stats.total,
        correct_predictions: stats.correct,
        accuracy_str: format!("{:.2}", stats.accuracy),
        page,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
        prev_page: page.saturating_sub(1).max(1),
        next_page: (page + 1).min(total_pages),
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e)))
}

/// Display a stored prediction with its advice and care tips.
pub async fn prediction_result(
    State(state): State<AppState>,
    Path(prediction_id): Path<i64>,
) -> Response {
    let prediction = match state.prediction_repo.get(prediction_id).await {
        Ok(Some(prediction)) => prediction,
        _ => return Redirect::to("/?flash=Prediction+not+found").into_response(),
    };

    let treatments =
        taxonomy::recommendations_for(&prediction.predicted_crop, &prediction.predicted_disease);
    let treatment_rows: Vec<_> = treatments.iter().map(TreatmentRow::from_advice).collect();

    // Tips come from the linked crop when the link survived, otherwise by
    // name match, mirroring the classify endpoint.
    let crop = match prediction.crop_id {
        Some(crop_id) => state.crop_repo.get(crop_id).await.unwrap_or(None),
        None => state
            .crop_repo
            .find_by_name(&prediction.predicted_crop)
            .await
            .unwrap_or(None),
    };
    let tip_rows: Vec<_> = match &crop {
        Some(crop) => state
            .crop_repo
            .tips_for(crop.id)
            .await
            .unwrap_or_default()
            .iter()
            .map(TipRow::from_tip)
            .collect(),
        None => Vec::new(),
    };

    let title = format!("Prediction Result - {}", prediction.predicted_crop);
    let template = PredictionResultTemplate {
        title: &title,
        predicted_crop: prediction.predicted_crop.clone(),
        predicted_disease: prediction.predicted_disease.clone(),
        confidence_str: format!("{:.2}%", prediction.confidence_score),
        date_str: prediction.created_at.format("%Y-%m-%d %H:%M").to_string(),
        has_image: prediction.image_path.is_some(),
        image_url: prediction
            .image_path
            .as_deref()
            .map(|p| format!("/uploads/{}", p))
            .unwrap_or_default(),
        has_treatments: !treatment_rows.is_empty(),
        treatments: treatment_rows,
        has_tips: !tip_rows.is_empty(),
        tips: tip_rows,
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e))).into_response()
}
