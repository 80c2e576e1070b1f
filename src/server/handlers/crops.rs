//! Crop catalog handlers.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use super::super::template_structs::{
    CropDetailTemplate, CropRow, CropsTemplate, DiseaseRow, ErrorTemplate, TipRow,
};
use super::super::AppState;
use super::pages::FlashParams;

/// Display the list of supported crops.
pub async fn crops_list(
    State(state): State<AppState>,
    Query(params): Query<FlashParams>,
) -> impl IntoResponse {
    let crops = match state.crop_repo.get_all().await {
        Ok(crops) => crops,
        Err(e) => {
            let template = ErrorTemplate {
                title: "Error",
                message: format!("Failed to load crops: {}", e),
            };
            return Html(template.render().unwrap_or_else(|_| e.to_string()));
        }
    };
    let rows: Vec<_> = crops.iter().map(CropRow::from_crop).collect();
    let flash = params.flash.unwrap_or_default();

    let template = CropsTemplate {
        title: "Supported Crops",
        has_crops: !rows.is_empty(),
        crops: rows,
        has_flash: !flash.is_empty(),
        flash,
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e)))
}

/// Display detailed information about a specific crop.
pub async fn crop_detail(State(state): State<AppState>, Path(crop_id): Path<i64>) -> Response {
    let crop = match state.crop_repo.get(crop_id).await {
        Ok(Some(crop)) => crop,
        _ => return Redirect::to("/crops?flash=Crop+not+found").into_response(),
    };

    let diseases = state
        .disease_repo
        .for_crop(crop.id)
        .await
        .unwrap_or_default();
    let tips = state.crop_repo.tips_for(crop.id).await.unwrap_or_default();

    let disease_rows: Vec<_> = diseases
        .iter()
        .map(|d| DiseaseRow::from_disease(d, &crop.name))
        .collect();
    let tip_rows: Vec<_> = tips.iter().map(TipRow::from_tip).collect();

    let title = format!("{} - Crop Information", crop.name);
    let template = CropDetailTemplate {
        title: &title,
        name: crop.name.clone(),
        scientific_name: crop.scientific_name.clone(),
        description: crop.description.clone(),
        has_diseases: !disease_rows.is_empty(),
        diseases: disease_rows,
        has_tips: !tip_rows.is_empty(),
        tips: tip_rows,
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e))).into_response()
}
