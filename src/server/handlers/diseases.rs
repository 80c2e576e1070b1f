//! Disease catalog handlers.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::super::template_structs::{
    DiseaseDetailTemplate, DiseaseRow, DiseasesTemplate, TreatmentRow,
};
use super::super::AppState;
use super::helpers::{page_count, paginate};

/// Diseases per listing page.
const PER_PAGE: usize = 20;

/// Query params for the disease listing.
#[derive(Debug, Deserialize)]
pub struct DiseaseListParams {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub flash: Option<String>,
}

/// Display the searchable disease database.
pub async fn diseases_list(
    State(state): State<AppState>,
    Query(params): Query<DiseaseListParams>,
) -> impl IntoResponse {
    let (page, limit, offset) = paginate(params.page, PER_PAGE);
    let search = params.search.unwrap_or_default();
    let query = (!search.trim().is_empty()).then_some(search.as_str());

    let rows = state
        .disease_repo
        .search(query, limit, offset)
        .await
        .unwrap_or_default();
    let total = state.disease_repo.search_count(query).await.unwrap_or(0);
    let total_pages = page_count(total, PER_PAGE);

    let disease_rows: Vec<_> = rows.iter().map(DiseaseRow::from_joined).collect();
    let flash = params.flash.unwrap_or_default();

    let template = DiseasesTemplate {
        title: "Diseases Database",
        has_diseases: !disease_rows.is_empty(),
        diseases: disease_rows,
        search_query: search,
        page,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
        prev_page: page.saturating_sub(1).max(1),
        next_page: (page + 1).min(total_pages),
        has_flash: !flash.is_empty(),
        flash,
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e)))
}

/// Display detailed information about a specific disease.
pub async fn disease_detail(
    State(state): State<AppState>,
    Path(disease_id): Path<i64>,
) -> Response {
    let found = match state.disease_repo.get(disease_id).await {
        Ok(Some(found)) => found,
        _ => return Redirect::to("/diseases?flash=Disease+not+found").into_response(),
    };

    let treatments = state
        .disease_repo
        .treatments_for(found.disease.id)
        .await
        .unwrap_or_default();
    let treatment_rows: Vec<_> = treatments.iter().map(TreatmentRow::from_treatment).collect();

    let title = format!("{} - {}", found.crop_name, found.disease.name);
    let template = DiseaseDetailTemplate {
        title: &title,
        crop_name: found.crop_name.clone(),
        disease_name: found.disease.name.clone(),
        has_treatments: !treatment_rows.is_empty(),
        treatments: treatment_rows,
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e))).into_response()
}
