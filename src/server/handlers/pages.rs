//! Main page handlers (home, about, contact).

use askama::Template;
use axum::{
    extract::Query,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use super::super::template_structs::{AboutTemplate, ContactTemplate, HomeTemplate};

/// Query params carrying a one-shot flash message after a redirect.
#[derive(Debug, Deserialize)]
pub struct FlashParams {
    pub flash: Option<String>,
}

/// Home page with the upload form.
pub async fn home(Query(params): Query<FlashParams>) -> impl IntoResponse {
    let flash = params.flash.unwrap_or_default();
    let template = HomeTemplate {
        title: "AgroDoctor - AI-Powered Crop Disease Detection",
        has_flash: !flash.is_empty(),
        flash,
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e)))
}

/// About page.
pub async fn about() -> impl IntoResponse {
    let template = AboutTemplate {
        title: "About AgroDoctor",
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e)))
}

/// Contact page.
pub async fn contact() -> impl IntoResponse {
    let template = ContactTemplate {
        title: "Contact Us",
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e)))
}
