//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Askama provides compile-time verification that templates are valid.

use askama::Template;

use crate::models::{Crop, CropTip, Disease, Prediction, Treatment};
use crate::repository::DiseaseWithCrop;
use crate::taxonomy::TreatmentAdvice;

/// Helper struct for crop rows in listings.
pub struct CropRow {
    pub id: i64,
    pub name: String,
    pub scientific_name: String,
    pub description: String,
}

impl CropRow {
    pub fn from_crop(crop: &Crop) -> Self {
        Self {
            id: crop.id,
            name: crop.name.clone(),
            scientific_name: crop.scientific_name.clone(),
            description: crop.description.clone(),
        }
    }
}

/// Helper struct for disease rows (with owning crop name).
pub struct DiseaseRow {
    pub id: i64,
    pub name: String,
    pub crop_name: String,
}

impl DiseaseRow {
    pub fn from_disease(disease: &Disease, crop_name: &str) -> Self {
        Self {
            id: disease.id,
            name: disease.name.clone(),
            crop_name: crop_name.to_string(),
        }
    }

    pub fn from_joined(row: &DiseaseWithCrop) -> Self {
        Self::from_disease(&row.disease, &row.crop_name)
    }
}

/// Helper struct for treatment rows.
pub struct TreatmentRow {
    pub title: String,
    pub instructions: String,
}

impl TreatmentRow {
    pub fn from_treatment(treatment: &Treatment) -> Self {
        Self {
            title: treatment.title.clone(),
            instructions: treatment.instructions.clone(),
        }
    }

    pub fn from_advice(advice: &TreatmentAdvice) -> Self {
        Self {
            title: advice.title.clone(),
            instructions: advice.instructions.clone(),
        }
    }
}

/// Helper struct for care tip rows.
pub struct TipRow {
    pub title: String,
    pub content: String,
    pub tip_type: String,
    pub season: String,
}

impl TipRow {
    pub fn from_tip(tip: &CropTip) -> Self {
        Self {
            title: tip.title.clone(),
            content: tip.content.clone(),
            tip_type: tip.tip_type.as_str().replace('_', " "),
            season: tip.season.as_str().to_string(),
        }
    }
}

/// Helper struct for prediction history rows.
pub struct PredictionRow {
    pub id: i64,
    pub predicted_crop: String,
    pub predicted_disease: String,
    pub confidence_str: String,
    pub date_str: String,
    pub verdict: String,
}

impl PredictionRow {
    pub fn from_prediction(p: &Prediction) -> Self {
        let verdict = match p.is_correct {
            Some(true) => "correct",
            Some(false) => "incorrect",
            None => "unreviewed",
        };
        Self {
            id: p.id,
            predicted_crop: p.predicted_crop.clone(),
            predicted_disease: p.predicted_disease.clone(),
            confidence_str: format!("{:.2}%", p.confidence_score),
            date_str: p.created_at.format("%Y-%m-%d %H:%M").to_string(),
            verdict: verdict.to_string(),
        }
    }
}

/// Home page with the upload form.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub title: &'a str,
    pub has_flash: bool,
    pub flash: String,
}

/// About page.
#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate<'a> {
    pub title: &'a str,
}

/// Contact page.
#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate<'a> {
    pub title: &'a str,
}

/// Supported crops listing.
#[derive(Template)]
#[template(path = "crops.html")]
pub struct CropsTemplate<'a> {
    pub title: &'a str,
    pub crops: Vec<CropRow>,
    pub has_crops: bool,
    pub has_flash: bool,
    pub flash: String,
}

/// Crop detail page.
#[derive(Template)]
#[template(path = "crop_detail.html")]
pub struct CropDetailTemplate<'a> {
    pub title: &'a str,
    pub name: String,
    pub scientific_name: String,
    pub description: String,
    pub diseases: Vec<DiseaseRow>,
    pub has_diseases: bool,
    pub tips: Vec<TipRow>,
    pub has_tips: bool,
}

/// Diseases database listing with search and pagination.
#[derive(Template)]
#[template(path = "diseases.html")]
pub struct DiseasesTemplate<'a> {
    pub title: &'a str,
    pub diseases: Vec<DiseaseRow>,
    pub has_diseases: bool,
    pub search_query: String,
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: usize,
    pub next_page: usize,
    pub has_flash: bool,
    pub flash: String,
}

/// Disease detail page.
#[derive(Template)]
#[template(path = "disease_detail.html")]
pub struct DiseaseDetailTemplate<'a> {
    pub title: &'a str,
    pub crop_name: String,
    pub disease_name: String,
    pub treatments: Vec<TreatmentRow>,
    pub has_treatments: bool,
}

/// Prediction history dashboard.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub title: &'a str,
    pub predictions: Vec<PredictionRow>,
    pub has_predictions: bool,
    pub total_predictions: u64,
    pub correct_predictions: u64,
    pub accuracy_str: String,
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: usize,
    pub next_page: usize,
}

/// Stored prediction detail page.
#[derive(Template)]
#[template(path = "prediction_result.html")]
pub struct PredictionResultTemplate<'a> {
    pub title: &'a str,
    pub predicted_crop: String,
    pub predicted_disease: String,
    pub confidence_str: String,
    pub date_str: String,
    pub has_image: bool,
    pub image_url: String,
    pub treatments: Vec<TreatmentRow>,
    pub has_treatments: bool,
    pub tips: Vec<TipRow>,
    pub has_tips: bool,
}

/// Generic error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: String,
}
