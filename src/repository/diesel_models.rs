//! Diesel ORM models for database tables.
//!
//! These models provide compile-time type checking for database operations.
//! For SQLite, operations go through SyncConnectionWrapper since
//! diesel-async only supports Postgres/MySQL natively.

use diesel::prelude::*;

use crate::schema;

/// Crop record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::crops)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CropRecord {
    pub id: i64,
    pub name: String,
    pub scientific_name: String,
    pub description: String,
    pub image_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// New crop for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::crops)]
pub struct NewCrop<'a> {
    pub name: &'a str,
    pub scientific_name: &'a str,
    pub description: &'a str,
    pub image_path: Option<&'a str>,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Disease record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::diseases)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DiseaseRecord {
    pub id: i64,
    pub crop_id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// New disease for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::diseases)]
pub struct NewDisease<'a> {
    pub crop_id: i64,
    pub name: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Treatment record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::treatments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TreatmentRecord {
    pub id: i64,
    pub disease_id: i64,
    pub title: String,
    pub instructions: String,
    pub created_at: String,
    pub updated_at: String,
}

/// New treatment for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::treatments)]
pub struct NewTreatment<'a> {
    pub disease_id: i64,
    pub title: &'a str,
    pub instructions: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Crop tip record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::crop_tips)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CropTipRecord {
    pub id: i64,
    pub crop_id: i64,
    pub title: String,
    pub content: String,
    pub tip_type: String,
    pub season: String,
    pub created_at: String,
    pub updated_at: String,
}

/// New crop tip for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::crop_tips)]
pub struct NewCropTip<'a> {
    pub crop_id: i64,
    pub title: &'a str,
    pub content: &'a str,
    pub tip_type: &'a str,
    pub season: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Prediction record from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::predictions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PredictionRecord {
    pub id: i64,
    pub image_path: Option<String>,
    pub predicted_crop: String,
    pub predicted_disease: String,
    pub confidence_score: f64,
    pub crop_id: Option<i64>,
    pub disease_id: Option<i64>,
    pub treatment_id: Option<i64>,
    pub actual_crop: String,
    pub actual_disease: String,
    pub is_correct: Option<bool>,
    pub created_at: String,
}

/// New prediction for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::predictions)]
pub struct NewPrediction<'a> {
    pub image_path: Option<&'a str>,
    pub predicted_crop: &'a str,
    pub predicted_disease: &'a str,
    pub confidence_score: f64,
    pub crop_id: Option<i64>,
    pub disease_id: Option<i64>,
    pub treatment_id: Option<i64>,
    pub actual_crop: &'a str,
    pub actual_disease: &'a str,
    pub is_correct: Option<bool>,
    pub created_at: &'a str,
}
