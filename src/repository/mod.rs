//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking
//! over SQLite.

pub mod diesel_context;
pub mod diesel_crop;
pub mod diesel_disease;
pub mod diesel_models;
pub mod diesel_pool;
pub mod diesel_prediction;
pub mod util;

pub use diesel_context::DbContext;
pub use diesel_crop::CropRepository;
pub use diesel_disease::{DiseaseRepository, DiseaseWithCrop};
pub use diesel_pool::DieselError;
pub use diesel_prediction::PredictionRepository;

use chrono::{DateTime, Utc};

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
