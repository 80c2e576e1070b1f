//! Prediction history entries.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded classification, append-only.
///
/// The predicted fields are free text copied verbatim from the decoder
/// (they may be the "Unknown" sentinel and need not match any catalog
/// row). The catalog references are nullable and nullified if the
/// referenced row is deleted; the history entry itself always survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: i64,
    /// Relative path of the stored upload inside the uploads dir.
    pub image_path: Option<String>,
    pub predicted_crop: String,
    pub predicted_disease: String,
    /// Percentage in [0, 100], two-decimal precision, stored exactly as
    /// decoded (never re-derived).
    pub confidence_score: f64,
    pub crop_id: Option<i64>,
    pub disease_id: Option<i64>,
    pub treatment_id: Option<i64>,
    /// Human-supplied ground truth, empty until recorded.
    pub actual_crop: String,
    pub actual_disease: String,
    pub is_correct: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl Prediction {
    /// Build a new history entry from a decoded diagnosis. Catalog links
    /// default to none; the repository assigns the id on insert.
    pub fn new(
        image_path: Option<String>,
        predicted_crop: String,
        predicted_disease: String,
        confidence_score: f64,
    ) -> Self {
        Self {
            id: 0, // Set by database
            image_path,
            predicted_crop,
            predicted_disease,
            confidence_score,
            crop_id: None,
            disease_id: None,
            treatment_id: None,
            actual_crop: String::new(),
            actual_disease: String::new(),
            is_correct: None,
            created_at: Utc::now(),
        }
    }
}

/// Aggregate accuracy over the stored history.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PredictionStats {
    pub total: u64,
    pub correct: u64,
    /// correct / total as a two-decimal percentage; 0 when the history is
    /// empty.
    pub accuracy: f64,
}

impl PredictionStats {
    pub fn new(total: u64, correct: u64) -> Self {
        let accuracy = if total > 0 {
            (correct as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };
        Self {
            total,
            correct,
            accuracy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accuracy() {
        let stats = PredictionStats::new(3, 2);
        assert_eq!(stats.accuracy, 66.67);
    }

    #[test]
    fn test_stats_empty_history() {
        let stats = PredictionStats::new(0, 0);
        assert_eq!(stats.accuracy, 0.0);
    }
}
