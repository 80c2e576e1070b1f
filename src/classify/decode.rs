//! Confidence gate and label decoding.

use serde::Serialize;

use crate::taxonomy;

/// Minimum winning probability for a prediction to be accepted.
pub const CONFIDENCE_THRESHOLD: f32 = 0.60;

/// Class name reported when the winning probability is below threshold.
pub const UNCERTAIN_CLASS: &str = "Uncertain / Not in dataset";

/// Crop/disease sentinel for uncertain or unmapped predictions.
pub const UNKNOWN: &str = "Unknown";

/// A decoded prediction: what the model saw and how sure it was.
///
/// `confidence` is the winning probability as a percentage, rounded to two
/// decimals. For below-threshold results crop and disease are both
/// [`UNKNOWN`] no matter which class won.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub class_name: String,
    pub crop: String,
    pub disease: String,
    pub confidence: f64,
}

impl Diagnosis {
    fn uncertain(confidence: f64) -> Self {
        Self {
            class_name: UNCERTAIN_CLASS.to_string(),
            crop: UNKNOWN.to_string(),
            disease: UNKNOWN.to_string(),
            confidence,
        }
    }
}

/// Round a probability to a two-decimal percentage.
fn to_percent(p: f32) -> f64 {
    (f64::from(p) * 100.0 * 100.0).round() / 100.0
}

/// Index of the first maximum in the probability vector.
fn argmax(probs: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in probs.iter().enumerate() {
        match best {
            Some((_, bp)) if p <= bp => {}
            _ => best = Some((i, p)),
        }
    }
    best.map(|(i, _)| i)
}

/// Decode a probability vector into a [`Diagnosis`].
///
/// The winning class is the argmax (first winner on ties). Labels decode
/// via the fixed taxonomy; a label without the `___` separator is treated
/// as a bare crop name with an empty disease. An index missing from the
/// table decodes to the [`UNKNOWN`] label.
pub fn decode(probs: &[f32]) -> Diagnosis {
    let Some(winner) = argmax(probs) else {
        return Diagnosis::uncertain(0.0);
    };
    let confidence = to_percent(probs[winner]);

    if probs[winner] < CONFIDENCE_THRESHOLD {
        return Diagnosis::uncertain(confidence);
    }

    let class_name = taxonomy::label_for_index(winner).unwrap_or(UNKNOWN);
    let (crop, disease) = match class_name.split_once("___") {
        Some((crop, disease)) => (crop, disease),
        None => (class_name, ""),
    };

    Diagnosis {
        class_name: class_name.to_string(),
        crop: crop.to_string(),
        disease: disease.to_string(),
        confidence,
    }
}
