//! Static label taxonomy for the frozen leaf classifier.
//!
//! The model predicts one of 39 fixed classes named `Crop___Disease`
//! (double underscore separator). Both lookup tables here ship with the
//! model artifact and never change at runtime.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

/// Number of classes the frozen model can output.
pub const NUM_CLASSES: usize = 39;

/// Key used for advice lookup when no real label is available.
pub const UNKNOWN_KEY: &str = "Unknown";

/// Advice returned for any key absent from the table.
pub const GENERIC_ADVICE: &str = "No specific treatment available.";

/// Model output index to class label, in the order the network was trained.
pub const CLASS_LABELS: [&str; NUM_CLASSES] = [
    "Apple___Apple_scab",
    "Apple___Black_rot",
    "Apple___Cedar_apple_rust",
    "Apple___healthy",
    "Not a plant",
    "Blueberry___healthy",
    "Cherry___Powdery_mildew",
    "Cherry___healthy",
    "Corn___Cercospora_leaf_spot Gray_leaf_spot",
    "Corn___Common_rust",
    "Corn___Northern_Leaf_Blight",
    "Corn___healthy",
    "Grape___Black_rot",
    "Grape___Esca_(Black_Measles)",
    "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
    "Grape___healthy",
    "Orange___Haunglongbing_(Citrus_greening)",
    "Peach___Bacterial_spot",
    "Peach___healthy",
    "Pepper,_bell___Bacterial_spot",
    "Pepper,_bell___healthy",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Raspberry___healthy",
    "Soybean___healthy",
    "Squash___Powdery_mildew",
    "Strawberry___Leaf_scorch",
    "Strawberry___healthy",
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___healthy",
];

/// Class label to treatment advice. Healthy classes map to a no-action
/// message; the `Unknown` entry is the fallback for unmapped labels.
const ADVICE_ENTRIES: &[(&str, &str)] = &[
    (
        "Apple___Apple_scab",
        "Remove fallen leaves and prune infected branches. Apply fungicides containing captan or myclobutanil.",
    ),
    (
        "Apple___Black_rot",
        "Prune out dead branches. Spray copper-based fungicide during early fruit development.",
    ),
    (
        "Apple___Cedar_apple_rust",
        "Remove nearby juniper trees. Apply fungicides before bud break.",
    ),
    ("Apple___healthy", "No action required. The plant is healthy."),
    ("Blueberry___healthy", "No action required. The plant is healthy."),
    (
        "Cherry___Powdery_mildew",
        "Apply sulfur-based fungicide. Ensure good air circulation around the plant.",
    ),
    ("Cherry___healthy", "No action required. The plant is healthy."),
    (
        "Corn___Cercospora_leaf_spot Gray_leaf_spot",
        "Rotate crops to avoid build-up of pathogens. Use resistant hybrids and apply foliar fungicides.",
    ),
    (
        "Corn___Common_rust",
        "Plant rust-resistant hybrids. Apply fungicides at the first sign of rust.",
    ),
    (
        "Corn___Northern_Leaf_Blight",
        "Use resistant varieties and apply fungicides when lesions are observed.",
    ),
    ("Corn___healthy", "No action required. The plant is healthy."),
    (
        "Grape___Black_rot",
        "Remove and destroy infected leaves and fruits. Apply fungicides containing myclobutanil or captan.",
    ),
    (
        "Grape___Esca_(Black_Measles)",
        "Prune and destroy infected wood. Apply fungicides during the growing season.",
    ),
    (
        "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
        "Maintain good air circulation. Spray protective fungicides like mancozeb.",
    ),
    ("Grape___healthy", "No action required. The plant is healthy."),
    (
        "Orange___Haunglongbing_(Citrus_greening)",
        "Remove and destroy infected trees. Control psyllid vectors with insecticides.",
    ),
    (
        "Peach___Bacterial_spot",
        "Apply copper-based bactericides. Use resistant varieties and avoid overhead irrigation.",
    ),
    ("Peach___healthy", "No action required. The plant is healthy."),
    (
        "Pepper,_bell___Bacterial_spot",
        "Apply copper-based sprays. Use certified seeds and avoid overhead irrigation.",
    ),
    ("Pepper,_bell___healthy", "No action required. The plant is healthy."),
    (
        "Potato___Early_blight",
        "Use certified seeds and apply preventative fungicides like chlorothalonil.",
    ),
    (
        "Potato___Late_blight",
        "Plant disease-free tubers and use fungicides containing metalaxyl.",
    ),
    ("Potato___healthy", "No action required. The plant is healthy."),
    ("Raspberry___healthy", "No action required. The plant is healthy."),
    ("Soybean___healthy", "No action required. The plant is healthy."),
    (
        "Squash___Powdery_mildew",
        "Use sulfur-based fungicides and ensure good ventilation.",
    ),
    (
        "Strawberry___Leaf_scorch",
        "Remove infected leaves. Apply fungicides containing myclobutanil.",
    ),
    ("Strawberry___healthy", "No action required. The plant is healthy."),
    (
        "Tomato___Bacterial_spot",
        "Apply copper-based sprays. Avoid overhead watering.",
    ),
    (
        "Tomato___Early_blight",
        "Prune infected leaves and apply fungicides containing chlorothalonil or mancozeb.",
    ),
    (
        "Tomato___Late_blight",
        "Remove infected plants. Apply fungicides containing chlorothalonil or metalaxyl.",
    ),
    (
        "Tomato___Leaf_Mold",
        "Ensure good ventilation and apply fungicides like mancozeb.",
    ),
    (
        "Tomato___Septoria_leaf_spot",
        "Remove infected leaves and apply fungicides containing chlorothalonil.",
    ),
    (
        "Tomato___Spider_mites Two-spotted_spider_mite",
        "Spray insecticidal soap or neem oil. Maintain humidity levels.",
    ),
    (
        "Tomato___Target_Spot",
        "Use resistant varieties. Apply fungicides containing chlorothalonil.",
    ),
    (
        "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
        "Remove infected plants. Use resistant varieties and control whitefly vectors.",
    ),
    (
        "Tomato___Tomato_mosaic_virus",
        "Remove infected plants and disinfect tools. Use resistant seed varieties.",
    ),
    ("Tomato___healthy", "No action required. The plant is healthy."),
    ("Unknown", "No specific treatment available."),
];

/// Look up the class label for a model output index.
pub fn label_for_index(index: usize) -> Option<&'static str> {
    CLASS_LABELS.get(index).copied()
}

fn advice_map() -> &'static HashMap<&'static str, &'static str> {
    static ADVICE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    ADVICE.get_or_init(|| ADVICE_ENTRIES.iter().copied().collect())
}

/// Advice text for a `Crop___Disease` key, falling back to the generic
/// message for unrecognized keys. Total: never fails.
pub fn advice_for(class_key: &str) -> &'static str {
    advice_map().get(class_key).copied().unwrap_or(GENERIC_ADVICE)
}

/// A single treatment recommendation from the static taxonomy.
///
/// This is deliberately distinct from the database-backed
/// [`Treatment`](crate::models::Treatment) entity: taxonomy advice ships
/// with the model and has no row identity.
#[derive(Debug, Clone, Serialize)]
pub struct TreatmentAdvice {
    pub title: String,
    pub description: String,
    pub treatment_type: String,
    pub effectiveness: String,
    pub instructions: String,
}

/// Build the recommendation list for a decoded (crop, disease) pair.
///
/// The key is reassembled as `Crop___Disease`; if either part is empty the
/// `Unknown` sentinel key is used instead. Always returns exactly one item
/// so callers handle the single static recommendation uniformly with a
/// future multi-treatment source.
pub fn recommendations_for(crop: &str, disease: &str) -> Vec<TreatmentAdvice> {
    let key = if crop.is_empty() || disease.is_empty() {
        UNKNOWN_KEY.to_string()
    } else {
        format!("{}___{}", crop, disease)
    };
    let advice = advice_for(&key);

    vec![TreatmentAdvice {
        title: format!("Treatment for {} - {}", crop, disease),
        description: advice.to_string(),
        treatment_type: "General".to_string(),
        effectiveness: "Medium".to_string(),
        instructions: advice.to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_table_is_complete() {
        assert_eq!(CLASS_LABELS.len(), NUM_CLASSES);
        assert_eq!(label_for_index(0), Some("Apple___Apple_scab"));
        assert_eq!(label_for_index(38), Some("Tomato___healthy"));
        assert_eq!(label_for_index(NUM_CLASSES), None);
    }

    #[test]
    fn test_every_label_has_advice_except_not_a_plant() {
        for label in CLASS_LABELS {
            if label == "Not a plant" {
                assert_eq!(advice_for(label), GENERIC_ADVICE);
            } else {
                assert_ne!(advice_for(label), GENERIC_ADVICE, "missing advice for {label}");
            }
        }
    }

    #[test]
    fn test_healthy_advice() {
        let recs = recommendations_for("Apple", "healthy");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].instructions, "No action required. The plant is healthy.");
    }

    #[test]
    fn test_unknown_pair_falls_back() {
        let recs = recommendations_for("Dragonfruit", "Mystery_blight");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].instructions, GENERIC_ADVICE);
        assert_eq!(recs[0].treatment_type, "General");
    }

    #[test]
    fn test_empty_disease_uses_unknown_key() {
        let recs = recommendations_for("Not a plant", "");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].instructions, GENERIC_ADVICE);
    }
}
