//! Classifier backend abstraction.
//!
//! The seam between the request pipeline and the frozen model lets tests
//! substitute a deterministic backend without loading real weights.

use rten_tensor::NdTensor;
use thiserror::Error;

/// Errors from preprocessing or inference.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The uploaded bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The frozen model could not be loaded from disk.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The forward pass failed or produced an unusable output.
    #[error("inference failed: {0}")]
    Inference(String),
}

/// A classifier backend: one forward pass over a preprocessed image.
///
/// Implementations hold the model for the process lifetime and must be
/// safe for concurrent calls (`&self`, no interior mutation of weights).
pub trait ClassifierBackend: Send + Sync {
    /// Run the network on a `[1, 256, 256, 3]` input and return the
    /// probability distribution over the class set.
    fn probabilities(&self, input: NdTensor<f32, 4>) -> Result<Vec<f32>, ClassifyError>;
}
