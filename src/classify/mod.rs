//! Leaf image classification pipeline.
//!
//! Upload bytes flow through three stages: preprocessing into the model's
//! input tensor, one synchronous forward pass through the frozen network,
//! and confidence-gated decoding into a labeled [`Diagnosis`]. The service
//! is constructed explicitly and injected into the server state; tests
//! swap in a fake [`ClassifierBackend`] instead of loading real weights.

mod backend;
pub mod decode;
pub mod preprocess;
mod rten_backend;

pub use backend::{ClassifierBackend, ClassifyError};
pub use decode::{Diagnosis, CONFIDENCE_THRESHOLD, UNCERTAIN_CLASS, UNKNOWN};
pub use rten_backend::RtenBackend;

use std::path::Path;

/// The inference pipeline around one frozen model instance.
pub struct LeafClassifier {
    backend: Box<dyn ClassifierBackend>,
}

impl LeafClassifier {
    /// Wrap an already-constructed backend.
    pub fn new(backend: Box<dyn ClassifierBackend>) -> Self {
        Self { backend }
    }

    /// Load the frozen model from disk and build the pipeline around it.
    pub fn from_model_file(path: &Path) -> Result<Self, ClassifyError> {
        Ok(Self::new(Box::new(RtenBackend::load(path)?)))
    }

    /// Classify one uploaded image.
    ///
    /// Blocking: the forward pass runs on the calling thread. Low
    /// confidence is not an error; it decodes to the uncertain sentinel.
    pub fn predict(&self, image_bytes: &[u8]) -> Result<Diagnosis, ClassifyError> {
        let input = preprocess::tensor_from_bytes(image_bytes)?;
        let probs = self.backend.probabilities(input)?;
        Ok(decode::decode(&probs))
    }
}
