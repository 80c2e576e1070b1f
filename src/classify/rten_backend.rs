//! rten inference backend for the frozen leaf model.
//!
//! The model file is an rten-serialized network converted offline from the
//! original training artifact. It is loaded exactly once; `rten::Model` is
//! `Send + Sync` and inference takes `&self`, so a single instance serves
//! all concurrent requests without locking.

use std::path::Path;

use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::NdTensor;

use super::backend::{ClassifierBackend, ClassifyError};

/// Classifier backend backed by an rten model file.
pub struct RtenBackend {
    model: Model,
}

impl RtenBackend {
    /// Load the frozen model from disk. There is no fallback: callers treat
    /// a load failure as fatal.
    pub fn load(path: &Path) -> Result<Self, ClassifyError> {
        let model = Model::load_file(path)
            .map_err(|e| ClassifyError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        tracing::info!(model = %path.display(), "loaded leaf classifier model");
        Ok(Self { model })
    }
}

impl ClassifierBackend for RtenBackend {
    fn probabilities(&self, input: NdTensor<f32, 4>) -> Result<Vec<f32>, ClassifyError> {
        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;

        // The network ends in a softmax over [1, NUM_CLASSES].
        let probs: NdTensor<f32, 2> = output
            .try_into()
            .map_err(|_| ClassifyError::Inference("unexpected output tensor shape".to_string()))?;

        Ok(probs.iter().copied().collect())
    }
}
