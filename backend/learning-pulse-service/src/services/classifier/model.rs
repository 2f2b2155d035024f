//! ONNX inference backend.
//!
//! Runs the exported persona model with tract-onnx. The artifact must take a
//! `[1, 25]` f32 input and emit a `[1, 10]` f32 probability tensor in the
//! class index order recorded in the model metadata.

use super::{ClassifierError, InferenceBackend, Result};
use crate::models::FeatureVector;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tract_onnx::prelude::{tvec, Framework, InferenceModelExt, Tensor};

type OnnxPlan = tract_onnx::prelude::SimplePlan<
    tract_onnx::prelude::TypedFact,
    Box<dyn tract_onnx::prelude::TypedOp>,
    tract_onnx::prelude::Graph<
        tract_onnx::prelude::TypedFact,
        Box<dyn tract_onnx::prelude::TypedOp>,
    >,
>;

pub struct OnnxBackend {
    plan: Arc<OnnxPlan>,
}

impl OnnxBackend {
    /// Load the ONNX artifact. A missing or malformed file is a fatal
    /// initialization error, never a silent fallback.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ClassifierError::ModelLoad(format!(
                "model file not found: {}",
                path.display()
            )));
        }

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                ClassifierError::ModelLoad(format!("{}: {}", path.display(), e))
            })?;

        debug!(path = %path.display(), "ONNX persona model loaded");
        Ok(Self {
            plan: Arc::new(plan),
        })
    }
}

impl InferenceBackend for OnnxBackend {
    fn class_probabilities(
        &self,
        features: &[f64; FeatureVector::NUM_FEATURES],
    ) -> Result<Vec<f64>> {
        // Single-row batch in model input order.
        let input_tensor = tract_onnx::prelude::tract_ndarray::Array2::from_shape_fn(
            (1, FeatureVector::NUM_FEATURES),
            |(_, j)| features[j] as f32,
        );

        let input_tensor: Tensor = input_tensor.into_dyn().into();
        let input = tract_onnx::prelude::tvec![input_tensor.into()];
        let output = self
            .plan
            .run(input)
            .map_err(|e| ClassifierError::Inference(format!("ONNX inference failed: {}", e)))?;

        let probabilities = output[0]
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("output extraction failed: {}", e)))?;

        Ok(probabilities.iter().map(|p| *p as f64).collect())
    }
}
