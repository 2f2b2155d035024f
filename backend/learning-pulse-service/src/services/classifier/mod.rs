// ============================================
// Persona Classifier
// ============================================
//
// Wraps the pre-trained persona model behind a narrow capability seam:
// a 25-feature vector in, a probability distribution over the ten personas
// out. The production backend runs an ONNX artifact with tract; tests inject
// a stub through the same trait.
//
// The model, scaler and metadata are loaded once at startup and treated as
// read-only for the process lifetime.

pub mod model;

use crate::models::{ClassificationResult, FeatureVector, LearningPersona};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Scaler loading failed: {0}")]
    ScalerLoad(String),

    #[error("Metadata loading failed: {0}")]
    MetadataLoad(String),

    #[error("Model not loaded")]
    NotLoaded,

    #[error("Model inference failed: {0}")]
    Inference(String),

    #[error("Model output could not be mapped to a persona: {0}")]
    UnmappedClass(String),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Confidence below this marks a prediction as low confidence.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Black-box inference capability over the fixed-order feature vector.
///
/// Implementations must return one probability per known class, in the class
/// index order of the trained model. The predicted class is derived by
/// argmax, which keeps `predict` and `predict_proba` consistent.
pub trait InferenceBackend: Send + Sync {
    fn class_probabilities(
        &self,
        features: &[f64; FeatureVector::NUM_FEATURES],
    ) -> Result<Vec<f64>>;
}

/// Pre-fitted affine feature scaler (sklearn MinMaxScaler semantics:
/// `x_scaled = x * scale + min`), persisted as JSON arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    pub scale: Vec<f64>,
    pub min: Vec<f64>,
}

impl FeatureScaler {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ClassifierError::ScalerLoad(format!("{}: {}", path.display(), e)))?;
        let scaler: FeatureScaler = serde_json::from_str(&raw)
            .map_err(|e| ClassifierError::ScalerLoad(format!("{}: {}", path.display(), e)))?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        if self.scale.len() != FeatureVector::NUM_FEATURES
            || self.min.len() != FeatureVector::NUM_FEATURES
        {
            return Err(ClassifierError::ScalerLoad(format!(
                "expected {} scale/min entries, got {}/{}",
                FeatureVector::NUM_FEATURES,
                self.scale.len(),
                self.min.len()
            )));
        }
        Ok(())
    }

    pub fn transform(&self, features: &mut [f64; FeatureVector::NUM_FEATURES]) {
        for (i, value) in features.iter_mut().enumerate() {
            *value = *value * self.scale[i] + self.min[i];
        }
    }
}

/// Side metadata persisted alongside the trained model.
#[derive(Debug, Clone, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    training_date: Option<String>,
    #[serde(default)]
    persona_names: Option<Vec<String>>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ModelMetadata {
    pub model_version: String,
    pub training_date: String,
    /// Class index → persona, in the model's internal class order.
    pub persona_index: Vec<LearningPersona>,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            model_version: "0.0.0".to_string(),
            training_date: "unknown".to_string(),
            persona_index: LearningPersona::ALL.to_vec(),
        }
    }
}

impl ModelMetadata {
    /// Load and validate metadata. Every `persona_names` entry must resolve
    /// to a known persona, and `feature_names` (when present) must match the
    /// extractor's field order exactly.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ClassifierError::MetadataLoad(format!("{}: {}", path.display(), e)))?;
        let raw: RawMetadata = serde_json::from_str(&raw)
            .map_err(|e| ClassifierError::MetadataLoad(format!("{}: {}", path.display(), e)))?;

        let persona_index = match raw.persona_names {
            Some(names) => names
                .iter()
                .map(|name| {
                    name.parse::<LearningPersona>().map_err(|_| {
                        ClassifierError::MetadataLoad(format!(
                            "persona_names contains unknown persona '{}'",
                            name
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => LearningPersona::ALL.to_vec(),
        };

        if let Some(feature_names) = &raw.feature_names {
            let order_matches = feature_names.len() == FeatureVector::NUM_FEATURES
                && feature_names
                    .iter()
                    .zip(FeatureVector::FEATURE_NAMES.iter())
                    .all(|(actual, expected)| actual == expected);
            if !order_matches {
                return Err(ClassifierError::MetadataLoad(
                    "feature_names does not match the extractor's feature order".to_string(),
                ));
            }
        }

        Ok(Self {
            model_version: raw.model_version.unwrap_or_else(|| "0.0.0".to_string()),
            training_date: raw.training_date.unwrap_or_else(|| "unknown".to_string()),
            persona_index,
        })
    }
}

/// Persona classifier: scaling, inference, and class-index resolution.
pub struct PersonaClassifier {
    backend: Option<Box<dyn InferenceBackend>>,
    scaler: Option<FeatureScaler>,
    metadata: ModelMetadata,
}

impl PersonaClassifier {
    /// Load the classifier from its on-disk artifacts.
    ///
    /// A missing or unreadable model file aborts initialization. A missing
    /// scaler or metadata file degrades gracefully (unscaled input, default
    /// metadata); an unreadable one is still a load error.
    pub fn load(model_path: &Path, scaler_path: &Path, metadata_path: &Path) -> Result<Self> {
        let backend = model::OnnxBackend::load(model_path)?;
        info!(path = %model_path.display(), "persona model loaded");

        let scaler = if scaler_path.exists() {
            let scaler = FeatureScaler::from_file(scaler_path)?;
            info!(path = %scaler_path.display(), "feature scaler loaded");
            Some(scaler)
        } else {
            warn!(
                path = %scaler_path.display(),
                "scaler file not found, using unscaled features"
            );
            None
        };

        let metadata = if metadata_path.exists() {
            let metadata = ModelMetadata::from_file(metadata_path)?;
            info!(
                version = %metadata.model_version,
                training_date = %metadata.training_date,
                "model metadata loaded"
            );
            metadata
        } else {
            warn!(
                path = %metadata_path.display(),
                "metadata file not found, using defaults"
            );
            ModelMetadata::default()
        };

        Ok(Self {
            backend: Some(Box::new(backend)),
            scaler,
            metadata,
        })
    }

    /// Build a classifier from an already-constructed backend. Used by tests
    /// and by callers that wrap an external inference service.
    pub fn with_backend(backend: Box<dyn InferenceBackend>, metadata: ModelMetadata) -> Self {
        Self {
            backend: Some(backend),
            scaler: None,
            metadata,
        }
    }

    /// A classifier with no model attached. Any prediction fails with
    /// `ClassifierError::NotLoaded`.
    pub fn unloaded() -> Self {
        Self {
            backend: None,
            scaler: None,
            metadata: ModelMetadata::default(),
        }
    }

    pub fn set_scaler(&mut self, scaler: FeatureScaler) {
        self.scaler = Some(scaler);
    }

    pub fn is_loaded(&self) -> bool {
        self.backend.is_some()
    }

    pub fn model_version(&self) -> &str {
        &self.metadata.model_version
    }

    pub fn last_training_date(&self) -> &str {
        &self.metadata.training_date
    }

    /// Predict the persona for a feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<ClassificationResult> {
        let probabilities = self.raw_probabilities(features)?;

        let (best_index, best_prob) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| ClassifierError::Inference("empty probability output".to_string()))?;

        let persona = self.resolve_class(best_index)?;
        let confidence = best_prob;
        let is_low_confidence = confidence < LOW_CONFIDENCE_THRESHOLD;

        if is_low_confidence {
            warn!(
                persona = %persona,
                confidence = confidence,
                "low confidence prediction"
            );
        }

        Ok(ClassificationResult {
            persona,
            confidence,
            probabilities: self.probability_map(&probabilities),
            is_low_confidence,
        })
    }

    /// Probability distribution over all personas for a feature vector.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<HashMap<String, f64>> {
        let probabilities = self.raw_probabilities(features)?;
        Ok(self.probability_map(&probabilities))
    }

    fn raw_probabilities(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let backend = self.backend.as_ref().ok_or(ClassifierError::NotLoaded)?;

        let mut array = features.as_array();
        if let Some(scaler) = &self.scaler {
            scaler.transform(&mut array);
        }

        let probabilities = backend.class_probabilities(&array)?;
        if probabilities.len() != self.metadata.persona_index.len() {
            return Err(ClassifierError::Inference(format!(
                "expected {} class probabilities, got {}",
                self.metadata.persona_index.len(),
                probabilities.len()
            )));
        }
        Ok(probabilities)
    }

    fn resolve_class(&self, index: usize) -> Result<LearningPersona> {
        self.metadata
            .persona_index
            .get(index)
            .copied()
            .ok_or_else(|| ClassifierError::UnmappedClass(format!("class index {}", index)))
    }

    fn probability_map(&self, probabilities: &[f64]) -> HashMap<String, f64> {
        self.metadata
            .persona_index
            .iter()
            .zip(probabilities)
            .map(|(persona, prob)| (persona.as_str().to_string(), *prob))
            .collect()
    }
}
