pub mod classifier;
pub mod features;
pub mod guardrails;
pub mod prediction;
pub mod recommendations;

pub use classifier::PersonaClassifier;
pub use features::FeatureExtractor;
pub use guardrails::LogicGuardrails;
pub use prediction::PredictionService;
pub use recommendations::RecommendationEngine;
