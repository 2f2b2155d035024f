// ============================================
// Prediction Service
// ============================================
//
// Orchestrates the full pipeline: feature extraction, model classification,
// guardrail correction, recommendation lookup and feature summarization.

use std::time::Instant;

use tracing::{info, warn};

use crate::models::{LearningPersona, PredictRequest, PredictResponse};
use crate::services::classifier::{PersonaClassifier, Result};
use crate::services::features::{summarize, FeatureExtractor};
use crate::services::guardrails::{GuardrailContext, LogicGuardrails};
use crate::services::recommendations::RecommendationEngine;

pub struct PredictionService {
    extractor: FeatureExtractor,
    classifier: PersonaClassifier,
    guardrails: LogicGuardrails,
    recommendations: RecommendationEngine,
}

impl PredictionService {
    pub fn new(classifier: PersonaClassifier) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            classifier,
            guardrails: LogicGuardrails::new(),
            recommendations: RecommendationEngine::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.classifier.is_loaded()
    }

    pub fn model_version(&self) -> &str {
        self.classifier.model_version()
    }

    pub fn last_training_date(&self) -> &str {
        self.classifier.last_training_date()
    }

    /// Runs the pipeline end to end for a single user.
    pub fn predict(&self, request: &PredictRequest) -> Result<PredictResponse> {
        let started = Instant::now();

        let features = self.extractor.extract(&request.behavior_data);
        let classification = self.classifier.predict(&features)?;

        let context = Self::guardrail_context(request);
        let result = self
            .guardrails
            .apply(&classification, &features, &context);

        let bundle = self.recommendations.recommendations_for(result.persona);
        let feature_summary = summarize(&features);

        let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        info!(
            user_id = %request.user_id,
            persona = %result.persona,
            confidence = classification.confidence,
            was_overridden = result.was_overridden,
            processing_time_ms,
            "persona prediction complete"
        );

        Ok(PredictResponse {
            user_id: request.user_id.clone(),
            persona: result.persona.as_str().to_string(),
            confidence: result.confidence,
            is_low_confidence: classification.is_low_confidence,
            recommendations: bundle.recommendations,
            feature_summary,
            override_info: result.override_info,
            flags: result.flags.flag_reasons,
            processing_time_ms,
        })
    }

    fn guardrail_context(request: &PredictRequest) -> GuardrailContext {
        let material = &request.behavior_data.material;
        let avg_time_per_material = if material.total_views > 0 {
            material.total_time_spent_seconds as f64 / material.total_views as f64
        } else {
            0.0
        };

        // Unknown previous personas are tolerated: they only weaken
        // trend-sensitive rules, never fail the request.
        let previous_persona = request.previous_persona.as_deref().and_then(|raw| {
            match raw.parse::<LearningPersona>() {
                Ok(persona) => Some(persona),
                Err(_) => {
                    warn!(previous_persona = raw, "ignoring unknown previous persona");
                    None
                }
            }
        });

        GuardrailContext {
            quiz_score: request.quiz_score,
            previous_persona,
            total_materials_viewed: material.unique_materials_viewed,
            avg_time_per_material,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BehaviorData, FeatureVector, MaterialInteraction};
    use crate::services::classifier::{InferenceBackend, ModelMetadata};

    struct FixedBackend(Vec<f64>);

    impl InferenceBackend for FixedBackend {
        fn class_probabilities(
            &self,
            _features: &[f64; FeatureVector::NUM_FEATURES],
        ) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    fn service_with_distribution(probabilities: [f64; 10]) -> PredictionService {
        let classifier = PersonaClassifier::with_backend(
            Box::new(FixedBackend(probabilities.to_vec())),
            ModelMetadata::default(),
        );
        PredictionService::new(classifier)
    }

    fn request(behavior_data: BehaviorData) -> PredictRequest {
        PredictRequest {
            user_id: behavior_data.user_id.clone(),
            behavior_data,
            quiz_score: None,
            previous_persona: None,
        }
    }

    #[test]
    fn pipeline_produces_consistent_response() {
        // Index 4 is master in the canonical order.
        let mut probabilities = [0.02; 10];
        probabilities[4] = 0.82;
        let service = service_with_distribution(probabilities);

        let response = service.predict(&request(BehaviorData::new("u1"))).unwrap();

        assert_eq!(response.persona, "master");
        assert!((response.confidence - 0.82).abs() < 1e-9);
        assert!(!response.is_low_confidence);
        assert!(response.recommendations.len() >= 4);
        assert!(response.override_info.is_none());
        assert!(response.processing_time_ms >= 0.0);
    }

    #[test]
    fn override_switches_recommendations_but_not_confidence() {
        let mut probabilities = [0.02; 10];
        probabilities[4] = 0.82;
        let service = service_with_distribution(probabilities);

        let mut req = request(BehaviorData::new("u2"));
        req.quiz_score = Some(40.0);

        let response = service.predict(&req).unwrap();

        assert_eq!(response.persona, "struggler");
        assert!((response.confidence - 0.82).abs() < 1e-9);
        let info = response.override_info.expect("override must be recorded");
        assert_eq!(info.original_persona, LearningPersona::Master);
        assert_eq!(info.final_persona, LearningPersona::Struggler);
        assert!(response
            .recommendations
            .iter()
            .all(|r| r.id.starts_with("struggler_")));
    }

    #[test]
    fn derived_context_uses_behavior_data() {
        // Index 6 is deep_diver; two unique materials force a lost override.
        let mut probabilities = [0.02; 10];
        probabilities[6] = 0.82;
        let service = service_with_distribution(probabilities);

        let mut data = BehaviorData::new("u3");
        data.material = MaterialInteraction {
            total_time_spent_seconds: 1200,
            total_views: 4,
            unique_materials_viewed: 2,
            bookmark_count: 0,
            avg_scroll_depth: 0.5,
        };

        let response = service.predict(&request(data)).unwrap();
        assert_eq!(response.persona, "lost");
    }

    #[test]
    fn unknown_previous_persona_is_ignored() {
        let mut probabilities = [0.02; 10];
        probabilities[0] = 0.82;
        let service = service_with_distribution(probabilities);

        let mut req = request(BehaviorData::new("u4"));
        req.previous_persona = Some("night_owl".to_string());

        let response = service.predict(&req).unwrap();
        assert_eq!(response.persona, "skimmer");
    }
}
