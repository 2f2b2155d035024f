// ============================================
// Logic Guardrails
// ============================================
//
// Deterministic pedagogical rules layered on top of the model prediction.
// Three override rules run in fixed priority order and are mutually
// exclusive (each matches a different original persona); two flag rules run
// independently and never change the classification. Confidence always
// passes through unchanged.

use crate::models::{
    ClassificationResult, FeatureVector, GuardrailFlags, GuardrailOverride, GuardrailResult,
    LearningPersona,
};
use tracing::warn;

/// Auxiliary signals the rules need beyond the feature vector.
#[derive(Debug, Clone, Default)]
pub struct GuardrailContext {
    /// Quiz score in [0, 100], when the caller supplied one.
    pub quiz_score: Option<f64>,
    /// Previous classification, for trend-sensitive rules.
    pub previous_persona: Option<LearningPersona>,
    /// Unique materials viewed over the analysis window.
    pub total_materials_viewed: u32,
    /// Average seconds spent per material view.
    pub avg_time_per_material: f64,
}

/// Pedagogical rules for classification override.
#[derive(Debug, Clone, Default)]
pub struct LogicGuardrails;

impl LogicGuardrails {
    // Override thresholds. All comparisons are strict: boundary values do
    // not trigger.
    const MASTER_MIN_QUIZ_SCORE: f64 = 50.0;
    const DEEP_DIVER_MIN_MATERIALS: u32 = 3;
    const SKIMMER_MAX_TIME_PER_MATERIAL: f64 = 300.0;

    // Flag thresholds.
    const ANXIOUS_LATE_NIGHT_THRESHOLD: f64 = 0.5;
    const ANXIOUS_SESSION_FREQUENCY_THRESHOLD: f64 = 0.3;
    const BURNOUT_DECLINING_THRESHOLD: f64 = 0.25;

    pub fn new() -> Self {
        Self
    }

    /// Apply the rules to a raw classification.
    pub fn apply(
        &self,
        prediction: &ClassificationResult,
        features: &FeatureVector,
        context: &GuardrailContext,
    ) -> GuardrailResult {
        // First matching override wins; the rest are skipped.
        let override_info = self
            .check_master_override(prediction, context)
            .or_else(|| self.check_deep_diver_override(prediction, context))
            .or_else(|| self.check_skimmer_reconsideration(prediction, context));

        let final_persona = match &override_info {
            Some(info) => {
                warn!(
                    original_persona = %info.original_persona,
                    final_persona = %info.final_persona,
                    rule = %info.rule_triggered,
                    "guardrail override"
                );
                info.final_persona
            }
            None => prediction.persona,
        };
        let was_overridden = override_info.is_some();

        let mut flag_reasons = Vec::new();

        let potential_anxious = self.check_anxious(features, &mut flag_reasons);
        let potential_burnout =
            self.check_burnout(features, context.previous_persona, &mut flag_reasons);

        let flags = GuardrailFlags {
            potential_anxious,
            potential_burnout,
            needs_attention: potential_anxious || potential_burnout || was_overridden,
            flag_reasons,
        };

        GuardrailResult {
            persona: final_persona,
            confidence: prediction.confidence,
            was_overridden,
            override_info,
            flags,
        }
    }

    /// Master with a failing quiz score is reclassified as Struggler.
    fn check_master_override(
        &self,
        prediction: &ClassificationResult,
        context: &GuardrailContext,
    ) -> Option<GuardrailOverride> {
        if prediction.persona != LearningPersona::Master {
            return None;
        }
        let quiz_score = context.quiz_score?;
        if quiz_score < Self::MASTER_MIN_QUIZ_SCORE {
            return Some(GuardrailOverride {
                original_persona: LearningPersona::Master,
                final_persona: LearningPersona::Struggler,
                rule_triggered: "master_low_quiz_score".to_string(),
                reason: format!(
                    "Quiz score ({:.1}%) is below {}% threshold for Master classification",
                    quiz_score,
                    Self::MASTER_MIN_QUIZ_SCORE
                ),
            });
        }
        None
    }

    /// Deep Diver with almost no materials viewed is really Lost.
    fn check_deep_diver_override(
        &self,
        prediction: &ClassificationResult,
        context: &GuardrailContext,
    ) -> Option<GuardrailOverride> {
        if prediction.persona != LearningPersona::DeepDiver {
            return None;
        }
        if context.total_materials_viewed < Self::DEEP_DIVER_MIN_MATERIALS {
            return Some(GuardrailOverride {
                original_persona: LearningPersona::DeepDiver,
                final_persona: LearningPersona::Lost,
                rule_triggered: "deep_diver_low_material_count".to_string(),
                reason: format!(
                    "Total materials viewed ({}) is below {} minimum for Deep Diver classification",
                    context.total_materials_viewed,
                    Self::DEEP_DIVER_MIN_MATERIALS
                ),
            });
        }
        None
    }

    /// Skimmer spending long stretches per material reads as Deep Diver.
    fn check_skimmer_reconsideration(
        &self,
        prediction: &ClassificationResult,
        context: &GuardrailContext,
    ) -> Option<GuardrailOverride> {
        if prediction.persona != LearningPersona::Skimmer {
            return None;
        }
        if context.avg_time_per_material > Self::SKIMMER_MAX_TIME_PER_MATERIAL {
            return Some(GuardrailOverride {
                original_persona: LearningPersona::Skimmer,
                final_persona: LearningPersona::DeepDiver,
                rule_triggered: "skimmer_high_time_per_material".to_string(),
                reason: format!(
                    "Average time per material ({:.0}s) exceeds {}s, reconsidering classification",
                    context.avg_time_per_material,
                    Self::SKIMMER_MAX_TIME_PER_MATERIAL
                ),
            });
        }
        None
    }

    fn check_anxious(&self, features: &FeatureVector, reasons: &mut Vec<String>) -> bool {
        if features.late_night_ratio > Self::ANXIOUS_LATE_NIGHT_THRESHOLD
            && features.session_frequency > Self::ANXIOUS_SESSION_FREQUENCY_THRESHOLD
        {
            reasons.push(format!(
                "High late-night activity ({:.0}%) combined with frequent sessions indicates potential anxiety",
                features.late_night_ratio * 100.0
            ));
            return true;
        }
        false
    }

    fn check_burnout(
        &self,
        features: &FeatureVector,
        previous_persona: Option<LearningPersona>,
        reasons: &mut Vec<String>,
    ) -> bool {
        let is_declining = features.engagement_trend_encoded < Self::BURNOUT_DECLINING_THRESHOLD;
        if is_declining && previous_persona == Some(LearningPersona::Master) {
            reasons.push(
                "Declining engagement trend from previous Master classification indicates potential burnout"
                    .to_string(),
            );
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn prediction(persona: LearningPersona, confidence: f64) -> ClassificationResult {
        ClassificationResult {
            persona,
            confidence,
            probabilities: HashMap::new(),
            is_low_confidence: confidence < 0.5,
        }
    }

    fn guardrails() -> LogicGuardrails {
        LogicGuardrails::new()
    }

    #[test]
    fn master_with_failing_quiz_becomes_struggler() {
        let context = GuardrailContext {
            quiz_score: Some(40.0),
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::Master, 0.9),
            &FeatureVector::default(),
            &context,
        );

        assert_eq!(result.persona, LearningPersona::Struggler);
        assert!(result.was_overridden);
        let info = result.override_info.unwrap();
        assert_eq!(info.rule_triggered, "master_low_quiz_score");
        assert_eq!(info.original_persona, LearningPersona::Master);
        assert!(info.reason.contains("40.0"));
        // Confidence is never adjusted by guardrails.
        assert!((result.confidence - 0.9).abs() < 1e-12);
        assert!(result.flags.needs_attention);
    }

    #[test]
    fn master_boundary_quiz_score_does_not_override() {
        let context = GuardrailContext {
            quiz_score: Some(50.0),
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::Master, 0.8),
            &FeatureVector::default(),
            &context,
        );
        assert_eq!(result.persona, LearningPersona::Master);
        assert!(!result.was_overridden);
        assert!(result.override_info.is_none());
    }

    #[test]
    fn master_without_quiz_score_is_untouched() {
        let result = guardrails().apply(
            &prediction(LearningPersona::Master, 0.8),
            &FeatureVector::default(),
            &GuardrailContext::default(),
        );
        assert!(!result.was_overridden);
    }

    #[test]
    fn deep_diver_with_two_materials_becomes_lost() {
        let context = GuardrailContext {
            total_materials_viewed: 2,
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::DeepDiver, 0.7),
            &FeatureVector::default(),
            &context,
        );

        assert_eq!(result.persona, LearningPersona::Lost);
        assert_eq!(
            result.override_info.unwrap().rule_triggered,
            "deep_diver_low_material_count"
        );
        assert!((result.confidence - 0.7).abs() < 1e-12);
    }

    #[test]
    fn deep_diver_with_three_materials_is_untouched() {
        let context = GuardrailContext {
            total_materials_viewed: 3,
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::DeepDiver, 0.7),
            &FeatureVector::default(),
            &context,
        );
        assert!(!result.was_overridden);
    }

    #[test]
    fn skimmer_with_long_dwell_time_becomes_deep_diver() {
        let context = GuardrailContext {
            avg_time_per_material: 450.0,
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::Skimmer, 0.6),
            &FeatureVector::default(),
            &context,
        );

        assert_eq!(result.persona, LearningPersona::DeepDiver);
        assert_eq!(
            result.override_info.unwrap().rule_triggered,
            "skimmer_high_time_per_material"
        );
    }

    #[test]
    fn skimmer_boundary_dwell_time_does_not_override() {
        let context = GuardrailContext {
            avg_time_per_material: 300.0,
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::Skimmer, 0.6),
            &FeatureVector::default(),
            &context,
        );
        assert!(!result.was_overridden);
    }

    #[test]
    fn at_most_one_override_fires() {
        // Conditions for all three rules hold at once, but persona matches
        // only the master rule.
        let context = GuardrailContext {
            quiz_score: Some(10.0),
            total_materials_viewed: 0,
            avg_time_per_material: 1000.0,
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::Master, 0.9),
            &FeatureVector::default(),
            &context,
        );
        assert_eq!(result.persona, LearningPersona::Struggler);
        assert_eq!(
            result.override_info.unwrap().rule_triggered,
            "master_low_quiz_score"
        );
    }

    #[test]
    fn both_flags_fire_independently() {
        let features = FeatureVector {
            late_night_ratio: 0.6,
            session_frequency: 0.5,
            engagement_trend_encoded: 0.0,
            ..FeatureVector::default()
        };
        let context = GuardrailContext {
            previous_persona: Some(LearningPersona::Master),
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::Procrastinator, 0.6),
            &features,
            &context,
        );

        assert!(result.flags.potential_anxious);
        assert!(result.flags.potential_burnout);
        assert!(result.flags.needs_attention);
        assert_eq!(result.flags.flag_reasons.len(), 2);
        assert!(!result.was_overridden);
        assert_eq!(result.persona, LearningPersona::Procrastinator);
    }

    #[test]
    fn flag_boundaries_are_strict() {
        // late_night_ratio exactly at threshold must not flag.
        let features = FeatureVector {
            late_night_ratio: 0.5,
            session_frequency: 0.5,
            ..FeatureVector::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::Lost, 0.6),
            &features,
            &GuardrailContext::default(),
        );
        assert!(!result.flags.potential_anxious);

        // engagement_trend_encoded exactly at threshold must not flag.
        let features = FeatureVector {
            engagement_trend_encoded: 0.25,
            ..FeatureVector::default()
        };
        let context = GuardrailContext {
            previous_persona: Some(LearningPersona::Master),
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::Lost, 0.6),
            &features,
            &context,
        );
        assert!(!result.flags.potential_burnout);
        assert!(!result.flags.needs_attention);
    }

    #[test]
    fn burnout_requires_previous_master() {
        let features = FeatureVector {
            engagement_trend_encoded: 0.0,
            ..FeatureVector::default()
        };
        let context = GuardrailContext {
            previous_persona: Some(LearningPersona::Skimmer),
            ..GuardrailContext::default()
        };
        let result = guardrails().apply(
            &prediction(LearningPersona::Lost, 0.6),
            &features,
            &context,
        );
        assert!(!result.flags.potential_burnout);
    }
}
