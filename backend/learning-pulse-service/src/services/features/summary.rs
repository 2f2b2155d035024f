//! Human-readable feature summary for response transparency.
//!
//! Buckets composite engagement scores into low/medium/high and surfaces the
//! single-feature signals worth a teacher's attention.

use crate::models::{FeatureSummary, FeatureVector};

const LOW_BUCKET: f64 = 0.33;
const MEDIUM_BUCKET: f64 = 0.66;

fn bucket(score: f64) -> &'static str {
    if score < LOW_BUCKET {
        "low"
    } else if score < MEDIUM_BUCKET {
        "medium"
    } else {
        "high"
    }
}

/// Summarize a feature vector into categorical buckets and key indicators.
pub fn summarize(features: &FeatureVector) -> FeatureSummary {
    let chat_score = features.chat_message_ratio * 0.3
        + features.messages_per_session * 0.3
        + features.session_count_norm * 0.2
        + features.feedback_engagement * 0.2;

    let material_score = features.time_spent_norm * 0.3
        + features.view_count_norm * 0.2
        + features.scroll_depth * 0.3
        + features.material_engagement_score * 0.2;

    let mut key_indicators = Vec::new();

    if features.question_frequency > 0.7 {
        key_indicators.push("High question frequency in chat".to_string());
    }
    if features.late_night_ratio > 0.5 {
        key_indicators.push("Significant late-night activity".to_string());
    }
    if features.scroll_depth > 0.8 {
        key_indicators.push("Thorough material reading".to_string());
    }
    if features.scroll_depth < 0.3 {
        key_indicators.push("Quick material scanning".to_string());
    }
    if features.engagement_trend_encoded < 0.25 {
        key_indicators.push("Declining engagement trend".to_string());
    } else if features.engagement_trend_encoded > 0.75 {
        key_indicators.push("Increasing engagement trend".to_string());
    }
    if features.bookmark_ratio > 0.5 {
        key_indicators.push("Active bookmarking behavior".to_string());
    }
    if features.quiz_score_norm > 0.8 {
        key_indicators.push("Strong quiz performance".to_string());
    } else if features.quiz_score_norm < 0.4 && features.quiz_attempt_frequency > 0.1 {
        key_indicators.push("Struggling with quizzes".to_string());
    }
    if features.active_days_ratio > 0.7 {
        key_indicators.push("Consistent daily activity".to_string());
    } else if features.active_days_ratio < 0.2 {
        key_indicators.push("Sporadic activity pattern".to_string());
    }

    FeatureSummary {
        chat_engagement: bucket(chat_score).to_string(),
        material_consumption: bucket(material_score).to_string(),
        activity_consistency: bucket(features.consistency_score).to_string(),
        key_indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(bucket(0.0), "low");
        assert_eq!(bucket(0.32), "low");
        assert_eq!(bucket(0.33), "medium");
        assert_eq!(bucket(0.65), "medium");
        assert_eq!(bucket(0.66), "high");
        assert_eq!(bucket(1.0), "high");
    }

    #[test]
    fn quiet_user_summarizes_low() {
        let features = FeatureVector {
            chat_message_ratio: 0.0,
            messages_per_session: 0.0,
            session_count_norm: 0.0,
            feedback_engagement: 0.0,
            time_spent_norm: 0.0,
            view_count_norm: 0.0,
            scroll_depth: 0.5,
            material_engagement_score: 0.2,
            consistency_score: 0.2,
            ..FeatureVector::default()
        };
        let summary = summarize(&features);
        assert_eq!(summary.chat_engagement, "low");
        assert_eq!(summary.material_consumption, "low");
        assert_eq!(summary.activity_consistency, "low");
    }

    #[test]
    fn key_indicators_fire_on_thresholds() {
        let features = FeatureVector {
            question_frequency: 0.8,
            late_night_ratio: 0.6,
            scroll_depth: 0.9,
            engagement_trend_encoded: 0.0,
            bookmark_ratio: 0.6,
            quiz_score_norm: 0.9,
            active_days_ratio: 0.8,
            ..FeatureVector::default()
        };
        let summary = summarize(&features);
        assert!(summary
            .key_indicators
            .contains(&"High question frequency in chat".to_string()));
        assert!(summary
            .key_indicators
            .contains(&"Significant late-night activity".to_string()));
        assert!(summary
            .key_indicators
            .contains(&"Thorough material reading".to_string()));
        assert!(summary
            .key_indicators
            .contains(&"Declining engagement trend".to_string()));
        assert!(summary
            .key_indicators
            .contains(&"Active bookmarking behavior".to_string()));
        assert!(summary
            .key_indicators
            .contains(&"Strong quiz performance".to_string()));
        assert!(summary
            .key_indicators
            .contains(&"Consistent daily activity".to_string()));
    }

    #[test]
    fn struggling_quiz_needs_real_attempts() {
        let features = FeatureVector {
            quiz_score_norm: 0.2,
            quiz_attempt_frequency: 0.0,
            ..FeatureVector::default()
        };
        // Low score without attempts is no signal at all.
        let summary = summarize(&features);
        assert!(!summary
            .key_indicators
            .contains(&"Struggling with quizzes".to_string()));

        let features = FeatureVector {
            quiz_score_norm: 0.2,
            quiz_attempt_frequency: 0.2,
            ..FeatureVector::default()
        };
        let summary = summarize(&features);
        assert!(summary
            .key_indicators
            .contains(&"Struggling with quizzes".to_string()));
    }

    #[test]
    fn near_neutral_vector_has_no_indicators() {
        let features = FeatureVector {
            active_days_ratio: 0.5,
            ..FeatureVector::default()
        };
        let summary = summarize(&features);
        assert!(
            summary.key_indicators.is_empty(),
            "unexpected indicators: {:?}",
            summary.key_indicators
        );
    }
}
