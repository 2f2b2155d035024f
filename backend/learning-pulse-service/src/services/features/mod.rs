// ============================================
// Feature Extractor
// ============================================
//
// Transforms raw behavior aggregates into the normalized 25-feature vector
// consumed by the persona model:
// 1. Chat features (message ratios, feedback, sessions)
// 2. Material features (time spent, diversity, bookmarks, scroll depth)
// 3. Activity features (cadence, consistency, late-night/weekend patterns)
// 4. Quiz features (score, completion, attempt frequency)
//
// Extraction never fails: every division-by-zero path resolves to a policy
// default (0.5 for ratio features, 0.0 for count features).

pub mod summary;

pub use summary::summarize;

use crate::models::{BehaviorData, EngagementTrend, FeatureVector};
use crate::utils::{normalize, safe_divide};
use tracing::debug;

/// Extracts and normalizes features from behavior data.
///
/// All outputs are bounded to [0, 1]. Sub-counts in the input are not
/// guaranteed to respect their totals, so every derived ratio is capped.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    // Normalization ceilings for min-max scaling.
    const MAX_MESSAGE_LENGTH: f64 = 500.0;
    const MAX_SESSIONS: f64 = 100.0;
    const MAX_MESSAGES_PER_SESSION: f64 = 20.0;
    const MAX_SESSION_DURATION_MINUTES: f64 = 600.0;
    const MAX_TIME_SPENT_SECONDS: f64 = 36_000.0;
    const MAX_VIEWS: f64 = 200.0;
    const MAX_TIME_PER_VIEW_SECONDS: f64 = 600.0;
    const MAX_SESSIONS_PER_DAY: f64 = 10.0;
    const MAX_VARIANCE: f64 = 10.0;
    const MAX_QUIZ_ATTEMPTS: f64 = 50.0;

    pub fn new() -> Self {
        Self
    }

    /// Extract the normalized feature vector for one user.
    pub fn extract(&self, data: &BehaviorData) -> FeatureVector {
        let vector = FeatureVector {
            // Chat features (8)
            chat_message_ratio: safe_divide(
                data.chat.user_messages as f64,
                data.chat.total_messages as f64,
                0.5,
            ),
            question_frequency: safe_divide(
                data.chat.question_count as f64,
                data.chat.user_messages as f64,
                0.0,
            )
            .min(1.0),
            avg_message_length_norm: normalize(
                data.chat.avg_message_length,
                Self::MAX_MESSAGE_LENGTH,
            ),
            feedback_ratio: self.feedback_ratio(data),
            feedback_engagement: self.feedback_engagement(data),
            session_count_norm: normalize(data.chat.unique_sessions as f64, Self::MAX_SESSIONS),
            messages_per_session: normalize(
                safe_divide(
                    data.chat.total_messages as f64,
                    data.chat.unique_sessions as f64,
                    0.0,
                ),
                Self::MAX_MESSAGES_PER_SESSION,
            ),
            session_duration_norm: normalize(
                data.chat.total_session_duration_minutes,
                Self::MAX_SESSION_DURATION_MINUTES,
            ),

            // Material features (7)
            time_spent_norm: self.time_spent_norm(data),
            view_count_norm: normalize(data.material.total_views as f64, Self::MAX_VIEWS),
            material_diversity: safe_divide(
                data.material.unique_materials_viewed as f64,
                data.material.total_views as f64,
                0.0,
            )
            .min(1.0),
            avg_time_per_view_norm: normalize(
                safe_divide(
                    data.material.total_time_spent_seconds as f64,
                    data.material.total_views as f64,
                    0.0,
                ),
                Self::MAX_TIME_PER_VIEW_SECONDS,
            ),
            bookmark_ratio: self.bookmark_ratio(data),
            scroll_depth: data.material.avg_scroll_depth.clamp(0.0, 1.0),
            material_engagement_score: self.material_engagement_score(data),

            // Activity features (7)
            active_days_ratio: safe_divide(
                data.activity.active_days as f64,
                data.analysis_period_days as f64,
                0.0,
            )
            .min(1.0),
            session_frequency: normalize(
                safe_divide(
                    data.activity.total_sessions as f64,
                    data.activity.active_days as f64,
                    0.0,
                ),
                Self::MAX_SESSIONS_PER_DAY,
            ),
            consistency_score: (1.0
                - normalize(data.activity.daily_activity_variance, Self::MAX_VARIANCE))
            .clamp(0.0, 1.0),
            late_night_ratio: safe_divide(
                data.activity.late_night_sessions as f64,
                data.activity.total_sessions as f64,
                0.0,
            )
            .min(1.0),
            weekend_ratio: safe_divide(
                data.activity.weekend_sessions as f64,
                data.activity.total_sessions as f64,
                0.0,
            )
            .min(1.0),
            peak_hour_norm: self.peak_hour_norm(data),
            engagement_trend_encoded: match self.engagement_trend(data) {
                EngagementTrend::Declining => 0.0,
                EngagementTrend::Stable => 0.5,
                EngagementTrend::Increasing => 1.0,
            },

            // Quiz features (3)
            quiz_score_norm: self.quiz_score_norm(data),
            quiz_completion_norm: self.quiz_completion_norm(data),
            quiz_attempt_frequency: match &data.quiz {
                Some(quiz) => normalize(quiz.quiz_attempts as f64, Self::MAX_QUIZ_ATTEMPTS),
                None => 0.0,
            },
        };

        debug!(user_id = %data.user_id, "extracted feature vector");
        vector
    }

    /// Classify the engagement trend from activity cadence.
    ///
    /// Two independent counters accumulate declining and increasing signals;
    /// the first to reach 2 wins, otherwise the trend is stable. A user with
    /// no sessions at all is stable by definition.
    pub fn engagement_trend(&self, data: &BehaviorData) -> EngagementTrend {
        let activity = &data.activity;

        if activity.total_sessions == 0 {
            return EngagementTrend::Stable;
        }

        // Raw sessions per active day, deliberately unnormalized.
        let session_frequency = safe_divide(
            activity.total_sessions as f64,
            activity.active_days as f64,
            0.0,
        );
        let active_days_ratio = safe_divide(
            activity.active_days as f64,
            data.analysis_period_days as f64,
            0.0,
        );
        let late_night_ratio = safe_divide(
            activity.late_night_sessions as f64,
            activity.total_sessions as f64,
            0.0,
        );

        let mut declining_score = 0u32;
        let mut increasing_score = 0u32;

        if activity.daily_activity_variance > 5.0 {
            declining_score += 1;
        } else if activity.daily_activity_variance < 2.0 {
            increasing_score += 1;
        }

        if active_days_ratio < 0.3 && activity.total_sessions > 0 {
            declining_score += 1;
        } else if active_days_ratio > 0.6 {
            increasing_score += 1;
        }

        if session_frequency > 2.0 {
            increasing_score += 1;
        } else if session_frequency < 0.5 && activity.active_days > 0 {
            declining_score += 1;
        }

        // Heavy late-night activity reads as a stress signal.
        if late_night_ratio > 0.4 {
            declining_score += 1;
        }

        if declining_score >= 2 {
            EngagementTrend::Declining
        } else if increasing_score >= 2 {
            EngagementTrend::Increasing
        } else {
            EngagementTrend::Stable
        }
    }

    fn feedback_ratio(&self, data: &BehaviorData) -> f64 {
        let total_feedback = (data.chat.thumbs_up_count + data.chat.thumbs_down_count) as f64;
        safe_divide(data.chat.thumbs_up_count as f64, total_feedback, 0.5)
    }

    fn feedback_engagement(&self, data: &BehaviorData) -> f64 {
        let total_feedback = (data.chat.thumbs_up_count + data.chat.thumbs_down_count) as f64;
        safe_divide(total_feedback, data.chat.total_messages as f64, 0.0).min(1.0)
    }

    fn time_spent_norm(&self, data: &BehaviorData) -> f64 {
        normalize(
            data.material.total_time_spent_seconds as f64,
            Self::MAX_TIME_SPENT_SECONDS,
        )
    }

    fn bookmark_ratio(&self, data: &BehaviorData) -> f64 {
        safe_divide(
            data.material.bookmark_count as f64,
            data.material.total_views as f64,
            0.0,
        )
        .min(1.0)
    }

    /// Composite engagement metric: 40% time spent, 40% scroll depth,
    /// 20% bookmarking.
    fn material_engagement_score(&self, data: &BehaviorData) -> f64 {
        let score = 0.4 * self.time_spent_norm(data)
            + 0.4 * data.material.avg_scroll_depth.clamp(0.0, 1.0)
            + 0.2 * self.bookmark_ratio(data);
        score.clamp(0.0, 1.0)
    }

    fn peak_hour_norm(&self, data: &BehaviorData) -> f64 {
        if data.activity.peak_hour > 23 {
            1.0
        } else {
            (data.activity.peak_hour as f64 / 23.0).clamp(0.0, 1.0)
        }
    }

    fn quiz_score_norm(&self, data: &BehaviorData) -> f64 {
        match &data.quiz {
            // Zero attempts means no signal, not a zero score.
            Some(quiz) if quiz.quiz_attempts > 0 => (quiz.avg_score / 100.0).clamp(0.0, 1.0),
            _ => 0.5,
        }
    }

    fn quiz_completion_norm(&self, data: &BehaviorData) -> f64 {
        match &data.quiz {
            Some(quiz) if quiz.quiz_attempts > 0 => quiz.completion_rate.clamp(0.0, 1.0),
            _ => 0.5,
        }
    }
}
