use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================
// Personas and trends
// ============================================

/// Learning Persona classifications.
///
/// Each persona represents a distinct learning behavior pattern that helps
/// teachers understand how students engage with materials. The set is closed:
/// rule dispatch and the recommendation table match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningPersona {
    Skimmer,
    Struggler,
    Anxious,
    Burnout,
    Master,
    Procrastinator,
    DeepDiver,
    SocialLearner,
    Perfectionist,
    Lost,
}

impl LearningPersona {
    /// All personas in canonical class-index order. Index i here corresponds
    /// to model class i when no `persona_names` mapping is supplied.
    pub const ALL: [LearningPersona; 10] = [
        LearningPersona::Skimmer,
        LearningPersona::Struggler,
        LearningPersona::Anxious,
        LearningPersona::Burnout,
        LearningPersona::Master,
        LearningPersona::Procrastinator,
        LearningPersona::DeepDiver,
        LearningPersona::SocialLearner,
        LearningPersona::Perfectionist,
        LearningPersona::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningPersona::Skimmer => "skimmer",
            LearningPersona::Struggler => "struggler",
            LearningPersona::Anxious => "anxious",
            LearningPersona::Burnout => "burnout",
            LearningPersona::Master => "master",
            LearningPersona::Procrastinator => "procrastinator",
            LearningPersona::DeepDiver => "deep_diver",
            LearningPersona::SocialLearner => "social_learner",
            LearningPersona::Perfectionist => "perfectionist",
            LearningPersona::Lost => "lost",
        }
    }
}

impl fmt::Display for LearningPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningPersona {
    type Err = UnknownPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LearningPersona::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPersona(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPersona(pub String);

impl fmt::Display for UnknownPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown learning persona: {}", self.0)
    }
}

impl std::error::Error for UnknownPersona {}

/// Engagement trend over the analysis period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementTrend {
    Increasing,
    Stable,
    Declining,
}

// ============================================
// Input behavior records
// ============================================

/// Chat interaction metrics aggregated over the analysis window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatBehavior {
    pub total_messages: u32,
    pub user_messages: u32,
    pub assistant_messages: u32,
    /// Messages ending with "?"
    pub question_count: u32,
    pub avg_message_length: f64,
    pub thumbs_up_count: u32,
    pub thumbs_down_count: u32,
    pub unique_sessions: u32,
    pub total_session_duration_minutes: f64,
}

/// Material consumption metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialInteraction {
    pub total_time_spent_seconds: u64,
    pub total_views: u32,
    pub unique_materials_viewed: u32,
    pub bookmark_count: u32,
    /// Average scroll depth in [0, 1]. 0.5 = neutral default.
    pub avg_scroll_depth: f64,
}

impl Default for MaterialInteraction {
    fn default() -> Self {
        Self {
            total_time_spent_seconds: 0,
            total_views: 0,
            unique_materials_viewed: 0,
            bookmark_count: 0,
            avg_scroll_depth: 0.5,
        }
    }
}

/// Temporal activity metrics derived from interaction timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityPattern {
    pub active_days: u32,
    pub total_sessions: u32,
    /// Hour of day with most activity (0-23).
    pub peak_hour: u32,
    /// Sessions between 23:00 and 05:00.
    pub late_night_sessions: u32,
    pub weekend_sessions: u32,
    pub total_weekday_sessions: u32,
    /// Lower = more consistent day-to-day activity.
    pub daily_activity_variance: f64,
}

impl Default for ActivityPattern {
    fn default() -> Self {
        Self {
            active_days: 0,
            total_sessions: 0,
            peak_hour: 12,
            late_night_sessions: 0,
            weekend_sessions: 0,
            total_weekday_sessions: 0,
            daily_activity_variance: 0.0,
        }
    }
}

/// Quiz/assessment metrics. Absent entirely means "no quiz data", which is
/// not the same as zero-valued quiz data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizPerformance {
    pub quiz_attempts: u32,
    /// Average score in [0, 100].
    pub avg_score: f64,
    /// Completion rate in [0, 1].
    pub completion_rate: f64,
}

/// Complete behavior data for one user over an analysis window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorData {
    pub user_id: String,
    #[serde(default = "default_analysis_period_days")]
    pub analysis_period_days: u32,
    #[serde(default)]
    pub chat: ChatBehavior,
    #[serde(default)]
    pub material: MaterialInteraction,
    #[serde(default)]
    pub activity: ActivityPattern,
    #[serde(default)]
    pub quiz: Option<QuizPerformance>,
}

fn default_analysis_period_days() -> u32 {
    30
}

impl BehaviorData {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            analysis_period_days: default_analysis_period_days(),
            chat: ChatBehavior::default(),
            material: MaterialInteraction::default(),
            activity: ActivityPattern::default(),
            quiz: None,
        }
    }
}

// ============================================
// Feature vector
// ============================================

/// Normalized feature vector for model input.
///
/// All 25 features lie in [0.0, 1.0]. This is the sole interface between the
/// feature extractor and the classifier; the field order of `as_array` and
/// `FEATURE_NAMES` is the wire contract with the trained model and must not
/// be reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    // Chat features (8)
    pub chat_message_ratio: f64,
    pub question_frequency: f64,
    pub avg_message_length_norm: f64,
    pub feedback_ratio: f64,
    pub feedback_engagement: f64,
    pub session_count_norm: f64,
    pub messages_per_session: f64,
    pub session_duration_norm: f64,

    // Material features (7)
    pub time_spent_norm: f64,
    pub view_count_norm: f64,
    pub material_diversity: f64,
    pub avg_time_per_view_norm: f64,
    pub bookmark_ratio: f64,
    pub scroll_depth: f64,
    pub material_engagement_score: f64,

    // Activity features (7)
    pub active_days_ratio: f64,
    pub session_frequency: f64,
    pub consistency_score: f64,
    pub late_night_ratio: f64,
    pub weekend_ratio: f64,
    pub peak_hour_norm: f64,
    pub engagement_trend_encoded: f64,

    // Quiz features (3)
    pub quiz_score_norm: f64,
    pub quiz_completion_norm: f64,
    pub quiz_attempt_frequency: f64,
}

impl FeatureVector {
    pub const NUM_FEATURES: usize = 25;

    /// Feature names in model input order. Must match the `feature_names`
    /// list in the model metadata produced at training time.
    pub const FEATURE_NAMES: [&'static str; Self::NUM_FEATURES] = [
        "chat_message_ratio",
        "question_frequency",
        "avg_message_length_norm",
        "feedback_ratio",
        "feedback_engagement",
        "session_count_norm",
        "messages_per_session",
        "session_duration_norm",
        "time_spent_norm",
        "view_count_norm",
        "material_diversity",
        "avg_time_per_view_norm",
        "bookmark_ratio",
        "scroll_depth",
        "material_engagement_score",
        "active_days_ratio",
        "session_frequency",
        "consistency_score",
        "late_night_ratio",
        "weekend_ratio",
        "peak_hour_norm",
        "engagement_trend_encoded",
        "quiz_score_norm",
        "quiz_completion_norm",
        "quiz_attempt_frequency",
    ];

    /// Flatten into model input order.
    pub fn as_array(&self) -> [f64; Self::NUM_FEATURES] {
        [
            self.chat_message_ratio,
            self.question_frequency,
            self.avg_message_length_norm,
            self.feedback_ratio,
            self.feedback_engagement,
            self.session_count_norm,
            self.messages_per_session,
            self.session_duration_norm,
            self.time_spent_norm,
            self.view_count_norm,
            self.material_diversity,
            self.avg_time_per_view_norm,
            self.bookmark_ratio,
            self.scroll_depth,
            self.material_engagement_score,
            self.active_days_ratio,
            self.session_frequency,
            self.consistency_score,
            self.late_night_ratio,
            self.weekend_ratio,
            self.peak_hour_norm,
            self.engagement_trend_encoded,
            self.quiz_score_norm,
            self.quiz_completion_norm,
            self.quiz_attempt_frequency,
        ]
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            chat_message_ratio: 0.5,
            question_frequency: 0.0,
            avg_message_length_norm: 0.0,
            feedback_ratio: 0.5,
            feedback_engagement: 0.0,
            session_count_norm: 0.0,
            messages_per_session: 0.0,
            session_duration_norm: 0.0,
            time_spent_norm: 0.0,
            view_count_norm: 0.0,
            material_diversity: 0.0,
            avg_time_per_view_norm: 0.0,
            bookmark_ratio: 0.0,
            scroll_depth: 0.5,
            material_engagement_score: 0.0,
            active_days_ratio: 0.0,
            session_frequency: 0.0,
            consistency_score: 1.0,
            late_night_ratio: 0.0,
            weekend_ratio: 0.0,
            peak_hour_norm: 12.0 / 23.0,
            engagement_trend_encoded: 0.5,
            quiz_score_norm: 0.5,
            quiz_completion_norm: 0.5,
            quiz_attempt_frequency: 0.0,
        }
    }
}

// ============================================
// Classification and guardrail results
// ============================================

/// Raw classification result from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub persona: LearningPersona,
    /// Max class probability in [0, 1].
    pub confidence: f64,
    /// Full probability distribution over all ten personas.
    pub probabilities: HashMap<String, f64>,
    /// True when confidence < 0.5.
    pub is_low_confidence: bool,
}

/// Record of a guardrail override, created only when a rule fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailOverride {
    pub original_persona: LearningPersona,
    pub final_persona: LearningPersona,
    pub rule_triggered: String,
    pub reason: String,
}

/// Flags raised by guardrails without overriding the classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardrailFlags {
    pub potential_anxious: bool,
    pub potential_burnout: bool,
    pub needs_attention: bool,
    pub flag_reasons: Vec<String>,
}

/// Result after applying the guardrail rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailResult {
    pub persona: LearningPersona,
    /// Carried through unchanged from the classification.
    pub confidence: f64,
    pub was_overridden: bool,
    pub override_info: Option<GuardrailOverride>,
    pub flags: GuardrailFlags,
}

// ============================================
// Recommendations
// ============================================

/// Single actionable recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    /// One of "content", "ui", "notification", "feature".
    pub action_type: String,
    /// 1 = highest.
    pub priority: u32,
}

/// Curated recommendation bundle for one persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaRecommendations {
    pub persona: LearningPersona,
    pub summary: String,
    pub recommendations: Vec<Recommendation>,
    pub ui_hints: HashMap<String, String>,
}

// ============================================
// API request/response types
// ============================================

/// Request body for persona prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub user_id: String,
    pub behavior_data: BehaviorData,
    /// Optional quiz score in [0, 100], used by guardrail rules.
    #[serde(default)]
    pub quiz_score: Option<f64>,
    /// Previous classification, if any. Unknown values are ignored.
    #[serde(default)]
    pub previous_persona: Option<String>,
}

/// Human-readable summary of extracted features for transparency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSummary {
    /// "low", "medium" or "high"
    pub chat_engagement: String,
    pub material_consumption: String,
    pub activity_consistency: String,
    pub key_indicators: Vec<String>,
}

/// Response for persona prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub user_id: String,
    pub persona: String,
    pub confidence: f64,
    /// Derived from the raw classification, not the post-override persona.
    pub is_low_confidence: bool,
    pub recommendations: Vec<Recommendation>,
    pub feature_summary: FeatureSummary,
    pub override_info: Option<GuardrailOverride>,
    pub flags: Vec<String>,
    pub processing_time_ms: f64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_version: String,
    pub last_training_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}
