// ============================================
// Recommendation Engine
// ============================================
//
// Static, persona-keyed recommendation bundles. The persona set is closed,
// so the lookup is a total function built from an exhaustive match; there is
// no failure path. Content is curated reference data, not derived from user
// behavior.

use crate::models::{LearningPersona, PersonaRecommendations, Recommendation};
use std::collections::HashMap;

fn rec(
    id: &str,
    title: &str,
    description: &str,
    action_type: &str,
    priority: u32,
) -> Recommendation {
    Recommendation {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        action_type: action_type.to_string(),
        priority,
    }
}

fn hints(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Maps personas to actionable recommendation bundles.
///
/// Every persona gets a one-line empathetic summary, at least four
/// recommendations with stable ids and priorities starting at 1, and a set
/// of UI hint flags.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Look up the recommendation bundle for a persona.
    pub fn recommendations_for(&self, persona: LearningPersona) -> PersonaRecommendations {
        match persona {
            LearningPersona::Struggler => struggler(),
            LearningPersona::Skimmer => skimmer(),
            LearningPersona::Anxious => anxious(),
            LearningPersona::Burnout => burnout(),
            LearningPersona::Master => master(),
            LearningPersona::Procrastinator => procrastinator(),
            LearningPersona::DeepDiver => deep_diver(),
            LearningPersona::SocialLearner => social_learner(),
            LearningPersona::Perfectionist => perfectionist(),
            LearningPersona::Lost => lost(),
        }
    }
}

/// Struggler: high AI chat usage, repeated questions, low comprehension.
fn struggler() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::Struggler,
        summary: "You seem to be working hard but facing challenges. Let's simplify things and provide more support.".to_string(),
        recommendations: vec![
            rec(
                "struggler_simplified_materials",
                "Access Simplified Materials",
                "We've prepared easier-to-understand versions of the content. Start with these simplified materials to build a stronger foundation before tackling advanced topics.",
                "content",
                1,
            ),
            rec(
                "struggler_more_examples",
                "Explore More Examples",
                "Practice makes perfect! Check out additional worked examples that break down complex concepts step-by-step.",
                "content",
                2,
            ),
            rec(
                "struggler_llm_explanations",
                "Ask AI for Explanations",
                "Use the AI assistant to get personalized explanations. Try asking 'Can you explain this concept in simpler terms?' or 'Give me an analogy for this.'",
                "feature",
                3,
            ),
            rec(
                "struggler_review_basics",
                "Review Foundational Concepts",
                "Sometimes going back to basics helps. We've identified prerequisite topics that might help strengthen your understanding.",
                "content",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("highlight_ai_chat", "true"),
            ("show_difficulty_filter", "true"),
            ("suggest_prerequisites", "true"),
        ]),
    }
}

/// Skimmer: quick browsing, low engagement, jumps between materials.
fn skimmer() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::Skimmer,
        summary: "You're covering a lot of ground quickly! Let's help you engage more deeply with the material.".to_string(),
        recommendations: vec![
            rec(
                "skimmer_engagement_prompts",
                "Try Interactive Checkpoints",
                "We've added quick comprehension checks throughout the material. These short prompts help ensure you're absorbing key concepts as you go.",
                "ui",
                1,
            ),
            rec(
                "skimmer_quizzes",
                "Take Quick Quizzes",
                "Test your understanding with short quizzes after each section. They only take a few minutes and help reinforce what you've learned.",
                "feature",
                2,
            ),
            rec(
                "skimmer_summary_highlights",
                "Review Key Highlights",
                "Check out the highlighted summaries and key takeaways for each material. These capture the most important points you shouldn't miss.",
                "content",
                3,
            ),
            rec(
                "skimmer_slow_down_reminder",
                "Pace Yourself",
                "Quality over quantity! Try spending at least 5 minutes on each material to fully understand the concepts before moving on.",
                "notification",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("show_reading_progress", "true"),
            ("enable_comprehension_checks", "true"),
            ("highlight_key_points", "true"),
        ]),
    }
}

/// Anxious: erratic patterns, late-night activity, high question frequency.
fn anxious() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::Anxious,
        summary: "Learning can feel overwhelming sometimes. Let's create a calmer, more supportive environment for you.".to_string(),
        recommendations: vec![
            rec(
                "anxious_calming_ui",
                "Enable Calm Mode",
                "Switch to our calming interface with softer colors and reduced visual clutter. This helps create a more relaxed learning environment.",
                "ui",
                1,
            ),
            rec(
                "anxious_progress_indicators",
                "Track Your Progress",
                "See how far you've come! Our progress tracker shows your achievements and helps you visualize your learning journey.",
                "ui",
                2,
            ),
            rec(
                "anxious_encouragement",
                "You're Doing Great!",
                "Remember: learning is a journey, not a race. Every question you ask and every material you review brings you closer to mastery.",
                "notification",
                3,
            ),
            rec(
                "anxious_breathing_break",
                "Take a Mindful Break",
                "Feeling stressed? Try our 2-minute breathing exercise to reset and refocus before continuing your studies.",
                "feature",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("enable_calm_mode", "true"),
            ("show_encouragement_messages", "true"),
            ("reduce_notifications", "true"),
            ("soft_color_scheme", "true"),
        ]),
    }
}

/// Burnout: declining engagement over time, fatigue indicators.
fn burnout() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::Burnout,
        summary: "You've been working hard! It's important to rest and recharge. Let's help you maintain a sustainable learning pace.".to_string(),
        recommendations: vec![
            rec(
                "burnout_break_reminder",
                "Take Regular Breaks",
                "Schedule 5-minute breaks every 25 minutes using the Pomodoro technique. Your brain needs rest to consolidate learning.",
                "notification",
                1,
            ),
            rec(
                "burnout_lighter_content",
                "Try Lighter Content",
                "Start with summary materials or video overviews before diving into detailed content. Ease back into learning gradually.",
                "content",
                2,
            ),
            rec(
                "burnout_celebrate_achievements",
                "Celebrate Your Progress",
                "Look at how much you've accomplished! Review your achievements from the past week and give yourself credit for your hard work.",
                "ui",
                3,
            ),
            rec(
                "burnout_reduce_workload",
                "Set Realistic Goals",
                "Consider reducing your daily learning goals temporarily. It's better to learn consistently at a sustainable pace than to burn out.",
                "feature",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("enable_break_reminders", "true"),
            ("show_achievements", "true"),
            ("suggest_lighter_content", "true"),
            ("reduce_daily_goals", "true"),
        ]),
    }
}

/// Master: high comprehension, good quiz scores, efficient learning.
fn master() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::Master,
        summary: "Excellent work! You're mastering the material. Let's challenge you further and help you share your knowledge.".to_string(),
        recommendations: vec![
            rec(
                "master_advanced_materials",
                "Explore Advanced Content",
                "Ready for more? Access advanced materials and deep-dive resources that go beyond the basics.",
                "content",
                1,
            ),
            rec(
                "master_peer_tutoring",
                "Help Fellow Learners",
                "Your understanding is strong! Consider joining our peer tutoring program to help others while reinforcing your own knowledge.",
                "feature",
                2,
            ),
            rec(
                "master_challenge_content",
                "Take on Challenges",
                "Test your limits with challenging problems and advanced exercises. Push yourself to the next level!",
                "content",
                3,
            ),
            rec(
                "master_explore_related",
                "Explore Related Topics",
                "Broaden your expertise by exploring related subjects and interdisciplinary connections.",
                "content",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("show_advanced_filter", "true"),
            ("highlight_challenges", "true"),
            ("enable_tutoring_badge", "true"),
        ]),
    }
}

/// Procrastinator: last-minute cramming, irregular patterns.
fn procrastinator() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::Procrastinator,
        summary: "We notice you tend to study in bursts. Let's help you build more consistent habits with small, manageable steps.".to_string(),
        recommendations: vec![
            rec(
                "procrastinator_deadline_reminders",
                "Set Up Deadline Alerts",
                "Enable smart reminders that notify you well before deadlines. Get gentle nudges to start early and avoid last-minute stress.",
                "notification",
                1,
            ),
            rec(
                "procrastinator_micro_tasks",
                "Break It Into Micro-Tasks",
                "Large tasks feel overwhelming. We've broken down your learning into small, 10-minute chunks that are easy to start.",
                "feature",
                2,
            ),
            rec(
                "procrastinator_progress_tracking",
                "Track Daily Progress",
                "Build momentum with our daily streak tracker. Even 15 minutes a day adds up to significant progress over time.",
                "ui",
                3,
            ),
            rec(
                "procrastinator_schedule_sessions",
                "Schedule Study Sessions",
                "Block out specific times for studying in your calendar. Treating learning like an appointment makes it harder to skip.",
                "feature",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("show_deadline_countdown", "true"),
            ("enable_streak_tracker", "true"),
            ("show_micro_tasks", "true"),
            ("calendar_integration", "true"),
        ]),
    }
}

/// Deep Diver: long sessions, thorough material consumption.
fn deep_diver() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::DeepDiver,
        summary: "You love going deep into topics! Let's fuel your curiosity with more resources and research opportunities.".to_string(),
        recommendations: vec![
            rec(
                "deep_diver_supplementary_resources",
                "Access Supplementary Resources",
                "Explore additional readings, research papers, and external resources that expand on the topics you're studying.",
                "content",
                1,
            ),
            rec(
                "deep_diver_deep_content",
                "Unlock Deep-Dive Content",
                "Access our extended materials with detailed explanations, case studies, and comprehensive analyses.",
                "content",
                2,
            ),
            rec(
                "deep_diver_research_opportunities",
                "Join Research Projects",
                "Your thorough approach is perfect for research! Explore opportunities to contribute to ongoing projects or start your own investigation.",
                "feature",
                3,
            ),
            rec(
                "deep_diver_expert_connections",
                "Connect with Experts",
                "Get access to expert Q&A sessions and office hours where you can discuss advanced topics in depth.",
                "feature",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("show_related_resources", "true"),
            ("enable_research_mode", "true"),
            ("show_citation_links", "true"),
        ]),
    }
}

/// Social Learner: high collaboration, peer interactions.
fn social_learner() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::SocialLearner,
        summary: "You thrive when learning with others! Let's connect you with study groups and collaborative opportunities.".to_string(),
        recommendations: vec![
            rec(
                "social_learner_study_groups",
                "Join Study Groups",
                "Connect with peers studying the same material. Join or create study groups to learn together and share insights.",
                "feature",
                1,
            ),
            rec(
                "social_learner_discussion_forums",
                "Participate in Discussions",
                "Join our discussion forums to ask questions, share perspectives, and learn from diverse viewpoints.",
                "feature",
                2,
            ),
            rec(
                "social_learner_collaborative_activities",
                "Try Collaborative Projects",
                "Work on group projects and collaborative exercises. Learning together often leads to deeper understanding.",
                "feature",
                3,
            ),
            rec(
                "social_learner_peer_review",
                "Exchange Peer Feedback",
                "Share your work and get feedback from peers. Reviewing others' work also helps reinforce your own learning.",
                "feature",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("show_active_groups", "true"),
            ("enable_chat_features", "true"),
            ("highlight_collaborative_pods", "true"),
        ]),
    }
}

/// Perfectionist: excessive review, high self-correction.
fn perfectionist() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::Perfectionist,
        summary: "Your attention to detail is admirable! Let's help you balance thoroughness with progress.".to_string(),
        recommendations: vec![
            rec(
                "perfectionist_time_boxing",
                "Try Time-Boxing",
                "Set time limits for each topic or task. When the timer ends, move on. You can always revisit later if needed.",
                "feature",
                1,
            ),
            rec(
                "perfectionist_good_enough",
                "Embrace 'Good Enough'",
                "Aim for 80% understanding before moving on. Perfection isn't required for progress; you'll reinforce concepts through practice.",
                "notification",
                2,
            ),
            rec(
                "perfectionist_celebrate_progress",
                "Celebrate Your Progress",
                "Focus on how far you've come, not just what's left. Every completed section is an achievement worth recognizing.",
                "ui",
                3,
            ),
            rec(
                "perfectionist_limit_reviews",
                "Limit Review Cycles",
                "Set a maximum of 2 review passes per material. Trust your understanding and move forward with confidence.",
                "feature",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("show_time_tracker", "true"),
            ("enable_progress_milestones", "true"),
            ("limit_review_prompts", "true"),
        ]),
    }
}

/// Lost: random navigation, no clear learning path.
fn lost() -> PersonaRecommendations {
    PersonaRecommendations {
        persona: LearningPersona::Lost,
        summary: "Finding your way can be challenging. Let's create a clear path and connect you with support.".to_string(),
        recommendations: vec![
            rec(
                "lost_guided_paths",
                "Follow a Guided Learning Path",
                "We've created a structured learning path just for you. Follow the recommended sequence to build knowledge step-by-step.",
                "content",
                1,
            ),
            rec(
                "lost_mentor_matching",
                "Get Matched with a Mentor",
                "Connect with an experienced mentor who can guide you, answer questions, and help you stay on track.",
                "feature",
                2,
            ),
            rec(
                "lost_foundational_materials",
                "Start with Foundations",
                "Begin with our foundational materials that cover the basics. Building a strong foundation makes everything else easier.",
                "content",
                3,
            ),
            rec(
                "lost_goal_setting",
                "Set Clear Learning Goals",
                "Define what you want to achieve. Having clear goals helps you focus and measure your progress.",
                "feature",
                4,
            ),
        ],
        ui_hints: hints(&[
            ("show_learning_path", "true"),
            ("enable_mentor_chat", "true"),
            ("highlight_prerequisites", "true"),
            ("show_goal_tracker", "true"),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const VALID_ACTION_TYPES: [&str; 4] = ["content", "ui", "notification", "feature"];

    #[test]
    fn every_persona_has_a_complete_bundle() {
        let engine = RecommendationEngine::new();

        for persona in LearningPersona::ALL {
            let bundle = engine.recommendations_for(persona);
            assert_eq!(bundle.persona, persona);
            assert!(!bundle.summary.is_empty());
            assert!(
                bundle.recommendations.len() >= 4,
                "{} has too few recommendations",
                persona
            );
            assert!(!bundle.ui_hints.is_empty());
        }
    }

    #[test]
    fn recommendation_ids_are_distinct_and_prioritized() {
        let engine = RecommendationEngine::new();

        for persona in LearningPersona::ALL {
            let bundle = engine.recommendations_for(persona);

            let ids: HashSet<&str> = bundle
                .recommendations
                .iter()
                .map(|r| r.id.as_str())
                .collect();
            assert_eq!(
                ids.len(),
                bundle.recommendations.len(),
                "{} has duplicate recommendation ids",
                persona
            );

            let mut priorities: Vec<u32> =
                bundle.recommendations.iter().map(|r| r.priority).collect();
            priorities.sort_unstable();
            assert_eq!(priorities[0], 1, "{} priorities must start at 1", persona);
            let distinct: HashSet<u32> = priorities.iter().copied().collect();
            assert_eq!(distinct.len(), priorities.len());
        }
    }

    #[test]
    fn action_types_are_from_the_known_set() {
        let engine = RecommendationEngine::new();

        for persona in LearningPersona::ALL {
            for recommendation in engine.recommendations_for(persona).recommendations {
                assert!(
                    VALID_ACTION_TYPES.contains(&recommendation.action_type.as_str()),
                    "unexpected action_type {} for {}",
                    recommendation.action_type,
                    recommendation.id
                );
            }
        }
    }

    #[test]
    fn ids_are_scoped_by_persona() {
        let engine = RecommendationEngine::new();
        let mut all_ids = HashSet::new();
        for persona in LearningPersona::ALL {
            for recommendation in engine.recommendations_for(persona).recommendations {
                assert!(
                    all_ids.insert(recommendation.id.clone()),
                    "id {} reused across personas",
                    recommendation.id
                );
            }
        }
    }
}
