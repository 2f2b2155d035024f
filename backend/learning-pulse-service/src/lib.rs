/// Learning Pulse Service Library
///
/// Classifies students into learning personas from aggregated behavior data
/// and maps each persona to actionable recommendations.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for prediction and health
/// - `models`: Behavior data, feature vector and persona types
/// - `services`: Feature extraction, classification, guardrails, recommendations
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `utils`: Shared numeric helpers
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::PredictionService;
