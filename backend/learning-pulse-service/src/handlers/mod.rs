/// Learning Pulse handlers - HTTP endpoints for persona prediction
use crate::error::{AppError, Result};
use crate::models::{HealthResponse, PredictRequest};
use crate::services::PredictionService;
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::instrument;

/// Shared handler state. The service is absent when the model failed to
/// load at startup; prediction then degrades to 503 while health still
/// answers.
#[derive(Clone)]
pub struct AppState {
    pub prediction: Option<Arc<PredictionService>>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/learning-pulse")
            .route("/predict-persona", web::post().to(predict_persona))
            .route("/health", web::get().to(health)),
    );
}

/// Classify a user into a learning persona from their behavior data.
#[instrument(skip(state, req), fields(user_id = %req.user_id))]
pub async fn predict_persona(
    state: web::Data<AppState>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id is required".to_string()));
    }

    let service = state
        .prediction
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("persona model is not loaded".to_string()))?;

    let response = service.predict(&req)?;
    Ok(HttpResponse::Ok().json(response))
}

/// Service health, including model load status and version.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let body = match &state.prediction {
        Some(service) if service.is_ready() => HealthResponse {
            status: "healthy".to_string(),
            model_loaded: true,
            model_version: service.model_version().to_string(),
            last_training_date: service.last_training_date().to_string(),
            error_details: None,
        },
        Some(service) => HealthResponse {
            status: "degraded".to_string(),
            model_loaded: false,
            model_version: service.model_version().to_string(),
            last_training_date: service.last_training_date().to_string(),
            error_details: Some("model backend unavailable".to_string()),
        },
        None => HealthResponse {
            status: "unhealthy".to_string(),
            model_loaded: false,
            model_version: "unknown".to_string(),
            last_training_date: "unknown".to_string(),
            error_details: Some("model failed to load at startup".to_string()),
        },
    };
    HttpResponse::Ok().json(body)
}
