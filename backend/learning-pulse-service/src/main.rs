use actix_web::{middleware::Logger, web, App, HttpServer};
use learning_pulse_service::handlers::{self, AppState};
use learning_pulse_service::services::classifier::PersonaClassifier;
use learning_pulse_service::{Config, PredictionService};
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    info!(
        service = %config.service.service_name,
        port = config.service.http_port,
        "starting learning pulse service"
    );

    // A missing model artifact is not fatal: the service starts degraded
    // and reports it through /health while predictions return 503.
    let prediction = match PersonaClassifier::load(
        &config.model.model_path,
        &config.model.scaler_path,
        &config.model.metadata_path,
    ) {
        Ok(classifier) => {
            info!(
                model_version = classifier.model_version(),
                "persona model loaded"
            );
            Some(Arc::new(PredictionService::new(classifier)))
        }
        Err(e) => {
            warn!(error = %e, "starting without persona model");
            None
        }
    };

    let state = AppState { prediction };
    let port = config.service.http_port;

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
