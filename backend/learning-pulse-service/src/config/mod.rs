use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub http_port: u16,
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub metadata_path: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            service: ServiceConfig {
                http_port: env::var("HTTP_PORT")
                    .unwrap_or_else(|_| "8015".to_string())
                    .parse()
                    .map_err(|_| anyhow::anyhow!("HTTP_PORT must be a valid u16"))?,
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "learning-pulse-service".to_string()),
            },
            model: ModelConfig {
                model_path: env::var("MODEL_PATH")
                    .unwrap_or_else(|_| "models/persona_classifier.onnx".to_string())
                    .into(),
                scaler_path: env::var("SCALER_PATH")
                    .unwrap_or_else(|_| "models/scaler.json".to_string())
                    .into(),
                metadata_path: env::var("METADATA_PATH")
                    .unwrap_or_else(|_| "models/metadata.json".to_string())
                    .into(),
            },
        })
    }
}
