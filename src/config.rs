use std::env;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    errors::{AppError, AppResult},
    models::domain::ModelId,
};

pub const DEFAULT_LLM_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: SecretString,
    pub llm_api_base_url: String,
    pub default_model: ModelId,
    pub llm_temperature: Option<f32>,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: SecretString::from(env::var("GEMINI_API_KEY").unwrap_or_default()),
            llm_api_base_url: env::var("LLM_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_API_BASE_URL.to_string()),
            default_model: env::var("DEFAULT_MODEL")
                .ok()
                .and_then(|m| match m.parse() {
                    Ok(model) => Some(model),
                    Err(err) => {
                        log::warn!("Ignoring DEFAULT_MODEL: {}", err);
                        None
                    }
                })
                .unwrap_or_default(),
            llm_temperature: env::var("LLM_TEMPERATURE")
                .ok()
                .and_then(|t| t.parse().ok()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
        }
    }

    /// Refuses to start without credentials for the model backend.
    pub fn validate(&self) -> AppResult<()> {
        if self.gemini_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ValidationError(
                "GEMINI_API_KEY is not set. Set it in the environment or in .env".to_string(),
            ));
        }

        if let Some(temperature) = self.llm_temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(AppError::ValidationError(format!(
                    "LLM_TEMPERATURE must be between 0 and 2, got {}",
                    temperature
                )));
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            gemini_api_key: SecretString::from("test_api_key".to_string()),
            llm_api_base_url: "http://127.0.0.1:9/v1/".to_string(),
            default_model: ModelId::FlashLite,
            llm_temperature: None,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: None,
        }
    }
}
