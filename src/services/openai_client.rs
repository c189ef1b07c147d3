//! Structured-output client for OpenAI-compatible chat completion endpoints
//! (Gemini's compatibility endpoint by default).

use std::{collections::HashMap, time::Duration};

use async_openai::{config::OpenAIConfig, Client};
use backoff::ExponentialBackoff;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::ModelError,
    models::domain::{ModelId, FALLBACK_ORDER},
    services::structured_output::{MediaKind, PromptPart, StructuredOutputClient, StructuredRequest},
};

/// One configured client per model, built once at startup and shared read-only.
pub struct ModelRegistry {
    clients: HashMap<ModelId, Client<OpenAIConfig>>,
}

impl ModelRegistry {
    pub fn from_config(config: &Config) -> Self {
        let clients = FALLBACK_ORDER
            .iter()
            .map(|model| {
                let openai_config = OpenAIConfig::new()
                    .with_api_key(config.gemini_api_key.expose_secret().to_string())
                    .with_api_base(config.llm_api_base_url.clone());
                let client = Client::with_config(openai_config).with_backoff(single_attempt());
                (*model, client)
            })
            .collect();

        Self { clients }
    }

    pub fn client(&self, model: ModelId) -> Result<&Client<OpenAIConfig>, ModelError> {
        self.clients
            .get(&model)
            .ok_or_else(|| ModelError::UnknownModel(model.to_string()))
    }

    pub fn models(&self) -> Vec<ModelId> {
        FALLBACK_ORDER
            .iter()
            .copied()
            .filter(|model| self.clients.contains_key(model))
            .collect()
    }
}

/// Each model gets one attempt per call; failover to the next model is
/// handled by the fallback runner.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

pub struct OpenAiStructuredClient {
    registry: ModelRegistry,
    temperature: Option<f32>,
}

impl OpenAiStructuredClient {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: ModelRegistry::from_config(config),
            temperature: config.llm_temperature,
        }
    }
}

#[async_trait]
impl StructuredOutputClient for OpenAiStructuredClient {
    async fn generate(
        &self,
        model: ModelId,
        request: StructuredRequest,
    ) -> Result<Value, ModelError> {
        let client = self.registry.client(model)?;
        let body = build_chat_request(model, &request, self.temperature);

        log::debug!(
            "Sending {} request to {} with {} part(s)",
            request.schema_name,
            model,
            request.parts.len()
        );

        let response: Value = client
            .chat()
            .create_byot(body)
            .await
            .map_err(|e| ModelError::Request {
                model,
                message: e.to_string(),
            })?;

        parse_chat_response(model, &response)
    }
}

/// Chat completion body with the prompt as one user message and a strict
/// `json_schema` response format.
pub fn build_chat_request(
    model: ModelId,
    request: &StructuredRequest,
    temperature: Option<f32>,
) -> Value {
    let content: Vec<Value> = request
        .parts
        .iter()
        .map(|part| match part {
            PromptPart::Text(text) => json!({ "type": "text", "text": text }),
            PromptPart::Media {
                kind: MediaKind::Image,
                data_uri,
                ..
            } => json!({ "type": "image_url", "image_url": { "url": data_uri } }),
            PromptPart::Media {
                file_name,
                kind: MediaKind::Pdf,
                data_uri,
            } => json!({
                "type": "file",
                "file": { "filename": file_name, "file_data": data_uri }
            }),
        })
        .collect();

    let mut body = json!({
        "model": model.as_str(),
        "messages": [{ "role": "user", "content": content }],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": request.schema_name,
                "strict": true,
                "schema": request.output_schema
            }
        }
    });

    if let Some(temperature) = temperature {
        body["temperature"] = json!(temperature);
    }

    body
}

/// Extracts and decodes `choices[0].message.content`.
pub fn parse_chat_response(model: ModelId, response: &Value) -> Result<Value, ModelError> {
    let content = response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(strip_code_fence)
        .filter(|content| !content.is_empty())
        .ok_or(ModelError::EmptyResponse { model })?;

    serde_json::from_str(content).map_err(|e| ModelError::SchemaViolation {
        model,
        message: format!("response is not valid JSON: {}", e),
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => rest
            .trim_start_matches("json")
            .trim_end()
            .trim_end_matches("```")
            .trim(),
        None => trimmed,
    }
}
