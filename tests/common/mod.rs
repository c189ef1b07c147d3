use std::sync::Mutex;

use async_trait::async_trait;
use lecture_quiz_server::{
    config::Config,
    errors::ModelError,
    models::domain::ModelId,
    services::structured_output::{StructuredOutputClient, StructuredRequest},
};
use secrecy::SecretString;
use serde_json::{json, Value};

pub fn test_config() -> Config {
    Config {
        gemini_api_key: SecretString::from("integration_key".to_string()),
        llm_api_base_url: "http://127.0.0.1:9/v1/".to_string(),
        default_model: ModelId::FlashLite,
        llm_temperature: None,
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        cors_allowed_origin: None,
    }
}

/// Answers analysis and question requests with canned payloads; the models
/// listed in `overloaded` fail with a retryable 503.
pub struct ScriptedClient {
    overloaded: Vec<ModelId>,
    questions: Value,
    calls: Mutex<Vec<(ModelId, String)>>,
}

impl ScriptedClient {
    pub fn new(questions: Value) -> Self {
        ScriptedClient {
            overloaded: Vec::new(),
            questions,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn overloaded(mut self, models: &[ModelId]) -> Self {
        self.overloaded = models.to_vec();
        self
    }

    /// `(model, schema name)` for every call, in order.
    pub fn calls(&self) -> Vec<(ModelId, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredOutputClient for ScriptedClient {
    async fn generate(&self, model: ModelId, request: StructuredRequest) -> Result<Value, ModelError> {
        self.calls
            .lock()
            .unwrap()
            .push((model, request.schema_name.clone()));

        if self.overloaded.contains(&model) {
            return Err(ModelError::Request {
                model,
                message: "503 Service Unavailable: the model is overloaded".to_string(),
            });
        }

        if request.schema_name == "analysis_output" {
            Ok(json!({
                "keyConcepts": ["mitochondria", "ATP"],
                "themes": ["cell energy"],
                "summary": "Mitochondria produce ATP through cellular respiration."
            }))
        } else {
            Ok(self.questions.clone())
        }
    }
}

pub fn mixed_questions() -> Value {
    json!({
        "questions": [
            {
                "type": "multiple-choice",
                "questionText": "Which molecules store energy?",
                "options": ["ATP", "Glucose", "Water", "Oxygen"],
                "correctAnswers": ["ATP", "Glucose"]
            },
            {
                "type": "multiple-choice",
                "questionText": "Where is ATP produced {during respiration}?",
                "options": ["Cytoplasm", "Mitochondria", "Nucleus"],
                "correctAnswers": ["Cytoplasm", "Mitochondria"]
            }
        ]
    })
}
