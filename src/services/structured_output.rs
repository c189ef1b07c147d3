//! Boundary to the structured-decode capability: given a prompt and an output
//! schema, a model either returns a schema-conforming JSON value or fails.

use async_trait::async_trait;
use serde::Serialize;

use crate::{errors::ModelError, models::domain::ModelId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Pdf,
}

/// One piece of a prompt. Media travels as an attachment keyed by its data URI,
/// never inlined into the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    Media {
        file_name: String,
        kind: MediaKind,
        data_uri: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructuredRequest {
    /// Name of the output schema, e.g. `analysis_output`.
    pub schema_name: String,
    pub parts: Vec<PromptPart>,
    pub output_schema: serde_json::Value,
}

impl StructuredRequest {
    pub fn new(schema_name: impl Into<String>, output_schema: serde_json::Value) -> Self {
        Self {
            schema_name: schema_name.into(),
            parts: Vec::new(),
            output_schema,
        }
    }

    /// Appends text, merging it into a preceding text part.
    pub fn push_text(&mut self, text: impl AsRef<str>) {
        match self.parts.last_mut() {
            Some(PromptPart::Text(existing)) => existing.push_str(text.as_ref()),
            _ => self.parts.push(PromptPart::Text(text.as_ref().to_string())),
        }
    }

    pub fn push_media(&mut self, file_name: &str, kind: MediaKind, data_uri: &str) {
        self.parts.push(PromptPart::Media {
            file_name: file_name.to_string(),
            kind,
            data_uri: data_uri.to_string(),
        });
    }

    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                PromptPart::Text(text) => Some(text.as_str()),
                PromptPart::Media { .. } => None,
            })
            .collect()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StructuredOutputClient: Send + Sync {
    async fn generate(
        &self,
        model: ModelId,
        request: StructuredRequest,
    ) -> Result<serde_json::Value, ModelError>;
}
