use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::ModelId;

/// Structured output contract of the analysis task.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput {
    /// Key concepts identified across all lecture contents.
    pub key_concepts: Vec<String>,
    /// Main themes identified across all lecture contents.
    pub themes: Vec<String>,
    /// A brief combined summary of all lecture contents.
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub key_concepts: Vec<String>,
    pub themes: Vec<String>,
    pub summary: String,
    pub used_model: ModelId,
    pub fallback_used: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn new(output: AnalysisOutput, used_model: ModelId, fallback_used: bool) -> Self {
        AnalysisResult {
            key_concepts: output.key_concepts,
            themes: output.themes,
            summary: output.summary,
            used_model,
            fallback_used,
            analyzed_at: Utc::now(),
        }
    }
}
