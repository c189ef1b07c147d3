use std::sync::Arc;

use crate::{
    constants::prompts::{ANALYSIS_PROMPT_FOOTER, ANALYSIS_PROMPT_HEADER},
    errors::{AppResult, ModelError},
    models::domain::{
        content_item::validate_batch, AnalysisOutput, AnalysisResult, ContentItem, ContentType,
        ModelId, FALLBACK_ORDER,
    },
    services::{
        model_selector::run_with_fallback,
        output_schema::analysis_schema,
        structured_output::{MediaKind, StructuredOutputClient, StructuredRequest},
    },
};

pub const ANALYSIS_SCHEMA_NAME: &str = "analysis_output";

pub struct AnalysisService {
    client: Arc<dyn StructuredOutputClient>,
    fallback_order: Vec<ModelId>,
}

impl AnalysisService {
    pub fn new(client: Arc<dyn StructuredOutputClient>) -> Self {
        Self {
            client,
            fallback_order: FALLBACK_ORDER.to_vec(),
        }
    }

    /// Synthesizes one analysis across the whole batch.
    ///
    /// Every item is checked before any model is contacted; the first invalid
    /// item fails the call with a message naming it.
    pub async fn analyze(
        &self,
        items: &[ContentItem],
        preferred: Option<ModelId>,
    ) -> AppResult<AnalysisResult> {
        validate_batch(items)?;

        let preferred = preferred
            .or_else(|| self.fallback_order.first().copied())
            .unwrap_or_default();
        let request = build_analysis_request(items);

        log::info!(
            "Analyzing {} content item(s), preferred model {}",
            items.len(),
            preferred
        );

        let outcome = run_with_fallback(preferred, &self.fallback_order, "analysis", |model| {
            let client = Arc::clone(&self.client);
            let request = request.clone();
            async move {
                let value = client.generate(model, request).await?;
                serde_json::from_value::<AnalysisOutput>(value).map_err(|e| {
                    ModelError::SchemaViolation {
                        model,
                        message: e.to_string(),
                    }
                })
            }
        })
        .await?;

        Ok(AnalysisResult::new(
            outcome.result,
            outcome.used_model,
            outcome.fallback_used,
        ))
    }
}

/// Text items are inlined between file markers; images and PDFs become
/// attachments at the position of their markers.
pub fn build_analysis_request(items: &[ContentItem]) -> StructuredRequest {
    let mut request = StructuredRequest::new(ANALYSIS_SCHEMA_NAME, analysis_schema());
    request.push_text(ANALYSIS_PROMPT_HEADER);

    for item in items {
        request.push_text(format!(
            "--- START FILE: {} (Type: {}) ---\n",
            item.file_name, item.content_type
        ));

        match item.content_type {
            ContentType::Text => {
                request.push_text(item.raw_text_content.as_deref().unwrap_or_default());
                request.push_text("\n");
            }
            ContentType::Image | ContentType::Pdf => {
                let kind = match item.content_type {
                    ContentType::Pdf => MediaKind::Pdf,
                    _ => MediaKind::Image,
                };
                request.push_media(
                    &item.file_name,
                    kind,
                    item.content_data_uri.as_deref().unwrap_or_default(),
                );
            }
        }

        request.push_text(format!("--- END FILE: {} ---\n", item.file_name));
    }

    request.push_text(ANALYSIS_PROMPT_FOOTER);
    request
}
