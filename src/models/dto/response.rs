use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::domain::{AnalysisResult, EditableQuestion, ModelId},
    services::question_editor::{EditNotice, EditOutcome},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: ModelId,
    pub label: String,
    pub selected: bool,
}

impl ModelInfo {
    pub fn new(id: ModelId, selected: ModelId) -> Self {
        ModelInfo {
            id,
            label: id.label().to_string(),
            selected: id == selected,
        }
    }
}

/// A user-facing notice, e.g. a refused edit or a fallback advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct NoticeDto {
    pub title: String,
    pub message: String,
}

impl From<&EditNotice> for NoticeDto {
    fn from(notice: &EditNotice) -> Self {
        NoticeDto {
            title: notice.title().to_string(),
            message: notice.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub key_concepts: Vec<String>,
    pub themes: Vec<String>,
    pub summary: String,
    pub used_model: ModelId,
    pub fallback_used: bool,
    pub analyzed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeDto>,
}

impl AnalysisResponse {
    pub fn new(result: AnalysisResult, notice: Option<NoticeDto>) -> Self {
        AnalysisResponse {
            key_concepts: result.key_concepts,
            themes: result.themes,
            summary: result.summary,
            used_model: result.used_model,
            fallback_used: result.fallback_used,
            analyzed_at: result.analyzed_at,
            notice,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<EditableQuestion>,
    pub used_model: ModelId,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeDto>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<EditableQuestion>,
}

impl EditResult {
    pub fn new(outcome: &EditOutcome, question: Option<EditableQuestion>) -> Self {
        match outcome {
            EditOutcome::Applied => EditResult {
                applied: true,
                notice: None,
                question,
            },
            EditOutcome::Rejected(notice) => EditResult {
                applied: false,
                notice: Some(notice.into()),
                question,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct DeleteQuestionResponse {
    pub id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_info_marks_selection() {
        let info = ModelInfo::new(ModelId::FlashLite, ModelId::Flash);
        assert_eq!(info.label, "Flash-Lite (по умолчанию)");
        assert!(!info.selected);
        assert!(ModelInfo::new(ModelId::Flash, ModelId::Flash).selected);
    }

    #[test]
    fn test_rejected_edit_carries_notice() {
        let outcome = EditOutcome::Rejected(EditNotice::MinimumReached {
            limit: 2,
            is_prompt: false,
        });

        let result = EditResult::new(&outcome, None);
        assert!(!result.applied);
        let notice = result.notice.expect("notice");
        assert_eq!(notice.title, "Минимум вариантов");
        assert_eq!(notice.message, "Должно быть не менее 2 вариантов.");
    }
}
