use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ContentItem, ContentType, Difficulty, ModelId, QuestionType},
    services::question_generation_service::DEFAULT_NUMBER_OF_QUESTIONS,
};

static DATA_URI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:[\w.+-]+/[\w.+-]+(;[\w.+-]+=[\w.+-]+)*(;base64)?,")
        .expect("DATA_URI_REGEX is a valid regex pattern")
});

/// A file record as produced by client-side extraction.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileDto {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    pub text_content: Option<String>,
    #[validate(regex(path = *DATA_URI_REGEX, message = "dataUri must be a data: URI"))]
    pub data_uri: Option<String>,
    pub error: Option<String>,
}

impl UploadedFileDto {
    /// `None` for records that failed extraction or carry nothing analyzable.
    pub fn into_content_item(self) -> Option<ContentItem> {
        if let Some(error) = &self.error {
            log::warn!("Skipping '{}': extraction failed: {}", self.file_name, error);
            return None;
        }

        if let Some(text) = self.text_content.as_deref().filter(|t| !t.is_empty()) {
            return Some(ContentItem::text(&self.file_name, text));
        }

        let data_uri = self.data_uri.as_deref().filter(|uri| !uri.is_empty());
        match data_uri {
            Some(uri) if self.file_type.starts_with("image/") => {
                Some(ContentItem::media(&self.file_name, ContentType::Image, uri))
            }
            Some(uri) if self.file_type == "application/pdf" => {
                Some(ContentItem::media(&self.file_name, ContentType::Pdf, uri))
            }
            _ => {
                log::warn!(
                    "Skipping '{}': unsupported file type '{}'",
                    self.file_name,
                    self.file_type
                );
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequestDto {
    #[serde(default)]
    pub contents: Vec<ContentItem>,
    #[serde(default)]
    #[validate(nested)]
    pub files: Vec<UploadedFileDto>,
    pub preferred_model: Option<ModelId>,
}

impl AnalyzeRequestDto {
    /// Explicit content items first, then whatever uploaded files map to one.
    pub fn into_content_items(self) -> AppResult<Vec<ContentItem>> {
        let uploaded = self.files.len();
        let mut items = self.contents;
        items.extend(
            self.files
                .into_iter()
                .filter_map(UploadedFileDto::into_content_item),
        );

        if items.is_empty() && uploaded > 0 {
            return Err(AppError::ValidationError(
                "No files suitable for analysis in the uploaded batch.".to_string(),
            ));
        }

        Ok(items)
    }
}

fn default_number_of_questions() -> u32 {
    DEFAULT_NUMBER_OF_QUESTIONS
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequestDto {
    #[validate(length(min = 1, message = "lectureContent must not be empty"))]
    pub lecture_content: Option<String>,
    #[serde(default = "default_number_of_questions")]
    #[validate(range(min = 1, max = 20))]
    pub number_of_questions: u32,
    #[serde(default)]
    pub question_difficulty: Difficulty,
    pub question_type: QuestionType,
    pub preferred_model: Option<ModelId>,
}
