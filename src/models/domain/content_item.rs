use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
    Pdf,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Text => write!(f, "text"),
            ContentType::Image => write!(f, "image"),
            ContentType::Pdf => write!(f, "pdf"),
        }
    }
}

/// One normalized unit of lecture material, as produced by file extraction.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub file_name: String,
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_data_uri: Option<String>,
}

impl ContentItem {
    pub fn text(file_name: &str, raw_text: &str) -> Self {
        ContentItem {
            file_name: file_name.to_string(),
            content_type: ContentType::Text,
            raw_text_content: Some(raw_text.to_string()),
            content_data_uri: None,
        }
    }

    pub fn media(file_name: &str, content_type: ContentType, data_uri: &str) -> Self {
        ContentItem {
            file_name: file_name.to_string(),
            content_type,
            raw_text_content: None,
            content_data_uri: Some(data_uri.to_string()),
        }
    }

    /// Text items need non-empty raw text; every other type needs a data URI.
    pub fn validate(&self) -> AppResult<()> {
        match self.content_type {
            ContentType::Text => {
                if non_empty(&self.raw_text_content).is_none() {
                    return Err(AppError::ValidationError(format!(
                        "Content item '{}' of type 'text' is missing 'rawTextContent'.",
                        self.file_name
                    )));
                }
            }
            ContentType::Image | ContentType::Pdf => {
                if non_empty(&self.content_data_uri).is_none() {
                    return Err(AppError::ValidationError(format!(
                        "Content item '{}' of type '{}' is missing 'contentDataUri'.",
                        self.file_name, self.content_type
                    )));
                }
            }
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Checks a whole batch before any model is contacted.
pub fn validate_batch(items: &[ContentItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::ValidationError(
            "At least one content item is required for analysis.".to_string(),
        ));
    }
    items.iter().try_for_each(ContentItem::validate)
}
