use async_graphql::Enum;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Model variants in order of increasing capability and decreasing availability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Enum)]
pub enum ModelId {
    #[serde(rename = "gemini-2.5-flash-lite")]
    FlashLite,
    #[serde(rename = "gemini-2.5-flash")]
    Flash,
    #[serde(rename = "gemini-2.5-pro")]
    Pro,
}

/// Default fallback order, also the display order.
pub const FALLBACK_ORDER: [ModelId; 3] = [ModelId::FlashLite, ModelId::Flash, ModelId::Pro];

impl ModelId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::FlashLite => "gemini-2.5-flash-lite",
            ModelId::Flash => "gemini-2.5-flash",
            ModelId::Pro => "gemini-2.5-pro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelId::FlashLite => "Flash-Lite (по умолчанию)",
            ModelId::Flash => "Flash",
            ModelId::Pro => "Pro",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            ModelId::FlashLite => "Flash-Lite",
            ModelId::Flash => "Flash",
            ModelId::Pro => "Pro",
        }
    }
}

impl Default for ModelId {
    fn default() -> Self {
        FALLBACK_ORDER[0]
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FALLBACK_ORDER
            .into_iter()
            .find(|model| model.as_str() == value.trim())
            .ok_or_else(|| format!("Unknown model: {}", value))
    }
}
