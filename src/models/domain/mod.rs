pub mod analysis;
pub mod content_item;
pub mod editable_question;
pub mod model_id;
pub mod question;

pub use analysis::{AnalysisOutput, AnalysisResult};
pub use content_item::{ContentItem, ContentType};
pub use editable_question::{EditableBody, EditableOption, EditableQuestion};
pub use model_id::{ModelId, FALLBACK_ORDER};
pub use question::{Difficulty, GeneratedQuestion, MatchingPair, QuestionSet, QuestionType};
