use async_graphql::{Enum, SimpleObject, Union};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum)]
pub enum QuestionType {
    #[serde(rename = "fill-in-the-blank")]
    FillInTheBlank,
    #[serde(rename = "single-choice")]
    SingleChoice,
    #[serde(rename = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "matching")]
    Matching,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::FillInTheBlank,
        QuestionType::SingleChoice,
        QuestionType::MultipleChoice,
        QuestionType::Matching,
    ];

    /// The `type` tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::FillInTheBlank => "fill-in-the-blank",
            QuestionType::SingleChoice => "single-choice",
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::Matching => "matching",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Validate, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct FillInTheBlankQuestion {
    /// The main text of the question. Use '___' as a placeholder for the blank space.
    pub question_text: String,
    /// The word or phrase that correctly fills the blank.
    pub correct_answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Validate, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_single_choice"))]
pub struct SingleChoiceQuestion {
    /// The main text of the question.
    pub question_text: String,
    /// An array of 3 to 5 unique answer options.
    #[validate(length(min = 3, max = 5))]
    pub options: Vec<String>,
    /// The single correct answer, which must exactly match one of the provided options.
    pub correct_answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Validate, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_multiple_choice"))]
pub struct MultipleChoiceQuestion {
    /// The main text of the question.
    pub question_text: String,
    /// An array of 3 to 5 unique answer options.
    #[validate(length(min = 3, max = 5))]
    pub options: Vec<String>,
    /// An array of AT LEAST TWO correct answers, each must exactly match one of the provided options.
    #[validate(length(min = 2))]
    pub correct_answers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema, SimpleObject)]
pub struct MatchingPair {
    /// An item from the 'prompts' array.
    pub prompt: String,
    /// The matching item from the 'options' array.
    pub option: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Validate, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_matching"))]
pub struct MatchingQuestion {
    /// The main text of the question.
    pub question_text: String,
    /// An array of 2 to 8 items to be matched.
    #[validate(length(min = 2, max = 8))]
    pub prompts: Vec<String>,
    /// An array of 2 to 8 unique options to match from.
    #[validate(length(min = 2, max = 8))]
    pub options: Vec<String>,
    /// Each object represents a correct pair of a prompt and an option.
    pub correct_matches: Vec<MatchingPair>,
}

/// A question as emitted by the generator, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Union)]
#[serde(tag = "type")]
pub enum GeneratedQuestion {
    #[serde(rename = "fill-in-the-blank")]
    FillInTheBlank(FillInTheBlankQuestion),
    #[serde(rename = "single-choice")]
    SingleChoice(SingleChoiceQuestion),
    #[serde(rename = "multiple-choice")]
    MultipleChoice(MultipleChoiceQuestion),
    #[serde(rename = "matching")]
    Matching(MatchingQuestion),
}

impl GeneratedQuestion {
    pub fn question_type(&self) -> QuestionType {
        match self {
            GeneratedQuestion::FillInTheBlank(_) => QuestionType::FillInTheBlank,
            GeneratedQuestion::SingleChoice(_) => QuestionType::SingleChoice,
            GeneratedQuestion::MultipleChoice(_) => QuestionType::MultipleChoice,
            GeneratedQuestion::Matching(_) => QuestionType::Matching,
        }
    }

    pub fn question_text(&self) -> &str {
        match self {
            GeneratedQuestion::FillInTheBlank(q) => &q.question_text,
            GeneratedQuestion::SingleChoice(q) => &q.question_text,
            GeneratedQuestion::MultipleChoice(q) => &q.question_text,
            GeneratedQuestion::Matching(q) => &q.question_text,
        }
    }

    /// Field bounds plus the rule that every answer refers to a live option or prompt.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            GeneratedQuestion::FillInTheBlank(q) => q.validate(),
            GeneratedQuestion::SingleChoice(q) => q.validate(),
            GeneratedQuestion::MultipleChoice(q) => q.validate(),
            GeneratedQuestion::Matching(q) => q.validate(),
        }
    }
}

/// The `{ "questions": [...] }` container shared by the generator output and the JSON export.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionSet {
    pub questions: Vec<GeneratedQuestion>,
}

fn validation_error(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn ensure_unique(values: &[String], field: &str) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    match values.iter().find(|value| !seen.insert(value.as_str())) {
        Some(duplicate) => Err(validation_error(
            "unique",
            format!("'{}' appears more than once in {}", duplicate, field),
        )),
        None => Ok(()),
    }
}

fn ensure_member(value: &str, values: &[String], field: &str) -> Result<(), ValidationError> {
    if values.iter().any(|v| v == value) {
        Ok(())
    } else {
        Err(validation_error(
            "membership",
            format!("'{}' is not one of the {}", value, field),
        ))
    }
}

fn validate_single_choice(question: &SingleChoiceQuestion) -> Result<(), ValidationError> {
    ensure_unique(&question.options, "options")?;
    ensure_member(&question.correct_answer, &question.options, "options")
}

fn validate_multiple_choice(question: &MultipleChoiceQuestion) -> Result<(), ValidationError> {
    ensure_unique(&question.options, "options")?;
    question
        .correct_answers
        .iter()
        .try_for_each(|answer| ensure_member(answer, &question.options, "options"))
}

fn validate_matching(question: &MatchingQuestion) -> Result<(), ValidationError> {
    ensure_unique(&question.prompts, "prompts")?;
    ensure_unique(&question.options, "options")?;
    question.correct_matches.iter().try_for_each(|pair| {
        ensure_member(&pair.prompt, &question.prompts, "prompts")?;
        ensure_member(&pair.option, &question.options, "options")
    })
}
