use async_graphql::{ComplexObject, SimpleObject, Union};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::domain::question::{
    FillInTheBlankQuestion, GeneratedQuestion, MatchingPair, MatchingQuestion,
    MultipleChoiceQuestion, QuestionType, SingleChoiceQuestion,
};

/// An option or prompt with a synthetic id, so renaming its text keeps its identity.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct EditableOption {
    pub id: String,
    pub text: String,
}

impl EditableOption {
    pub fn new(text: impl Into<String>) -> Self {
        EditableOption {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
        }
    }
}

fn editable_options(texts: &[String]) -> Vec<EditableOption> {
    texts.iter().map(EditableOption::new).collect()
}

fn texts(options: &[EditableOption]) -> Vec<String> {
    options.iter().map(|o| o.text.clone()).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct EditableFillInTheBlank {
    pub original_question: FillInTheBlankQuestion,
    pub edited_correct_answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct EditableSingleChoice {
    pub original_question: SingleChoiceQuestion,
    pub edited_options: Vec<EditableOption>,
    pub edited_correct_answer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct EditableMultipleChoice {
    pub original_question: MultipleChoiceQuestion,
    pub edited_options: Vec<EditableOption>,
    pub edited_correct_answers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct EditableMatching {
    pub original_question: MatchingQuestion,
    pub edited_prompts: Vec<EditableOption>,
    pub edited_options: Vec<EditableOption>,
    /// Prompt id -> option text.
    #[graphql(skip)]
    pub edited_correct_matches: BTreeMap<String, String>,
}

#[ComplexObject]
impl EditableMatching {
    async fn correct_matches(&self) -> Vec<MatchingPair> {
        self.correct_match_pairs()
    }
}

impl EditableMatching {
    /// Text pairs in prompt order; prompts without a match are left out.
    pub fn correct_match_pairs(&self) -> Vec<MatchingPair> {
        self.edited_prompts
            .iter()
            .filter_map(|prompt| {
                self.edited_correct_matches
                    .get(&prompt.id)
                    .map(|option| MatchingPair {
                        prompt: prompt.text.clone(),
                        option: option.clone(),
                    })
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Union)]
#[serde(tag = "type")]
pub enum EditableBody {
    #[serde(rename = "fill-in-the-blank")]
    FillInTheBlank(EditableFillInTheBlank),
    #[serde(rename = "single-choice")]
    SingleChoice(EditableSingleChoice),
    #[serde(rename = "multiple-choice")]
    MultipleChoice(EditableMultipleChoice),
    #[serde(rename = "matching")]
    Matching(EditableMatching),
}

/// Mutable, UI-facing wrapper around one generated question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct EditableQuestion {
    pub id: String,
    pub selected: bool,
    pub edited_question_text: String,
    #[serde(flatten)]
    pub body: EditableBody,
}

impl EditableQuestion {
    pub fn from_generated(question: GeneratedQuestion) -> Self {
        let edited_question_text = question.question_text().to_string();
        let body = match question {
            GeneratedQuestion::FillInTheBlank(q) => {
                EditableBody::FillInTheBlank(EditableFillInTheBlank {
                    edited_correct_answer: q.correct_answer.clone(),
                    original_question: q,
                })
            }
            GeneratedQuestion::SingleChoice(q) => EditableBody::SingleChoice(EditableSingleChoice {
                edited_options: editable_options(&q.options),
                edited_correct_answer: q.correct_answer.clone(),
                original_question: q,
            }),
            GeneratedQuestion::MultipleChoice(q) => {
                EditableBody::MultipleChoice(EditableMultipleChoice {
                    edited_options: editable_options(&q.options),
                    edited_correct_answers: q.correct_answers.clone(),
                    original_question: q,
                })
            }
            GeneratedQuestion::Matching(q) => {
                let edited_prompts = editable_options(&q.prompts);
                let edited_correct_matches = key_matches_by_prompt_id(&edited_prompts, &q.correct_matches);
                EditableBody::Matching(EditableMatching {
                    edited_options: editable_options(&q.options),
                    edited_prompts,
                    edited_correct_matches,
                    original_question: q,
                })
            }
        };

        EditableQuestion {
            id: Uuid::new_v4().to_string(),
            selected: true,
            edited_question_text,
            body,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match &self.body {
            EditableBody::FillInTheBlank(_) => QuestionType::FillInTheBlank,
            EditableBody::SingleChoice(_) => QuestionType::SingleChoice,
            EditableBody::MultipleChoice(_) => QuestionType::MultipleChoice,
            EditableBody::Matching(_) => QuestionType::Matching,
        }
    }

    /// Projects the edited state back to a plain generated question.
    pub fn to_generated(&self) -> GeneratedQuestion {
        let question_text = self.edited_question_text.clone();
        match &self.body {
            EditableBody::FillInTheBlank(q) => GeneratedQuestion::FillInTheBlank(FillInTheBlankQuestion {
                question_text,
                correct_answer: q.edited_correct_answer.clone(),
            }),
            EditableBody::SingleChoice(q) => GeneratedQuestion::SingleChoice(SingleChoiceQuestion {
                question_text,
                options: texts(&q.edited_options),
                correct_answer: q.edited_correct_answer.clone(),
            }),
            EditableBody::MultipleChoice(q) => GeneratedQuestion::MultipleChoice(MultipleChoiceQuestion {
                question_text,
                options: texts(&q.edited_options),
                correct_answers: q.edited_correct_answers.clone(),
            }),
            EditableBody::Matching(q) => GeneratedQuestion::Matching(MatchingQuestion {
                question_text,
                prompts: texts(&q.edited_prompts),
                options: texts(&q.edited_options),
                correct_matches: q.correct_match_pairs(),
            }),
        }
    }
}

/// Resolves text pairs to prompt ids. A repeated prompt text claims the next
/// unmatched prompt carrying it; later pairs for a single prompt overwrite earlier ones.
fn key_matches_by_prompt_id(
    prompts: &[EditableOption],
    pairs: &[MatchingPair],
) -> BTreeMap<String, String> {
    let mut matches = BTreeMap::new();
    for pair in pairs {
        let mut candidates = prompts.iter().filter(|p| p.text == pair.prompt);
        let first = candidates.clone().next();
        let target = candidates
            .find(|p| !matches.contains_key(&p.id))
            .or(first);
        match target {
            Some(prompt) => {
                matches.insert(prompt.id.clone(), pair.option.clone());
            }
            None => log::warn!("Dropping match for unknown prompt '{}'", pair.prompt),
        }
    }
    matches
}
