//! Edit transitions over the live collection of editable questions.
//!
//! Every transition works on a copy of the addressed question and swaps it into
//! the collection only when the edit is applied. A rejected bounds check or an
//! error leaves the collection untouched.

use std::fmt;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        editable_question::{EditableMatching, EditableOption},
        EditableBody, EditableQuestion, GeneratedQuestion,
    },
};

pub const MAX_CHOICE_OPTIONS: usize = 5;
pub const MAX_MATCHING_ITEMS: usize = 8;
pub const MIN_ITEMS: usize = 2;

/// User-facing reason an edit was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditNotice {
    MaximumReached { limit: usize, is_prompt: bool },
    MinimumReached { limit: usize, is_prompt: bool },
}

impl EditNotice {
    pub fn title(&self) -> &'static str {
        match self {
            EditNotice::MaximumReached { is_prompt: true, .. } => "Максимум элементов",
            EditNotice::MaximumReached { is_prompt: false, .. } => "Максимум вариантов",
            EditNotice::MinimumReached { is_prompt: true, .. } => "Минимум элементов",
            EditNotice::MinimumReached { is_prompt: false, .. } => "Минимум вариантов",
        }
    }
}

fn item_noun(is_prompt: bool) -> &'static str {
    if is_prompt {
        "элементов"
    } else {
        "вариантов"
    }
}

impl fmt::Display for EditNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditNotice::MaximumReached { limit, is_prompt } => write!(
                f,
                "Можно добавить не более {} {}.",
                limit,
                item_noun(*is_prompt)
            ),
            EditNotice::MinimumReached { limit, is_prompt } => write!(
                f,
                "Должно быть не менее {} {}.",
                limit,
                item_noun(*is_prompt)
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Rejected(EditNotice),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuestionEditor {
    questions: Vec<EditableQuestion>,
}

impl QuestionEditor {
    pub fn new(questions: Vec<EditableQuestion>) -> Self {
        Self { questions }
    }

    pub fn from_generated(questions: Vec<GeneratedQuestion>) -> Self {
        Self::new(questions.into_iter().map(EditableQuestion::from_generated).collect())
    }

    pub fn questions(&self) -> &[EditableQuestion] {
        &self.questions
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> AppResult<&EditableQuestion> {
        self.questions
            .iter()
            .find(|q| q.id == id)
            .ok_or_else(|| question_not_found(id))
    }

    /// Selected questions projected back to plain generated questions, in order.
    pub fn export_view(&self) -> Vec<GeneratedQuestion> {
        self.questions
            .iter()
            .filter(|q| q.selected)
            .map(EditableQuestion::to_generated)
            .collect()
    }

    pub fn set_question_text(&mut self, id: &str, text: &str) -> AppResult<EditOutcome> {
        self.replace(id, |question| {
            question.edited_question_text = text.to_string();
            Ok(EditOutcome::Applied)
        })
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> AppResult<EditOutcome> {
        self.replace(id, |question| {
            question.selected = selected;
            Ok(EditOutcome::Applied)
        })
    }

    pub fn set_fill_blank_answer(&mut self, id: &str, text: &str) -> AppResult<EditOutcome> {
        self.replace(id, |question| match &mut question.body {
            EditableBody::FillInTheBlank(body) => {
                body.edited_correct_answer = text.to_string();
                Ok(EditOutcome::Applied)
            }
            _ => Err(wrong_type(question, "fill-in-the-blank")),
        })
    }

    /// Renames a choice option and rewrites any correct answer that carried the old text.
    pub fn rename_option(
        &mut self,
        id: &str,
        option_id: &str,
        new_text: &str,
    ) -> AppResult<EditOutcome> {
        self.replace(id, |question| {
            let question_id = question.id.clone();
            match &mut question.body {
                EditableBody::SingleChoice(body) => {
                    let old = rename_item(&mut body.edited_options, option_id, new_text, &question_id)?;
                    if body.edited_correct_answer == old {
                        body.edited_correct_answer = new_text.to_string();
                    }
                    Ok(EditOutcome::Applied)
                }
                EditableBody::MultipleChoice(body) => {
                    let old = rename_item(&mut body.edited_options, option_id, new_text, &question_id)?;
                    for answer in body.edited_correct_answers.iter_mut() {
                        if *answer == old {
                            *answer = new_text.to_string();
                        }
                    }
                    Ok(EditOutcome::Applied)
                }
                _ => Err(wrong_type(question, "single-choice or multiple-choice")),
            }
        })
    }

    /// Renames a matching prompt or option. Matches are keyed by prompt id, so a
    /// prompt rename keeps its match; an option rename rewrites every match
    /// pointing at the old text.
    pub fn rename_prompt_or_option(
        &mut self,
        id: &str,
        item_id: &str,
        new_text: &str,
        is_prompt: bool,
    ) -> AppResult<EditOutcome> {
        self.replace(id, |question| {
            let question_id = question.id.clone();
            let body = matching_body(question)?;
            if is_prompt {
                rename_item(&mut body.edited_prompts, item_id, new_text, &question_id)?;
            } else {
                let old = rename_item(&mut body.edited_options, item_id, new_text, &question_id)?;
                for option in body.edited_correct_matches.values_mut() {
                    if *option == old {
                        *option = new_text.to_string();
                    }
                }
            }
            Ok(EditOutcome::Applied)
        })
    }

    pub fn set_single_choice_answer(&mut self, id: &str, option_text: &str) -> AppResult<EditOutcome> {
        self.replace(id, |question| match &mut question.body {
            EditableBody::SingleChoice(body) => {
                ensure_live(&body.edited_options, option_text, "options")?;
                body.edited_correct_answer = option_text.to_string();
                Ok(EditOutcome::Applied)
            }
            _ => Err(wrong_type(question, "single-choice")),
        })
    }

    pub fn toggle_multiple_choice_answer(
        &mut self,
        id: &str,
        option_text: &str,
        included: bool,
    ) -> AppResult<EditOutcome> {
        self.replace(id, |question| match &mut question.body {
            EditableBody::MultipleChoice(body) => {
                ensure_live(&body.edited_options, option_text, "options")?;
                let answers = &mut body.edited_correct_answers;
                if included {
                    if !answers.iter().any(|a| a == option_text) {
                        answers.push(option_text.to_string());
                    }
                } else {
                    answers.retain(|a| a != option_text);
                }
                Ok(EditOutcome::Applied)
            }
            _ => Err(wrong_type(question, "multiple-choice")),
        })
    }

    pub fn set_matching_pair(
        &mut self,
        id: &str,
        prompt_id: &str,
        option_text: &str,
    ) -> AppResult<EditOutcome> {
        self.replace(id, |question| {
            let question_id = question.id.clone();
            let body = matching_body(question)?;
            if !body.edited_prompts.iter().any(|p| p.id == prompt_id) {
                return Err(item_not_found(prompt_id, &question_id));
            }
            ensure_live(&body.edited_options, option_text, "options")?;
            body.edited_correct_matches
                .insert(prompt_id.to_string(), option_text.to_string());
            Ok(EditOutcome::Applied)
        })
    }

    /// Appends a placeholder option (or matching prompt) unless the list is full.
    pub fn add_option(&mut self, id: &str, is_prompt: bool) -> AppResult<EditOutcome> {
        self.replace(id, |question| {
            let (items, limit) = match &mut question.body {
                EditableBody::SingleChoice(body) if !is_prompt => {
                    (&mut body.edited_options, MAX_CHOICE_OPTIONS)
                }
                EditableBody::MultipleChoice(body) if !is_prompt => {
                    (&mut body.edited_options, MAX_CHOICE_OPTIONS)
                }
                EditableBody::Matching(body) if is_prompt => {
                    (&mut body.edited_prompts, MAX_MATCHING_ITEMS)
                }
                EditableBody::Matching(body) => (&mut body.edited_options, MAX_MATCHING_ITEMS),
                _ => return Err(no_such_list(question, is_prompt)),
            };

            if items.len() >= limit {
                return Ok(EditOutcome::Rejected(EditNotice::MaximumReached { limit, is_prompt }));
            }

            items.push(EditableOption::new(placeholder_text(is_prompt, items.len() + 1)));
            Ok(EditOutcome::Applied)
        })
    }

    /// Removes an option or matching prompt unless the list is at its minimum,
    /// then repairs the correctness fields that referred to it.
    pub fn remove_option(&mut self, id: &str, item_id: &str, is_prompt: bool) -> AppResult<EditOutcome> {
        self.replace(id, |question| {
            let question_id = question.id.clone();
            match &mut question.body {
                EditableBody::SingleChoice(body) if !is_prompt => {
                    let removed = match remove_item(&mut body.edited_options, item_id, is_prompt, &question_id)? {
                        Ok(removed) => removed,
                        Err(notice) => return Ok(EditOutcome::Rejected(notice)),
                    };
                    if body.edited_correct_answer == removed.text && !has_text(&body.edited_options, &removed.text) {
                        body.edited_correct_answer = body
                            .edited_options
                            .first()
                            .map(|o| o.text.clone())
                            .unwrap_or_default();
                    }
                    Ok(EditOutcome::Applied)
                }
                EditableBody::MultipleChoice(body) if !is_prompt => {
                    let removed = match remove_item(&mut body.edited_options, item_id, is_prompt, &question_id)? {
                        Ok(removed) => removed,
                        Err(notice) => return Ok(EditOutcome::Rejected(notice)),
                    };
                    if !has_text(&body.edited_options, &removed.text) {
                        body.edited_correct_answers.retain(|a| *a != removed.text);
                    }
                    Ok(EditOutcome::Applied)
                }
                EditableBody::Matching(body) if is_prompt => {
                    let removed = match remove_item(&mut body.edited_prompts, item_id, is_prompt, &question_id)? {
                        Ok(removed) => removed,
                        Err(notice) => return Ok(EditOutcome::Rejected(notice)),
                    };
                    body.edited_correct_matches.remove(&removed.id);
                    Ok(EditOutcome::Applied)
                }
                EditableBody::Matching(body) => {
                    let removed = match remove_item(&mut body.edited_options, item_id, is_prompt, &question_id)? {
                        Ok(removed) => removed,
                        Err(notice) => return Ok(EditOutcome::Rejected(notice)),
                    };
                    if !has_text(&body.edited_options, &removed.text) {
                        body.edited_correct_matches.retain(|_, option| *option != removed.text);
                    }
                    Ok(EditOutcome::Applied)
                }
                _ => Err(no_such_list(question, is_prompt)),
            }
        })
    }

    pub fn delete_question(&mut self, id: &str) -> AppResult<EditableQuestion> {
        let index = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| question_not_found(id))?;
        Ok(self.questions.remove(index))
    }

    fn replace<F>(&mut self, id: &str, edit: F) -> AppResult<EditOutcome>
    where
        F: FnOnce(&mut EditableQuestion) -> AppResult<EditOutcome>,
    {
        let index = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| question_not_found(id))?;

        let mut updated = self.questions[index].clone();
        let outcome = edit(&mut updated)?;
        match &outcome {
            EditOutcome::Applied => self.questions[index] = updated,
            EditOutcome::Rejected(notice) => {
                log::debug!("Edit of question {} rejected: {}", id, notice)
            }
        }
        Ok(outcome)
    }
}

pub fn placeholder_text(is_prompt: bool, number: usize) -> String {
    if is_prompt {
        format!("Новый элемент {}", number)
    } else {
        format!("Новый вариант {}", number)
    }
}

fn question_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Question {} not found", id))
}

fn item_not_found(item_id: &str, question_id: &str) -> AppError {
    AppError::NotFound(format!("Item {} not found in question {}", item_id, question_id))
}

fn wrong_type(question: &EditableQuestion, expected: &str) -> AppError {
    AppError::BadRequest(format!(
        "Question {} is {}, expected {}",
        question.id,
        question.question_type(),
        expected
    ))
}

fn no_such_list(question: &EditableQuestion, is_prompt: bool) -> AppError {
    AppError::BadRequest(format!(
        "Question {} of type {} has no editable {}",
        question.id,
        question.question_type(),
        if is_prompt { "prompts" } else { "options" }
    ))
}

fn matching_body(question: &mut EditableQuestion) -> AppResult<&mut EditableMatching> {
    let id = question.id.clone();
    let question_type = question.question_type();
    match &mut question.body {
        EditableBody::Matching(body) => Ok(body),
        _ => Err(AppError::BadRequest(format!(
            "Question {} is {}, expected matching",
            id, question_type
        ))),
    }
}

fn has_text(items: &[EditableOption], text: &str) -> bool {
    items.iter().any(|item| item.text == text)
}

fn ensure_live(items: &[EditableOption], text: &str, field: &str) -> AppResult<()> {
    if has_text(items, text) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "'{}' is not one of the current {}",
            text, field
        )))
    }
}

/// Returns the previous text.
fn rename_item(
    items: &mut [EditableOption],
    item_id: &str,
    new_text: &str,
    question_id: &str,
) -> AppResult<String> {
    let item = items
        .iter_mut()
        .find(|item| item.id == item_id)
        .ok_or_else(|| item_not_found(item_id, question_id))?;
    Ok(std::mem::replace(&mut item.text, new_text.to_string()))
}

/// The outer error is a missing item; the inner one a refused bounds check.
fn remove_item(
    items: &mut Vec<EditableOption>,
    item_id: &str,
    is_prompt: bool,
    question_id: &str,
) -> AppResult<Result<EditableOption, EditNotice>> {
    let index = items
        .iter()
        .position(|item| item.id == item_id)
        .ok_or_else(|| item_not_found(item_id, question_id))?;

    if items.len() <= MIN_ITEMS {
        return Ok(Err(EditNotice::MinimumReached {
            limit: MIN_ITEMS,
            is_prompt,
        }));
    }

    Ok(Ok(items.remove(index)))
}
