use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{GeneratedQuestion, QuestionSet},
};

pub const JSON_EXPORT_FILE_NAME: &str = "test_questions.json";
pub const GIFT_EXPORT_FILE_NAME: &str = "test_questions.txt";

const NOTHING_SELECTED: &str =
    "Нет выбранных вопросов. Пожалуйста, выберите вопросы для сохранения.";

static GIFT_SPECIAL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[~=#{}]").expect("GIFT escape pattern is valid"));

/// A rendered export ready to be sent as a download.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

fn ensure_selection(questions: &[GeneratedQuestion]) -> AppResult<()> {
    if questions.is_empty() {
        return Err(AppError::BadRequest(NOTHING_SELECTED.to_string()));
    }
    Ok(())
}

/// `{"questions": [...]}`, pretty-printed.
pub fn export_json(questions: &[GeneratedQuestion]) -> AppResult<ExportFile> {
    ensure_selection(questions)?;

    let document = QuestionSet {
        questions: questions.to_vec(),
    };
    let body = serde_json::to_string_pretty(&document)?;

    log::info!("Exported {} question(s) as JSON", questions.len());
    Ok(ExportFile {
        file_name: JSON_EXPORT_FILE_NAME,
        content_type: "application/json; charset=utf-8",
        body,
    })
}

pub fn export_gift(questions: &[GeneratedQuestion]) -> AppResult<ExportFile> {
    ensure_selection(questions)?;

    let body = questions
        .iter()
        .enumerate()
        .map(|(index, question)| gift_question(index + 1, question))
        .collect::<Vec<_>>()
        .join("\n\n");

    log::info!("Exported {} question(s) as GIFT", questions.len());
    Ok(ExportFile {
        file_name: GIFT_EXPORT_FILE_NAME,
        content_type: "text/plain; charset=utf-8",
        body,
    })
}

/// Prefixes `~ = # { }` with a backslash.
pub fn escape_gift(text: &str) -> String {
    GIFT_SPECIAL_CHARS.replace_all(text, r"\$0").into_owned()
}

fn gift_question(number: usize, question: &GeneratedQuestion) -> String {
    let title = format!("::Вопрос {}::", number);
    let question_text = escape_gift(question.question_text());

    match question {
        GeneratedQuestion::FillInTheBlank(q) => {
            let answer = format!("{{={}}}", escape_gift(&q.correct_answer));
            format!("{}{}", title, question_text.replacen("___", &answer, 1))
        }
        GeneratedQuestion::SingleChoice(q) => {
            let answers = q
                .options
                .iter()
                .map(|option| {
                    let marker = if *option == q.correct_answer { '=' } else { '~' };
                    format!("{}{}", marker, escape_gift(option))
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("{}{} {{{}}}", title, question_text, answers)
        }
        GeneratedQuestion::MultipleChoice(q) => {
            let correct_weight = if q.correct_answers.is_empty() {
                0.0
            } else {
                100.0 / q.correct_answers.len() as f64
            };
            let answers = q
                .options
                .iter()
                .map(|option| {
                    if q.correct_answers.contains(option) {
                        format!("~%{}%{}", correct_weight, escape_gift(option))
                    } else {
                        format!("~%0%{}", escape_gift(option))
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("{}{} {{{}}}", title, question_text, answers)
        }
        GeneratedQuestion::Matching(q) => {
            let pairs = q
                .correct_matches
                .iter()
                .map(|pair| format!("={} -> {}", escape_gift(&pair.prompt), escape_gift(&pair.option)))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{}{} {{{}}}", title, question_text, pairs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::question::{FillInTheBlankQuestion, MultipleChoiceQuestion},
        test_utils::fixtures::*,
    };

    #[test]
    fn escape_prefixes_every_special_character() {
        assert_eq!(escape_gift("a~b=c#d{e}f"), r"a\~b\=c\#d\{e\}f");
        assert_eq!(escape_gift("plain text"), "plain text");
    }

    #[test]
    fn fill_in_the_blank_is_escaped_then_filled() {
        let question = GeneratedQuestion::FillInTheBlank(FillInTheBlankQuestion {
            question_text: "What is 2+2={4}? The answer is ___".to_string(),
            correct_answer: "4".to_string(),
        });

        let file = export_gift(&[question]).unwrap();

        assert_eq!(
            file.body,
            r"::Вопрос 1::What is 2+2\=\{4\}? The answer is {=4}"
        );
    }

    #[test]
    fn only_first_blank_is_filled() {
        let question = GeneratedQuestion::FillInTheBlank(FillInTheBlankQuestion {
            question_text: "___ and ___".to_string(),
            correct_answer: "x=y".to_string(),
        });

        let file = export_gift(&[question]).unwrap();
        assert_eq!(file.body, r"::Вопрос 1::{=x\=y} and ___");
    }

    #[test]
    fn single_choice_marks_correct_option() {
        let file = export_gift(&[GeneratedQuestion::SingleChoice(single_choice_question())]).unwrap();

        assert_eq!(
            file.body,
            "::Вопрос 1::What is the capital of France? {=Paris ~London ~Berlin}"
        );
    }

    #[test]
    fn multiple_choice_splits_weight_across_correct_options() {
        let file =
            export_gift(&[GeneratedQuestion::MultipleChoice(multiple_choice_question())]).unwrap();

        assert_eq!(
            file.body,
            "::Вопрос 1::Which of the following are primary colors? {~%50%Red ~%0%Green ~%50%Blue ~%0%Yellow}"
        );
    }

    #[test]
    fn multiple_choice_weight_is_not_rounded() {
        let question = GeneratedQuestion::MultipleChoice(MultipleChoiceQuestion {
            question_text: "Pick".to_string(),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answers: vec!["A".into(), "B".into(), "C".into()],
        });

        let file = export_gift(&[question]).unwrap();
        assert!(file.body.contains("~%33.333333333333336%A"));
    }

    #[test]
    fn matching_emits_correct_pairs_only() {
        let file = export_gift(&[GeneratedQuestion::Matching(matching_question())]).unwrap();

        assert_eq!(
            file.body,
            "::Вопрос 1::Match the countries with their capitals. {=France -> Paris =Germany -> Berlin}"
        );
    }

    #[test]
    fn questions_are_numbered_and_separated_by_blank_line() {
        let file = export_gift(&[
            GeneratedQuestion::FillInTheBlank(fill_blank_question()),
            GeneratedQuestion::SingleChoice(single_choice_question()),
        ])
        .unwrap();

        let blocks: Vec<&str> = file.body.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("::Вопрос 1::The capital of France is {=Paris}."));
        assert!(blocks[1].starts_with("::Вопрос 2::What is the capital"));
        assert_eq!(file.file_name, "test_questions.txt");
    }

    #[test]
    fn json_export_wraps_questions() {
        let questions = vec![
            GeneratedQuestion::SingleChoice(single_choice_question()),
            GeneratedQuestion::Matching(matching_question()),
        ];

        let file = export_json(&questions).unwrap();
        let parsed: QuestionSet = serde_json::from_str(&file.body).unwrap();

        assert_eq!(parsed.questions, questions);
        assert!(file.body.starts_with("{\n  \"questions\": ["));
        assert_eq!(file.file_name, "test_questions.json");
    }

    #[test]
    fn empty_selection_produces_no_file() {
        assert!(matches!(export_json(&[]), Err(AppError::BadRequest(_))));
        assert!(matches!(export_gift(&[]), Err(AppError::BadRequest(_))));
    }
}
