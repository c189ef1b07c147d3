use std::sync::Arc;

use serde_json::Value;
use validator::Validate;

use crate::{
    constants::prompts::{
        FILL_IN_THE_BLANK_GUIDANCE, MATCHING_GUIDANCE, MULTIPLE_CHOICE_GUIDANCE,
        QUESTION_GENERATION_PROMPT, SINGLE_CHOICE_GUIDANCE,
    },
    errors::{AppResult, ModelError},
    models::domain::{Difficulty, GeneratedQuestion, ModelId, QuestionType, FALLBACK_ORDER},
    services::{
        model_selector::run_with_fallback,
        output_schema::{question_set_schema, question_set_schema_name},
        structured_output::{StructuredOutputClient, StructuredRequest},
    },
};

pub const DEFAULT_NUMBER_OF_QUESTIONS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Validate)]
pub struct GenerateQuestionsInput {
    #[validate(length(min = 1, message = "Lecture content must not be empty"))]
    pub lecture_content: String,
    #[validate(range(min = 1, max = 20))]
    pub number_of_questions: u32,
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
    pub preferred_model: Option<ModelId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedQuestions {
    pub questions: Vec<GeneratedQuestion>,
    pub used_model: ModelId,
    pub fallback_used: bool,
}

pub struct QuestionGenerationService {
    client: Arc<dyn StructuredOutputClient>,
    fallback_order: Vec<ModelId>,
}

impl QuestionGenerationService {
    pub fn new(client: Arc<dyn StructuredOutputClient>) -> Self {
        Self {
            client,
            fallback_order: FALLBACK_ORDER.to_vec(),
        }
    }

    pub async fn generate(&self, input: &GenerateQuestionsInput) -> AppResult<GeneratedQuestions> {
        input.validate()?;

        let question_type = input.question_type;
        let preferred = input
            .preferred_model
            .or_else(|| self.fallback_order.first().copied())
            .unwrap_or_default();
        let request = build_question_request(input);
        let label = format!("question generation ({})", question_type);

        log::info!(
            "Generating {} {} question(s) of {} difficulty, preferred model {}",
            input.number_of_questions,
            question_type,
            input.difficulty,
            preferred
        );

        let outcome = run_with_fallback(preferred, &self.fallback_order, &label, |model| {
            let client = Arc::clone(&self.client);
            let request = request.clone();
            async move {
                let value = client.generate(model, request).await?;
                parse_questions(model, question_type, &value)
            }
        })
        .await?;

        log::info!(
            "Generated {} {} question(s) with {}",
            outcome.result.len(),
            question_type,
            outcome.used_model
        );

        Ok(GeneratedQuestions {
            questions: outcome.result,
            used_model: outcome.used_model,
            fallback_used: outcome.fallback_used,
        })
    }
}

fn type_guidance(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::FillInTheBlank => FILL_IN_THE_BLANK_GUIDANCE,
        QuestionType::SingleChoice => SINGLE_CHOICE_GUIDANCE,
        QuestionType::MultipleChoice => MULTIPLE_CHOICE_GUIDANCE,
        QuestionType::Matching => MATCHING_GUIDANCE,
    }
}

/// Prompt plus the output schema for exactly the requested question type.
pub fn build_question_request(input: &GenerateQuestionsInput) -> StructuredRequest {
    let question_type = input.question_type;
    let prompt = QUESTION_GENERATION_PROMPT
        .replace("{number_of_questions}", &input.number_of_questions.to_string())
        .replace("{difficulty}", &input.difficulty.to_string())
        .replace("{question_type}", question_type.as_str())
        .replace("{type_guidance}", type_guidance(question_type))
        // last, so placeholders inside the lecture text stay untouched
        .replace("{lecture_content}", &input.lecture_content);

    let mut request = StructuredRequest::new(
        question_set_schema_name(question_type),
        question_set_schema(question_type),
    );
    request.push_text(prompt);
    request
}

/// Decodes `{ "questions": [...] }`.
///
/// Items with an unrecognised `type` are dropped. A recognised type other than
/// the requested one, or a question breaking its field constraints, fails the
/// whole call.
pub fn parse_questions(
    model: ModelId,
    requested: QuestionType,
    value: &Value,
) -> Result<Vec<GeneratedQuestion>, ModelError> {
    let items = value
        .get("questions")
        .and_then(Value::as_array)
        .ok_or_else(|| ModelError::SchemaViolation {
            model,
            message: "response has no 'questions' array".to_string(),
        })?;

    let mut questions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let tag = item.get("type").and_then(Value::as_str).unwrap_or_default();
        if !QuestionType::ALL.iter().any(|t| t.as_str() == tag) {
            log::error!(
                "Dropping generated question {} with unsupported type '{}' from {}",
                index,
                tag,
                model
            );
            continue;
        }

        let question: GeneratedQuestion =
            serde_json::from_value(item.clone()).map_err(|e| ModelError::SchemaViolation {
                model,
                message: format!("question {}: {}", index, e),
            })?;

        if question.question_type() != requested {
            return Err(ModelError::SchemaViolation {
                model,
                message: format!(
                    "question {} has type '{}' but '{}' was requested",
                    index,
                    question.question_type(),
                    requested
                ),
            });
        }

        question.validate().map_err(|e| ModelError::SchemaViolation {
            model,
            message: format!("question {}: {}", index, e),
        })?;

        questions.push(question);
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::AppError, services::structured_output::MockStructuredOutputClient};
    use serde_json::json;

    fn input(question_type: QuestionType) -> GenerateQuestionsInput {
        GenerateQuestionsInput {
            lecture_content: "Paris is the capital of France. Berlin is the capital of Germany."
                .to_string(),
            number_of_questions: 2,
            difficulty: Difficulty::Easy,
            question_type,
            preferred_model: None,
        }
    }

    fn matching_json() -> Value {
        json!({
            "questions": [{
                "type": "matching",
                "questionText": "Match the countries with their capitals.",
                "prompts": ["France", "Germany"],
                "options": ["Berlin", "Paris"],
                "correctMatches": [
                    { "prompt": "France", "option": "Paris" },
                    { "prompt": "Germany", "option": "Berlin" }
                ]
            }]
        })
    }

    #[test]
    fn prompt_interpolates_every_field() {
        let request = build_question_request(&input(QuestionType::SingleChoice));
        let text = request.text();

        assert!(text.contains("write 2 test questions of easy difficulty"));
        assert!(text.contains("Every question must be of type: single-choice"));
        assert!(text.contains("Paris is the capital of France."));
        assert!(text.contains("\"correctAnswer\": \"H2O\""));
        assert!(!text.contains("{lecture_content}"));
        assert_eq!(request.schema_name, "question_set_single_choice");
    }

    #[test]
    fn lecture_text_is_not_treated_as_a_template() {
        let mut generate = input(QuestionType::FillInTheBlank);
        generate.lecture_content = "Literal {difficulty} braces".to_string();

        let text = build_question_request(&generate).text();
        assert!(text.contains("Literal {difficulty} braces"));
    }

    #[tokio::test]
    async fn schema_varies_with_requested_type() {
        let mut client = MockStructuredOutputClient::new();
        client
            .expect_generate()
            .withf(|_, request| request.output_schema == question_set_schema(QuestionType::Matching))
            .times(1)
            .returning(|_, _| Ok(matching_json()));

        let service = QuestionGenerationService::new(Arc::new(client));
        let generated = service
            .generate(&input(QuestionType::Matching))
            .await
            .expect("generation should succeed");

        assert_eq!(generated.questions.len(), 1);
        assert_eq!(generated.questions[0].question_type(), QuestionType::Matching);
        assert_eq!(generated.used_model, ModelId::FlashLite);
    }

    #[tokio::test]
    async fn wrong_question_type_is_a_fatal_schema_violation() {
        let mut client = MockStructuredOutputClient::new();
        client
            .expect_generate()
            .times(1)
            .returning(|_, _| Ok(matching_json()));

        let service = QuestionGenerationService::new(Arc::new(client));
        let err = service
            .generate(&input(QuestionType::SingleChoice))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ModelFailure(_)));
        assert!(err.to_string().contains("'single-choice' was requested"));
    }

    #[test]
    fn unknown_types_are_dropped() {
        let value = json!({
            "questions": [
                { "type": "essay", "questionText": "Discuss." },
                { "type": "fill-in-the-blank", "questionText": "___ is red.", "correctAnswer": "Mars" }
            ]
        });

        let questions =
            parse_questions(ModelId::Pro, QuestionType::FillInTheBlank, &value).expect("parse");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_text(), "___ is red.");
    }

    #[test]
    fn answer_outside_options_violates_schema() {
        let value = json!({
            "questions": [{
                "type": "single-choice",
                "questionText": "Capital of France?",
                "options": ["Paris", "Lyon", "Nice"],
                "correctAnswer": "Marseille"
            }]
        });

        let err = parse_questions(ModelId::Flash, QuestionType::SingleChoice, &value).unwrap_err();
        assert!(matches!(err, ModelError::SchemaViolation { model: ModelId::Flash, .. }));
    }

    #[tokio::test]
    async fn out_of_range_count_is_rejected_without_model_call() {
        let mut client = MockStructuredOutputClient::new();
        client.expect_generate().never();

        let mut generate = input(QuestionType::Matching);
        generate.number_of_questions = 0;

        let service = QuestionGenerationService::new(Arc::new(client));
        let err = service.generate(&generate).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn every_model_overloaded_surfaces_as_unavailable() {
        let mut client = MockStructuredOutputClient::new();
        client.expect_generate().times(3).returning(|model, _| {
            Err(ModelError::Request {
                model,
                message: "503 Service Unavailable: the model is overloaded".to_string(),
            })
        });

        let service = QuestionGenerationService::new(Arc::new(client));
        let err = service
            .generate(&input(QuestionType::FillInTheBlank))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ModelUnavailable(_)));
        assert!(err.to_string().contains("gemini-2.5-pro"));
    }
}
