#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{
        question::{
            FillInTheBlankQuestion, MatchingQuestion, MultipleChoiceQuestion, SingleChoiceQuestion,
        },
        ContentItem, ContentType, MatchingPair,
    };

    pub fn fill_blank_question() -> FillInTheBlankQuestion {
        FillInTheBlankQuestion {
            question_text: "The capital of France is ___.".to_string(),
            correct_answer: "Paris".to_string(),
        }
    }

    pub fn single_choice_question() -> SingleChoiceQuestion {
        SingleChoiceQuestion {
            question_text: "What is the capital of France?".to_string(),
            options: vec!["Paris".into(), "London".into(), "Berlin".into()],
            correct_answer: "Paris".to_string(),
        }
    }

    pub fn multiple_choice_question() -> MultipleChoiceQuestion {
        MultipleChoiceQuestion {
            question_text: "Which of the following are primary colors?".to_string(),
            options: vec!["Red".into(), "Green".into(), "Blue".into(), "Yellow".into()],
            correct_answers: vec!["Red".into(), "Blue".into()],
        }
    }

    pub fn matching_question() -> MatchingQuestion {
        MatchingQuestion {
            question_text: "Match the countries with their capitals.".to_string(),
            prompts: vec!["France".into(), "Germany".into()],
            options: vec!["Paris".into(), "Berlin".into()],
            correct_matches: vec![
                MatchingPair {
                    prompt: "France".into(),
                    option: "Paris".into(),
                },
                MatchingPair {
                    prompt: "Germany".into(),
                    option: "Berlin".into(),
                },
            ],
        }
    }

    pub fn lecture_batch() -> Vec<ContentItem> {
        vec![
            ContentItem::text("lecture1.txt", "Photosynthesis converts light into chemical energy."),
            ContentItem::media("diagram.png", ContentType::Image, "data:image/png;base64,iVBORw0KGgo="),
            ContentItem::media("slides.pdf", ContentType::Pdf, "data:application/pdf;base64,JVBERi0xLjQ="),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_are_internally_consistent() {
        use validator::Validate;

        assert!(single_choice_question().validate().is_ok());
        assert!(multiple_choice_question().validate().is_ok());
        assert!(matching_question().validate().is_ok());
        assert!(fill_blank_question().question_text.contains("___"));
    }

    #[test]
    fn test_fixtures_lecture_batch() {
        let batch = lecture_batch();
        assert_eq!(batch.len(), 3);
        assert!(batch.iter().all(|item| item.validate().is_ok()));
    }
}
