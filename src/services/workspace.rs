//! The single live workspace: the current analysis, the editable question
//! collection and the model selected for the next task.

use std::sync::Arc;

use tokio::sync::RwLock;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AnalysisResult, ContentItem, EditableQuestion, ModelId, FALLBACK_ORDER},
        dto::{
            request::GenerateQuestionsRequestDto,
            response::{
                AnalysisResponse, DeleteQuestionResponse, EditResult, GenerateQuestionsResponse,
                ModelInfo, NoticeDto,
            },
        },
    },
    services::{
        analysis_service::AnalysisService,
        export_service::{self, ExportFile},
        question_editor::{EditOutcome, QuestionEditor},
        question_generation_service::{GenerateQuestionsInput, QuestionGenerationService},
        structured_output::StructuredOutputClient,
    },
};

#[derive(Clone, Debug, Default)]
pub struct Workspace {
    pub analysis: Option<AnalysisResult>,
    pub editor: QuestionEditor,
    pub selected_model: ModelId,
    /// Bumped whenever a task starts that supersedes earlier in-flight ones.
    epoch: u64,
}

impl Workspace {
    pub fn new(selected_model: ModelId) -> Self {
        Self {
            selected_model,
            ..Default::default()
        }
    }

    /// Drops the previous analysis and questions. Returns the new epoch.
    pub fn start_new_batch(&mut self) -> u64 {
        self.analysis = None;
        self.editor = QuestionEditor::default();
        self.epoch += 1;
        self.epoch
    }

    /// Clears the questions ahead of a generation. Returns the new epoch.
    pub fn start_generation(&mut self) -> u64 {
        self.editor = QuestionEditor::default();
        self.epoch += 1;
        self.epoch
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Switches to `used` when it differs from `preferred` and returns the
    /// advisory notice for the switch.
    pub fn record_model_use(
        &mut self,
        preferred: ModelId,
        used: ModelId,
        title: &str,
    ) -> Option<NoticeDto> {
        if used == preferred {
            return None;
        }

        log::warn!("Model {} did not respond, switching to {}", preferred, used);
        self.selected_model = used;
        Some(NoticeDto {
            title: title.to_string(),
            message: format!(
                "Модель «{}» не отвечает, использована «{}».",
                preferred.short_label(),
                used.short_label()
            ),
        })
    }
}

pub struct WorkspaceService {
    state: RwLock<Workspace>,
    analysis_service: AnalysisService,
    question_generation_service: QuestionGenerationService,
}

impl WorkspaceService {
    pub fn new(client: Arc<dyn StructuredOutputClient>, default_model: ModelId) -> Self {
        Self {
            state: RwLock::new(Workspace::new(default_model)),
            analysis_service: AnalysisService::new(Arc::clone(&client)),
            question_generation_service: QuestionGenerationService::new(client),
        }
    }

    /// Starts a new batch and analyzes it.
    pub async fn analyze(
        &self,
        items: Vec<ContentItem>,
        preferred: Option<ModelId>,
    ) -> AppResult<AnalysisResponse> {
        let (epoch, preferred) = {
            let mut workspace = self.state.write().await;
            let epoch = workspace.start_new_batch();
            (epoch, preferred.unwrap_or(workspace.selected_model))
        };

        let result = self.analysis_service.analyze(&items, Some(preferred)).await?;

        let mut workspace = self.state.write().await;
        if !workspace.is_current(epoch) {
            log::info!(
                "Discarding analysis of {} item(s): superseded by a newer task",
                items.len()
            );
            return Ok(AnalysisResponse::new(result, None));
        }
        let notice = workspace.record_model_use(preferred, result.used_model, "Анализ завершен");
        workspace.analysis = Some(result.clone());

        log::info!(
            "Analysis of {} item(s) stored ({} concepts, {} themes)",
            items.len(),
            result.key_concepts.len(),
            result.themes.len()
        );
        Ok(AnalysisResponse::new(result, notice))
    }

    /// Generates questions from the given lecture content, or from the stored
    /// analysis summary, and replaces the editable collection with them.
    pub async fn generate_questions(
        &self,
        request: GenerateQuestionsRequestDto,
    ) -> AppResult<GenerateQuestionsResponse> {
        request.validate()?;

        let (epoch, lecture_content, preferred) = {
            let mut workspace = self.state.write().await;
            let lecture_content = match request.lecture_content {
                Some(content) => content,
                None => workspace
                    .analysis
                    .as_ref()
                    .map(|analysis| analysis.summary.clone())
                    .filter(|summary| !summary.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::ValidationError(
                            "No analysis data available for question generation.".to_string(),
                        )
                    })?,
            };
            (
                workspace.start_generation(),
                lecture_content,
                request.preferred_model.unwrap_or(workspace.selected_model),
            )
        };

        let input = GenerateQuestionsInput {
            lecture_content,
            number_of_questions: request.number_of_questions,
            difficulty: request.question_difficulty,
            question_type: request.question_type,
            preferred_model: Some(preferred),
        };
        let generated = self.question_generation_service.generate(&input).await?;

        let mut workspace = self.state.write().await;
        if !workspace.is_current(epoch) {
            log::info!(
                "Discarding {} generated question(s): superseded by a newer task",
                generated.questions.len()
            );
            return Ok(GenerateQuestionsResponse {
                questions: QuestionEditor::from_generated(generated.questions)
                    .questions()
                    .to_vec(),
                used_model: generated.used_model,
                fallback_used: generated.fallback_used,
                notice: None,
            });
        }
        let notice =
            workspace.record_model_use(preferred, generated.used_model, "Вопросы сгенерированы");
        workspace.editor = QuestionEditor::from_generated(generated.questions);

        Ok(GenerateQuestionsResponse {
            questions: workspace.editor.questions().to_vec(),
            used_model: generated.used_model,
            fallback_used: generated.fallback_used,
            notice,
        })
    }

    pub async fn questions(&self) -> Vec<EditableQuestion> {
        self.state.read().await.editor.questions().to_vec()
    }

    pub async fn question(&self, id: &str) -> AppResult<EditableQuestion> {
        self.state.read().await.editor.get(id).cloned()
    }

    pub async fn analysis(&self) -> Option<AnalysisResult> {
        self.state.read().await.analysis.clone()
    }

    pub async fn selected_model(&self) -> ModelId {
        self.state.read().await.selected_model
    }

    pub async fn select_model(&self, model: ModelId) -> ModelId {
        let mut workspace = self.state.write().await;
        workspace.selected_model = model;
        model
    }

    pub async fn models(&self) -> Vec<ModelInfo> {
        let selected = self.selected_model().await;
        FALLBACK_ORDER
            .iter()
            .map(|model| ModelInfo::new(*model, selected))
            .collect()
    }

    /// Applies one editor transition and reports the question as it now stands.
    pub async fn edit<F>(&self, question_id: &str, edit: F) -> AppResult<EditResult>
    where
        F: FnOnce(&mut QuestionEditor) -> AppResult<EditOutcome>,
    {
        let mut workspace = self.state.write().await;
        let outcome = edit(&mut workspace.editor)?;
        let question = workspace.editor.get(question_id).ok().cloned();
        Ok(EditResult::new(&outcome, question))
    }

    pub async fn delete_question(&self, id: &str) -> AppResult<DeleteQuestionResponse> {
        let mut workspace = self.state.write().await;
        let deleted = workspace.editor.delete_question(id)?;
        log::info!("Deleted question {}", deleted.id);
        Ok(DeleteQuestionResponse {
            id: deleted.id,
            message: "Вопрос удален".to_string(),
        })
    }

    pub async fn export_json(&self) -> AppResult<ExportFile> {
        let workspace = self.state.read().await;
        export_service::export_json(&workspace.editor.export_view())
    }

    pub async fn export_gift(&self) -> AppResult<ExportFile> {
        let workspace = self.state.read().await;
        export_service::export_gift(&workspace.editor.export_view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::ModelError,
        models::domain::{EditableBody, QuestionType},
        services::{
            analysis_service::ANALYSIS_SCHEMA_NAME,
            structured_output::{MockStructuredOutputClient, StructuredRequest},
        },
        test_utils::fixtures::lecture_batch,
    };
    use serde_json::{json, Value};

    fn analysis_json() -> Value {
        json!({
            "keyConcepts": ["light reactions"],
            "themes": ["energy"],
            "summary": "Photosynthesis converts light into chemical energy."
        })
    }

    fn single_choice_json() -> Value {
        json!({
            "questions": [{
                "type": "single-choice",
                "questionText": "What does photosynthesis produce?",
                "options": ["Glucose", "Salt", "Iron"],
                "correctAnswer": "Glucose"
            }]
        })
    }

    fn scripted_client(first_model_overloaded: bool) -> Arc<MockStructuredOutputClient> {
        let mut client = MockStructuredOutputClient::new();
        client.expect_generate().returning(move |model, request| {
            if first_model_overloaded && model == ModelId::FlashLite {
                return Err(ModelError::Request {
                    model,
                    message: "503 Service Unavailable".to_string(),
                });
            }
            if request.schema_name == ANALYSIS_SCHEMA_NAME {
                Ok(analysis_json())
            } else {
                Ok(single_choice_json())
            }
        });
        Arc::new(client)
    }

    fn generate_request() -> GenerateQuestionsRequestDto {
        serde_json::from_value(json!({ "questionType": "single-choice" })).unwrap()
    }

    #[tokio::test]
    async fn generation_uses_stored_summary() {
        let service = WorkspaceService::new(scripted_client(false), ModelId::FlashLite);

        let analysis = service.analyze(lecture_batch(), None).await.unwrap();
        assert!(analysis.notice.is_none());

        let response = service.generate_questions(generate_request()).await.unwrap();
        assert_eq!(response.questions.len(), 1);
        assert_eq!(response.questions[0].question_type(), QuestionType::SingleChoice);
        assert_eq!(service.questions().await.len(), 1);
    }

    #[tokio::test]
    async fn generation_without_analysis_is_rejected() {
        let service = WorkspaceService::new(scripted_client(false), ModelId::FlashLite);

        let err = service.generate_questions(generate_request()).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn new_batch_discards_previous_questions() {
        let service = WorkspaceService::new(scripted_client(false), ModelId::FlashLite);
        service.analyze(lecture_batch(), None).await.unwrap();
        service.generate_questions(generate_request()).await.unwrap();

        service.analyze(lecture_batch(), None).await.unwrap();

        assert!(service.questions().await.is_empty());
        assert!(service.analysis().await.is_some());
    }

    #[tokio::test]
    async fn fallback_switches_selected_model_with_notice() {
        let service = WorkspaceService::new(scripted_client(true), ModelId::FlashLite);

        let response = service.analyze(lecture_batch(), None).await.unwrap();

        assert!(response.fallback_used);
        assert_eq!(response.used_model, ModelId::Flash);
        let notice = response.notice.expect("fallback notice");
        assert_eq!(notice.message, "Модель «Flash-Lite» не отвечает, использована «Flash».");
        assert_eq!(service.selected_model().await, ModelId::Flash);

        let models = service.models().await;
        assert!(models.iter().any(|m| m.id == ModelId::Flash && m.selected));
    }

    #[tokio::test]
    async fn edits_and_exports_go_through_the_live_collection() {
        let service = WorkspaceService::new(scripted_client(false), ModelId::FlashLite);
        service.analyze(lecture_batch(), None).await.unwrap();
        let generated = service.generate_questions(generate_request()).await.unwrap();
        let question = &generated.questions[0];
        let EditableBody::SingleChoice(body) = &question.body else {
            panic!("expected single-choice");
        };
        let glucose_id = body.edited_options[0].id.clone();

        let result = service
            .edit(&question.id, |editor| {
                editor.rename_option(&question.id, &glucose_id, "Sugar {C6H12O6}")
            })
            .await
            .unwrap();
        assert!(result.applied);

        let gift = service.export_gift().await.unwrap();
        assert!(gift.body.contains(r"=Sugar \{C6H12O6\}"));

        service.delete_question(&question.id).await.unwrap();
        assert!(matches!(
            service.export_json().await,
            Err(AppError::BadRequest(_))
        ));
    }

    /// Holds any call whose prompt mentions `old.txt` until released.
    struct GatedClient {
        started: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    impl GatedClient {
        fn new() -> Arc<Self> {
            Arc::new(GatedClient {
                started: tokio::sync::Notify::new(),
                release: tokio::sync::Notify::new(),
            })
        }
    }

    #[async_trait::async_trait]
    impl StructuredOutputClient for GatedClient {
        async fn generate(
            &self,
            _model: ModelId,
            request: StructuredRequest,
        ) -> Result<Value, ModelError> {
            let is_old = request.text().contains("old.txt");
            if is_old {
                self.started.notify_one();
                self.release.notified().await;
            }

            if request.schema_name == ANALYSIS_SCHEMA_NAME {
                let summary = if is_old { "Old batch summary" } else { "New batch summary" };
                Ok(json!({ "keyConcepts": [], "themes": [], "summary": summary }))
            } else {
                Ok(single_choice_json())
            }
        }
    }

    #[tokio::test]
    async fn late_analysis_of_superseded_batch_is_discarded() {
        let client = GatedClient::new();
        let service = Arc::new(WorkspaceService::new(client.clone(), ModelId::FlashLite));

        let old = tokio::spawn({
            let service = Arc::clone(&service);
            async move {
                service
                    .analyze(vec![ContentItem::text("old.txt", "old lecture")], None)
                    .await
            }
        });
        client.started.notified().await;

        service
            .analyze(vec![ContentItem::text("new.txt", "new lecture")], None)
            .await
            .unwrap();
        client.release.notify_one();
        let old_response = old.await.unwrap().unwrap();

        assert_eq!(old_response.summary, "Old batch summary");
        let stored = service.analysis().await.expect("analysis stored");
        assert_eq!(stored.summary, "New batch summary");
    }

    #[tokio::test]
    async fn late_generation_does_not_repopulate_a_new_batch() {
        let client = GatedClient::new();
        let service = Arc::new(WorkspaceService::new(client.clone(), ModelId::FlashLite));

        let generation = tokio::spawn({
            let service = Arc::clone(&service);
            async move {
                let request: GenerateQuestionsRequestDto = serde_json::from_value(json!({
                    "lectureContent": "Notes from old.txt",
                    "questionType": "single-choice"
                }))
                .unwrap();
                service.generate_questions(request).await
            }
        });
        client.started.notified().await;

        service
            .analyze(vec![ContentItem::text("new.txt", "new lecture")], None)
            .await
            .unwrap();
        client.release.notify_one();
        let response = generation.await.unwrap().unwrap();

        assert_eq!(response.questions.len(), 1);
        assert!(service.questions().await.is_empty());
        assert_eq!(
            service.analysis().await.map(|a| a.summary),
            Some("New batch summary".to_string())
        );
    }
}
