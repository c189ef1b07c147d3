use async_graphql::{Context, Object, ID};

use crate::{
    app_state::AppState,
    errors::AppResult,
    models::{domain::ModelId, dto::response::EditResult},
    services::question_editor::EditOutcome,
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn set_question_text(
        &self,
        ctx: &Context<'_>,
        id: ID,
        text: String,
    ) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| editor.set_question_text(&id, &text))
            .await
    }

    async fn set_selected(&self, ctx: &Context<'_>, id: ID, selected: bool) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| editor.set_selected(&id, selected))
            .await
    }

    async fn set_fill_blank_answer(
        &self,
        ctx: &Context<'_>,
        id: ID,
        answer: String,
    ) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| editor.set_fill_blank_answer(&id, &answer))
            .await
    }

    /// Renames a single- or multiple-choice option, carrying its correctness along.
    async fn rename_option(
        &self,
        ctx: &Context<'_>,
        id: ID,
        option_id: ID,
        text: String,
    ) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| editor.rename_option(&id, &option_id, &text))
            .await
    }

    async fn rename_prompt_or_option(
        &self,
        ctx: &Context<'_>,
        id: ID,
        item_id: ID,
        text: String,
        is_prompt: bool,
    ) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| {
                editor.rename_prompt_or_option(&id, &item_id, &text, is_prompt)
            })
            .await
    }

    async fn set_single_choice_answer(
        &self,
        ctx: &Context<'_>,
        id: ID,
        option_text: String,
    ) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| editor.set_single_choice_answer(&id, &option_text))
            .await
    }

    async fn toggle_multiple_choice_answer(
        &self,
        ctx: &Context<'_>,
        id: ID,
        option_text: String,
        included: bool,
    ) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| {
                editor.toggle_multiple_choice_answer(&id, &option_text, included)
            })
            .await
    }

    async fn set_matching_pair(
        &self,
        ctx: &Context<'_>,
        id: ID,
        prompt_id: ID,
        option_text: String,
    ) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| editor.set_matching_pair(&id, &prompt_id, &option_text))
            .await
    }

    /// Rejected with a notice once the list is full.
    async fn add_option(
        &self,
        ctx: &Context<'_>,
        id: ID,
        #[graphql(default = false)] is_prompt: bool,
    ) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| editor.add_option(&id, is_prompt))
            .await
    }

    /// Rejected with a notice when only two items remain.
    async fn remove_option(
        &self,
        ctx: &Context<'_>,
        id: ID,
        item_id: ID,
        #[graphql(default = false)] is_prompt: bool,
    ) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state
            .workspace
            .edit(&id, |editor| editor.remove_option(&id, &item_id, is_prompt))
            .await
    }

    async fn delete_question(&self, ctx: &Context<'_>, id: ID) -> AppResult<EditResult> {
        let state = ctx.data::<AppState>()?;
        state.workspace.delete_question(&id).await?;
        Ok(EditResult::new(&EditOutcome::Applied, None))
    }

    async fn select_model(&self, ctx: &Context<'_>, model: ModelId) -> AppResult<ModelId> {
        let state = ctx.data::<AppState>()?;
        Ok(state.workspace.select_model(model).await)
    }
}
