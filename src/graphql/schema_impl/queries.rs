use async_graphql::{Context, Object, ID};

use crate::{
    app_state::AppState,
    errors::AppResult,
    models::{
        domain::{AnalysisResult, EditableQuestion, ModelId},
        dto::response::ModelInfo,
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The live question collection, in generation order.
    async fn questions(&self, ctx: &Context<'_>) -> AppResult<Vec<EditableQuestion>> {
        let state = ctx.data::<AppState>()?;
        Ok(state.workspace.questions().await)
    }

    async fn question(&self, ctx: &Context<'_>, id: ID) -> AppResult<EditableQuestion> {
        let state = ctx.data::<AppState>()?;
        state.workspace.question(&id).await
    }

    async fn analysis(&self, ctx: &Context<'_>) -> AppResult<Option<AnalysisResult>> {
        let state = ctx.data::<AppState>()?;
        Ok(state.workspace.analysis().await)
    }

    async fn models(&self, ctx: &Context<'_>) -> AppResult<Vec<ModelInfo>> {
        let state = ctx.data::<AppState>()?;
        Ok(state.workspace.models().await)
    }

    async fn selected_model(&self, ctx: &Context<'_>) -> AppResult<ModelId> {
        let state = ctx.data::<AppState>()?;
        Ok(state.workspace.selected_model().await)
    }
}
