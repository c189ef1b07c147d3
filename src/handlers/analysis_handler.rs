use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{app_state::AppState, errors::AppError, models::dto::request::AnalyzeRequestDto};

#[post("/api/analysis")]
pub async fn analyze_content(
    state: web::Data<AppState>,
    request: web::Json<AnalyzeRequestDto>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let preferred = request.preferred_model;
    let items = request.into_content_items()?;
    let response = state.workspace.analyze(items, preferred).await?;
    Ok(HttpResponse::Ok().json(response))
}
