use actix_web::{
    delete, get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, web, HttpResponse,
};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::GenerateQuestionsRequestDto,
    services::export_service::ExportFile,
};

#[post("/api/questions/generate")]
pub async fn generate_questions(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionsRequestDto>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .workspace
        .generate_questions(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/questions")]
pub async fn list_questions(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let questions = state.workspace.questions().await;
    Ok(HttpResponse::Ok().json(questions))
}

#[delete("/api/questions/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.workspace.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/questions/export/json")]
pub async fn export_json(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let file = state.workspace.export_json().await?;
    Ok(attachment(file))
}

#[get("/api/questions/export/gift")]
pub async fn export_gift(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let file = state.workspace.export_gift().await?;
    Ok(attachment(file))
}

fn attachment(file: ExportFile) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.file_name.to_string())],
        })
        .body(file.body)
}
