use actix_web::{get, put, web, HttpResponse};
use serde::Deserialize;

use crate::{app_state::AppState, errors::AppError, models::domain::ModelId};

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/api/models")]
pub async fn list_models(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let models = state.workspace.models().await;
    let selected = state.workspace.selected_model().await;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "models": models,
        "selectedModel": selected
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectModelRequest {
    pub model: ModelId,
}

#[put("/api/models/selected")]
pub async fn select_model(
    state: web::Data<AppState>,
    request: web::Json<SelectModelRequest>,
) -> Result<HttpResponse, AppError> {
    let selected = state.workspace.select_model(request.model).await;
    log::info!("Selected model set to {}", selected);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "selectedModel": selected })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, services::structured_output::MockStructuredOutputClient};
    use actix_web::{test, App};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::with_client(
            Config::test_config(),
            Arc::new(MockStructuredOutputClient::new()),
        )
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;

        let req = test::TestRequest::get().uri("/health").to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_models_are_listed_in_fallback_order() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .service(list_models),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/models").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["selectedModel"], "gemini-2.5-flash-lite");
        assert_eq!(body["models"][0]["id"], "gemini-2.5-flash-lite");
        assert_eq!(body["models"][0]["label"], "Flash-Lite (по умолчанию)");
        assert_eq!(body["models"][2]["id"], "gemini-2.5-pro");
    }

    #[actix_web::test]
    async fn test_select_model() {
        let state = state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .service(select_model),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/models/selected")
            .set_json(serde_json::json!({ "model": "gemini-2.5-pro" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(state.workspace.selected_model().await, ModelId::Pro);
    }
}
