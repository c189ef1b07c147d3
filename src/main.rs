use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use lecture_quiz_server::{
    app_state::AppState, config::Config, graphql::create_schema, handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if let Err(err) = config.validate() {
        log::error!("Invalid configuration: {}", err);
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            err.to_string(),
        ));
    }

    let bind_address = (config.web_server_host.clone(), config.web_server_port);
    let cors_origin = config.cors_allowed_origin.clone();
    let app_state = AppState::new(config);
    let schema = create_schema(app_state.clone());

    log::info!(
        "Starting HTTP server on http://{}:{}",
        bind_address.0,
        bind_address.1
    );
    log::info!(
        "GraphiQL playground: http://{}:{}/graphiql",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .expose_headers(["content-disposition", "x-request-id"])
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .app_data(web::JsonConfig::default().limit(32 * 1024 * 1024))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .service(handlers::health_check)
            .service(handlers::list_models)
            .service(handlers::select_model)
            .service(handlers::analyze_content)
            .service(handlers::generate_questions)
            .service(handlers::list_questions)
            .service(handlers::delete_question)
            .service(handlers::export_json)
            .service(handlers::export_gift)
            .service(handlers::graphql)
            .service(handlers::graphiql)
    })
    .bind(bind_address)?
    .run()
    .await
}
