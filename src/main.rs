use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use questionnaire_server::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&state.config.cors_allowed_origin)
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(state.jwt_service.as_ref().clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(handlers::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
