//! # Yatube web server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod render;
mod state;
mod telemetry;
mod urls;

use config::AppConfig;
use middleware::error::error_pages;
use render::Templates;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Yatube on {}:{}", config.host, config.port);

    let templates = Templates::load(&config.template_dir).map_err(|e| {
        tracing::error!(error = ?e, dir = %config.template_dir, "Failed to load templates");
        std::io::Error::other(e.to_string())
    })?;
    let templates = web::Data::new(templates);

    let state = web::Data::new(AppState::new(&config).await?);

    HttpServer::new(move || {
        App::new()
            .wrap(error_pages())
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(templates.clone())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
