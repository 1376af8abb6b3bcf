use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tokio::signal;

mod api_error;
mod auth;
mod config;
mod db;
mod http;
mod middleware;
mod models;
mod service;
mod store;
mod telemetry;

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::http::AppState;
use crate::middleware::cors_middleware;
use crate::service::PokemonService;
use crate::store::PgStore;
use crate::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> io::Result<()> {
    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize telemetry
    init_telemetry(&config.server.rust_log);

    // Create database pool and bring the schema up to date
    let db_pool = create_pool(&config)
        .await
        .expect("Failed to create database pool");
    run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let pokemon = PokemonService::new(config.pokemon_api.clone())
        .expect("Failed to build PokeAPI client");

    let state = web::Data::new(AppState::new(
        Arc::new(PgStore::new(db_pool)),
        &config,
        pokemon,
    ));

    tracing::info!(
        weekly_result_cap = config.limits.weekly_result_cap,
        "Starting weekly results server on {}:{}",
        config.server.host,
        config.server.port
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(http::json_config())
            .app_data(http::query_config())
            .wrap(cors_middleware())
            .wrap(actix_web::middleware::Logger::default())
            .configure(http::configure_routes::<PgStore>)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run();

    // Graceful shutdown
    let server_handle = server.handle();
    tokio::spawn(async move {
        signal::ctrl_c().await.expect("Failed to listen for shutdown signal");
        tracing::info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
    });

    server.await
}
