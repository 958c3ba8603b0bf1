// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, backend handles, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
#[cfg(test)]
mod mock;
mod models;
mod services;
mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use db::{PgPhotoRepository, PgVoteRepository};
use dotenv::dotenv;
use services::StorageClient;
use state::AppState;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    // Without its backend the service cannot answer anything
    let vote_policy = match config.validate().and(config.vote_policy.clone()) {
        Ok(policy) => policy,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Starting hotspot backend...");
    log::info!("Vote policy: {:?}", vote_policy);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Build the shared backend handles once
    let storage = StorageClient::new(
        config.supabase_url.clone(),
        config.supabase_key.clone(),
        config.storage_bucket.clone(),
    );
    log::info!("Uploads go to bucket '{}'", config.storage_bucket);

    let state = web::Data::new(AppState::new(
        Arc::new(PgPhotoRepository::new(pool.clone())),
        Arc::new(PgVoteRepository::new(pool)),
        Arc::new(storage),
        vote_policy,
        config.max_upload_bytes,
    ));

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::photos_config)
            .configure(handlers::votes_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
