//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{db::DbAdapter, transcript::CaptionTrackAdapter, translate::TranslateApiAdapter},
    config::Config,
    error::ApiError,
    web::{router, state::AppState, tokens::TokenService, ApiDoc},
};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let http_client = reqwest::Client::new();
    let transcript_adapter = Arc::new(CaptionTrackAdapter::new(http_client.clone()));

    let translate_api_key = config
        .translate_api_key
        .clone()
        .ok_or_else(|| ApiError::Internal("TRANSLATE_API_KEY is required".to_string()))?;
    let translate_adapter = Arc::new(TranslateApiAdapter::new(
        http_client,
        config.translate_api_url.clone(),
        translate_api_key,
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        tokens: TokenService::new(&config.jwt_secret),
        config: config.clone(),
        transcripts: transcript_adapter,
        translator: translate_adapter,
    });

    // --- 5. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
