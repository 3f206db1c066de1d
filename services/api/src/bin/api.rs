//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{EnvCredentials, OpenAiCompletionAdapter, UploadDir},
    config::{Config, API_KEY_VAR},
    error::ApiError,
    web::{cors_layer, router, state::AppState},
};
use relay_core::{ChatRelay, MAX_UPLOAD_BYTES};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Prepare the Upload Directory ---
    let uploads = UploadDir::create(&config.upload_dir).await?;

    // --- 3. Initialize the Completion Adapter ---
    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .map_err(|e| ApiError::Internal(format!("Failed to build HTTP client: {e}")))?;
    let completion = Arc::new(OpenAiCompletionAdapter::new(
        http,
        config.api_base.clone(),
        config.chat_model.clone(),
    ));
    let credentials = Arc::new(EnvCredentials::new(API_KEY_VAR));
    if std::env::var(API_KEY_VAR).is_err() {
        warn!("{} is not set; chat requests will fail until it is provided", API_KEY_VAR);
    }

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        uploads,
        max_upload_bytes: MAX_UPLOAD_BYTES,
        public_base_url: config.public_base_url.clone(),
        relay: ChatRelay::new(completion, credentials),
    });

    // --- 5. Create the Web Router ---
    let cors = cors_layer(config.cors_origin.as_deref())?;
    let app = router(app_state, cors);

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
