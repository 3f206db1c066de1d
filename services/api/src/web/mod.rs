pub mod chat;
pub mod rest;
pub mod state;
pub mod upload;


pub use chat::chat_handler;
pub use rest::health_handler;
pub use upload::upload_handler;

use crate::config::ConfigError;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use rest::ApiDoc;
use state::AppState;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use upload::UPLOADS_PREFIX;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Headroom above the file ceiling for multipart boundaries, part headers and small fields.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Builds the complete application router: API routes, static uploads and Swagger UI.
pub fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    let body_limit = usize::try_from(state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
        .unwrap_or(usize::MAX);
    let uploads = ServeDir::new(state.uploads.path());

    let api_router = Router::new()
        .route("/api/upload", post(upload_handler))
        .route("/api/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    Router::new()
        .merge(api_router)
        .nest_service(UPLOADS_PREFIX, uploads)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS for browser clients: a single configured origin, or any origin when unset.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, ConfigError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    Ok(match origin {
        Some(origin) => {
            let origin = origin.parse::<HeaderValue>().map_err(|e| {
                ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
            })?;
            layer.allow_origin(origin)
        }
        None => layer.allow_origin(Any),
    })
}
