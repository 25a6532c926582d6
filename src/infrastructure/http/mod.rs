pub mod request_id;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{audio::AudioController, health, study::StudyController};
use crate::infrastructure::config::Config;
use self::request_id::request_id_middleware;

/// Uploads are capped at 10MB; the body limit leaves headroom for the
/// multipart framing around them.
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

/// Build the application router with all routes configured
pub fn build_router(
    config: Arc<Config>,
    study_controller: Arc<StudyController>,
    audio_controller: Arc<AudioController>,
) -> Router {
    // Upload route (multipart, raised body limit)
    let study_routes = Router::new()
        .route("/api/generate", post(StudyController::generate))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(study_controller);

    // Audio narration route
    let audio_routes = Router::new()
        .route("/api/generate-audio", post(AudioController::generate_audio))
        .with_state(audio_controller);

    // Health routes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(config);

    Router::new()
        .merge(health_routes)
        .merge(study_routes)
        .merge(audio_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    study_controller: Arc<StudyController>,
    audio_controller: Arc<AudioController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(config.clone(), study_controller, audio_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
