use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studycast_backend::controllers::{audio::AudioController, study::StudyController};
use studycast_backend::domain::{
    audio::AudioService, extraction::ExtractionService, study::StudyService,
};
use studycast_backend::infrastructure::config::{Config, LogFormat};
use studycast_backend::infrastructure::http::start_http_server;
use studycast_backend::infrastructure::repositories::{
    AnthropicModelRepository, ElevenLabsTtsRepository, ModelRepository, TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Studycast Backend on {}:{}",
        config.host,
        config.port
    );

    if !config.has_model_credentials() {
        tracing::warn!(
            "ANTHROPIC_API_KEY not set. Study material requests will return placeholder content."
        );
    }
    if !config.has_tts_credentials() {
        tracing::warn!(
            "ELEVENLABS_API_KEY not set. Audio narration will return placeholder audio."
        );
    }

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (provider clients)
    tracing::info!("Instantiating repositories...");
    let model_repo: Arc<dyn ModelRepository> = Arc::new(AnthropicModelRepository::new(
        config.anthropic_api_key.clone(),
        config.anthropic_model.clone(),
    ));
    let tts_repo: Arc<dyn TtsRepository> = Arc::new(ElevenLabsTtsRepository::new(
        config.elevenlabs_api_key.clone(),
        config.elevenlabs_voice_id.clone(),
    ));

    // 2. Instantiate services (inject repositories)
    tracing::info!("Instantiating services...");
    let extraction_service = Arc::new(ExtractionService::new());
    let study_service = Arc::new(StudyService::new(model_repo));
    let audio_service = Arc::new(AudioService::new(tts_repo, config.tts_cache_enabled));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let study_controller = Arc::new(StudyController::new(study_service, extraction_service));
    let audio_controller = Arc::new(AudioController::new(audio_service));

    // Start HTTP server with all routes
    start_http_server(config, study_controller, audio_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "studycast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "studycast_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
