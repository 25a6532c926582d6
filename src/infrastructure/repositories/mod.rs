pub mod anthropic_model_repository;
pub mod elevenlabs_tts_repository;
pub mod model_repository;
pub mod tts_repository;

pub use anthropic_model_repository::AnthropicModelRepository;
pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use model_repository::ModelRepository;
pub use tts_repository::TtsRepository;
