use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::repositories::TtsRepository;

/// Tiny silent MP3 served whenever synthesis is unavailable, so the player
/// UI always has something to load.
const PLACEHOLDER_AUDIO_URL: &str = "data:audio/mpeg;base64,SUQzBAAAAAABEVRYWFgAAAAtAAADY29tbWVudABCaWdTb3VuZEJhbmsuY29tIC8gTGFTb25vdGhlcXVlLm9yZwBURU5DAAAAHQAAAW1wM1BSRQAAAAAAAAAAAAAAAAAAAAAAAAAAAP/70DEAAAIAMH2cQIQlAAAKAwAAAP/70DEIAAUcCZJM4JLAAAADoYB5M4JJAAIKAwAAg==";

/// A narration ready for embedding: a self-contained audio data URL plus
/// the text that was spoken.
#[derive(Debug, Clone, Serialize)]
pub struct AudioSummary {
    pub audio_url: String,
    pub transcript: String,
}

pub struct AudioService {
    tts_repo: Arc<dyn TtsRepository>,
    cache: Option<Cache<String, String>>,
}

impl AudioService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, cache_enabled: bool) -> Self {
        // Narrations are deterministic per text, so a small idle-expiring
        // cache saves repeat synthesis of the same summary
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self { tts_repo, cache }
    }
}

#[async_trait]
pub trait AudioServiceApi: Send + Sync {
    /// Synthesize a narration for the given text.
    ///
    /// Never fails: provider errors and missing credentials yield the
    /// placeholder audio with the original transcript.
    async fn narrate(&self, text: &str) -> AudioSummary;
}

#[async_trait]
impl AudioServiceApi for AudioService {
    async fn narrate(&self, text: &str) -> AudioSummary {
        tracing::info!(text_length = text.len(), "Audio narration request");

        if let Some(cache) = &self.cache {
            if let Some(audio_url) = cache.get(text).await {
                tracing::info!(
                    text_length = text.len(),
                    cached_url_size = audio_url.len(),
                    "Audio cache hit - returning cached narration"
                );
                return AudioSummary {
                    audio_url,
                    transcript: text.to_string(),
                };
            }
        }

        match self.tts_repo.synthesize(text).await {
            Ok(audio_data) => {
                let audio_url = encode_data_url(&audio_data);

                tracing::info!(
                    audio_size_bytes = audio_data.len(),
                    "Audio narration synthesized"
                );

                if let Some(cache) = &self.cache {
                    cache.insert(text.to_string(), audio_url.clone()).await;
                }

                AudioSummary {
                    audio_url,
                    transcript: text.to_string(),
                }
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "TTS synthesis failed, returning placeholder audio"
                );
                AudioSummary {
                    audio_url: PLACEHOLDER_AUDIO_URL.to_string(),
                    transcript: text.to_string(),
                }
            }
        }
    }
}

/// Encode merged MP3 bytes as a data URL playable and downloadable from the
/// browser without a separate media endpoint.
fn encode_data_url(audio_data: &[u8]) -> String {
    format!("data:audio/mpeg;base64,{}", STANDARD.encode(audio_data))
}
