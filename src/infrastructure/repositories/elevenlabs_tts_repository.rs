use super::tts_repository::TtsRepository;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// ElevenLabs has a limit of 5000 characters per request
const MAX_BATCH_SIZE: usize = 5000;

/// Short pause between batch requests to stay under the provider's rate limit
const BATCH_DELAY: Duration = Duration::from_millis(100);

const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const MODEL_ID: &str = "eleven_monolingual_v1";
const OUTPUT_FORMAT: &str = "mp3_44100_128";

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
    output_format: &'a str,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl VoiceSettings {
    fn narration() -> Self {
        Self {
            stability: 0.6,
            similarity_boost: 0.7,
            style: 0.2,
            use_speaker_boost: true,
        }
    }
}

impl ElevenLabsTtsRepository {
    pub fn new(api_key: String, voice_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            voice_id,
        }
    }

    /// Call the ElevenLabs API to synthesize a single text batch
    async fn call_elevenlabs(&self, text: &str) -> Result<Vec<u8>, String> {
        tracing::info!(
            voice_id = %self.voice_id,
            model_id = MODEL_ID,
            text_length = text.len(),
            text_preview = &text[..text.len().min(200)],
            "Calling ElevenLabs text-to-speech"
        );

        let request = SpeechRequest {
            text,
            model_id: MODEL_ID,
            voice_settings: VoiceSettings::narration(),
            output_format: OUTPUT_FORMAT,
        };

        let response = self
            .client
            .post(format!("{}/{}", ELEVENLABS_API_URL, self.voice_id))
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                tracing::error!(error = %error, "ElevenLabs request failed");
                format!("ElevenLabs request failed: {}", error)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(
                status = %status,
                voice_id = %self.voice_id,
                text_length = text.len(),
                "ElevenLabs API returned an error"
            );
            return Err(format!("ElevenLabs API error: {}", status));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|error| {
                tracing::error!(error = %error, "Failed to read ElevenLabs audio body");
                format!("Failed to read audio body: {}", error)
            })?
            .to_vec();

        tracing::debug!(
            audio_size = audio_bytes.len(),
            "ElevenLabs audio received successfully"
        );

        Ok(audio_bytes)
    }

    /// Synthesize multiple text batches and merge the audio results in order
    async fn synthesize_batches(&self, batches: &[String]) -> Result<Vec<u8>, String> {
        let mut merged_audio = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            tracing::info!(
                batch_index = index,
                batch_size = batch.len(),
                "Synthesizing batch"
            );

            let audio_data = self.call_elevenlabs(batch).await?;
            merged_audio.extend(audio_data);

            tracing::info!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );

            if index + 1 < batches.len() {
                tokio::time::sleep(BATCH_DELAY).await;
            }
        }

        Ok(merged_audio)
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, String> {
        if self.api_key.is_empty() {
            return Err("ELEVENLABS_API_KEY is not configured".to_string());
        }

        let start_time = std::time::Instant::now();

        // Split text into batches based on the provider's limitations
        let batches = split_into_batches(text);
        tracing::info!(
            batch_count = batches.len(),
            text_length = text.len(),
            "Text split into batches"
        );

        // Synthesize each batch and merge results
        let audio_data = self.synthesize_batches(&batches).await?;

        let duration = start_time.elapsed();
        let characters_count = text.len();
        let throughput_chars_per_sec = if duration.as_secs_f64() > 0.0 {
            characters_count as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        tracing::info!(
            provider = "elevenlabs",
            voice_id = %self.voice_id,
            latency_ms = duration.as_millis(),
            characters_count = characters_count,
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            throughput_chars_per_sec = format!("{:.2}", throughput_chars_per_sec),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}

/// Split text into batches that respect sentence boundaries
/// Each batch is at most MAX_BATCH_SIZE characters
fn split_into_batches(text: &str) -> Vec<String> {
    if text.len() <= MAX_BATCH_SIZE {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();

    // Split on sentence-ending punctuation
    let sentence_pattern = regex::Regex::new(r"([.!?]+\s+)").unwrap();
    let mut last_end = 0;

    for mat in sentence_pattern.find_iter(text) {
        let sentence = &text[last_end..mat.end()];

        // If adding this sentence would exceed the limit, save current batch
        if !current_batch.is_empty() && current_batch.len() + sentence.len() > MAX_BATCH_SIZE {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        current_batch.push_str(sentence);
        last_end = mat.end();
    }

    // Handle remaining text after last sentence boundary
    if last_end < text.len() {
        let remaining = &text[last_end..];

        if !current_batch.is_empty() && current_batch.len() + remaining.len() > MAX_BATCH_SIZE {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        // If remaining text itself is too large, split it by characters
        if remaining.len() > MAX_BATCH_SIZE {
            let chars: Vec<char> = remaining.chars().collect();
            for chunk in chars.chunks(MAX_BATCH_SIZE) {
                batches.push(chunk.iter().collect());
            }
        } else {
            current_batch.push_str(remaining);
        }
    }

    // Add any remaining batch
    if !current_batch.is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches
}
