use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::audio::{AudioService, AudioServiceApi},
    error::{AppError, AppResult},
};

const MIN_TEXT_CHARS: usize = 50;

/// Request for POST /api/generate-audio
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioRequest {
    pub text: String,
}

/// Response for POST /api/generate-audio
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioResponse {
    pub audio_url: String,
    pub transcript: String,
}

pub struct AudioController {
    audio_service: Arc<AudioService>,
}

impl AudioController {
    pub fn new(audio_service: Arc<AudioService>) -> Self {
        Self { audio_service }
    }

    /// POST /api/generate-audio - Narrate a summary as embeddable audio
    pub async fn generate_audio(
        State(controller): State<Arc<AudioController>>,
        Json(request): Json<AudioRequest>,
    ) -> AppResult<Json<AudioResponse>> {
        let text = request.text.trim();

        if text.is_empty() {
            return Err(AppError::BadRequest(
                "No text content provided for audio generation".to_string(),
            ));
        }

        if text.len() < MIN_TEXT_CHARS {
            return Err(AppError::BadRequest(
                "Text content too short for audio generation (minimum 50 characters)."
                    .to_string(),
            ));
        }

        let summary = controller.audio_service.narrate(text).await;

        Ok(Json(AudioResponse {
            audio_url: summary.audio_url,
            transcript: summary.transcript,
        }))
    }
}
