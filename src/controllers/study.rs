use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::{
        extraction::ExtractionService,
        study::{StudyMaterial, StudyService, StudyServiceApi},
    },
    error::{AppError, AppResult},
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const MIN_TEXT_CHARS: usize = 50;

pub struct StudyController {
    study_service: Arc<StudyService>,
    extraction_service: Arc<ExtractionService>,
}

impl StudyController {
    pub fn new(
        study_service: Arc<StudyService>,
        extraction_service: Arc<ExtractionService>,
    ) -> Self {
        Self {
            study_service,
            extraction_service,
        }
    }

    /// POST /api/generate - Turn an uploaded document into study material
    pub async fn generate(
        State(controller): State<Arc<StudyController>>,
        mut multipart: Multipart,
    ) -> AppResult<Json<StudyMaterial>> {
        let mut upload: Option<(String, Vec<u8>)> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|error| AppError::BadRequest(format!("Invalid upload: {}", error)))?
        {
            if field.name() != Some("file") {
                continue;
            }

            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|error| {
                AppError::Internal(format!("Failed to read uploaded file: {}", error))
            })?;

            upload = Some((content_type, bytes.to_vec()));
            break;
        }

        let Some((content_type, bytes)) = upload else {
            return Err(AppError::BadRequest("No file provided".to_string()));
        };

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::PayloadTooLarge(
                "File size exceeds 10MB limit".to_string(),
            ));
        }

        let extracted_text = controller
            .extraction_service
            .extract(&content_type, &bytes)
            .await?;

        if extracted_text.trim().len() < MIN_TEXT_CHARS {
            return Err(AppError::BadRequest(
                "Insufficient text content. Please provide a file with more readable text (minimum 50 characters).".to_string(),
            ));
        }

        let material = controller.study_service.process(&extracted_text).await;

        Ok(Json(material))
    }
}
