use regex::Regex;
use tokio::process::Command;
use uuid::Uuid;

use super::error::ExtractionError;

/// OCR gets a tighter limit than plain uploads; tesseract slows down badly
/// past this size.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const MIN_EXTRACTED_CHARS: usize = 10;

/// Extracts raw text from uploaded documents: plain text, PDF, or image
/// (OCR via the tesseract binary).
pub struct ExtractionService;

impl ExtractionService {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, ExtractionError> {
        tracing::info!(
            content_type = content_type,
            size_bytes = bytes.len(),
            "Extracting text from upload"
        );

        match content_type {
            "text/plain" => Ok(String::from_utf8_lossy(bytes).to_string()),
            "application/pdf" => self.extract_pdf(bytes),
            "image/jpeg" | "image/jpg" | "image/png" => self.extract_image(bytes).await,
            other => Err(ExtractionError::Unsupported(other.to_string())),
        }
    }

    fn extract_pdf(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|error| {
            tracing::error!(error = %error, "PDF text extraction failed");
            ExtractionError::Unreadable(
                "Failed to extract text from PDF. Please ensure the PDF contains readable text."
                    .to_string(),
            )
        })
    }

    async fn extract_image(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ExtractionError::TooLarge(
                "Images must be 5 MB or less for OCR".to_string(),
            ));
        }

        let image_path = std::env::temp_dir().join(format!("studycast-ocr-{}", Uuid::new_v4()));

        tokio::fs::write(&image_path, bytes).await.map_err(|error| {
            tracing::error!(error = %error, "Failed to stage image for OCR");
            ExtractionError::Unreadable("Failed to process the uploaded image.".to_string())
        })?;

        let output = Command::new("tesseract")
            .arg(&image_path)
            .arg("stdout")
            .args(["-l", "eng"])
            .output()
            .await;

        let _ = tokio::fs::remove_file(&image_path).await;

        let output = output.map_err(|error| {
            tracing::error!(error = %error, "Failed to run tesseract");
            ExtractionError::Unreadable(
                "OCR is unavailable. Please upload a text or PDF file instead.".to_string(),
            )
        })?;

        if !output.status.success() {
            tracing::error!(
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "tesseract exited with an error"
            );
            return Err(ExtractionError::Unreadable(
                "Failed to extract text from image. Please try with a clearer image.".to_string(),
            ));
        }

        let text = clean_ocr_text(&String::from_utf8_lossy(&output.stdout));

        if text.len() < MIN_EXTRACTED_CHARS {
            return Err(ExtractionError::Unreadable(
                "Could not extract meaningful text from the image. Please ensure the image contains clear, readable text."
                    .to_string(),
            ));
        }

        Ok(text)
    }
}

impl Default for ExtractionService {
    fn default() -> Self {
        Self::new()
    }
}

/// OCR output is full of stray newlines and uneven spacing; collapse it to
/// single-spaced text.
fn clean_ocr_text(text: &str) -> String {
    let whitespace = Regex::new(r"\s+").unwrap();
    whitespace.replace_all(text, " ").trim().to_string()
}
