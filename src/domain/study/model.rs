use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single question/answer card. Ids are assigned server-side at assembly
/// time and are never taken from model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
}

/// The complete study material produced for one document.
///
/// Always schema-complete: concepts and summary are non-empty and there is
/// at least one flashcard, even when the model reply was unusable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub concepts: Vec<String>,
    pub summary: String,
    pub flashcards: Vec<Flashcard>,
}
