use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::model::{Flashcard, StudyMaterial};

pub const FALLBACK_CONCEPTS: [&str; 3] = ["Key Concept 1", "Key Concept 2", "Key Concept 3"];

pub const FALLBACK_SUMMARY: &str =
    "This material contains important concepts for learning and understanding.";

pub const FALLBACK_FLASHCARDS: [(&str, &str); 2] = [
    (
        "What are the main topics covered in this material?",
        "The material covers various important concepts and principles.",
    ),
    (
        "What should you focus on when studying this content?",
        "Focus on understanding the key concepts and their applications.",
    ),
];

/// The reply shape the model is prompted to produce. Unknown fields
/// (including any model-supplied card ids) are ignored.
#[derive(Debug, Deserialize)]
pub struct ParsedReply {
    pub concepts: Vec<String>,
    pub summary: String,
    pub flashcards: Vec<ParsedFlashcard>,
}

#[derive(Debug, Deserialize)]
pub struct ParsedFlashcard {
    pub question: String,
    pub answer: String,
}

/// Check a parsed value against the expected reply shape: an array of
/// concept strings, a summary string, and an array of question/answer
/// objects. Any mismatch discards the parse.
pub fn validate_reply(value: &Value) -> Option<ParsedReply> {
    serde_json::from_value(value.clone()).ok()
}

/// Collapse whatever the earlier stages produced into a complete result.
///
/// Sole constructor of StudyMaterial: empty fields are backfilled with
/// generic placeholders, flashcards with a blank question or answer are
/// dropped, and every surviving card gets a freshly generated id.
pub fn build_material(
    concepts: Vec<String>,
    summary: String,
    flashcards: Vec<(String, String)>,
) -> StudyMaterial {
    let concepts = if concepts.is_empty() {
        FALLBACK_CONCEPTS.iter().map(|c| c.to_string()).collect()
    } else {
        concepts
    };

    let summary = if summary.trim().is_empty() {
        FALLBACK_SUMMARY.to_string()
    } else {
        summary
    };

    let flashcards: Vec<(String, String)> = flashcards
        .into_iter()
        .filter(|(question, answer)| !question.trim().is_empty() && !answer.trim().is_empty())
        .collect();

    let flashcards = if flashcards.is_empty() {
        FALLBACK_FLASHCARDS
            .iter()
            .map(|(question, answer)| (question.to_string(), answer.to_string()))
            .collect()
    } else {
        flashcards
    };

    StudyMaterial {
        concepts,
        summary,
        flashcards: flashcards
            .into_iter()
            .map(|(question, answer)| Flashcard {
                id: Uuid::new_v4(),
                question,
                answer,
            })
            .collect(),
    }
}
