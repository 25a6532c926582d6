use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::model::StudyMaterial;
use super::{assemble, normalize, repair, salvage};
use crate::infrastructure::repositories::ModelRepository;

const SYSTEM_PROMPT: &str = "Extract key concepts, create a summary, and generate flashcards from the material.\n\nRespond with valid JSON only:\n{\n  \"concepts\": [\"concept1\", \"concept2\", \"concept3\"],\n  \"summary\": \"Brief explanation in 1-2 sentences\",\n  \"flashcards\": [\n    {\"question\": \"Simple question\", \"answer\": \"Clear answer\"}\n  ]\n}\n\nKeep responses concise and complete.";

/// The model regularly ignores instructions on long inputs, so the prompt
/// only carries the head of the document.
const MAX_PROMPT_CHARS: usize = 8000;

pub struct StudyService {
    model_repo: Arc<dyn ModelRepository>,
}

impl StudyService {
    pub fn new(model_repo: Arc<dyn ModelRepository>) -> Self {
        Self { model_repo }
    }
}

#[async_trait]
pub trait StudyServiceApi: Send + Sync {
    /// Turn extracted document text into study material.
    ///
    /// This operation:
    /// - Sends the document to the generative model
    /// - Recovers a structured result from the reply, however broken
    ///
    /// Never fails: a model error or an unusable reply degrades to
    /// placeholder content instead of surfacing.
    async fn process(&self, document_text: &str) -> StudyMaterial;
}

#[async_trait]
impl StudyServiceApi for StudyService {
    async fn process(&self, document_text: &str) -> StudyMaterial {
        tracing::info!(
            document_length = document_text.len(),
            "Study material request"
        );

        let prompt = build_user_prompt(document_text);

        let reply = match self.model_repo.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::error!(
                    error = %error,
                    "Model request failed, returning generic study material"
                );
                return assemble::build_material(Vec::new(), String::new(), Vec::new());
            }
        };

        tracing::info!(reply_length = reply.len(), "Model reply received");

        recover_material(&reply)
    }
}

/// Run the recovery pipeline on a raw model reply.
///
/// Strictly forward: strict parse, then textual repair, then field-level
/// salvage. Each stage is attempted once; assembly collapses whatever was
/// recovered into a guaranteed-complete result.
pub fn recover_material(raw_reply: &str) -> StudyMaterial {
    let candidate = normalize::extract_json(raw_reply);

    let parsed = match serde_json::from_str::<Value>(&candidate) {
        Ok(value) => {
            tracing::debug!("Model reply parsed directly");
            Some(value)
        }
        Err(parse_error) => {
            tracing::warn!(error = %parse_error, "Direct parse failed, attempting repair");
            let repaired = repair::repair_json(&candidate);
            match serde_json::from_str::<Value>(&repaired) {
                Ok(value) => {
                    tracing::debug!("Model reply parsed after repair");
                    Some(value)
                }
                Err(repair_error) => {
                    tracing::warn!(error = %repair_error, "Repair failed, salvaging fields");
                    None
                }
            }
        }
    };

    if let Some(value) = parsed {
        if let Some(reply) = assemble::validate_reply(&value) {
            return assemble::build_material(
                reply.concepts,
                reply.summary,
                reply
                    .flashcards
                    .into_iter()
                    .map(|card| (card.question, card.answer))
                    .collect(),
            );
        }
        tracing::warn!("Model reply parsed but failed shape validation, salvaging fields");
    }

    let concepts = salvage::extract_concepts(&candidate);
    let summary = salvage::extract_summary(&candidate);
    let flashcards = salvage::extract_flashcards(&candidate);

    tracing::info!(
        concepts_salvaged = concepts.len(),
        summary_salvaged = !summary.is_empty(),
        flashcards_salvaged = flashcards.len(),
        "Assembling study material from salvaged fields"
    );

    assemble::build_material(concepts, summary, flashcards)
}

fn build_user_prompt(document_text: &str) -> String {
    let truncated: String = document_text.chars().take(MAX_PROMPT_CHARS).collect();
    format!("Analyze this material briefly and respond with valid JSON:\n\n{truncated}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::study::assemble::{FALLBACK_CONCEPTS, FALLBACK_FLASHCARDS, FALLBACK_SUMMARY};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recover_well_formed_reply_round_trips() {
        let reply = r#"{
            "concepts": ["Photosynthesis", "Chlorophyll"],
            "summary": "Plants convert light into chemical energy.",
            "flashcards": [
                {"question": "What pigment absorbs light?", "answer": "Chlorophyll absorbs it."}
            ]
        }"#;

        let material = recover_material(reply);

        assert_eq!(material.concepts, vec!["Photosynthesis", "Chlorophyll"]);
        assert_eq!(material.summary, "Plants convert light into chemical energy.");
        assert_eq!(material.flashcards.len(), 1);
        assert_eq!(material.flashcards[0].question, "What pigment absorbs light?");
        assert_eq!(material.flashcards[0].answer, "Chlorophyll absorbs it.");
    }

    #[test]
    fn test_recover_reply_wrapped_in_prose_and_fencing() {
        let reply = "Here you go:\n```json\n{\"concepts\": [\"Entropy\"], \"summary\": \"Disorder always increases.\", \"flashcards\": []}\n```";

        let material = recover_material(reply);

        assert_eq!(material.concepts, vec!["Entropy"]);
        assert_eq!(material.summary, "Disorder always increases.");
    }

    #[test]
    fn test_recover_truncated_reply_salvages_fields() {
        let reply = r#"{"concepts": ["A","B"], "summary": "This is a test summary.", "flashcards": [{"question": "Q1 long enough", "answer": "A1 long"#;

        let material = recover_material(reply);

        assert_eq!(material.concepts, vec!["A", "B"]);
        assert_eq!(material.summary, "This is a test summary.");
        // The cut-off answer never gets a closing quote, so the pair is
        // unrecoverable and assembly backfills the generic cards
        assert!(!material.flashcards.is_empty());
    }

    #[test]
    fn test_recover_trailing_commas_parse_after_repair() {
        let reply = r#"{"concepts": ["X",], "summary": "Ok.", "flashcards": [],}"#;

        let material = recover_material(reply);

        assert_eq!(material.concepts, vec!["X"]);
        assert_eq!(material.summary, "Ok.");
        assert_eq!(material.flashcards.len(), FALLBACK_FLASHCARDS.len());
        assert_eq!(material.flashcards[0].question, FALLBACK_FLASHCARDS[0].0);
    }

    #[test]
    fn test_recover_smart_quotes_match_straight_quote_result() {
        let straight = r#"{"concepts": ["Osmosis"], "summary": "Water moves across membranes.", "flashcards": []}"#;
        let curly = straight.replace('"', "\u{201c}");

        let from_straight = recover_material(straight);
        let from_curly = recover_material(&curly);

        assert_eq!(from_straight.concepts, from_curly.concepts);
        assert_eq!(from_straight.summary, from_curly.summary);
    }

    #[test]
    fn test_recover_garbage_returns_fully_generic_material() {
        let material = recover_material("not json at all");

        assert_eq!(material.concepts, FALLBACK_CONCEPTS.to_vec());
        assert_eq!(material.summary, FALLBACK_SUMMARY);
        assert_eq!(material.flashcards.len(), FALLBACK_FLASHCARDS.len());
    }

    #[test]
    fn test_recover_always_returns_complete_material() {
        let inputs = [
            "",
            "{}",
            "{\"concepts\": []}",
            "{\"flashcards\": [{\"question\": 1}]}",
            "```json\n```",
            "{\"summary\": \"cut",
        ];

        for input in inputs {
            let material = recover_material(input);
            assert!(!material.concepts.is_empty(), "empty concepts for {input:?}");
            assert!(!material.summary.is_empty(), "empty summary for {input:?}");
            assert!(
                !material.flashcards.is_empty(),
                "no flashcards for {input:?}"
            );
        }
    }

    #[test]
    fn test_recover_assigns_distinct_ids_within_one_reply() {
        let cards: Vec<String> = (0..6)
            .map(|i| format!(r#"{{"question": "Question {i} is long?", "answer": "Answer {i} is long."}}"#))
            .collect();
        let reply = format!(
            r#"{{"concepts": ["A"], "summary": "Summary long enough.", "flashcards": [{}]}}"#,
            cards.join(",")
        );

        let material = recover_material(&reply);

        let mut ids: Vec<_> = material.flashcards.iter().map(|card| card.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_build_user_prompt_truncates_long_documents() {
        let document = "x".repeat(MAX_PROMPT_CHARS + 500);
        let prompt = build_user_prompt(&document);
        assert!(prompt.len() < document.len());
        assert!(prompt.starts_with("Analyze this material"));
    }
}
