//! Field-level recovery from model replies too broken to repair.
//!
//! Each extractor scans the normalized reply text with pattern matching
//! rather than structural parsing, and returns an empty result on a miss.
//! Failures are isolated per field: a corrupt flashcards section cannot
//! prevent recovery of the summary.

use regex::Regex;

const MAX_CONCEPTS: usize = 8;
const MAX_FLASHCARDS: usize = 8;
const MIN_SUMMARY_CHARS: usize = 10;
const MIN_CARD_FIELD_CHARS: usize = 5;

/// Pull concept strings out of a `concepts` list, or, failing that, any
/// quoted substrings that plausibly name a concept.
pub fn extract_concepts(text: &str) -> Vec<String> {
    let concepts_field = Regex::new(r#""concepts"\s*:\s*\[([\s\S]*?)\]"#).unwrap();
    if let Some(caps) = concepts_field.captures(text) {
        let list = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let quoted = Regex::new(r#""([^"]+)""#).unwrap();
        let concepts: Vec<String> = quoted
            .captures_iter(list)
            .map(|caps| caps[1].to_string())
            .collect();
        if !concepts.is_empty() {
            return concepts;
        }
    }

    // No usable concepts field: fall back to short capitalized quoted
    // strings anywhere in the text, skipping the other field names
    let quoted = Regex::new(r#""([^"]{3,50})""#).unwrap();
    quoted
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|candidate| {
            !candidate.contains("question")
                && !candidate.contains("answer")
                && !candidate.contains("summary")
                && candidate
                    .chars()
                    .next()
                    .is_some_and(|first| !first.is_lowercase())
        })
        .take(MAX_CONCEPTS)
        .collect()
}

/// Pull the summary string, tolerating an unterminated trailing quote.
/// Returns an empty string when nothing substantial is found.
pub fn extract_summary(text: &str) -> String {
    let complete = Regex::new(r#""summary"\s*:\s*"([^"]*(?:\\.[^"]*)*)""#).unwrap();
    let truncated = Regex::new(r#""summary"\s*:\s*"([^"]+)"#).unwrap();

    let captured = complete
        .captures(text)
        .or_else(|| truncated.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    match captured {
        Some(raw) => {
            let summary = unescape(raw);
            if summary.len() > MIN_SUMMARY_CHARS {
                summary
            } else {
                String::new()
            }
        }
        None => String::new(),
    }
}

/// Pull question/answer pairs. An answer field may occur anywhere after its
/// question, with arbitrary intervening text; the pairing is not anchored
/// to adjacency. Extraction stops after eight pairs.
pub fn extract_flashcards(text: &str) -> Vec<(String, String)> {
    let pair = Regex::new(
        r#""question"\s*:\s*"([^"]+(?:[^"\\]|\\.)*)"[\s\S]*?"answer"\s*:\s*"([^"]+(?:[^"\\]|\\.)*)""#,
    )
    .unwrap();

    let mut flashcards = Vec::new();
    for caps in pair.captures_iter(text) {
        if flashcards.len() >= MAX_FLASHCARDS {
            break;
        }

        let question = unescape(&caps[1]);
        let answer = unescape(&caps[2]);

        if question.len() > MIN_CARD_FIELD_CHARS && answer.len() > MIN_CARD_FIELD_CHARS {
            flashcards.push((question, answer));
        }
    }

    flashcards
}

fn unescape(value: &str) -> String {
    value
        .replace("\\\"", "\"")
        .replace("\\n", " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_concepts_from_field() {
        let text = r#"{"concepts": ["Photosynthesis", "Cell Respiration"], "summary":"#;
        assert_eq!(
            extract_concepts(text),
            vec!["Photosynthesis", "Cell Respiration"]
        );
    }

    #[test]
    fn test_extract_concepts_from_multiline_field() {
        let text = "\"concepts\": [\n  \"Photosynthesis\",\n  \"Chlorophyll\"\n]";
        assert_eq!(extract_concepts(text), vec!["Photosynthesis", "Chlorophyll"]);
    }

    #[test]
    fn test_extract_concepts_fallback_skips_field_names_and_lowercase() {
        let text = r#"broken "question text" and "lowercase thing" but "Valid Concept" here"#;
        assert_eq!(extract_concepts(text), vec!["Valid Concept"]);
    }

    #[test]
    fn test_extract_concepts_fallback_caps_at_eight() {
        let quoted: Vec<String> = (0..12).map(|i| format!("\"Concept {i}\"")).collect();
        let text = quoted.join(" ");
        assert_eq!(extract_concepts(&text).len(), 8);
    }

    #[test]
    fn test_extract_concepts_miss_returns_empty() {
        assert!(extract_concepts("no quotes here").is_empty());
    }

    #[test]
    fn test_extract_summary_complete() {
        let text = r#"{"summary": "A summary with \"quotes\" inside.", "flashcards": []}"#;
        assert_eq!(extract_summary(text), "A summary with \"quotes\" inside.");
    }

    #[test]
    fn test_extract_summary_truncated() {
        let text = r#"{"summary": "This summary was cut o"#;
        assert_eq!(extract_summary(text), "This summary was cut o");
    }

    #[test]
    fn test_extract_summary_too_short_is_discarded() {
        let text = r#"{"summary": "Short."}"#;
        assert_eq!(extract_summary(text), "");
    }

    #[test]
    fn test_extract_summary_replaces_escaped_newlines() {
        let text = r#"{"summary": "First line.\nSecond line."}"#;
        assert_eq!(extract_summary(text), "First line. Second line.");
    }

    #[test]
    fn test_extract_flashcards_pairs() {
        let text = r#"
            {"question": "What is photosynthesis?", "answer": "Conversion of light to energy."},
            {"question": "Where does it happen?", "answer": "In the chloroplasts."}
        "#;
        let cards = extract_flashcards(text);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].0, "What is photosynthesis?");
        assert_eq!(cards[1].1, "In the chloroplasts.");
    }

    #[test]
    fn test_extract_flashcards_skips_short_fields() {
        let text = r#"{"question": "Why?", "answer": "Because of the conservation of energy."}"#;
        assert!(extract_flashcards(text).is_empty());
    }

    #[test]
    fn test_extract_flashcards_caps_at_eight() {
        let cards: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"question": "Question number {i}?", "answer": "Answer number {i}."}}"#))
            .collect();
        let text = cards.join("\n");
        assert_eq!(extract_flashcards(&text).len(), 8);
    }

    #[test]
    fn test_extract_flashcards_miss_returns_empty() {
        assert!(extract_flashcards("nothing resembling a card").is_empty());
    }
}
