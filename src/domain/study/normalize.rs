use regex::Regex;

/// Isolate the JSON payload from a raw model reply.
///
/// Models frequently wrap the payload in prose or a markdown fence, and
/// occasionally emit typographic quotes. This never fails; when no payload
/// can be located the cleaned text is returned as-is and the caller's parse
/// attempt fails downstream.
pub fn extract_json(raw: &str) -> String {
    let mut clean = raw.trim().to_string();

    // Typographic quotes break both parsing and the salvage patterns
    clean = clean.replace(['\u{201c}', '\u{201d}'], "\"");
    clean = clean.replace(['\u{2018}', '\u{2019}'], "'");

    if let Some(block) = fenced_json_block(&clean) {
        return block;
    }

    let Some(first_brace) = clean.find('{') else {
        return clean;
    };

    // A missing or misplaced closing brace means the reply was cut off, so
    // keep everything from the opening brace onward for the repair stage.
    match clean.rfind('}') {
        Some(last_brace) if last_brace > first_brace => {
            clean[first_brace..=last_brace].to_string()
        }
        _ => clean[first_brace..].to_string(),
    }
}

fn fenced_json_block(text: &str) -> Option<String> {
    let fence = Regex::new(r"```json\s*([\s\S]*?)\s*```").unwrap();
    fence
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|block| block.as_str().trim().to_string())
}
