use regex::Regex;

/// Best-effort structural repair for candidate JSON that fails to parse.
///
/// Targets the failure modes a generative model actually produces:
/// truncation mid-string, truncation mid-structure, stray trailing commas,
/// and non-standard quote characters. Deeper corruption (swapped keys,
/// wrong nesting) is left to the salvage stage. Applying this to its own
/// output yields the same string.
pub fn repair_json(candidate: &str) -> String {
    let mut repaired = candidate.trim().to_string();

    // Trailing commas before a closing brace or bracket
    let trailing_comma = Regex::new(r",(\s*[}\]])").unwrap();
    repaired = trailing_comma.replace_all(&repaired, "$1").to_string();

    // Quote normalization, including smart quotes the normalizer may not
    // have seen (the salvage patterns feed this the same text)
    repaired = repaired.replace('\'', "\"");
    repaired = repaired.replace(['\u{201c}', '\u{201d}'], "\"");

    repaired = close_unterminated_string(repaired);
    balance_structures(repaired)
}

/// An odd number of double quotes means a string literal was cut off.
/// Close it just before the next structural character, or at the very end
/// when none follows.
fn close_unterminated_string(mut repaired: String) -> String {
    let quote_count = repaired.matches('"').count();
    if quote_count % 2 == 0 {
        return repaired;
    }

    let Some(last_quote) = repaired.rfind('"') else {
        return repaired;
    };

    let after_last_quote = &repaired[last_quote + 1..];
    let next_non_whitespace = after_last_quote.trim_start().chars().next();
    if matches!(next_non_whitespace, Some(',') | Some('}') | Some(']')) {
        return repaired;
    }

    match after_last_quote.find([',', '}', ']']) {
        Some(offset) => repaired.insert(last_quote + 1 + offset, '"'),
        None => repaired.push('"'),
    }

    repaired
}

/// A reply that does not end in `}` or `]` was truncated mid-structure.
/// Brackets are closed before braces since array contents nest inside
/// object fields.
fn balance_structures(mut repaired: String) -> String {
    if repaired.ends_with('}') || repaired.ends_with(']') {
        return repaired;
    }

    let open_braces = repaired.matches('{').count();
    let close_braces = repaired.matches('}').count();
    let open_brackets = repaired.matches('[').count();
    let close_brackets = repaired.matches(']').count();

    for _ in close_brackets..open_brackets {
        repaired.push(']');
    }
    for _ in close_braces..open_braces {
        repaired.push('}');
    }

    repaired
}
