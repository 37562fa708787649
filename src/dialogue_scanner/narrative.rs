// WHY: Narration-only text for the narrator voice, derived independently of the detection passes
// Removal is regex-driven over the original text, so the result is best-effort

use regex_automata::meta::Regex;

/// Strip dialogue from `text` by applying each removal pattern in order, then collapse whitespace
pub fn extract_narrative(text: &str, removals: &[Regex]) -> String {
    let mut remaining = text.to_string();
    for pattern in removals {
        remaining = remove_matches(pattern, &remaining);
    }

    let mut narrative = String::with_capacity(remaining.len());
    collapse_whitespace_into(&remaining, &mut narrative);
    narrative
}

/// Copy `text` without any span matched by `pattern`
pub fn remove_matches(pattern: &Regex, text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;

    for mat in pattern.find_iter(text) {
        result.push_str(&text[last_end..mat.start()]);
        last_end = mat.end();
    }
    result.push_str(&text[last_end..]);
    result
}

/// Collapse blank lines and whitespace runs into single spaces and trim, reusing `buffer`
pub fn collapse_whitespace_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut prev_was_space = true; // swallows leading whitespace
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                buffer.push(' ');
                prev_was_space = true;
            }
        } else {
            buffer.push(ch);
            prev_was_space = false;
        }
    }

    if buffer.ends_with(' ') {
        buffer.pop();
    }
}
