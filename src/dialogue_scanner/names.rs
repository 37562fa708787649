// WHY: Centralized character-name acceptance so every detection pass applies the same rules
// Keeps pronouns and attribution verbs from being registered as speakers

use std::ops::RangeInclusive;

/// Words that disqualify a candidate when found anywhere inside it (case-insensitive)
/// NOTE: substring containment, so "Theo" and "Stephen" are rejected too
pub const NAME_STOPLIST: &[&str] = &[
    "he", "she", "it", "they", "the", "and", "but", "that", "this", "said", "asked",
];

/// Accepted character-name length, counted in characters
pub const NAME_LENGTH: RangeInclusive<usize> = 2..=25;

/// Check whether a captured token can be registered as a speaking character
pub fn is_valid_name(candidate: &str) -> bool {
    if !NAME_LENGTH.contains(&candidate.chars().count()) {
        return false;
    }

    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }

    if !chars.all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        return false;
    }

    !contains_stop_word(candidate)
}

/// Check a candidate against the stoplist using lowercase substring containment
pub fn contains_stop_word(candidate: &str) -> bool {
    let lowered = candidate.to_lowercase();
    NAME_STOPLIST.iter().any(|word| lowered.contains(word))
}
