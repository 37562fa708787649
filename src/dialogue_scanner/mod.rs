// WHY: Heuristic dialogue attribution over raw manuscript prose
// Produces the character list, attributed lines, and narration-only text used for voice assignment

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

pub mod names;
pub mod narrative;
pub mod patterns;

pub use names::is_valid_name;
use patterns::PatternSet;

/// Which detection pass produced an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourcePattern {
    /// `Name: "text"` at line start
    #[serde(rename = "colon_format")]
    Colon,
    /// `Name said "text"`
    #[serde(rename = "said_format")]
    SaidVerb,
    /// `"text," Name said`
    #[serde(rename = "quote_said_format")]
    QuoteThenSaid,
}

impl SourcePattern {
    /// Passes in the order they run
    pub const ALL: [SourcePattern; 3] = [
        SourcePattern::Colon,
        SourcePattern::SaidVerb,
        SourcePattern::QuoteThenSaid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourcePattern::Colon => "colon_format",
            SourcePattern::SaidVerb => "said_format",
            SourcePattern::QuoteThenSaid => "quote_said_format",
        }
    }
}

impl fmt::Display for SourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attributed line of quoted dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueUtterance {
    pub character: String,
    pub text: String,
    pub source_pattern: SourcePattern,
    /// Detection order across all passes; not narrative order
    pub sequence_index: usize,
}

/// Shortest quoted text a scanner may be configured to accept
pub const MIN_DIALOGUE_LEN_FLOOR: usize = 3;

/// Scanner tuning knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Minimum quoted-text length in characters
    pub min_dialogue_len: usize,
    /// Raw matches examined per pass before the pass stops
    pub max_matches_per_pattern: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_dialogue_len: 3,
            max_matches_per_pattern: 200,
        }
    }
}

/// Per-scan accumulator: characters in first-seen order and their utterances in detection order
#[derive(Debug, Default)]
pub struct CharacterRegistry {
    order: Vec<String>,
    utterances: HashMap<String, Vec<DialogueUtterance>>,
    next_index: usize,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `character` if unseen and append an utterance with the next sequence index
    pub fn record(&mut self, character: &str, text: &str, source_pattern: SourcePattern) -> usize {
        if !self.utterances.contains_key(character) {
            self.order.push(character.to_string());
        }

        let sequence_index = self.next_index;
        self.next_index += 1;

        self.utterances
            .entry(character.to_string())
            .or_default()
            .push(DialogueUtterance {
                character: character.to_string(),
                text: text.to_string(),
                source_pattern,
                sequence_index,
            });

        sequence_index
    }

    pub fn characters(&self) -> &[String] {
        &self.order
    }

    pub fn dialogue_for(&self, character: &str) -> &[DialogueUtterance] {
        self.utterances
            .get(character)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total utterances recorded so far
    pub fn len(&self) -> usize {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    /// Flatten into a result with sections in detection order
    pub fn into_scan_result(mut self, narrative_text: String) -> ScanResult {
        let mut dialogue_sections = Vec::with_capacity(self.next_index);
        for character in &self.order {
            if let Some(lines) = self.utterances.remove(character) {
                dialogue_sections.extend(lines);
            }
        }
        dialogue_sections.sort_by_key(|utterance| utterance.sequence_index);

        ScanResult {
            characters: self.order,
            dialogue_sections,
            narrative_text,
        }
    }
}

/// Output of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Unique character names in first-seen order
    pub characters: Vec<String>,
    /// Utterances in detection order
    pub dialogue_sections: Vec<DialogueUtterance>,
    /// Best-effort narration-only text
    pub narrative_text: String,
}

impl ScanResult {
    /// True when neither characters nor dialogue were found
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty() && self.dialogue_sections.is_empty()
    }

    pub fn dialogue_for<'a>(&'a self, character: &'a str) -> impl Iterator<Item = &'a DialogueUtterance> + 'a {
        self.dialogue_sections
            .iter()
            .filter(move |utterance| utterance.character == character)
    }

    /// Utterance count per detection pass, in pass order
    pub fn pattern_counts(&self) -> [(SourcePattern, usize); 3] {
        SourcePattern::ALL.map(|pattern| {
            let count = self
                .dialogue_sections
                .iter()
                .filter(|utterance| utterance.source_pattern == pattern)
                .count();
            (pattern, count)
        })
    }
}

/// Dialogue attribution scanner holding compiled patterns; reusable and shareable across threads
#[derive(Debug)]
pub struct DialogueScanner {
    config: ScannerConfig,
    patterns: PatternSet,
}

impl DialogueScanner {
    pub fn new(config: ScannerConfig) -> Result<Self> {
        if config.min_dialogue_len < MIN_DIALOGUE_LEN_FLOOR {
            anyhow::bail!(
                "min_dialogue_len must be at least {}, got {}",
                MIN_DIALOGUE_LEN_FLOOR,
                config.min_dialogue_len
            );
        }
        let patterns = PatternSet::new(config.min_dialogue_len)?;
        Ok(Self { config, patterns })
    }

    pub fn with_default_config() -> Result<Self> {
        Self::new(ScannerConfig::default())
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan manuscript text; every call starts from an empty registry
    pub fn scan(&self, content: &str) -> ScanResult {
        debug!("Starting dialogue scan on {} characters", content.len());

        let mut registry = CharacterRegistry::new();
        for pattern in SourcePattern::ALL {
            let outcome = self.run_pass(content, pattern, &mut registry);
            if outcome.truncated {
                warn!(
                    pattern = %pattern,
                    max_matches = self.config.max_matches_per_pattern,
                    "Match limit reached; remaining dialogue for this pattern was not scanned"
                );
            }
            debug!(pattern = %pattern, accepted = outcome.accepted, "Detection pass complete");
        }

        let narrative_text = narrative::extract_narrative(content, &self.patterns.removals);
        let result = registry.into_scan_result(narrative_text);

        info!(
            characters = result.characters.len(),
            dialogue_sections = result.dialogue_sections.len(),
            narrative_chars = result.narrative_text.len(),
            "Dialogue scan complete"
        );
        result
    }

    fn run_pass(&self, content: &str, pattern: SourcePattern, registry: &mut CharacterRegistry) -> PassOutcome {
        let (regex, name_group, text_group) = match pattern {
            SourcePattern::Colon => (&self.patterns.colon, 1, 2),
            SourcePattern::SaidVerb => (&self.patterns.said_verb, 1, 2),
            SourcePattern::QuoteThenSaid => (&self.patterns.quote_then_said, 2, 1),
        };

        let mut matches = regex.captures_iter(content);
        let mut accepted = 0;
        for caps in matches.by_ref().take(self.config.max_matches_per_pattern) {
            let (Some(name_span), Some(text_span)) = (caps.get_group(name_group), caps.get_group(text_group)) else {
                continue;
            };
            let character = content[name_span.start..name_span.end].trim();
            let text = content[text_span.start..text_span.end].trim();

            if text.chars().count() < self.config.min_dialogue_len {
                continue;
            }
            if !is_valid_name(character) {
                debug!(pattern = %pattern, candidate = character, "Rejected character name");
                continue;
            }

            registry.record(character, text, pattern);
            accepted += 1;
        }

        PassOutcome {
            accepted,
            truncated: matches.next().is_some(),
        }
    }
}

/// Result of one detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PassOutcome {
    accepted: usize,
    /// More raw matches existed beyond the cap
    truncated: bool,
}

/// Scan with the default configuration
pub fn scan(content: &str) -> Result<ScanResult> {
    Ok(DialogueScanner::with_default_config()?.scan(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_preserves_first_seen_order() {
        let mut registry = CharacterRegistry::new();
        registry.record("Tom", "First line.", SourcePattern::SaidVerb);
        registry.record("Ann", "Second line.", SourcePattern::Colon);
        registry.record("Tom", "Third line.", SourcePattern::QuoteThenSaid);

        assert_eq!(registry.characters(), ["Tom".to_string(), "Ann".to_string()]);
        assert_eq!(registry.dialogue_for("Tom").len(), 2);
        assert_eq!(registry.dialogue_for("Nobody").len(), 0);
        assert_eq!(registry.len(), 3);

        let result = registry.into_scan_result(String::new());
        let indexes: Vec<usize> = result.dialogue_sections.iter().map(|u| u.sequence_index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert_eq!(result.dialogue_sections[1].character, "Ann");
    }

    #[test]
    fn test_registry_keys_are_case_sensitive() {
        let mut registry = CharacterRegistry::new();
        registry.record("Tom", "Hello.", SourcePattern::Colon);
        registry.record("TOM", "Hello again.", SourcePattern::Colon);
        assert_eq!(registry.characters().len(), 2);
    }

    #[test]
    fn test_sequence_index_continues_across_passes() {
        let scanner = DialogueScanner::with_default_config().unwrap();
        let text = "\"Come in,\" Jane called.\nSarah: \"Thank you.\"\nTom said \"Good evening.\"";
        let result = scanner.scan(text);

        let tagged: Vec<(usize, &str, SourcePattern)> = result
            .dialogue_sections
            .iter()
            .map(|u| (u.sequence_index, u.character.as_str(), u.source_pattern))
            .collect();
        assert_eq!(
            tagged,
            vec![
                (0, "Sarah", SourcePattern::Colon),
                (1, "Tom", SourcePattern::SaidVerb),
                (2, "Jane", SourcePattern::QuoteThenSaid),
            ]
        );
        // first-seen order follows the pass order, not document order
        assert_eq!(result.characters, vec!["Sarah", "Tom", "Jane"]);
    }

    #[test]
    fn test_match_cap_limits_each_pass() {
        let config = ScannerConfig { max_matches_per_pattern: 2, ..Default::default() };
        let scanner = DialogueScanner::new(config).unwrap();
        let text = (0..5)
            .map(|i| format!("Sarah: \"Line number {i}.\""))
            .collect::<Vec<_>>()
            .join("\n");

        let result = scanner.scan(&text);
        assert_eq!(result.dialogue_sections.len(), 2);
    }

    #[test]
    fn test_pass_reports_truncation_at_cap() {
        let config = ScannerConfig { max_matches_per_pattern: 200, ..Default::default() };
        let scanner = DialogueScanner::new(config).unwrap();
        let lines = |count: usize| {
            (0..count)
                .map(|i| format!("Sarah: \"Line number {i}.\""))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let mut registry = CharacterRegistry::new();
        let outcome = scanner.run_pass(&lines(250), SourcePattern::Colon, &mut registry);
        assert_eq!(outcome, PassOutcome { accepted: 200, truncated: true });

        // exactly at the cap nothing is dropped
        let mut registry = CharacterRegistry::new();
        let outcome = scanner.run_pass(&lines(200), SourcePattern::Colon, &mut registry);
        assert_eq!(outcome, PassOutcome { accepted: 200, truncated: false });
    }

    #[test]
    fn test_min_dialogue_len_below_floor_is_rejected() {
        for min_dialogue_len in [0, 1, 2] {
            let config = ScannerConfig { min_dialogue_len, ..Default::default() };
            let err = DialogueScanner::new(config).unwrap_err();
            assert!(err.to_string().contains("min_dialogue_len must be at least 3"));
        }
        assert!(DialogueScanner::new(ScannerConfig { min_dialogue_len: 5, ..Default::default() }).is_ok());
    }

    #[test]
    fn test_serialized_field_names() {
        let result = scan("Sarah: \"Hello there.\"").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["characters"][0], "Sarah");
        assert_eq!(json["dialogueSections"][0]["sourcePattern"], "colon_format");
        assert_eq!(json["dialogueSections"][0]["sequenceIndex"], 0);
        assert!(json.get("narrativeText").is_some());
    }
}
