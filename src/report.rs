// WHY: Text renderings consumed by the dialogue-preview and voice-assignment views

use serde::Serialize;

use crate::dialogue_scanner::ScanResult;
use crate::voices::VoiceAssignments;

/// Sample lines kept per character in the distribution summary
pub const SAMPLES_PER_CHARACTER: usize = 2;

/// Per-character dialogue summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSummary {
    pub character: String,
    pub utterances: usize,
    pub samples: Vec<String>,
}

/// Message shown when a scan yields neither characters nor dialogue
pub fn no_dialogue_notice() -> &'static str {
    "No dialogue found. Check that dialogue is written as Name: \"...\", Name said \"...\", or \"...\" Name said."
}

pub fn summary_line(result: &ScanResult) -> String {
    format!(
        "Found {} characters and {} dialogue sections",
        result.characters.len(),
        result.dialogue_sections.len()
    )
}

/// One tab-separated line per utterance: index, character, pattern, text
pub fn dialogue_table(result: &ScanResult) -> String {
    let mut table = String::new();
    for utterance in &result.dialogue_sections {
        table.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            utterance.sequence_index,
            utterance.character,
            utterance.source_pattern,
            utterance.text.replace(['\t', '\n'], " ")
        ));
    }
    table
}

/// Utterance counts and sample lines per character, in first-seen order
pub fn character_distribution(result: &ScanResult) -> Vec<CharacterSummary> {
    result
        .characters
        .iter()
        .map(|character| {
            let lines: Vec<&str> = result
                .dialogue_for(character)
                .map(|utterance| utterance.text.as_str())
                .collect();
            CharacterSummary {
                character: character.clone(),
                utterances: lines.len(),
                samples: lines
                    .iter()
                    .take(SAMPLES_PER_CHARACTER)
                    .map(|line| line.to_string())
                    .collect(),
            }
        })
        .collect()
}

/// One line per character: name, utterance count, assigned voice (or "-")
pub fn character_table(result: &ScanResult, voices: Option<&VoiceAssignments>) -> String {
    let mut table = String::new();
    for summary in character_distribution(result) {
        let voice = voices
            .and_then(|v| v.voice_for(&summary.character))
            .unwrap_or("-");
        table.push_str(&format!("{}\t{}\t{}\n", summary.character, summary.utterances, voice));
    }
    table
}
