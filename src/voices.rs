use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::dialogue_scanner::ScanResult;

/// Mapping of detected characters to TTS voice identifiers
/// Characters without an explicit voice fall back to the narrator voice
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceAssignments {
    #[serde(default)]
    pub narrator: Option<String>,
    #[serde(default)]
    pub characters: BTreeMap<String, String>,
}

impl VoiceAssignments {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read voice assignments {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse voice assignments {}", path.display()))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write voice assignments {}", path.display()))
    }

    pub fn assign(&mut self, character: impl Into<String>, voice: impl Into<String>) {
        self.characters.insert(character.into(), voice.into());
    }

    /// Voice for `character`, else the narrator voice
    pub fn voice_for(&self, character: &str) -> Option<&str> {
        self.characters
            .get(character)
            .or(self.narrator.as_ref())
            .map(String::as_str)
    }

    /// Detected characters lacking an explicit voice, in first-seen order
    pub fn unassigned<'a>(&self, result: &'a ScanResult) -> Vec<&'a str> {
        result
            .characters
            .iter()
            .filter(|character| !self.characters.contains_key(character.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Remove assignments for characters absent from `result`; returns how many were dropped
    pub fn prune(&mut self, result: &ScanResult) -> usize {
        let before = self.characters.len();
        self.characters
            .retain(|character, _| result.characters.iter().any(|c| c == character));
        let dropped = before - self.characters.len();
        if dropped > 0 {
            info!("Pruned {} stale voice assignments", dropped);
        }
        dropped
    }
}
