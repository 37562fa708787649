use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dialogue_scanner::{ScanResult, SourcePattern};

/// Per-pattern utterance counts
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternCounts {
    pub colon_format: u64,
    pub said_format: u64,
    pub quote_said_format: u64,
}

/// Statistics for one scan run, written as JSON with `--stats-out`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ScanStats {
    /// Unix seconds at run start
    pub run_start: u64,
    pub chapters_read: u64,
    pub chars_scanned: u64,
    pub characters_found: u64,
    pub dialogue_sections: u64,
    pub pattern_counts: PatternCounts,
    pub narrative_chars: u64,
    /// Whether the result came from the scan cache
    pub cache_hit: bool,
    pub processing_time_ms: u64,
    pub chars_per_sec: f64,
}

impl ScanStats {
    pub fn from_result(
        result: &ScanResult,
        run_start: u64,
        chapters_read: usize,
        chars_scanned: usize,
        processing_time_ms: u64,
        cache_hit: bool,
    ) -> Self {
        let mut pattern_counts = PatternCounts::default();
        for (pattern, count) in result.pattern_counts() {
            let count = count as u64;
            match pattern {
                SourcePattern::Colon => pattern_counts.colon_format = count,
                SourcePattern::SaidVerb => pattern_counts.said_format = count,
                SourcePattern::QuoteThenSaid => pattern_counts.quote_said_format = count,
            }
        }

        // sub-millisecond scans count as 1ms
        let elapsed_secs = (processing_time_ms.max(1)) as f64 / 1000.0;

        Self {
            run_start,
            chapters_read: chapters_read as u64,
            chars_scanned: chars_scanned as u64,
            characters_found: result.characters.len() as u64,
            dialogue_sections: result.dialogue_sections.len() as u64,
            pattern_counts,
            narrative_chars: result.narrative_text.chars().count() as u64,
            cache_hit,
            processing_time_ms,
            chars_per_sec: chars_scanned as f64 / elapsed_secs,
        }
    }
}

pub async fn write_stats(stats: &ScanStats, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write stats file {}", path.display()))
}
