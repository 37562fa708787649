// WHY: Caller-owned cache of scan results, one entry per manuscript
// An entry is reused only while its content key still matches; edits replace it in place

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::dialogue_scanner::{ScanResult, ScannerConfig};

/// Cache file name inside the cache directory
pub const CACHE_FILE_NAME: &str = ".authorr_scan_cache.json";

/// Manuscripts kept in one cache file; the least recently scanned are evicted first
pub const MAX_CACHED_MANUSCRIPTS: usize = 32;

/// Cache key derived from manuscript text and the scanner settings that shape the result
pub fn cache_key(content: &str, config: &ScannerConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(config.min_dialogue_len.to_le_bytes());
    hasher.update(config.max_matches_per_pattern.to_le_bytes());
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Identity of a manuscript across edits: its input paths, order-insensitive
pub fn manuscript_id<P: AsRef<Path>>(paths: &[P]) -> String {
    let mut names: Vec<String> = paths
        .iter()
        .map(|path| path.as_ref().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names.dedup();

    let mut hasher = Sha256::new();
    for name in &names {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

pub fn generate_cache_path<P: AsRef<Path>>(cache_dir: P) -> PathBuf {
    cache_dir.as_ref().join(CACHE_FILE_NAME)
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CachedScan {
    /// `cache_key` of the text this result was computed from
    pub content_key: String,
    pub result: ScanResult,
    /// Unix seconds when the entry was stored
    pub scanned_at: u64,
}

/// Persistent map from manuscript id to its latest scan result
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ScanCache {
    entries: HashMap<String, CachedScan>,
    last_updated: u64,
}

impl ScanCache {
    /// Load the cache from `cache_dir`; a missing or unreadable file yields an empty cache
    pub async fn load(cache_dir: &Path) -> Self {
        let cache_path = generate_cache_path(cache_dir);

        match fs::read_to_string(&cache_path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring corrupt scan cache {}: {}", cache_path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub async fn save(&self, cache_dir: &Path) -> Result<()> {
        let cache_path = generate_cache_path(cache_dir);
        let content = serde_json::to_string_pretty(self)?;

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&cache_path, content)
            .await
            .with_context(|| format!("Failed to write scan cache {}", cache_path.display()))?;
        debug!("Saved {} cached scans to {}", self.entries.len(), cache_path.display());
        Ok(())
    }

    /// Cached result for `manuscript`, only if it was computed from content with `content_key`
    pub fn get(&self, manuscript: &str, content_key: &str) -> Option<&ScanResult> {
        self.entries
            .get(manuscript)
            .filter(|entry| entry.content_key == content_key)
            .map(|entry| &entry.result)
    }

    /// Store the latest result for `manuscript`, replacing any earlier revision
    pub fn insert(&mut self, manuscript: String, content_key: String, result: ScanResult) {
        let now = unix_now();
        self.entries.insert(
            manuscript,
            CachedScan { content_key, result, scanned_at: now },
        );
        self.last_updated = now;
        self.evict_oldest();
    }

    fn evict_oldest(&mut self) {
        while self.entries.len() > MAX_CACHED_MANUSCRIPTS {
            let oldest = self
                .entries
                .iter()
                .min_by(|(a_id, a), (b_id, b)| a.scanned_at.cmp(&b.scanned_at).then_with(|| a_id.cmp(b_id)))
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    debug!("Evicting cached scan for manuscript {}", id);
                    self.entries.remove(&id);
                }
                None => break,
            }
        }
    }

    /// Drop the entry for one manuscript, returning whether it existed
    pub fn invalidate(&mut self, manuscript: &str) -> bool {
        let removed = self.entries.remove(manuscript).is_some();
        if removed {
            self.last_updated = unix_now();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_updated = unix_now();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_updated(&self) -> u64 {
        self.last_updated
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
