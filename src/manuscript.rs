use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Separator placed between chapters when assembling the full manuscript
pub const CHAPTER_SEPARATOR: &str = "\n\n";

/// Chapter files open at once while loading
pub const MAX_CONCURRENT_READS: usize = 16;

/// Configuration for chapter discovery and loading
#[derive(Debug, Clone)]
pub struct ManuscriptConfig {
    /// Whether to fail fast on first unreadable chapter or skip it
    pub fail_fast: bool,
    /// File extensions treated as chapter files when a directory is given
    pub extensions: Vec<String>,
}

impl Default for ManuscriptConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            extensions: vec!["txt".to_string(), "md".to_string()],
        }
    }
}

/// One chapter of a manuscript
#[derive(Debug, Clone)]
pub struct Chapter {
    /// Source file, or `None` for chapters supplied in memory
    pub path: Option<PathBuf>,
    pub content: String,
}

/// Ordered chapters making up one project
#[derive(Debug, Clone, Default)]
pub struct Manuscript {
    pub chapters: Vec<Chapter>,
}

impl Manuscript {
    /// Build from in-memory chapter texts, e.g. chapters held by an editor
    pub fn from_chapters<I, S>(chapters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chapters: chapters
                .into_iter()
                .map(|content| Chapter { path: None, content: content.into() })
                .collect(),
        }
    }

    /// Load chapters from files and directories, preserving argument order
    /// Directories contribute their chapter files in sorted path order
    pub async fn load(paths: &[PathBuf], config: &ManuscriptConfig) -> Result<Self> {
        let mut files = Vec::new();
        for path in paths {
            if path.is_dir() {
                files.extend(discover_chapter_files(path, config)?);
            } else {
                files.push(path.clone());
            }
        }

        info!("Loading {} chapter files", files.len());
        // buffered keeps results in input order
        let reads: Vec<_> = stream::iter(files.iter())
            .map(|path| fs::read_to_string(path))
            .buffered(MAX_CONCURRENT_READS)
            .collect()
            .await;

        let mut chapters = Vec::with_capacity(files.len());
        for (path, read) in files.into_iter().zip(reads) {
            match read {
                Ok(content) => {
                    debug!("Read chapter {}: {} bytes", path.display(), content.len());
                    chapters.push(Chapter { path: Some(path), content });
                }
                Err(e) if config.fail_fast => {
                    return Err(e).with_context(|| format!("Failed to read chapter {}", path.display()));
                }
                Err(e) => {
                    warn!("Skipping unreadable chapter {}: {}", path.display(), e);
                }
            }
        }

        Ok(Self { chapters })
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Concatenate all chapters in order
    pub fn full_text(&self) -> String {
        self.chapters
            .iter()
            .map(|chapter| chapter.content.as_str())
            .collect::<Vec<_>>()
            .join(CHAPTER_SEPARATOR)
    }

    /// True when no chapter holds anything but whitespace
    pub fn is_blank(&self) -> bool {
        self.chapters.iter().all(|chapter| chapter.content.trim().is_empty())
    }

    /// Full text ready for scanning; blank manuscripts are rejected here rather than by the scanner
    pub fn text_for_scan(&self) -> Result<String> {
        if self.is_blank() {
            anyhow::bail!("No story content found. Generate chapters or write content first.");
        }
        Ok(self.full_text())
    }
}

/// Find chapter files under `root_dir` recursively, sorted by path
pub fn discover_chapter_files(root_dir: &Path, config: &ManuscriptConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    // directory names may contain glob metacharacters such as `[draft]`
    let escaped_root = Pattern::escape(&root_dir.to_string_lossy());

    for extension in &config.extensions {
        let pattern = format!("{}/**/*.{}", escaped_root, extension);
        debug!("Discovering chapters with pattern: {}", pattern);

        for entry in glob(&pattern).with_context(|| format!("Invalid chapter pattern {pattern}"))? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) if config.fail_fast => return Err(e.into()),
                Err(e) => warn!("Chapter discovery error (continuing): {}", e),
            }
        }
    }

    files.sort();
    files.dedup();
    info!("Discovered {} chapter files in {}", files.len(), root_dir.display());
    Ok(files)
}
