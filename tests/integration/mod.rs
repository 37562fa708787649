// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Three chapters exercising each attribution pattern once
pub const CHAPTER_ONE: &str = "The harbor was quiet at dusk.\n\nSarah: \"We should leave before dark.\"";
pub const CHAPTER_TWO: &str = "The wind picked up.\n\nTom said \"I am not ready yet.\"";
pub const CHAPTER_THREE: &str = "Lanterns flickered along the pier.\n\n\"Then hurry up,\" Jane whispered.";

/// Test fixture helper for creating temporary project directories with chapter files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Create a chapter file with given content, creating parent directories as needed
    pub fn create_chapter_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write chapter file");
        file_path
    }

    /// Lay out the standard three-chapter project under `chapters/`
    pub fn create_standard_project(&self) -> PathBuf {
        self.create_chapter_file("chapters/01-harbor.txt", CHAPTER_ONE);
        self.create_chapter_file("chapters/02-wind.txt", CHAPTER_TWO);
        self.create_chapter_file("chapters/03-pier.md", CHAPTER_THREE);
        self.root_path.join("chapters")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root_path.join("cache")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir().join(".authorr_scan_cache.json")
    }

    pub fn cache_exists(&self) -> bool {
        self.cache_path().exists()
    }

    pub fn read_cache(&self) -> Result<String, std::io::Error> {
        fs::read_to_string(self.cache_path())
    }
}
