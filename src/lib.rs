pub mod dialogue_scanner;
pub mod manuscript;
pub mod report;
pub mod scan_cache;
pub mod stats;
pub mod voices;

// Re-export main types for convenient access
pub use dialogue_scanner::{
    scan, is_valid_name, MIN_DIALOGUE_LEN_FLOOR,
    CharacterRegistry, DialogueScanner, DialogueUtterance, ScanResult, ScannerConfig, SourcePattern
};

// Re-export chapter assembly and caller-side utilities
pub use manuscript::{Chapter, Manuscript, ManuscriptConfig, discover_chapter_files};
pub use scan_cache::{ScanCache, cache_key, generate_cache_path, manuscript_id};
pub use stats::{ScanStats, write_stats};
pub use voices::VoiceAssignments;
