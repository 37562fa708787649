use anyhow::Result;
use authorr_scan::{
    cache_key, manuscript_id, report, write_stats, DialogueScanner, Manuscript, ManuscriptConfig, ScanCache,
    ScanResult, ScanStats, ScannerConfig, VoiceAssignments,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Full scan result as JSON
    Json,
    /// One tab-separated line per dialogue section
    Table,
    /// Characters with utterance counts and voices
    Characters,
    /// Narration-only text
    Narrative,
}

#[derive(Parser, Debug)]
#[command(name = "authorr-scan")]
#[command(about = "Detect speaking characters and their dialogue in manuscript chapters")]
#[command(version)]
struct Args {
    /// Chapter files or directories of chapter files, in reading order
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Minimum quoted-text length in characters
    #[arg(long, default_value_t = 3)]
    min_dialogue_len: usize,

    /// Raw matches examined per detection pattern
    #[arg(long, default_value_t = 200)]
    max_matches: usize,

    /// Voice assignment JSON file
    #[arg(long)]
    voices: Option<PathBuf>,

    /// Rewrite the voice file without characters that are no longer detected
    #[arg(long, requires = "voices")]
    prune_voices: bool,

    /// Directory holding the scan cache; caching is off without it
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Discard any cached result for this manuscript before scanning
    #[arg(long)]
    refresh: bool,

    /// Abort on the first unreadable chapter
    #[arg(long)]
    fail_fast: bool,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the report, so structured logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let run_start = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let started = Instant::now();

    for path in &args.paths {
        if !path.exists() {
            anyhow::bail!("Path does not exist: {}", path.display());
        }
    }

    let manuscript_config = ManuscriptConfig {
        fail_fast: args.fail_fast,
        ..Default::default()
    };
    let manuscript = Manuscript::load(&args.paths, &manuscript_config).await?;
    let content = manuscript.text_for_scan()?;

    let scanner = DialogueScanner::new(ScannerConfig {
        min_dialogue_len: args.min_dialogue_len,
        max_matches_per_pattern: args.max_matches,
    })?;

    let (result, cache_hit) = scan_with_cache(&scanner, &content, &args).await?;

    let mut voices = match &args.voices {
        Some(path) => Some(VoiceAssignments::load(path).await?),
        None => None,
    };
    if args.prune_voices {
        if let (Some(voices), Some(path)) = (voices.as_mut(), args.voices.as_ref()) {
            if voices.prune(&result) > 0 {
                voices.save(path).await?;
            }
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => print!("{}", report::dialogue_table(&result)),
        OutputFormat::Characters => print!("{}", report::character_table(&result, voices.as_ref())),
        OutputFormat::Narrative => println!("{}", result.narrative_text),
    }

    if result.is_empty() {
        eprintln!("{}", report::no_dialogue_notice());
    } else {
        eprintln!("{}", report::summary_line(&result));
        if let Some(voices) = &voices {
            let unassigned = voices.unassigned(&result);
            if !unassigned.is_empty() {
                eprintln!("Characters without a voice: {}", unassigned.join(", "));
            }
        }
    }

    if let Some(stats_path) = &args.stats_out {
        let stats = ScanStats::from_result(
            &result,
            run_start,
            manuscript.chapter_count(),
            content.chars().count(),
            started.elapsed().as_millis() as u64,
            cache_hit,
        );
        write_stats(&stats, stats_path).await?;
        info!("Wrote stats to {}", stats_path.display());
    }

    Ok(())
}

/// Scan through the optional cache; returns the result and whether it was a cache hit
async fn scan_with_cache(scanner: &DialogueScanner, content: &str, args: &Args) -> Result<(ScanResult, bool)> {
    let Some(cache_dir) = &args.cache_dir else {
        return Ok((scanner.scan(content), false));
    };

    let mut cache = ScanCache::load(cache_dir).await;
    let manuscript = manuscript_id(&args.paths);
    let key = cache_key(content, scanner.config());

    if args.refresh && cache.invalidate(&manuscript) {
        info!("Discarded cached scan for manuscript {}", manuscript);
    } else if let Some(cached) = cache.get(&manuscript, &key) {
        info!("Using cached scan {}", key);
        return Ok((cached.clone(), true));
    }

    let result = scanner.scan(content);
    cache.insert(manuscript, key, result.clone());
    cache.save(cache_dir).await?;
    Ok((result, false))
}
