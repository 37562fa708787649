use authorr_scan::{DialogueScanner, ScannerConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const SIMPLE_TEXT: &str = "Sarah: \"Hello there.\"\n\nTom said \"I am leaving.\"\n\n\"Wait!\" Jane shouted.";

const CHAPTER_TEXT: &str = r#"The harbor was quiet at dusk, and the last boats drifted in on the tide.

Sarah: "We should leave before dark."

The wind picked up. Tom said "I am not ready yet." He folded the map twice and tucked it away.

"Then hurry up," Jane whispered. Lanterns flickered along the pier while gulls circled overhead.

Nobody spoke for a while. The water slapped against the hull.
"#;

fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialogue_scan");

    group.bench_function("scanner_construction", |b| {
        b.iter(|| DialogueScanner::new(black_box(ScannerConfig::default())).unwrap())
    });

    let scanner = DialogueScanner::with_default_config().unwrap();

    group.bench_function("simple_text", |b| {
        b.iter(|| scanner.scan(black_box(SIMPLE_TEXT)))
    });

    group.bench_function("chapter_text", |b| {
        b.iter(|| scanner.scan(black_box(CHAPTER_TEXT)))
    });

    group.finish();
}

fn bench_manuscript_throughput(c: &mut Criterion) {
    // a book-length manuscript built from repeated chapters
    let manuscript = CHAPTER_TEXT.repeat(200);
    let unbalanced = "Alpha Beta Gamma Delta \"".repeat(5_000);
    let scanner = DialogueScanner::with_default_config().unwrap();

    let mut group = c.benchmark_group("manuscript_throughput");
    group.throughput(Throughput::Bytes(manuscript.len() as u64));

    group.bench_function("book_length", |b| {
        b.iter(|| scanner.scan(black_box(&manuscript)))
    });

    group.bench_function("unbalanced_quotes", |b| {
        b.iter(|| scanner.scan(black_box(&unbalanced)))
    });

    group.finish();
}

criterion_group!(benches, bench_scanner, bench_manuscript_throughput);
criterion_main!(benches);
