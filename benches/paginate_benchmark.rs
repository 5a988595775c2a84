//! Benchmarks for pageflow pagination and PDF emission.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pageflow::{Content, DocumentEmitter, Geometry, PdfEmitter, Record};

/// Creates synthetic content with `record_count` records of four sections each.
fn create_test_content(record_count: usize) -> Content {
    let channels = ["x", "instagram", "linkedin", "youtube", "tiktok", "facebook"];
    let paragraph = "Plan the week around two anchor posts and reuse the best-performing \
                     clips as short-form follow-ups. Track saves and shares over likes.";

    let records = (0..record_count)
        .map(|i| {
            let body = std::iter::repeat(paragraph)
                .take(4 + i % 3)
                .collect::<Vec<_>>()
                .join("\n");
            Record::new(channels[i % channels.len()])
                .with_section("Strategy", body.clone())
                .with_section("Weekly Plan", "Mon: reel\nWed: carousel\nFri: live")
                .with_section("Content Ideas", body)
                .with_section("Metrics", "Reach, saves, watch time.")
        })
        .collect();

    Content::new(records)
}

/// Benchmark pagination at various sizes.
fn bench_pagination(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");
    let geometry = Geometry::default();

    for record_count in [1, 6, 30].iter() {
        let content = create_test_content(*record_count);

        group.bench_function(format!("{}_records", record_count), |b| {
            b.iter(|| pageflow::paginate(black_box(&content), &geometry).unwrap());
        });
    }

    group.finish();
}

/// Benchmark PDF emission of an already paginated document.
fn bench_pdf_emission(c: &mut Criterion) {
    let doc = pageflow::paginate(&create_test_content(30), &Geometry::default()).unwrap();
    let emitter = PdfEmitter::default();

    c.bench_function("emit_pdf_30_records", |b| {
        b.iter(|| emitter.emit(black_box(&doc)).unwrap());
    });
}

/// Benchmark the full in-memory pipeline.
fn bench_render_pdf(c: &mut Criterion) {
    let content = create_test_content(6);

    c.bench_function("render_pdf_6_records", |b| {
        b.iter(|| pageflow::render_pdf(black_box(&content)).unwrap());
    });
}

criterion_group!(benches, bench_pagination, bench_pdf_emission, bench_render_pdf);
criterion_main!(benches);
