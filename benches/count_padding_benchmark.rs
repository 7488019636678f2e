use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
};
use padscan::{
    count_padding, count_padding_chunked, count_padding_chunked_path,
    count_padding_full, SliceSource, DEFAULT_CHUNK_SIZE,
};
use rand::prelude::*;
use tempdir::TempDir;

// Modify time limit here
const BENCHMARK_TIME_LIMIT: std::time::Duration =
    std::time::Duration::from_secs(10);

fn generate_padded_data(size: usize, padding: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut data: Vec<u8> = (0..size - padding).map(|_| rng.gen()).collect();
    if let Some(last) = data.last_mut() {
        *last |= 1;
    }
    data.resize(size, 0);
    data
}

/// Benchmarks full and chunked padding counts.
///
/// - In memory, over sources with a growing share of padding.
/// - On disk, where the chunked strategy avoids reading the content.
fn bench_count_padding(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_padding");
    group.measurement_time(BENCHMARK_TIME_LIMIT);

    let inputs = [("10pct", 10), ("50pct", 50), ("90pct", 90)];
    let size = 4 * 1024 * 1024;

    for (name, percentage) in inputs.iter() {
        let data = generate_padded_data(size, size * percentage / 100);

        group.bench_with_input(
            BenchmarkId::new("full", name),
            &data,
            |b, data| {
                b.iter(|| {
                    count_padding_full(&mut SliceSource::new(black_box(data)))
                        .expect("count_padding_full returned an error")
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("chunked", name),
            &data,
            |b, data| {
                b.iter(|| {
                    count_padding_chunked(
                        &mut SliceSource::new(black_box(data)),
                        DEFAULT_CHUNK_SIZE,
                    )
                    .expect("count_padding_chunked returned an error")
                });
            },
        );
    }

    let dir = TempDir::new("count_padding_bench")
        .expect("Failed to create temporary directory");
    let path = dir.path().join("padded.bin");
    std::fs::write(&path, generate_padded_data(size, size / 5))
        .expect("Failed to write benchmark file");

    group.bench_function("file_full", |b| {
        b.iter(|| {
            count_padding(black_box(&path))
                .expect("count_padding returned an error")
        });
    });
    group.bench_function("file_chunked", |b| {
        b.iter(|| {
            count_padding_chunked_path(black_box(&path), DEFAULT_CHUNK_SIZE)
                .expect("count_padding_chunked_path returned an error")
        });
    });

    group.finish();
}

criterion_group!(benches, bench_count_padding);
criterion_main!(benches);
