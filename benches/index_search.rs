use criterion::{Criterion, criterion_group, criterion_main};

use lexrag::FlatIndex;

/// Cheap deterministic pseudo-random vectors; no seeding dependency needed
/// for a throughput bench.
fn synthetic_vectors(count: usize, dim: usize) -> Vec<Vec<f32>> {
    let mut state: u64 = 0x2545F4914F6CDD1D;
    (0..count)
        .map(|_| {
            (0..dim)
                .map(|_| {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    ((state >> 33) & 0xffff) as f32 / 65535.0
                })
                .collect()
        })
        .collect()
}

fn bench_flat_search(c: &mut Criterion) {
    for count in [1_000, 10_000] {
        let mut vectors = synthetic_vectors(count + 1, 384);
        let query = vectors.pop().unwrap();
        let index = FlatIndex::build(vectors).unwrap();

        c.bench_function(&format!("flat_search_{count}x384_top5"), |b| {
            b.iter(|| index.search(std::hint::black_box(&query), 5).unwrap())
        });
    }
}

criterion_group! {
    name = search_benches;
    config = Criterion::default().sample_size(20);
    targets = bench_flat_search
}

criterion_main!(search_benches);
