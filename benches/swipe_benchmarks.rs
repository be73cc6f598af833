use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use swipe_align::core::alignment::cell_update::{cell_update, cell_update_biased};
use swipe_align::core::alignment::gotoh::local_score;
use swipe_align::core::compute::score_vector::ScoreVector;
use swipe_align::{
    banded_3frame_swipe, banded_swipe, banded_swipe_traceback, swipe, DpTarget, DpWorkspace, Scoring, TranslatedQuery,
};

fn generate_random_protein(len: usize, seed: u64) -> Vec<u8> {
    // Simple LCG random number generator for reproducible sequences
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            ((rng / 65536) % 20) as u8
        })
        .collect()
}

fn generate_protein_with_mutations(seq: &[u8], mutation_rate: f64, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    seq.iter()
        .map(|&aa| {
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            let rand_val = (rng % 1000) as f64 / 1000.0;
            if rand_val < mutation_rate {
                (aa + 1 + ((rng / 1000) % 19) as u8) % 20
            } else {
                aa
            }
        })
        .collect()
}

/// One million cell updates, plain (i8) and biased (u8)
fn bench_cell_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_update");
    group.throughput(Throughput::Elements(1_000_000));

    group.bench_function("i8x16", |b| {
        let scores = ScoreVector::<i8>::from_lanes(&[3, -1, 2, 5, -4, 0, 1, 1, 2, -2, 6, 0, -1, 3, 2, 1]);
        let (open, ext) = (ScoreVector::<i8>::splat(11), ScoreVector::<i8>::splat(1));
        b.iter(|| {
            let (mut h, mut v, mut best, mut diag) = (ScoreVector::zero(), ScoreVector::zero(), ScoreVector::zero(), ScoreVector::zero());
            for _ in 0..1_000_000 {
                diag = cell_update(black_box(diag), scores, ext, open, &mut h, &mut v, &mut best);
            }
            black_box(best)
        })
    });

    group.bench_function("u8x16_biased", |b| {
        let scores = ScoreVector::<u8>::from_lanes(&[7, 3, 6, 9, 0, 4, 5, 5, 6, 2, 10, 4, 3, 7, 6, 5]);
        let (bias, open, ext) = (ScoreVector::<u8>::splat(4), ScoreVector::<u8>::splat(11), ScoreVector::<u8>::splat(1));
        b.iter(|| {
            let (mut h, mut v, mut best, mut diag) = (ScoreVector::zero(), ScoreVector::zero(), ScoreVector::zero(), ScoreVector::zero());
            for _ in 0..1_000_000 {
                diag = cell_update_biased(black_box(diag), scores, bias, ext, open, &mut h, &mut v, &mut best);
            }
            black_box(best)
        })
    });
    group.finish();
}

/// Full-matrix SWIPE of one query against 16 targets, per lane kind
fn bench_swipe(c: &mut Criterion) {
    let scoring = Scoring::default();
    let mut group = c.benchmark_group("swipe_16_targets");

    for len in [50usize, 150, 400] {
        let query = generate_random_protein(len, 42);
        let targets: Vec<Vec<u8>> =
            (0..16).map(|i| generate_protein_with_mutations(&query, 0.2, 100 + i)).collect();
        group.throughput(Throughput::Elements((len * len * 16) as u64));

        group.bench_with_input(BenchmarkId::new("u8", len), &len, |b, _| {
            let mut ws = DpWorkspace::<u8>::new();
            b.iter(|| black_box(swipe(black_box(&query), &targets, &scoring, &mut ws)))
        });
        group.bench_with_input(BenchmarkId::new("i16", len), &len, |b, _| {
            let mut ws = DpWorkspace::<i16>::new();
            b.iter(|| black_box(swipe(black_box(&query), &targets, &scoring, &mut ws)))
        });
        group.bench_with_input(BenchmarkId::new("scalar", len), &len, |b, _| {
            b.iter(|| {
                for t in &targets {
                    black_box(local_score(black_box(&query), t, &scoring));
                }
            })
        });
    }
    group.finish();
}

/// Banded passes over 8 targets (one i16 batch)
fn bench_banded(c: &mut Criterion) {
    let scoring = Scoring::default();
    let mut group = c.benchmark_group("banded_8_targets");
    let query = generate_random_protein(300, 7);
    let targets: Vec<Vec<u8>> = (0..8).map(|i| generate_protein_with_mutations(&query, 0.2, 200 + i)).collect();

    for width in [8i32, 32] {
        let batch: Vec<DpTarget> = targets.iter().map(|t| DpTarget::around(t, 0, width)).collect();
        group.bench_with_input(BenchmarkId::new("score", width), &width, |b, _| {
            let mut ws = DpWorkspace::<i16>::new();
            b.iter(|| black_box(banded_swipe(black_box(&query), &batch, &scoring, &mut ws)))
        });
        group.bench_with_input(BenchmarkId::new("traceback", width), &width, |b, _| {
            let mut ws = DpWorkspace::<i16>::new();
            let mut out = Vec::with_capacity(8);
            b.iter(|| {
                out.clear();
                banded_swipe_traceback(black_box(&query), &batch, &scoring, &mut ws, &mut out).unwrap();
                black_box(out.len())
            })
        });
    }

    let dna: Vec<u8> = generate_random_protein(900, 9).iter().map(|&x| b"ACGT"[(x % 4) as usize]).collect();
    let translated = TranslatedQuery::translate(&dna);
    let subjects: Vec<Vec<u8>> = (0..8).map(|i| generate_random_protein(300, 300 + i)).collect();
    let batch: Vec<DpTarget> = subjects.iter().map(|s| DpTarget::around(s, 0, 16)).collect();
    group.bench_function("three_frame", |b| {
        let mut ws = DpWorkspace::<i16>::new();
        b.iter(|| black_box(banded_3frame_swipe(black_box(&translated), &batch, &scoring, &mut ws)))
    });
    group.finish();
}

criterion_group!(benches, bench_cell_update, bench_swipe, bench_banded);
criterion_main!(benches);
