use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arena_core::{mock_cohort, rank, LeagueTable};

fn rank_cohort(c: &mut Criterion) {
    let cohort = mock_cohort(500, 42);
    c.bench_function("rank_cohort_500", |b| {
        b.iter(|| rank(black_box(&cohort)).unwrap())
    });
}

fn classify_sweep(c: &mut Criterion) {
    let table = LeagueTable::builtin();
    c.bench_function("classify_0_to_12k", |b| {
        b.iter(|| {
            for xp in (0..12_000).step_by(37) {
                black_box(table.classify(xp).unwrap());
            }
        })
    });
}

criterion_group!(benches, rank_cohort, classify_sweep);
criterion_main!(benches);
