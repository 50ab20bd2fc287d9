//! Benchmarks for the analysis engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bimatrix_solver::analysis::{find_pure_equilibria, simulate_replicator, PayoffMatrix, Session};
use bimatrix_solver::games::evolutionary::hawk_dove;
use bimatrix_solver::games::Preset;

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> PayoffMatrix {
    let data = (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(-10..=10) as f64).collect())
        .collect();
    PayoffMatrix::new(data).expect("random matrix is well formed")
}

fn pure_equilibria_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let p1 = random_matrix(&mut rng, 20, 20);
    let p2 = random_matrix(&mut rng, 20, 20);

    c.bench_function("pure_equilibria_20x20", |b| {
        b.iter(|| find_pure_equilibria(black_box(&p1), black_box(&p2)))
    });
}

fn full_report_benchmark(c: &mut Criterion) {
    let session = Session::from_preset(Preset::BattleOfTheSexes, Default::default());

    c.bench_function("analyze_battle_of_the_sexes", |b| b.iter(|| black_box(session.analyze())));
}

fn replicator_benchmark(c: &mut Criterion) {
    let payoff = hawk_dove(10.0, 15.0).expect("finite parameters");

    c.bench_function("replicator_1000_generations", |b| {
        b.iter(|| simulate_replicator(&payoff, black_box(0.5), 1000, 1.0))
    });
}

criterion_group!(
    benches,
    pure_equilibria_benchmark,
    full_report_benchmark,
    replicator_benchmark
);
criterion_main!(benches);
