use banditry::kullback::{DEFAULT_PRECISION, klucb_bern, klucb_exp, klucb_poisson};
use banditry::policies::{KlUcb, Ucb};
use banditry::prelude::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use std::hint::black_box;

/// Feeds one reward to every arm so that index policies leave their warm-up.
fn warm<P: Policy>(policy: &mut P, rng: &mut rand::rngs::StdRng) {
    for arm in 0..policy.nb_arms() {
        policy.get_reward(arm, (arm % 2) as f64, rng);
    }
}

fn bench_klucb(c: &mut Criterion) {
    let mut group = c.benchmark_group("klucb");

    group.bench_function("bernoulli", |b| {
        b.iter(|| black_box(klucb_bern(black_box(0.3), black_box(0.05), DEFAULT_PRECISION)))
    });
    group.bench_function("poisson", |b| {
        b.iter(|| black_box(klucb_poisson(black_box(4.0), black_box(0.05), DEFAULT_PRECISION)))
    });
    group.bench_function("exponential", |b| {
        b.iter(|| black_box(klucb_exp(black_box(2.0), black_box(0.05), DEFAULT_PRECISION)))
    });

    group.finish();
}

fn bench_choice(c: &mut Criterion) {
    let mut group = c.benchmark_group("choice");

    for n_arms in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("ucb", n_arms), n_arms, |b, &n| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(42);
            let mut policy = IndexPolicy::new(n, Ucb::default()).unwrap();
            warm(&mut policy, &mut rng);
            b.iter(|| black_box(policy.choice(&mut rng)));
        });

        group.bench_with_input(BenchmarkId::new("klucb", n_arms), n_arms, |b, &n| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(42);
            let mut policy = IndexPolicy::new(n, KlUcb::new(Divergence::Bernoulli).unwrap()).unwrap();
            warm(&mut policy, &mut rng);
            b.iter(|| black_box(policy.choice(&mut rng)));
        });

        group.bench_with_input(BenchmarkId::new("thompson", n_arms), n_arms, |b, &n| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(42);
            let mut policy = ThompsonSampling::beta(n).unwrap();
            warm(&mut policy, &mut rng);
            b.iter(|| black_box(policy.choice(&mut rng)));
        });
    }

    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");
    group.sample_size(10);

    let env = Environment::bernoulli(&[0.1, 0.3, 0.5, 0.7, 0.9]).unwrap();
    for parallel in [false, true] {
        let config = EvaluationConfig::builder()
            .nb_repetitions(64)
            .horizon(1000)
            .stride(100)
            .parallel(parallel)
            .build()
            .unwrap();
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(BenchmarkId::new("ucb", label), |b| {
            let policy = IndexPolicy::ucb(5, 1.0).unwrap();
            b.iter(|| black_box(Evaluation::of(&env, &policy, &config).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_klucb, bench_choice, bench_evaluation);
criterion_main!(benches);
