//! Benchmark suite for pedagogy-algo
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pedagogy_algo::{
    probability_correct, select_most_informative, ContentContext, ContentSafetyFilter, ItemParams,
};

fn bench_probability_correct(c: &mut Criterion) {
    let item = ItemParams::new(0.3, 1.4, 0.2, 0.98).unwrap();
    c.bench_function("irt::probability_correct", |b| {
        b.iter(|| probability_correct(black_box(0.7), black_box(&item)))
    });
}

fn bench_select_most_informative(c: &mut Criterion) {
    let bank: Vec<ItemParams> = (0..2_000)
        .map(|i| ItemParams::two_pl((i % 60) as f64 / 10.0 - 3.0, 0.5 + (i % 7) as f64 * 0.2).unwrap())
        .collect();
    c.bench_function("irt::select_most_informative/2000", |b| {
        b.iter(|| select_most_informative(black_box(0.4), black_box(&bank)))
    });
}

fn bench_sanitize(c: &mut Criterion) {
    let filter = ContentSafetyFilter::default();
    let text = "Hi, I'm stuck on question 4. Email me at student@example.com or call \
                555-123-4567. My password: hunter2. This damn integral is hard."
        .repeat(20);
    c.bench_function("safety::sanitize", |b| {
        b.iter(|| filter.sanitize(black_box(&text), &ContentContext::LearnerInput))
    });
}

criterion_group!(
    benches,
    bench_probability_correct,
    bench_select_most_informative,
    bench_sanitize
);
criterion_main!(benches);
