//! Criterion benchmarks for the dashboard Aggregator

use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use subsleuth::services::Aggregator;
use subsleuth::types::{BillingCycle, Subscription, DEFAULT_CATEGORIES};

/// Deterministic synthetic subscription list
fn make_subs(count: usize) -> Vec<Subscription> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|i| Subscription {
            id: format!("sub-{}", i),
            name: format!("Service {}", i),
            cost: 1.0 + (i % 97) as f64 * 0.5,
            billing_cycle: if i % 4 == 0 {
                BillingCycle::Yearly
            } else {
                BillingCycle::Monthly
            },
            category: DEFAULT_CATEGORIES[i % DEFAULT_CATEGORIES.len()].to_string(),
            renewal_date: base + Duration::days((i * 37 % 365) as i64),
        })
        .collect()
}

fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator");

    for &count in &[10usize, 100, 1_000] {
        let subs = make_subs(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("summary", count), &subs, |b, subs| {
            b.iter(|| Aggregator::summary(black_box(subs)));
        });
    }

    group.finish();
}

fn bench_category_breakdown(c: &mut Criterion) {
    let subs = make_subs(1_000);

    let mut group = c.benchmark_group("aggregator");
    group.throughput(Throughput::Elements(subs.len() as u64));

    group.bench_function("category_breakdown", |b| {
        b.iter(|| Aggregator::category_breakdown(black_box(&subs)));
    });

    group.bench_function("next_renewal", |b| {
        b.iter(|| Aggregator::next_renewal(black_box(&subs)).map(|s| s.renewal_date));
    });

    group.finish();
}

criterion_group!(benches, bench_summary, bench_category_breakdown);
criterion_main!(benches);
