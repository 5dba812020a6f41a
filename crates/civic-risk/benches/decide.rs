use std::hint::black_box;

use civic_core::{IssueMetrics, IssueType, RoadContext, RoadType, TrafficLevel};
use civic_risk::RiskAgent;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_decide(c: &mut Criterion) {
    let agent = RiskAgent::new();
    let metrics = IssueMetrics::area(25.0);
    let context = RoadContext::new(RoadType::Highway, TrafficLevel::High);

    c.bench_function("decide_pothole_highway", |b| {
        b.iter(|| {
            agent.decide(
                black_box(IssueType::Pothole),
                black_box(&metrics),
                black_box(&context),
            )
        })
    });

    let garbage_metrics = IssueMetrics::volume(20.0);
    let quiet = RoadContext::new(RoadType::Residential, TrafficLevel::Low);

    c.bench_function("decide_garbage_residential", |b| {
        b.iter(|| {
            agent.decide(
                black_box(IssueType::Garbage),
                black_box(&garbage_metrics),
                black_box(&quiet),
            )
        })
    });
}

criterion_group!(benches, bench_decide);
criterion_main!(benches);
