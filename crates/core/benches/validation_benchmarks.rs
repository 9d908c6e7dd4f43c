use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use itinera_core::TripRequest;

fn bench_validation(c: &mut Criterion) {
    let valid = json!({"destination": "Paris", "durationDays": 3});
    let invalid = json!({"destination": "   ", "durationDays": -4});

    c.bench_function("trip_request_valid", |b| {
        b.iter(|| TripRequest::from_json(black_box(&valid)))
    });
    c.bench_function("trip_request_invalid", |b| {
        b.iter(|| TripRequest::from_json(black_box(&invalid)))
    });
}

criterion_group!(benches, bench_validation);
criterion_main!(benches);
