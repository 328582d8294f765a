// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fluxion_observable::{Observer, Subject};
use fluxion_subject::PublishSubject;
use fluxion_test_utils::RecordingObserver;

fn bench_fan_out(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("subject_fan_out");

    for &subscribers in &[1usize, 8, 64] {
        group.throughput(Throughput::Elements(subscribers as u64));
        let id = BenchmarkId::from_parameter(subscribers);
        group.bench_with_input(id, &subscribers, |bencher, &subscribers| {
            bencher.iter(|| {
                runtime.block_on(async {
                    let subject = PublishSubject::new();
                    for _ in 0..subscribers {
                        let recorder = Arc::new(RecordingObserver::<i32>::new());
                        subject.as_observable().subscribe(recorder).await;
                    }
                    for item in 0..100 {
                        subject.on_next(item).await;
                    }
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fan_out);
criterion_main!(benches);
