//! Benchmarks for the per-line pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use packrun::{process_line, LineSignals, Observation, PipelineConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic shift: state toggling every ~30 samples, a counter with
/// occasional resets, and sparse weight samples.
fn generate_line(samples: usize) -> LineSignals {
    let mut rng = StdRng::seed_from_u64(7);
    let mut signals = LineSignals::new("bench-line");
    let mut counter = 0.0;

    for i in 0..samples {
        let timestamp_ms = i as u64 * 10_000;
        let running = (i / 30) % 2 == 1;

        signals
            .state
            .push(Observation::new(timestamp_ms, if running { 4.0 } else { 0.0 }));

        if running {
            counter += rng.gen_range(5.0..15.0);
        }
        if rng.gen_ratio(1, 500) {
            counter = 0.0; // controller restart
        }
        signals.counter.push(Observation::new(timestamp_ms, counter));

        if i % 7 == 0 {
            signals
                .weight
                .push(Observation::new(timestamp_ms, rng.gen_range(200.0..300.0)));
        }
    }

    signals
}

fn bench_process_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for &samples in &[1_000usize, 10_000] {
        let signals = generate_line(samples);
        let config = PipelineConfig::default();

        group.throughput(Throughput::Elements(samples as u64));
        group.bench_function(format!("process_line_{}_samples", samples), |b| {
            b.iter(|| {
                let report = process_line(black_box(&signals), black_box(&config));
                black_box(report);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_process_line);
criterion_main!(benches);
