//! Tick hot-loop micro-benchmark.
//!
//! Measures per-tick cost of the composition engine:
//! - a wide AND group of lambda leaves
//! - a deep sequence hand-off
//! - wire arithmetic evaluation

use criterion::{Criterion, criterion_group, criterion_main};

use takt_core::prelude::*;

fn bench_group_tick(c: &mut Criterion) {
    let mut group = Group::all();
    for _ in 0..64 {
        group.push(LambdaProcess::new(|_| true));
    }
    let mut t = 0.0;

    c.bench_function("group_tick_64_leaves", |b| {
        b.iter(|| {
            t += 0.001;
            group.update(t);
            group.is_completed(t)
        });
    });
}

fn bench_sequence_drain(c: &mut Criterion) {
    c.bench_function("sequence_drain_32", |b| {
        b.iter(|| {
            let mut sequence = Sequence::new();
            for _ in 0..32 {
                sequence.push(LambdaProcess::new(|_| false));
            }
            let mut t = 0.0;
            while !sequence.is_completed(t) {
                t += 0.001;
                sequence.update(t);
            }
            t
        });
    });
}

fn bench_wire_chain(c: &mut Criterion) {
    let base = FloatWire::constant(2.0);
    let mut chain = base.clone();
    for _ in 0..16 {
        chain = chain * base.clone() + 1.0;
    }

    c.bench_function("wire_chain_16_ops", |b| {
        b.iter(|| chain.value());
    });
}

criterion_group!(benches, bench_group_tick, bench_sequence_drain, bench_wire_chain);
criterion_main!(benches);
