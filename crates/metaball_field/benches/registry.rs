mod common;

use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use metaball_field::prelude::{
    EventRegistry, Listener, LocalEventBus, ManualTimers, TimerRegistry,
};

const LISTENER_COUNTS: [usize; 4] = [1, 16, 128, 1024];

fn listeners(count: usize) -> Vec<Listener<()>> {
    (0..count).map(|_| Listener::new(|_: &()| {})).collect()
}

fn event_registry_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/events");

    for &count in &LISTENER_COUNTS {
        group.throughput(common::subscriptions(count));
        let listeners = listeners(count);

        group.bench_with_input(BenchmarkId::new("add_remove_all", count), &count, |b, _| {
            b.iter_batched(
                || EventRegistry::new(LocalEventBus::<usize, ()>::new()),
                |registry| {
                    for (i, listener) in listeners.iter().enumerate() {
                        registry.add(&(i % 8), "resize", listener);
                    }
                    black_box(registry.remove_all());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("dispatch", count), &count, |b, _| {
            let bus = LocalEventBus::<usize, ()>::new();
            let registry = EventRegistry::new(bus.clone());
            for listener in &listeners {
                registry.add(&0, "resize", listener);
            }
            b.iter(|| black_box(bus.dispatch(&0, "resize", &())));
        });
    }

    group.finish();
}

fn timer_registry_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/timers");

    for &count in &LISTENER_COUNTS {
        group.throughput(common::subscriptions(count));

        group.bench_with_input(BenchmarkId::new("schedule_fire", count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let clock = ManualTimers::new();
                    (TimerRegistry::new(clock.clone()), clock)
                },
                |(registry, clock)| {
                    for i in 0..count {
                        registry.schedule(Duration::from_millis(i as u64 % 16), || {});
                    }
                    black_box(clock.advance(Duration::from_millis(16)));
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("schedule_cancel", count), &count, |b, &count| {
            b.iter_batched(
                || TimerRegistry::new(ManualTimers::new()),
                |registry| {
                    for i in 0..count {
                        registry.schedule(Duration::from_millis(i as u64), || {});
                    }
                    black_box(registry.cancel_all());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::frame_criterion();
    targets = event_registry_benches, timer_registry_benches
}
criterion_main!(benches);
