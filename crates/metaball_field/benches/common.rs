#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};

pub const SAMPLE_SIZE: usize = 50;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

/// Host frame interval at 60 Hz.
pub const FRAME_MILLIS: f64 = 1000.0 / 60.0;

pub fn frame_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput of one frame, counted in generators.
pub fn generators_per_frame(generator_count: usize) -> Throughput {
    Throughput::Elements(generator_count.max(1) as u64)
}

/// Throughput of one registry pass, counted in subscriptions.
pub fn subscriptions(count: usize) -> Throughput {
    Throughput::Elements(count.max(1) as u64)
}

/// Timestamp after `frame` host frames.
pub fn frame_time(frame: u64) -> f64 {
    frame as f64 * FRAME_MILLIS
}
