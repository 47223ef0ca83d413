// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use criterion::Criterion;

use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<T>().ok()).unwrap_or(default)
}

/// Criterion with a flamegraph profiler attached (`cargo bench -- --profile-time <secs>`).
pub fn criterion() -> Criterion {
    let frequency = env_or("SKETCHBRIDGE_PROFILE_FREQ", 100i32).clamp(1, 1000);
    let sample_size = env_or("SKETCHBRIDGE_BENCH_SAMPLES", 50usize).clamp(10, 200);
    let measurement_secs = env_or("SKETCHBRIDGE_BENCH_SECS", 4u64).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(measurement_secs))
        .with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
}
