//! Timing helper and the scenario registry.
//!
//! The scenario benches and `cmpbench suite` both prepare their inputs here,
//! so the two always measure the same data.

use std::time::{Duration, Instant};

pub mod scenarios;

/// Run `f` once and return its result with the wall-clock time it took.
#[inline]
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}
