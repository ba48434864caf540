use std::time::{Duration, Instant};

/// Monotonic request timer. Immune to wall-clock adjustments, so elapsed time is never negative.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed milliseconds rounded to two decimals.
    pub fn elapsed_ms(&self) -> f64 {
        duration_ms(self.elapsed())
    }
}

pub fn duration_ms(duration: Duration) -> f64 {
    let ms = duration.as_nanos() as f64 / 1_000_000.0;
    (ms * 100.0).round() / 100.0
}
