//! Throttled progress messages for step loops and sweeps
//!
//! A run of a few thousand steps or a sweep over many `(n, threads)` pairs
//! would flood the log if every iteration reported. [`PeriodicLogger`]
//! announces the start of the loop once, then lets through at most one
//! progress line per interval.

use lazy_static::lazy_static;
use log::{info, log, Level};
use std::fmt::Display;
use std::sync::RwLock;
use std::time::{Duration, Instant};

lazy_static! {
    // process-wide, set once from the command line
    static ref DEFAULT_INTERVAL: RwLock<Duration> = RwLock::new(Duration::from_secs(1));
}

/// Interval picked up by every later [`PeriodicLogger::new`]
pub fn set_default_interval(interval: Duration) {
    if let Ok(mut d) = DEFAULT_INTERVAL.write() {
        *d = interval;
    }
}

pub fn default_interval() -> Duration {
    DEFAULT_INTERVAL
        .read()
        .map(|d| *d)
        .unwrap_or(Duration::from_secs(1))
}

/// ```ignore
/// let mut progress = PeriodicLogger::new("stepping", Level::Info);
/// for s in 1..=steps {
///     kernel.step(&mut store, &params);
///     progress.log(format_args!("step {s} / {steps}"));
/// }
/// ```
pub struct PeriodicLogger {
    last_logged: Instant,
    interval: Duration,
    level: Level,
}

impl PeriodicLogger {
    pub fn new(start_message: &str, level: Level) -> Self {
        Self::new_with_interval(start_message, default_interval(), level)
    }

    pub fn new_with_interval(start_message: &str, interval: Duration, level: Level) -> Self {
        info!("{start_message}");
        Self {
            last_logged: Instant::now(),
            interval,
            level,
        }
    }

    /// Emit `message` if the interval has elapsed since the last emitted
    /// line; returns whether it was emitted
    pub fn log<D: Display>(&mut self, message: D) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_logged) < self.interval {
            return false;
        }
        self.last_logged = now;
        log!(self.level, "\t{message}");
        true
    }
}
