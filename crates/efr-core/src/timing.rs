//! Wall-clock timing for run summaries.
//!
//! Drivers report how long a workflow took; the timer here is the single
//! place that touches `Instant`.

use std::time::Instant;

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Seconds elapsed since `start`.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Stop the timer and return the elapsed time.
    pub fn stop(self) -> Elapsed {
        Elapsed {
            label: self.label,
            seconds: self.elapsed_s(),
        }
    }
}

/// Elapsed wall time of a finished timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elapsed {
    pub label: &'static str,
    pub seconds: f64,
}

impl Elapsed {
    /// Split into whole minutes and remaining seconds.
    pub fn minutes_seconds(&self) -> (u64, f64) {
        let minutes = (self.seconds / 60.0).floor();
        (minutes as u64, self.seconds - minutes * 60.0)
    }
}

impl std::fmt::Display for Elapsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (min, sec) = self.minutes_seconds();
        write!(
            f,
            "{} elapsed time = {:.2} seconds (≈ {} min {:.0} sec)",
            self.label, self.seconds, min, sec
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_seconds_split() {
        let e = Elapsed {
            label: "run",
            seconds: 125.5,
        };
        let (min, sec) = e.minutes_seconds();
        assert_eq!(min, 2);
        assert!((sec - 5.5).abs() < 1e-12);
        assert!(e.to_string().contains("2 min"));
    }

    #[test]
    fn timer_is_monotonic() {
        let t = Timer::start("noop");
        assert_eq!(t.label(), "noop");
        let elapsed = t.stop();
        assert!(elapsed.seconds >= 0.0);
    }
}
