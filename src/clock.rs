// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub elapsed: f64,
    pub delta: f64,
}

#[derive(Clone, Debug)]
pub struct Clock {
    session_start: Instant,
    last_update: Instant,
    max_delta: Option<Duration>,
}

impl Clock {
    pub fn new(now: Instant) -> Self {
        Self {
            session_start: now,
            last_update: now,
            max_delta: None,
        }
    }

    pub fn set_max_delta(&mut self, cap: Option<Duration>) {
        self.max_delta = cap.filter(|d| !d.is_zero());
    }

    #[cfg(test)]
    pub fn session_start(&self) -> Instant {
        self.session_start
    }

    #[cfg(test)]
    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    /// Derives the pulse scalars. Does not commit; see [`Clock::commit`].
    pub fn pulse(&self, now: Instant) -> Pulse {
        let elapsed = now.saturating_duration_since(self.session_start);
        let mut delta = now.saturating_duration_since(self.last_update);
        if let Some(cap) = self.max_delta {
            delta = delta.min(cap);
        }
        Pulse {
            elapsed: elapsed.as_secs_f64(),
            delta: delta.as_secs_f64(),
        }
    }

    pub fn commit(&mut self, now: Instant) {
        self.last_update = now;
    }

    /// Moves both timestamps forward, hiding `by` from elapsed and delta.
    pub fn shift(&mut self, by: Duration) {
        self.session_start += by;
        self.last_update += by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_measured_from_last_commit() {
        let t0 = Instant::now();
        let mut clock = Clock::new(t0);

        let t1 = t0 + Duration::from_millis(100);
        let p = clock.pulse(t1);
        assert!((p.elapsed - 0.1).abs() < 1e-9);
        assert!((p.delta - 0.1).abs() < 1e-9);

        // Not committed yet: a second read sees the same base.
        let t2 = t0 + Duration::from_millis(150);
        assert!((clock.pulse(t2).delta - 0.15).abs() < 1e-9);

        clock.commit(t1);
        let p = clock.pulse(t2);
        assert!((p.elapsed - 0.15).abs() < 1e-9);
        assert!((p.delta - 0.05).abs() < 1e-9);
        assert_eq!(clock.session_start(), t0);
    }

    #[test]
    fn timestamps_before_last_update_saturate_to_zero() {
        let t0 = Instant::now();
        let mut clock = Clock::new(t0);
        clock.commit(t0 + Duration::from_secs(1));
        let p = clock.pulse(t0);
        assert_eq!(p.delta, 0.0);
        assert_eq!(p.elapsed, 0.0);
    }

    #[test]
    fn max_delta_caps_delta_but_not_elapsed() {
        let t0 = Instant::now();
        let mut clock = Clock::new(t0);
        clock.set_max_delta(Some(Duration::from_millis(250)));
        let p = clock.pulse(t0 + Duration::from_secs(3));
        assert!((p.delta - 0.25).abs() < 1e-9);
        assert!((p.elapsed - 3.0).abs() < 1e-9);

        clock.set_max_delta(Some(Duration::ZERO));
        assert!((clock.pulse(t0 + Duration::from_secs(3)).delta - 3.0).abs() < 1e-9);
    }

    #[test]
    fn shift_hides_a_gap() {
        let t0 = Instant::now();
        let mut clock = Clock::new(t0);
        clock.commit(t0 + Duration::from_secs(1));
        clock.shift(Duration::from_secs(10));
        let p = clock.pulse(t0 + Duration::from_secs(12));
        assert!((p.elapsed - 2.0).abs() < 1e-9);
        assert!((p.delta - 1.0).abs() < 1e-9);
    }
}
