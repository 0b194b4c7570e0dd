//! Monotonic tick clock
//!
//! Turns wall clock time into the deltas fed to `Scenario::advance`. Uses
//! `std::time::Instant` so deltas never go backwards, and scales them by a
//! speed factor for faster or slower than real time playback.

use std::time::Instant;

use crate::time_value::TimeValue;

/// Monotonic clock producing score-time deltas
///
/// While running, every `tick()` returns the wall time elapsed since the
/// previous tick (or since `start()`), multiplied by the speed.
pub struct TickClock {
    /// Instant of the previous tick (None if paused/stopped)
    last_instant: Option<Instant>,

    /// Score time handed out so far
    position: TimeValue,

    speed: f64,
}

impl TickClock {
    /// Create a stopped clock at position 0, running at real time
    pub fn new() -> Self {
        Self {
            last_instant: None,
            position: TimeValue::ZERO,
            speed: 1.0,
        }
    }

    /// Negative or NaN speeds are treated as 0
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = if speed.is_nan() { 0.0 } else { speed.max(0.0) };
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.last_instant.is_none() {
            self.last_instant = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.last_instant.is_some()
    }

    /// Pause without resetting position. Time until pause is accounted for.
    pub fn pause(&mut self) {
        if self.last_instant.is_some() {
            self.tick();
            self.last_instant = None;
        }
    }

    /// Stop and reset to zero
    pub fn stop(&mut self) {
        self.last_instant = None;
        self.position = TimeValue::ZERO;
    }

    /// Delta since the previous tick
    pub fn tick(&mut self) -> TimeValue {
        self.tick_at(Instant::now())
    }

    /// Delta between the previous tick and `now`
    pub fn tick_at(&mut self, now: Instant) -> TimeValue {
        let Some(last) = self.last_instant else {
            return TimeValue::ZERO;
        };
        let elapsed = now.saturating_duration_since(last);
        self.last_instant = Some(now);

        let delta = TimeValue::from_secs(elapsed.as_secs_f64() * self.speed);
        self.position += delta;
        delta
    }

    /// Total score time handed out
    pub fn position(&self) -> TimeValue {
        self.position
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_new_clock_at_zero() {
        let clock = TickClock::new();
        assert_eq!(clock.position(), TimeValue::ZERO);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_stopped_clock_yields_nothing() {
        let mut clock = TickClock::new();
        assert_eq!(clock.tick(), TimeValue::ZERO);
    }

    #[test]
    fn test_deltas_follow_instants() {
        let mut clock = TickClock::new();
        let t0 = Instant::now();
        clock.start_at(t0);

        let delta = clock.tick_at(t0 + Duration::from_millis(250));
        assert_eq!(delta, TimeValue::from_millis(250));
        let delta = clock.tick_at(t0 + Duration::from_millis(300));
        assert_eq!(delta, TimeValue::from_millis(50));
        assert_eq!(clock.position(), TimeValue::from_millis(300));
    }

    #[test]
    fn test_speed_scales_deltas() {
        let mut clock = TickClock::new().with_speed(2.0);
        let t0 = Instant::now();
        clock.start_at(t0);
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(1)), TimeValue::from_secs(2.0));

        clock.set_speed(-1.0);
        assert_eq!(clock.speed(), 0.0);
    }

    #[test]
    fn test_stop_resets_position() {
        let mut clock = TickClock::new();
        clock.start();
        thread::sleep(Duration::from_millis(5));
        clock.tick();
        assert!(clock.position() > TimeValue::ZERO);

        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.position(), TimeValue::ZERO);
    }

    #[test]
    fn test_pause_keeps_position() {
        let mut clock = TickClock::new();
        clock.start();
        thread::sleep(Duration::from_millis(5));
        clock.pause();
        assert!(!clock.is_running());

        let paused_at = clock.position();
        assert!(paused_at > TimeValue::ZERO);
        thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.tick(), TimeValue::ZERO);
        assert_eq!(clock.position(), paused_at);
    }
}
