//! Pausable game clock
//!
//! One clock drives a level: the spawn scheduler gates releases on it and
//! entities compute their motion from its elapsed time. It is passed around
//! explicitly rather than living in a global.

use std::time::Instant;

/// Start/stop/pause clock reporting elapsed seconds
pub trait Clock {
    /// Start counting from zero
    fn start(&mut self);
    /// Stop; elapsed reads 0 until started again
    fn stop(&mut self);
    fn pause(&mut self);
    fn unpause(&mut self);
    /// Seconds since start, excluding paused spans
    fn elapsed(&self) -> f32;
    fn is_started(&self) -> bool;
    fn is_paused(&self) -> bool;

    /// Stop and zero the clock
    fn reset(&mut self) {
        self.stop();
    }
}

/// Timer bookkeeping shared by the real and manual clocks, expressed over
/// an external `now` reading in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Stopwatch {
    start_at: f64,
    paused_elapsed: f64,
    started: bool,
    paused: bool,
}

impl Stopwatch {
    fn start(&mut self, now: f64) {
        self.started = true;
        self.paused = false;
        self.start_at = now;
        self.paused_elapsed = 0.0;
    }

    fn stop(&mut self) {
        *self = Self::default();
    }

    fn pause(&mut self, now: f64) {
        if self.started && !self.paused {
            self.paused = true;
            self.paused_elapsed = now - self.start_at;
        }
    }

    fn unpause(&mut self, now: f64) {
        if self.paused {
            self.paused = false;
            self.start_at = now - self.paused_elapsed;
            self.paused_elapsed = 0.0;
        }
    }

    fn elapsed(&self, now: f64) -> f32 {
        if !self.started {
            0.0
        } else if self.paused {
            self.paused_elapsed as f32
        } else {
            (now - self.start_at) as f32
        }
    }
}

/// Wall-clock backed game clock
#[derive(Debug, Clone)]
pub struct GameClock {
    origin: Instant,
    watch: Stopwatch,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            watch: Stopwatch::default(),
        }
    }

    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Clock for GameClock {
    fn start(&mut self) {
        let now = self.now();
        self.watch.start(now);
    }

    fn stop(&mut self) {
        self.watch.stop();
    }

    fn pause(&mut self) {
        let now = self.now();
        self.watch.pause(now);
    }

    fn unpause(&mut self) {
        let now = self.now();
        self.watch.unpause(now);
    }

    fn elapsed(&self) -> f32 {
        self.watch.elapsed(self.now())
    }

    fn is_started(&self) -> bool {
        self.watch.started
    }

    fn is_paused(&self) -> bool {
        self.watch.paused
    }
}

/// Clock advanced by hand; used by tests and the headless simulator
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: f64,
    watch: Stopwatch,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the underlying time source forward by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.now += f64::from(dt);
    }
}

impl Clock for ManualClock {
    fn start(&mut self) {
        self.watch.start(self.now);
    }

    fn stop(&mut self) {
        self.watch.stop();
    }

    fn pause(&mut self) {
        self.watch.pause(self.now);
    }

    fn unpause(&mut self) {
        self.watch.unpause(self.now);
    }

    fn elapsed(&self) -> f32 {
        self.watch.elapsed(self.now)
    }

    fn is_started(&self) -> bool {
        self.watch.started
    }

    fn is_paused(&self) -> bool {
        self.watch.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_elapsed() {
        let mut clock = ManualClock::new();
        clock.advance(5.0);
        assert_eq!(clock.elapsed(), 0.0);

        clock.start();
        clock.advance(1.5);
        assert!((clock.elapsed() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut clock = ManualClock::new();
        clock.start();
        clock.advance(1.0);
        clock.pause();
        assert!(clock.is_paused());
        clock.advance(10.0);
        assert!((clock.elapsed() - 1.0).abs() < 1e-6);

        clock.unpause();
        clock.advance(0.5);
        assert!((clock.elapsed() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_reset_stops_and_zeroes() {
        let mut clock = ManualClock::new();
        clock.start();
        clock.advance(3.0);
        clock.pause();
        clock.reset();
        assert!(!clock.is_started());
        assert!(!clock.is_paused());
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_pause_before_start_is_ignored() {
        let mut clock = ManualClock::new();
        clock.pause();
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_game_clock_starts_at_zero() {
        let mut clock = GameClock::new();
        clock.start();
        let t = clock.elapsed();
        assert!((0.0..1.0).contains(&t));
    }
}
