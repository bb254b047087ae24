//! Fixed timestep simulation clock
//!
//! Converts variable host frame times into a whole number of fixed
//! `PhysicsWorld::step` calls, carrying the remainder to the next frame.
use std::time::{Duration, Instant};

use super::physics::PhysicsError;

/// Default simulation rate (60 steps per second)
pub const DEFAULT_TIMESTEP: f64 = 1.0 / 60.0;

/// `DEFAULT_TIMESTEP` rounded to whole nanoseconds
const DEFAULT_STEP: Duration = Duration::from_nanos(16_666_667);

/// Maximum number of steps per frame to prevent spiral of death
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// Accumulator turning frame time into fixed steps
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Fixed step length
    dt: Duration,

    /// Step cap per frame
    max_steps: u32,

    /// Time not yet consumed by steps
    accumulator: Duration,

    /// Time of the last `tick`
    last_tick: Option<Instant>,

    paused: bool,
    frame_count: u64,
    step_count: u64,
}

impl SimulationClock {
    /// Create a clock stepping every `dt` seconds
    ///
    /// `dt` must be finite and at least one nanosecond long.
    pub fn new(dt: f64) -> Result<Self, PhysicsError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        let step =
            Duration::try_from_secs_f64(dt).map_err(|_| PhysicsError::InvalidTimestep(dt))?;
        if step.is_zero() {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        Ok(Self::from_step(step))
    }

    fn from_step(dt: Duration) -> Self {
        Self {
            dt,
            max_steps: MAX_STEPS_PER_FRAME,
            accumulator: Duration::ZERO,
            last_tick: None,
            paused: false,
            frame_count: 0,
            step_count: 0,
        }
    }

    /// Override the per-frame step cap
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Feed one frame's duration, returns the number of steps to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_steps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.dt {
            log::debug!(
                "Dropping {:?} of simulation time after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator = Duration::ZERO;
        }

        self.step_count += steps as u64;
        steps
    }

    /// Measure wall time since the previous call and advance by it
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = self
            .last_tick
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.advance(frame_time)
    }

    /// Step length in seconds
    pub fn dt(&self) -> f64 {
        self.dt.as_secs_f64()
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f64 {
        self.accumulator.as_secs_f64() / self.dt.as_secs_f64()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Simulated time consumed so far
    pub fn simulated_secs(&self) -> f64 {
        self.step_count as f64 * self.dt()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a step burst
            self.accumulator = Duration::ZERO;
            self.last_tick = None;
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::from_step(DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_clock_creation() {
        let clock = SimulationClock::default();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.step_count(), 0);
        assert!(!clock.is_paused());
        assert_abs_diff_eq!(clock.dt(), DEFAULT_TIMESTEP, epsilon = 1e-9);
    }

    #[test]
    fn test_accumulates_remainder() {
        let mut clock = SimulationClock::new(0.010).unwrap();

        assert_eq!(clock.advance(millis(15)), 1);
        assert_abs_diff_eq!(clock.alpha(), 0.5, epsilon = 1e-9);

        assert_eq!(clock.advance(millis(6)), 1);
        assert_eq!(clock.advance(millis(3)), 0);
        assert_eq!(clock.step_count(), 2);
        assert_eq!(clock.frame_count(), 3);
        assert_abs_diff_eq!(clock.simulated_secs(), 0.02, epsilon = 1e-9);
    }

    #[test]
    fn test_max_steps_limit() {
        let mut clock = SimulationClock::new(0.010).unwrap().with_max_steps(3);

        // 300ms would allow 30 steps
        assert_eq!(clock.advance(millis(300)), 3);
        // Backlog is dropped rather than replayed
        assert_eq!(clock.advance(millis(0)), 0);
    }

    #[test]
    fn test_pause_resume() {
        let mut clock = SimulationClock::new(0.010).unwrap();
        clock.advance(millis(5));

        clock.pause();
        assert!(clock.is_paused());
        assert_eq!(clock.advance(millis(50)), 0);
        assert_eq!(clock.frame_count(), 2);

        clock.resume();
        assert!(!clock.is_paused());
        assert_eq!(clock.alpha(), 0.0);
        assert_eq!(clock.advance(millis(10)), 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut clock = SimulationClock::default();

        clock.toggle_pause();
        assert!(clock.is_paused());

        clock.toggle_pause();
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_rejects_invalid_timestep() {
        for dt in [-0.01, 0.0, -0.0, 1e-12, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300] {
            match SimulationClock::new(dt) {
                Err(PhysicsError::InvalidTimestep(_)) => {}
                other => panic!("dt {} should be rejected, got {:?}", dt, other),
            }
        }
    }

    #[test]
    fn test_accepts_small_timestep() {
        let mut clock = SimulationClock::new(1e-6).unwrap();
        assert_abs_diff_eq!(clock.dt(), 1e-6, epsilon = 1e-11);
        assert_eq!(clock.advance(Duration::from_micros(10)), MAX_STEPS_PER_FRAME);
        assert!(clock.alpha().is_finite());
    }

    #[test]
    fn test_first_tick_runs_no_steps() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.frame_count(), 1);
    }
}
