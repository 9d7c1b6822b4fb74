//! Timing for the tick loop.
//!
//! Physics runs in fixed steps while frames arrive whenever the host loop
//! gets to them. [`StepClock`] converts frame time into a whole number of
//! physics steps, carrying the remainder to the next frame. [`FrameTimer`]
//! measures real frame time and FPS for hosts that have no clock of their
//! own.
//!
//! # Example
//!
//! ```
//! use neuron_swarm::time::StepClock;
//!
//! let mut clock = StepClock::new(1.0 / 60.0, 10);
//!
//! // A 50 ms frame runs three 16.7 ms physics steps.
//! assert_eq!(clock.advance(0.05), 3);
//! ```

use std::time::{Duration, Instant};

use tracing::warn;

/// Fixed-timestep accumulator with a catch-up cap.
#[derive(Debug, Clone, PartialEq)]
pub struct StepClock {
    fixed_step: f32,
    max_substeps: u32,
    accumulator: f32,
    /// Total physics steps handed out.
    steps: u64,
    /// Steps discarded because a frame needed more than `max_substeps`.
    dropped: u64,
}

impl StepClock {
    pub fn new(fixed_step: f32, max_substeps: u32) -> Self {
        Self {
            fixed_step,
            max_substeps,
            accumulator: 0.0,
            steps: 0,
            dropped: 0,
        }
    }

    /// Length of one physics step in seconds.
    #[inline]
    pub fn fixed_step(&self) -> f32 {
        self.fixed_step
    }

    /// Add a frame's worth of time and return how many physics steps to run.
    ///
    /// Never returns more than `max_substeps`. Time beyond that is thrown
    /// away instead of piling up into an ever longer catch-up.
    pub fn advance(&mut self, frame_delta: f32) -> u32 {
        if !(frame_delta > 0.0) || !frame_delta.is_finite() {
            return 0;
        }
        self.accumulator += frame_delta;

        // Small epsilon so frames of exactly n steps are not lost to rounding.
        let due = ((self.accumulator + self.fixed_step * 1e-4) / self.fixed_step).floor() as u64;
        let run = due.min(self.max_substeps as u64);
        if due > run {
            let skipped = due - run;
            self.dropped += skipped;
            warn!(skipped, "physics fell behind, dropping steps");
            self.accumulator = 0.0;
        } else {
            self.accumulator = (self.accumulator - run as f32 * self.fixed_step).max(0.0);
        }

        self.steps += run;
        run as u32
    }

    /// Fraction of a step left over in the accumulator, in [0, 1).
    #[inline]
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.fixed_step).min(1.0)
    }

    /// Total physics steps handed out so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Total steps dropped by the catch-up cap.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Wall-clock frame timing.
#[derive(Debug)]
pub struct FrameTimer {
    last_frame: Instant,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
}

impl FrameTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
        }
    }

    /// Mark a new frame and return the seconds since the previous one.
    ///
    /// Returns 0 while paused.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        if self.paused {
            0.0
        } else {
            delta
        }
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_exact_frame_runs_one_step() {
        let mut clock = StepClock::new(1.0 / 60.0, 10);
        assert_eq!(clock.advance(1.0 / 60.0), 1);
        assert_eq!(clock.steps(), 1);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut clock = StepClock::new(1.0 / 60.0, 10);
        assert_eq!(clock.advance(1.0 / 180.0), 0);
        assert_eq!(clock.advance(1.0 / 180.0), 0);
        assert_eq!(clock.advance(1.0 / 180.0), 1);
        assert!(clock.alpha() < 0.01);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut clock = StepClock::new(0.01, 5);
        assert_eq!(clock.advance(1.0), 5);
        assert_eq!(clock.dropped(), 95);
        // The backlog is gone, so the next short frame does not spike.
        assert_eq!(clock.advance(0.01), 1);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = StepClock::new(0.01, 5);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
        assert_eq!(clock.steps(), 0);
    }

    #[test]
    fn test_frame_timer_tick() {
        let mut timer = FrameTimer::new();
        thread::sleep(Duration::from_millis(10));
        let delta = timer.tick();

        assert!(delta > 0.0);
        assert_eq!(timer.frame(), 1);
    }

    #[test]
    fn test_frame_timer_pause() {
        let mut timer = FrameTimer::new();
        timer.toggle_pause();
        thread::sleep(Duration::from_millis(5));

        assert!(timer.is_paused());
        assert_eq!(timer.tick(), 0.0);
    }
}
