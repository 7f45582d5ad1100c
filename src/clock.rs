//! Frame timing.
//!
//! The renderer never reads the wall clock itself. A [`FrameClock`] hands out
//! the elapsed time since the previous tick, and [`run_frames`] keeps calling
//! the frame callback with that delta until the callback asks to stop.

use std::ops::ControlFlow;
use std::time::Instant;

/// Source of per-frame time deltas, in seconds
pub trait FrameClock {
    /// Seconds since the previous call (or since creation for the first call)
    fn delta(&mut self) -> f64;
}

/// Wall-clock deltas
#[derive(Debug)]
pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            last: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn delta(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        delta
    }
}

/// Fixed-step clock for deterministic playback and tests
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    step: f64,
}

impl ManualClock {
    pub fn new(step: f64) -> Self {
        ManualClock { step }
    }
}

impl FrameClock for ManualClock {
    fn delta(&mut self) -> f64 {
        self.step
    }
}

/// Calls `frame` with each tick's delta until it breaks, returning the break value
pub fn run_frames<C, F, B>(clock: &mut C, mut frame: F) -> B
where
    C: FrameClock + ?Sized,
    F: FnMut(f64) -> ControlFlow<B>,
{
    loop {
        if let ControlFlow::Break(value) = frame(clock.delta()) {
            return value;
        }
    }
}

/// Rolling frames-per-second estimate, refreshed once per second
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: usize,
    window: f64,
    fps: f64,
}

impl FpsCounter {
    pub fn new() -> Self {
        FpsCounter {
            frames: 0,
            window: 0.0,
            fps: 0.0,
        }
    }

    pub fn tick(&mut self, dt: f64) {
        self.frames += 1;
        self.window += dt;
        if self.window >= 1.0 {
            self.fps = self.frames as f64 / self.window;
            self.frames = 0;
            self.window = 0.0;
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
