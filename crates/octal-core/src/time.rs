//! Time system for the Octal engine
//!
//! Handles frame delta time and frame pacing for the main loop.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Configuration for game time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f64,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f64,
    /// Unscaled delta time
    pub unscaled_delta_time: f64,
    /// Frame counter
    pub frame_count: u64,
    /// Whether time is paused
    pub paused: bool,
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f64) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f64) {
        self.config.time_scale = scale.max(0.0);
    }
}

/// Sleeps away whatever is left of a frame's time budget.
///
/// This blocks the calling thread. It exists only to hand unused time back to
/// the OS between frames.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    budget: Option<Duration>,
}

impl FramePacer {
    /// A pacer for `target_fps` frames per second. Zero disables pacing.
    pub fn new(target_fps: u32) -> Self {
        let budget = (target_fps > 0).then(|| Duration::from_secs(1) / target_fps);
        Self { budget }
    }

    /// The per-frame budget, if pacing is enabled
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// How long a frame that started at `frame_start` still has to wait at `now`
    pub fn remaining(&self, frame_start: Instant, now: Instant) -> Duration {
        match self.budget {
            Some(budget) => budget.saturating_sub(now.saturating_duration_since(frame_start)),
            None => Duration::ZERO,
        }
    }

    /// Sleep until the frame that started at `frame_start` has used its budget
    pub fn wait(&self, frame_start: Instant) {
        let remaining = self.remaining(frame_start, Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}
