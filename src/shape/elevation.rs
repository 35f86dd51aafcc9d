//! Running min/max of sampled elevations.

use serde::{Deserialize, Serialize};

/// Running `{min, max}` of elevations produced during a generation pass.
///
/// Starts empty (`min = +inf`, `max = -inf`). Faces accumulate into their own
/// range and the planet merges them, so no range is ever shared between threads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationRange {
    pub min: f32,
    pub max: f32,
}

impl Default for ElevationRange {
    fn default() -> Self {
        Self::new()
    }
}

impl ElevationRange {
    pub const fn new() -> Self {
        Self {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }

    /// Records one elevation sample.
    pub fn add_value(&mut self, value: f32) {
        if value > self.max {
            self.max = value;
        }
        if value < self.min {
            self.min = value;
        }
    }

    /// Folds another range into this one.
    pub fn merge(&mut self, other: &ElevationRange) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// True until the first sample is recorded.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// True when the range cannot be used for normalization (empty or `min == max`).
    pub fn is_degenerate(&self) -> bool {
        !(self.max > self.min)
    }

    /// Normalizes `elevation` into [0, 1]. A degenerate range yields 0.
    pub fn percent(&self, elevation: f32) -> f32 {
        if self.is_degenerate() {
            return 0.0;
        }
        ((elevation - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Inverse of [`percent`](Self::percent). A degenerate range returns `fallback`.
    pub fn lerp(&self, percent: f32, fallback: f32) -> f32 {
        if self.is_degenerate() {
            return if self.is_empty() { fallback } else { self.min };
        }
        self.min + percent * (self.max - self.min)
    }
}
