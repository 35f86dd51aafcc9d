//! Piecewise-linear colour gradients.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A colour pinned at a position in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientKey {
    pub time: f32,
    /// Linear RGB in [0, 1].
    pub colour: Vec3,
}

impl GradientKey {
    pub fn new(time: f32, colour: Vec3) -> Self {
        Self { time, colour }
    }
}

/// Colour keys blended linearly. Keys are kept sorted by time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<GradientKey>", into = "Vec<GradientKey>")]
pub struct Gradient {
    keys: Vec<GradientKey>,
}

impl From<Vec<GradientKey>> for Gradient {
    fn from(keys: Vec<GradientKey>) -> Self {
        Self::new(keys)
    }
}

impl From<Gradient> for Vec<GradientKey> {
    fn from(gradient: Gradient) -> Self {
        gradient.keys
    }
}

impl Gradient {
    pub fn new(mut keys: Vec<GradientKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Two-key gradient from `start` at 0 to `end` at 1.
    pub fn linear(start: Vec3, end: Vec3) -> Self {
        Self::new(vec![GradientKey::new(0.0, start), GradientKey::new(1.0, end)])
    }

    pub fn keys(&self) -> &[GradientKey] {
        &self.keys
    }

    /// Colour at `t`. Outside the key range the nearest key's colour is held.
    /// An empty gradient is black.
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return Vec3::ZERO;
        };
        if t <= first.time {
            return first.colour;
        }
        if t >= last.time {
            return last.colour;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.time {
                let span = b.time - a.time;
                if span <= 0.0 {
                    return b.colour;
                }
                return a.colour.lerp(b.colour, (t - a.time) / span);
            }
        }
        last.colour
    }
}
