//! Fractal noise filters evaluated at points on (or near) the unit sphere.

use glam::Vec3;
use simdnoise::NoiseBuilder;

use super::settings::{NoiseParams, NoiseSettings};

/// Normalization for simdnoise's 3D simplex kernel (radius² 0.6), which
/// returns the raw corner sum without the usual factor of 32.
const SIMPLEX_3D_SCALE: f32 = 32.0;

/// Samples single-octave 3D simplex noise at `point`.
///
/// Returns a value in [-1, 1]. The same point and seed always give the same value.
pub fn raw_noise_3d(point: Vec3, seed: i32) -> f32 {
    let raw = NoiseBuilder::fbm_3d_offset(point.x, 1, point.y, 1, point.z, 1)
        .with_seed(seed)
        .with_freq(1.0)
        .with_octaves(1)
        .generate()
        .0[0];
    (raw * SIMPLEX_3D_SCALE).clamp(-1.0, 1.0)
}

/// A noise layer ready for evaluation.
///
/// Holds a copy of its settings, so evaluation is a pure function of the point.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    settings: NoiseSettings,
    seed: i32,
}

impl NoiseFilter {
    /// Builds the filter for the given variant.
    pub fn new(settings: NoiseSettings, seed: i32) -> Self {
        Self { settings, seed }
    }

    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Evaluates the filter at `point`. The result is never negative.
    pub fn evaluate(&self, point: Vec3) -> f32 {
        match &self.settings {
            NoiseSettings::Simple(params) => simple_fractal(params, self.seed, point),
            NoiseSettings::Rigid {
                params,
                weight_multiplier,
            } => rigid_fractal(params, *weight_multiplier, self.seed, point),
        }
    }
}

fn simple_fractal(params: &NoiseParams, seed: i32, point: Vec3) -> f32 {
    let mut noise_value = 0.0f32;
    let mut frequency = params.base_roughness;
    let mut amplitude = 1.0f32;

    for _ in 0..params.num_layers {
        let v = raw_noise_3d(point * frequency + params.centre, seed);
        // Remap [-1, 1] to [0, 1] before weighting.
        noise_value += (v + 1.0) * 0.5 * amplitude;
        frequency *= params.roughness;
        amplitude *= params.persistence;
    }

    (noise_value - params.min_value).max(0.0) * params.strength
}

fn rigid_fractal(params: &NoiseParams, weight_multiplier: f32, seed: i32, point: Vec3) -> f32 {
    let mut noise_value = 0.0f32;
    let mut frequency = params.base_roughness;
    let mut amplitude = 1.0f32;
    let mut weight = 1.0f32;

    for _ in 0..params.num_layers {
        let mut v = 1.0 - raw_noise_3d(point * frequency + params.centre, seed).abs();
        v *= v;
        v *= weight;
        weight = (v * weight_multiplier).clamp(0.0, 1.0);

        noise_value += v * amplitude;
        frequency *= params.roughness;
        amplitude *= params.persistence;
    }

    (noise_value - params.min_value).max(0.0) * params.strength
}
