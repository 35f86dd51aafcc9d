//! Noise layer parameters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Parameters shared by every fractal noise filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Output multiplier (0-5 typical).
    pub strength: f32,
    /// Number of octaves summed (1-8).
    pub num_layers: u32,
    /// Frequency of the first octave.
    pub base_roughness: f32,
    /// Frequency multiplier per octave.
    pub roughness: f32,
    /// Amplitude multiplier per octave (0-0.75).
    pub persistence: f32,
    /// Offset added to every sample position.
    pub centre: Vec3,
    /// Subtracted from the summed value before clamping at zero (0-2).
    pub min_value: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            num_layers: 1,
            base_roughness: 1.0,
            roughness: 1.0,
            persistence: 0.5,
            centre: Vec3::ZERO,
            min_value: 0.0,
        }
    }
}

/// Which fractal a filter computes, with the parameters for that variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NoiseSettings {
    /// Additive fractal of remapped gradient noise.
    Simple(NoiseParams),
    /// Ridged fractal where each octave is weighted by the previous one.
    Rigid {
        #[serde(flatten)]
        params: NoiseParams,
        /// Scales the weight handed to the next octave (0-1).
        weight_multiplier: f32,
    },
}

impl Default for NoiseSettings {
    fn default() -> Self {
        NoiseSettings::Simple(NoiseParams::default())
    }
}

impl NoiseSettings {
    /// Rigid settings with the default weight multiplier of 0.8.
    pub fn rigid(params: NoiseParams) -> Self {
        NoiseSettings::Rigid {
            params,
            weight_multiplier: 0.8,
        }
    }

    pub fn params(&self) -> &NoiseParams {
        match self {
            NoiseSettings::Simple(params) => params,
            NoiseSettings::Rigid { params, .. } => params,
        }
    }

    pub fn params_mut(&mut self) -> &mut NoiseParams {
        match self {
            NoiseSettings::Simple(params) => params,
            NoiseSettings::Rigid { params, .. } => params,
        }
    }

    /// Short lowercase name of the variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NoiseSettings::Simple(_) => "simple",
            NoiseSettings::Rigid { .. } => "rigid",
        }
    }
}
