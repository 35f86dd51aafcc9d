//! Shape configuration: planet radius and the ordered noise layers.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::noise::{NoiseParams, NoiseSettings};

/// One entry of the layer stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLayer {
    /// Disabled layers contribute nothing.
    pub enabled: bool,
    /// Multiply this layer by the value of the first layer.
    pub use_first_layer_as_mask: bool,
    pub noise: NoiseSettings,
}

impl Default for NoiseLayer {
    fn default() -> Self {
        Self {
            enabled: true,
            use_first_layer_as_mask: false,
            noise: NoiseSettings::default(),
        }
    }
}

impl NoiseLayer {
    pub fn new(noise: NoiseSettings) -> Self {
        Self {
            noise,
            ..Default::default()
        }
    }

    /// The same layer, gated by the first layer.
    pub fn masked(mut self) -> Self {
        self.use_first_layer_as_mask = true;
        self
    }
}

/// Configuration of the planet's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSettings {
    /// Radius of the undisplaced sphere, which is also sea level.
    pub planet_radius: f32,
    /// Layers in evaluation order. Layer 0 is the mask source.
    pub noise_layers: Vec<NoiseLayer>,
    /// Seed for the gradient noise primitive.
    pub seed: i32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            planet_radius: 1.0,
            noise_layers: vec![NoiseLayer::new(NoiseSettings::Simple(NoiseParams {
                strength: 0.12,
                num_layers: 4,
                base_roughness: 1.1,
                roughness: 2.2,
                persistence: 0.5,
                centre: Vec3::ZERO,
                min_value: 0.9,
            }))],
            seed: 0,
        }
    }
}

impl ShapeSettings {
    /// A sphere with no displacement.
    pub fn flat(planet_radius: f32) -> Self {
        Self {
            planet_radius,
            noise_layers: Vec::new(),
            seed: 0,
        }
    }

    /// Creates randomized continents plus a masked ridge layer.
    ///
    /// The continent minimum value is biased towards 1.0, which keeps more of
    /// the surface at sea level.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let r: f32 = rng.random_range(0.0..=1.0);
        let continents = NoiseParams {
            strength: rng.random_range(0.0..=0.2),
            num_layers: rng.random_range(1..8),
            base_roughness: rng.random_range(0.0..=5.0),
            roughness: rng.random_range(0.0..=10.0),
            persistence: rng.random_range(0.0..=0.75),
            centre: Vec3::ZERO,
            min_value: 0.5 + r * r * 0.5,
        };

        let ridges = NoiseSettings::Rigid {
            params: NoiseParams {
                strength: rng.random_range(0.0..=5.0),
                num_layers: rng.random_range(1..8),
                base_roughness: rng.random_range(0.0..=5.0),
                roughness: rng.random_range(0.0..=10.0),
                persistence: rng.random_range(0.0..=0.75),
                centre: Vec3::ZERO,
                min_value: 0.0,
            },
            weight_multiplier: rng.random_range(0.0..=1.0),
        };

        Self {
            planet_radius: 10.0,
            noise_layers: vec![
                NoiseLayer::new(NoiseSettings::Simple(continents)),
                NoiseLayer::new(ridges).masked(),
            ],
            seed: 0,
        }
    }
}
