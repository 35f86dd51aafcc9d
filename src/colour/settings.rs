//! Colour configuration: ocean gradient and ordered biome bands.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::gradient::{Gradient, GradientKey};
use crate::noise::NoiseSettings;
use crate::settings::SettingsError;

/// A land colour band, starting at `start_height` along the biome axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Biome {
    /// Colour along the land elevation axis.
    pub gradient: Gradient,
    pub tint: Vec3,
    /// Start of the band in [0, 1].
    pub start_height: f32,
    /// How far the gradient is pulled towards `tint` (0-1).
    pub tint_percent: f32,
}

impl Default for Biome {
    fn default() -> Self {
        Self {
            gradient: Gradient::linear(Vec3::new(0.2, 0.5, 0.2), Vec3::new(0.9, 0.9, 0.9)),
            tint: Vec3::ZERO,
            start_height: 0.0,
            tint_percent: 0.0,
        }
    }
}

/// Ocean gradient, biome list and the noise that perturbs biome boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColourSettings {
    /// Colour by depth, 0 = deepest, 1 = sea level.
    pub ocean_colour: Gradient,
    /// Biomes in ascending `start_height` order.
    pub biomes: Vec<Biome>,
    pub biome_noise: NoiseSettings,
    /// Subtracted from the biome noise value before scaling.
    pub noise_offset: f32,
    /// Scale of the noise added to the height percent.
    pub noise_strength: f32,
    /// Width of the blend window around each biome boundary (0-1).
    pub blend_amount: f32,
    /// Seed for the biome noise primitive.
    pub seed: i32,
}

impl Default for ColourSettings {
    fn default() -> Self {
        Self {
            ocean_colour: Gradient::linear(Vec3::new(0.02, 0.05, 0.3), Vec3::new(0.1, 0.35, 0.7)),
            biomes: vec![
                Biome {
                    gradient: Gradient::new(vec![
                        GradientKey::new(0.0, Vec3::new(0.85, 0.8, 0.55)),
                        GradientKey::new(0.1, Vec3::new(0.3, 0.55, 0.2)),
                        GradientKey::new(1.0, Vec3::new(0.15, 0.35, 0.1)),
                    ]),
                    start_height: 0.0,
                    ..Default::default()
                },
                Biome {
                    gradient: Gradient::linear(Vec3::new(0.45, 0.4, 0.3), Vec3::new(0.55, 0.55, 0.55)),
                    start_height: 0.4,
                    ..Default::default()
                },
                Biome {
                    gradient: Gradient::linear(Vec3::new(0.6, 0.6, 0.65), Vec3::ONE),
                    start_height: 0.8,
                    ..Default::default()
                },
            ],
            biome_noise: NoiseSettings::default(),
            noise_offset: 0.0,
            noise_strength: 0.0,
            blend_amount: 0.2,
            seed: 0,
        }
    }
}

fn random_colour<R: Rng>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.random_range(0.0..=1.0),
        rng.random_range(0.0..=1.0),
        rng.random_range(0.0..=1.0),
    )
}

impl ColourSettings {
    /// Requires a non-empty biome list sorted by `start_height`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.biomes.is_empty() {
            return Err(SettingsError::EmptyBiomes);
        }
        for (index, pair) in self.biomes.windows(2).enumerate() {
            if pair[1].start_height < pair[0].start_height {
                return Err(SettingsError::UnsortedBiomes {
                    index: index + 1,
                    start_height: pair[1].start_height,
                    previous: pair[0].start_height,
                });
            }
        }
        Ok(())
    }

    /// Three random biomes over a random blue ocean.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let biomes = (0..3)
            .map(|i| {
                let base = random_colour(rng);
                let end = random_colour(rng);
                let mut keys = vec![GradientKey::new(0.0, base.lerp(Vec3::ZERO, 0.05))];
                keys.extend(
                    [0.05, 0.20, 0.35, 0.45, 0.90]
                        .into_iter()
                        .map(|t| GradientKey::new(t, base.lerp(end, t))),
                );

                let start_height = match i {
                    1 => rng.random_range(0.2..=0.25),
                    2 => rng.random_range(0.75..=0.8),
                    _ => 0.0,
                };

                Biome {
                    gradient: Gradient::new(keys),
                    tint: Vec3::ZERO,
                    start_height,
                    tint_percent: 0.0,
                }
            })
            .collect();

        let ocean_colour = Gradient::linear(
            Vec3::new(0.0, 0.0, rng.random_range(0.5..=1.0)),
            Vec3::new(0.0, 0.0, rng.random_range(0.5..=1.0)),
        );

        Self {
            ocean_colour,
            biomes,
            biome_noise: NoiseSettings::default(),
            noise_offset: 0.0,
            noise_strength: rng.random_range(-0.3..=0.3),
            blend_amount: rng.random_range(0.0..=1.0),
            seed: 0,
        }
    }
}
