//! Composition of noise layers into a single elevation function.

use glam::Vec3;

use super::elevation::ElevationRange;
use super::settings::{NoiseLayer, ShapeSettings};
use crate::noise::NoiseFilter;

/// Evaluates the layer stack of a [`ShapeSettings`].
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    planet_radius: f32,
    layers: Vec<NoiseLayer>,
    filters: Vec<NoiseFilter>,
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new(&ShapeSettings::default())
    }
}

impl ShapeGenerator {
    /// Builds one filter per layer, parallel to `settings.noise_layers`.
    pub fn new(settings: &ShapeSettings) -> Self {
        let filters = settings
            .noise_layers
            .iter()
            .map(|layer| NoiseFilter::new(layer.noise.clone(), settings.seed))
            .collect();

        Self {
            planet_radius: settings.planet_radius,
            layers: settings.noise_layers.clone(),
            filters,
        }
    }

    pub fn planet_radius(&self) -> f32 {
        self.planet_radius
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Distance from the planet centre of the surface above `point_on_unit_sphere`.
    ///
    /// Layer 0 is added as-is and remembered as the mask value; later layers are
    /// multiplied by it when they ask for it. A disabled layer 0 leaves the mask at 0.
    pub fn calculate_elevation(&self, point_on_unit_sphere: Vec3) -> f32 {
        let mut first_layer_value = 0.0f32;
        let mut elevation = 0.0f32;

        let mut stack = self.layers.iter().zip(&self.filters);
        if let Some((layer, filter)) = stack.next() {
            if layer.enabled {
                first_layer_value = filter.evaluate(point_on_unit_sphere);
                elevation = first_layer_value;
            }
        }

        for (layer, filter) in stack {
            if !layer.enabled {
                continue;
            }
            let mask = if layer.use_first_layer_as_mask {
                first_layer_value
            } else {
                1.0
            };
            elevation += filter.evaluate(point_on_unit_sphere) * mask;
        }

        self.planet_radius * (1.0 + elevation)
    }

    /// Displaced position of `point_on_unit_sphere`, recording its elevation in `range`.
    pub fn calculate_point_on_planet(
        &self,
        point_on_unit_sphere: Vec3,
        range: &mut ElevationRange,
    ) -> Vec3 {
        let elevation = self.calculate_elevation(point_on_unit_sphere);
        range.add_value(elevation);
        point_on_unit_sphere * elevation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{NoiseParams, NoiseSettings};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn points() -> Vec<Vec3> {
        vec![
            Vec3::Y,
            Vec3::new(0.6, 0.8, 0.0),
            Vec3::new(-0.48, 0.6, 0.64),
            Vec3::new(0.0, -0.6, -0.8),
            Vec3::new(0.36, -0.48, 0.8),
        ]
    }

    fn three_layer_settings() -> ShapeSettings {
        let base = NoiseParams {
            strength: 0.3,
            num_layers: 4,
            base_roughness: 1.5,
            roughness: 2.0,
            persistence: 0.5,
            centre: Vec3::ZERO,
            min_value: 0.6,
        };
        ShapeSettings {
            planet_radius: 2.0,
            noise_layers: vec![
                NoiseLayer::new(NoiseSettings::Simple(base.clone())),
                NoiseLayer::new(NoiseSettings::rigid(NoiseParams {
                    min_value: 0.0,
                    centre: Vec3::new(5.0, 1.0, -3.0),
                    ..base.clone()
                })),
                NoiseLayer::new(NoiseSettings::Simple(NoiseParams {
                    strength: 0.05,
                    min_value: 0.0,
                    base_roughness: 6.0,
                    ..base
                })),
            ],
            seed: 17,
        }
    }

    fn sphere_points(count: usize) -> Vec<Vec3> {
        let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
        (0..count)
            .map(|i| {
                let y = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
                let r = (1.0 - y * y).sqrt();
                let theta = golden * i as f32;
                Vec3::new(r * theta.cos(), y, r * theta.sin())
            })
            .collect()
    }

    fn relief(generator: &ShapeGenerator, points: &[Vec3]) -> f32 {
        let mut range = ElevationRange::new();
        for &p in points {
            generator.calculate_point_on_planet(p, &mut range);
        }
        range.max - range.min
    }

    #[test]
    fn test_layer_stack_produces_relief() {
        let settings = three_layer_settings();
        let generator = ShapeGenerator::new(&settings);
        let relief = relief(&generator, &sphere_points(2000));
        assert!(
            relief > 0.05 * settings.planet_radius,
            "relief {} is too small for radius {}",
            relief,
            settings.planet_radius
        );
    }

    #[test]
    fn test_random_shapes_are_mostly_not_flat() {
        let points = sphere_points(1000);
        let mut textured = 0;
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let settings = ShapeSettings::random(&mut rng);
            let generator = ShapeGenerator::new(&settings);
            if relief(&generator, &points) > 1e-3 * settings.planet_radius {
                textured += 1;
            }
        }
        assert!(textured >= 10, "only {} of 20 random shapes have relief", textured);
    }

    #[test]
    fn test_no_layers_gives_plain_sphere() {
        let generator = ShapeGenerator::new(&ShapeSettings::flat(3.5));
        let mut range = ElevationRange::new();
        for p in points() {
            let pos = generator.calculate_point_on_planet(p, &mut range);
            assert!((pos - p * 3.5).length() < 1e-6);
        }
        assert_eq!(range, ElevationRange { min: 3.5, max: 3.5 });
    }

    #[test]
    fn test_elevation_never_below_radius() {
        // Every filter output is clamped at zero, so displacement is outward only.
        let generator = ShapeGenerator::new(&three_layer_settings());
        for p in points() {
            assert!(generator.calculate_elevation(p) >= generator.planet_radius());
        }
    }

    #[test]
    fn test_point_on_planet_records_elevation() {
        let generator = ShapeGenerator::new(&three_layer_settings());
        let mut range = ElevationRange::new();
        let mut expected = ElevationRange::new();
        for p in points() {
            let pos = generator.calculate_point_on_planet(p, &mut range);
            let elevation = generator.calculate_elevation(p);
            expected.add_value(elevation);
            assert!((pos.length() - elevation).abs() < 1e-5);
        }
        assert_eq!(range, expected);
    }

    #[test]
    fn test_disabled_layer_removes_exactly_its_contribution() {
        let settings = three_layer_settings();
        let full = ShapeGenerator::new(&settings);

        let mut disabled = settings.clone();
        disabled.noise_layers[2].enabled = false;
        let without = ShapeGenerator::new(&disabled);

        let contribution = NoiseFilter::new(settings.noise_layers[2].noise.clone(), settings.seed);

        for p in points() {
            let expected = full.calculate_elevation(p)
                - settings.planet_radius * contribution.evaluate(p);
            assert!(
                (without.calculate_elevation(p) - expected).abs() < 1e-5,
                "at {:?}",
                p
            );
        }

        let mut reenabled = disabled;
        reenabled.noise_layers[2].enabled = true;
        let restored = ShapeGenerator::new(&reenabled);
        for p in points() {
            assert_eq!(restored.calculate_elevation(p).to_bits(), full.calculate_elevation(p).to_bits());
        }
    }

    #[test]
    fn test_mask_gates_layer_by_first_layer() {
        let mut settings = three_layer_settings();
        // Continents at min value 2.0 are flat everywhere, so the mask is zero.
        settings.noise_layers[0].noise.params_mut().min_value = 2.0;
        settings.noise_layers.truncate(2);
        settings.noise_layers[1].use_first_layer_as_mask = true;

        let generator = ShapeGenerator::new(&settings);
        for p in points() {
            assert_eq!(generator.calculate_elevation(p), settings.planet_radius);
        }
    }

    #[test]
    fn test_disabled_first_layer_zeroes_mask() {
        let mut settings = three_layer_settings();
        settings.noise_layers[0].enabled = false;
        settings.noise_layers[1].use_first_layer_as_mask = true;
        settings.noise_layers[2].enabled = false;

        let generator = ShapeGenerator::new(&settings);
        for p in points() {
            assert_eq!(generator.calculate_elevation(p), settings.planet_radius);
        }
    }
}
