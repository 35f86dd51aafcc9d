//! Elevation and biome driven colouring.

use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use super::settings::ColourSettings;
use crate::noise::NoiseFilter;
use crate::settings::SettingsError;
use crate::shape::ElevationRange;

/// Texels per half of a colour map row.
pub const TEXTURE_RESOLUTION: u32 = 50;

/// Colour lookup table with one row per biome.
///
/// The left half of every row is the ocean gradient (deep to shallow), the
/// right half is that biome's tinted land gradient (low to high).
#[derive(Debug, Clone, PartialEq)]
pub struct ColourMap {
    width: u32,
    height: u32,
    texels: Vec<Vec3>,
}

impl ColourMap {
    fn build(settings: &ColourSettings) -> Self {
        let res = TEXTURE_RESOLUTION;
        let width = res * 2;
        let height = settings.biomes.len() as u32;
        let step = (res - 1) as f32;

        let mut texels = Vec::with_capacity((width * height) as usize);
        for biome in &settings.biomes {
            for i in 0..width {
                let colour = if i < res {
                    settings.ocean_colour.evaluate(i as f32 / step)
                } else {
                    let land = biome.gradient.evaluate((i - res) as f32 / step);
                    land.lerp(biome.tint, biome.tint_percent)
                };
                texels.push(colour);
            }
        }

        Self { width, height, texels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texel(&self, x: u32, y: u32) -> Vec3 {
        debug_assert!(x < self.width && y < self.height);
        self.texels[(y * self.width + x) as usize]
    }

    /// Texels in row-major order.
    pub fn texels(&self) -> &[Vec3] {
        &self.texels
    }

    /// Samples the ocean or land half at `t` in [0, 1], blending between the
    /// two biome rows around `biome_percent`.
    pub fn sample(&self, land: bool, t: f32, biome_percent: f32) -> Vec3 {
        let half = self.width / 2;
        let column = (t.clamp(0.0, 1.0) * (half - 1) as f32).round() as u32;
        let column = if land { half + column } else { column };

        let row = biome_percent.clamp(0.0, 1.0) * (self.height - 1) as f32;
        let lower = row.floor() as u32;
        let upper = (lower + 1).min(self.height - 1);
        self.texel(column, lower)
            .lerp(self.texel(column, upper), row - lower as f32)
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Turns elevations and sphere positions into colour lookup coordinates.
#[derive(Debug, Clone)]
pub struct ColourGenerator {
    settings: ColourSettings,
    biome_filter: NoiseFilter,
    elevation: ElevationRange,
    sea_level: f32,
    colour_map: Option<ColourMap>,
}

impl ColourGenerator {
    /// Validates the biome list and builds the biome noise filter.
    ///
    /// The colour map is not built until [`update_colours`](Self::update_colours).
    pub fn new(settings: ColourSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let biome_filter = NoiseFilter::new(settings.biome_noise.clone(), settings.seed);
        Ok(Self {
            settings,
            biome_filter,
            elevation: ElevationRange::new(),
            sea_level: 0.0,
            colour_map: None,
        })
    }

    pub fn settings(&self) -> &ColourSettings {
        &self.settings
    }

    /// Stores the elevation range of the finished mesh and the sea level
    /// (the undisplaced planet radius).
    pub fn update_elevation(&mut self, range: ElevationRange, sea_level: f32) {
        if range.is_degenerate() {
            warn!(
                min = range.min,
                max = range.max,
                "degenerate elevation range, treating planet as flat"
            );
        }
        self.elevation = range;
        self.sea_level = sea_level;
    }

    pub fn elevation_range(&self) -> ElevationRange {
        self.elevation
    }

    /// `elevation` normalized into [0, 1] over the stored range.
    pub fn elevation_percent(&self, elevation: f32) -> f32 {
        self.elevation.percent(elevation)
    }

    /// Position along the biome list in [0, 1].
    ///
    /// Height is the elevation percent perturbed by biome noise. Each biome
    /// boundary is blended with a smoothstep over a window of `blend_amount`
    /// centred on its start height, so the result is non-decreasing in height.
    pub fn biome_percent_from_point(&self, point_on_unit_sphere: Vec3, elevation_percent: f32) -> f32 {
        let mut height_percent = elevation_percent;
        if self.settings.noise_strength != 0.0 {
            let noise = self.biome_filter.evaluate(point_on_unit_sphere);
            height_percent += (noise - self.settings.noise_offset) * self.settings.noise_strength;
        }

        let blend_range = self.settings.blend_amount / 2.0 + 0.001;
        let mut biome_index = 0.0f32;
        for (i, biome) in self.settings.biomes.iter().enumerate() {
            let weight = smoothstep(-blend_range, blend_range, height_percent - biome.start_height);
            biome_index *= 1.0 - weight;
            biome_index += i as f32 * weight;
        }

        let last = (self.settings.biomes.len() as f32 - 1.0).max(1.0);
        (biome_index / last).clamp(0.0, 1.0)
    }

    /// Rebuilds the colour map from the current settings.
    pub fn update_colours(&mut self) {
        let map = ColourMap::build(&self.settings);
        debug!(width = map.width, height = map.height, "rebuilt colour map");
        self.colour_map = Some(map);
    }

    pub fn colour_map(&self) -> Option<&ColourMap> {
        self.colour_map.as_ref()
    }

    /// Resolves `(elevation_percent, biome_percent)` to a colour.
    ///
    /// Elevations at or below sea level use the ocean half of the map. Returns
    /// black while the colour map has not been built.
    pub fn sample_colour(&self, uv: Vec2) -> Vec3 {
        let Some(map) = &self.colour_map else {
            debug!("colour map requested before update_colours");
            return Vec3::ZERO;
        };

        let elevation = self.elevation.lerp(uv.x, self.sea_level);
        let (min, max) = if self.elevation.is_empty() {
            (self.sea_level, self.sea_level)
        } else {
            (self.elevation.min, self.elevation.max)
        };

        if elevation <= self.sea_level {
            let depth = if self.sea_level > min {
                (elevation - min) / (self.sea_level - min)
            } else {
                1.0
            };
            map.sample(false, depth, uv.y)
        } else {
            let shore = self.sea_level.max(min);
            let height = if max > shore {
                (elevation - shore) / (max - shore)
            } else {
                0.0
            };
            map.sample(true, height, uv.y)
        }
    }
}
