//! Top-level planet configuration and its JSON persistence.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::colour::ColourSettings;
use crate::geometry::{FaceMask, SphereMapping};
use crate::shape::ShapeSettings;

/// Smallest accepted grid resolution per face.
pub const MIN_RESOLUTION: u32 = 2;
/// Largest accepted grid resolution per face. Grid coordinates must fit in a `u8`.
pub const MAX_RESOLUTION: u32 = 256;

/// Errors raised while validating, loading or saving settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Resolution {0} is outside [2, 256]")]
    InvalidResolution(u32),
    #[error("Planet radius must be finite and positive, got {0}")]
    InvalidRadius(f32),
    #[error("Colour settings need at least one biome")]
    EmptyBiomes,
    #[error("Biome {index} starts at {start_height}, below the previous biome at {previous}")]
    UnsortedBiomes {
        index: usize,
        start_height: f32,
        previous: f32,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Checks that `resolution` is within [`MIN_RESOLUTION`, `MAX_RESOLUTION`].
pub fn check_resolution(resolution: u32) -> Result<u32, SettingsError> {
    if (MIN_RESOLUTION..=MAX_RESOLUTION).contains(&resolution) {
        Ok(resolution)
    } else {
        Err(SettingsError::InvalidResolution(resolution))
    }
}

/// Everything needed to generate a planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetSettings {
    /// Vertices per face edge (2-256).
    pub resolution: u32,
    /// Which faces are generated.
    pub face_mask: FaceMask,
    /// Cube-to-sphere projection.
    pub mapping: SphereMapping,
    pub shape: ShapeSettings,
    pub colour: ColourSettings,
}

impl Default for PlanetSettings {
    fn default() -> Self {
        Self {
            resolution: 10,
            face_mask: FaceMask::All,
            mapping: SphereMapping::Normalize,
            shape: ShapeSettings::default(),
            colour: ColourSettings::default(),
        }
    }
}

impl PlanetSettings {
    /// Rejects settings that cannot produce a mesh.
    ///
    /// An empty noise layer list is valid and yields an undisplaced sphere.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_resolution(self.resolution)?;

        let radius = self.shape.planet_radius;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SettingsError::InvalidRadius(radius));
        }

        self.colour.validate()
    }

    /// Loads settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let reader = BufReader::new(File::open(path)?);
        let settings: PlanetSettings = serde_json::from_reader(reader)?;
        info!("loaded settings from {}", path.display());
        debug!(
            resolution = settings.resolution,
            layers = settings.shape.noise_layers.len(),
            biomes = settings.colour.biomes.len(),
            "settings summary"
        );
        Ok(settings)
    }

    /// Writes settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        info!("saved settings to {}", path.display());
        Ok(())
    }
}
