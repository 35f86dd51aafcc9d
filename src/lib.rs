//! Procedural cube-sphere planet generator.
//!
//! This crate builds a planet as six grid meshes projected from a cube onto a
//! sphere, displaces them with layered noise, and colours them from an ocean
//! gradient below sea level and elevation-keyed biome bands above it, with
//! optional noise blurring the band boundaries.

pub mod geometry;
pub mod noise;
pub mod shape;
pub mod colour;
pub mod terrain;
pub mod settings;
pub mod export;

pub use geometry::{FaceId, FaceMask, SphereMapping};
pub use noise::{NoiseFilter, NoiseParams, NoiseSettings};
pub use shape::{ElevationRange, NoiseLayer, ShapeGenerator, ShapeSettings};
pub use colour::{Biome, ColourGenerator, ColourSettings, Gradient};
pub use terrain::{
    FaceOutcome, FaceStatus, GenerationReport, MeshError, MeshSurface, Planet, PlanetState,
    TerrainFace, TerrainFaceMesh, Vertex,
};
pub use settings::{PlanetSettings, SettingsError};
