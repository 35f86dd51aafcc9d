//! Planet shape: layered noise elevation over the unit sphere.

mod elevation;
mod settings;
mod generator;

pub use elevation::ElevationRange;
pub use settings::{NoiseLayer, ShapeSettings};
pub use generator::ShapeGenerator;
