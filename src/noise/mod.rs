//! Noise generation module for terrain synthesis.
//!
//! Uses simdnoise as the gradient noise primitive. Filters layer it into
//! simple (additive) or rigid (ridged, self-masking) fractals.

mod settings;
mod filter;

pub use settings::{NoiseParams, NoiseSettings};
pub use filter::{NoiseFilter, raw_noise_3d};
