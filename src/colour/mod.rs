//! Planet colouring: ocean depth and biome bands resolved through a colour map.

mod gradient;
mod settings;
mod generator;

pub use gradient::{Gradient, GradientKey};
pub use settings::{Biome, ColourSettings};
pub use generator::{ColourGenerator, ColourMap, TEXTURE_RESOLUTION};
