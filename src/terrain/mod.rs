//! Terrain meshes and the planet that sequences their generation.
//!
//! Each cube face is an independent grid mesh; the planet builds them in
//! parallel and merges their elevation ranges before colouring.

mod face;
mod planet;

pub use face::{MeshError, TerrainFace, TerrainFaceMesh, Vertex};
pub use planet::{
    FaceOutcome, FaceStatus, GenerationReport, MeshSurface, Planet, PlanetState,
};
