//! Export module for saving generated planets to files.
//!
//! Supports Wavefront OBJ for the meshes and PNG for the colour map and
//! per-face elevation and colour images.

mod obj;
mod png;

pub use obj::{export_planet_obj, ObjExportError, ObjWriter};
pub use png::{
    export_colour_map_png,
    export_face_colour_png,
    export_face_elevation_png,
    export_planet_png,
    PngExportError,
    PngExportOptions,
};
