//! PNG export for the colour map and per-face elevation and colour images.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use glam::Vec3;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;
use tracing::debug;

use crate::colour::ColourMap;
use crate::geometry::FaceId;
use crate::terrain::{Planet, TerrainFace};

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Face {0:?} has no mesh to export")]
    EmptyMesh(FaceId),
    #[error("Colour map has not been built")]
    MissingColourMap,
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

fn to_rgb8(colour: Vec3) -> [u8; 3] {
    let c = (colour.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8]
}

fn write_png(
    path: &Path,
    data: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(data, width, height, color)?;
    debug!(path = %path.display(), width, height, "wrote png");
    Ok(())
}

/// Exports the colour map as an 8-bit RGB PNG, one row per biome.
pub fn export_colour_map_png(
    map: &ColourMap,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let data: Vec<u8> = map.texels().iter().flat_map(|&c| to_rgb8(c)).collect();
    write_png(path, &data, map.width(), map.height(), ExtendedColorType::Rgb8, options)
}

/// Exports a face's elevation percent (uv.x) as a 16-bit grayscale PNG.
///
/// Pixel `(x, y)` is the vertex at grid coordinate `(x, y)`.
pub fn export_face_elevation_png(
    face: &TerrainFace,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let mesh = face.mesh();
    if mesh.is_empty() {
        return Err(PngExportError::EmptyMesh(face.face()));
    }

    let pixels: Vec<u16> = mesh
        .vertices
        .iter()
        .map(|v| (v.uv.x.clamp(0.0, 1.0) * 65535.0).round() as u16)
        .collect();
    // The encoder expects native-endian u16 samples
    let bytes: &[u8] = bytemuck::cast_slice(&pixels);

    let res = face.resolution();
    write_png(path, bytes, res, res, ExtendedColorType::L16, options)
}

/// Exports a face's resolved vertex colours as an 8-bit RGB PNG.
pub fn export_face_colour_png(
    face: &TerrainFace,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let mesh = face.mesh();
    if mesh.is_empty() {
        return Err(PngExportError::EmptyMesh(face.face()));
    }

    let data: Vec<u8> = mesh.vertices.iter().flat_map(|v| to_rgb8(v.colour)).collect();
    let res = face.resolution();
    write_png(path, &data, res, res, ExtendedColorType::Rgb8, options)
}

/// Exports the colour map and every visible face of a planet.
///
/// Files are named `{base_name}_colour_map.png`,
/// `{base_name}_{face}_elevation.png` and `{base_name}_{face}_colour.png`.
///
/// # Returns
/// The paths written, or the first error encountered
pub fn export_planet_png(
    planet: &Planet,
    output_dir: &Path,
    base_name: &str,
    options: &PngExportOptions,
) -> Result<Vec<PathBuf>, PngExportError> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    let map = planet
        .colour_generator()
        .colour_map()
        .ok_or(PngExportError::MissingColourMap)?;
    let path = output_dir.join(format!("{}_colour_map.png", base_name));
    export_colour_map_png(map, &path, options)?;
    written.push(path);

    for face in planet.visible_faces() {
        let name = face.face().short_name();

        let path = output_dir.join(format!("{}_{}_elevation.png", base_name, name));
        export_face_elevation_png(face, &path, options)?;
        written.push(path);

        let path = output_dir.join(format!("{}_{}_colour.png", base_name, name));
        export_face_colour_png(face, &path, options)?;
        written.push(path);
    }

    Ok(written)
}
