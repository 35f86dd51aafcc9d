//! Wavefront OBJ export.
//!
//! Each face becomes its own `o` group. Vertex colours are appended to the
//! `v` lines and the colour lookup coordinates are written as `vt`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::geometry::FaceId;
use crate::terrain::{MeshSurface, Planet, TerrainFaceMesh};

#[derive(Error, Debug)]
pub enum ObjExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Planet has no built faces to export")]
    NoFaces,
}

/// Streams face meshes into an OBJ document.
pub struct ObjWriter<W: Write> {
    out: W,
    vertex_offset: usize,
    faces_written: usize,
}

impl<W: Write> ObjWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            vertex_offset: 0,
            faces_written: 0,
        }
    }

    pub fn faces_written(&self) -> usize {
        self.faces_written
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W, ObjExportError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> MeshSurface for ObjWriter<W> {
    type Error = ObjExportError;

    fn receive(&mut self, face: FaceId, mesh: &TerrainFaceMesh) -> Result<(), Self::Error> {
        let out = &mut self.out;
        writeln!(out, "o {}", face.short_name())?;

        for v in &mesh.vertices {
            writeln!(
                out,
                "v {} {} {} {} {} {}",
                v.position.x, v.position.y, v.position.z, v.colour.x, v.colour.y, v.colour.z
            )?;
        }
        for v in &mesh.vertices {
            writeln!(out, "vn {} {} {}", v.normal.x, v.normal.y, v.normal.z)?;
        }
        for v in &mesh.vertices {
            writeln!(out, "vt {} {}", v.uv.x, v.uv.y)?;
        }

        // OBJ indices are 1-based and global across groups
        let base = self.vertex_offset + 1;
        for tri in mesh.triangles.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize + base);
            writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }

        self.vertex_offset += mesh.vertices.len();
        self.faces_written += 1;
        Ok(())
    }
}

/// Writes every visible face of `planet` to an OBJ file.
///
/// # Returns
/// The number of faces written
pub fn export_planet_obj(planet: &Planet, path: &Path) -> Result<usize, ObjExportError> {
    let file = File::create(path)?;
    let mut writer = ObjWriter::new(BufWriter::new(file));
    writeln!(writer.out, "# planetgen radius {}", planet.settings().shape.planet_radius)?;

    let count = planet.present(&mut writer)?;
    if count == 0 {
        return Err(ObjExportError::NoFaces);
    }
    writer.finish()?;

    info!(path = %path.display(), faces = count, "wrote obj");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FaceMask;
    use crate::settings::PlanetSettings;
    use tempfile::tempdir;

    fn planet(resolution: u32, face_mask: FaceMask) -> Planet {
        let mut planet = Planet::new(PlanetSettings {
            resolution,
            face_mask,
            ..Default::default()
        })
        .unwrap();
        planet.generate_planet().unwrap();
        planet
    }

    fn render(planet: &Planet) -> String {
        let mut writer = ObjWriter::new(Vec::new());
        planet.present(&mut writer).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_counts_and_groups() {
        let planet = planet(4, FaceMask::All);
        let text = render(&planet);

        let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("o "), 6);
        assert_eq!(count("v "), 6 * 16);
        assert_eq!(count("vn "), 6 * 16);
        assert_eq!(count("vt "), 6 * 16);
        assert_eq!(count("f "), 6 * 18);
    }

    #[test]
    fn test_indices_are_one_based_and_global() {
        let planet = planet(3, FaceMask::All);
        let text = render(&planet);

        let indices: Vec<usize> = text
            .lines()
            .filter(|l| l.starts_with("f "))
            .flat_map(|l| l.split_whitespace().skip(1).map(|c| c.split('/').next().unwrap().parse().unwrap()).collect::<Vec<usize>>())
            .collect();
        assert_eq!(*indices.iter().min().unwrap(), 1);
        assert_eq!(*indices.iter().max().unwrap(), 6 * 9);
    }

    #[test]
    fn test_vertex_lines_carry_colour() {
        let planet = planet(2, FaceMask::Front);
        let text = render(&planet);

        let first = text.lines().find(|l| l.starts_with("v ")).unwrap();
        let fields: Vec<f32> = first.split_whitespace().skip(1).map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 6);

        let v = planet.face(FaceId::Front).unwrap().mesh().vertices[0];
        assert_eq!(fields[3..], [v.colour.x, v.colour.y, v.colour.z]);
        assert!(text.starts_with("o front\n"));
    }

    #[test]
    fn test_export_planet_obj_file() {
        let planet = planet(4, FaceMask::Bottom);
        let dir = tempdir().unwrap();
        let path = dir.path().join("planet.obj");

        assert_eq!(export_planet_obj(&planet, &path).unwrap(), 1);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# planetgen"));
        assert!(text.contains("o bottom"));
    }

    #[test]
    fn test_unbuilt_planet_is_rejected() {
        let mut planet = Planet::new(PlanetSettings::default()).unwrap();
        planet.initialize().unwrap();
        let dir = tempdir().unwrap();

        let result = export_planet_obj(&planet, &dir.path().join("empty.obj"));
        assert!(matches!(result, Err(ObjExportError::NoFaces)));
    }
}
