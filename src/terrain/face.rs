//! Mesh generation for one cube face of the planet.

use glam::{Vec2, Vec3};
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::colour::ColourGenerator;
use crate::geometry::{point_on_unit_sphere, FaceId, SphereMapping};
use crate::settings::{MAX_RESOLUTION, MIN_RESOLUTION};
use crate::shape::{ElevationRange, ShapeGenerator};

/// Errors raised while building a face mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Resolution {0} is outside [2, 256]")]
    InvalidResolution(u32),
    #[error("Non-finite elevation {elevation} at grid ({x}, {y})")]
    NonFiniteElevation { x: u32, y: u32, elevation: f32 },
}

/// One mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// World-space position, scaled by the planet radius and displacement.
    pub position: Vec3,
    /// Unit normal from the surrounding triangles.
    pub normal: Vec3,
    /// Grid x, grid y and face index. Used to recover the unit sphere point.
    pub packed_coord: [u8; 3],
    /// `(elevation_percent, biome_percent)`, written by the colour pass.
    pub uv: Vec2,
    /// Distance from the planet centre.
    pub elevation: f32,
    /// Colour resolved from `uv`, written by the colour pass.
    pub colour: Vec3,
}

/// Triangulated grid of one face. Replaced wholesale on every rebuild.
#[derive(Debug, Clone, Default)]
pub struct TerrainFaceMesh {
    pub vertices: Vec<Vertex>,
    /// Counter-clockwise (seen from outside) index triples.
    pub triangles: Vec<u32>,
    pub local_up: Vec3,
    pub resolution: u32,
}

impl TerrainFaceMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| v.position.to_array()).collect()
    }

    pub fn normals(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| v.normal.to_array()).collect()
    }

    pub fn uvs(&self) -> Vec<[f32; 2]> {
        self.vertices.iter().map(|v| v.uv.to_array()).collect()
    }

    pub fn colours(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| v.colour.to_array()).collect()
    }
}

/// Index triples for a `resolution × resolution` grid, two triangles per cell.
fn grid_triangles(resolution: u32) -> Vec<u32> {
    let cells = (resolution - 1) as usize;
    let mut triangles = Vec::with_capacity(cells * cells * 6);
    for y in 0..resolution - 1 {
        for x in 0..resolution - 1 {
            let i = x + y * resolution;
            triangles.extend_from_slice(&[
                i,
                i + 1,
                i + resolution,
                i + 1,
                i + resolution + 1,
                i + resolution,
            ]);
        }
    }
    triangles
}

/// Area-weighted vertex normals: unnormalized face normals summed per vertex.
fn recalculate_normals(vertices: &mut [Vertex], triangles: &[u32]) {
    let mut sums = vec![Vec3::ZERO; vertices.len()];
    for tri in triangles.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let pa = vertices[a].position;
        let face_normal = (vertices[b].position - pa).cross(vertices[c].position - pa);
        sums[a] += face_normal;
        sums[b] += face_normal;
        sums[c] += face_normal;
    }
    for (vertex, sum) in vertices.iter_mut().zip(sums) {
        vertex.normal = sum.normalize_or_zero();
    }
}

/// One of the six faces of the cube sphere.
#[derive(Debug, Clone)]
pub struct TerrainFace {
    face: FaceId,
    resolution: u32,
    mapping: SphereMapping,
    mesh: TerrainFaceMesh,
}

impl TerrainFace {
    /// Creates an empty face. Resolution must be in [2, 256].
    pub fn new(face: FaceId, resolution: u32, mapping: SphereMapping) -> Result<Self, MeshError> {
        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&resolution) {
            return Err(MeshError::InvalidResolution(resolution));
        }
        Ok(Self {
            face,
            resolution,
            mapping,
            mesh: TerrainFaceMesh {
                local_up: face.local_up(),
                resolution,
                ..Default::default()
            },
        })
    }

    pub fn face(&self) -> FaceId {
        self.face
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn mapping(&self) -> SphereMapping {
        self.mapping
    }

    pub fn mesh(&self) -> &TerrainFaceMesh {
        &self.mesh
    }

    /// Unit sphere point under grid index `(x, y)`.
    pub fn point_on_unit_sphere(&self, x: u32, y: u32) -> Vec3 {
        point_on_unit_sphere(self.face, x, y, self.resolution, self.mapping)
    }

    /// Rebuilds positions, triangles and normals, returning the elevation range
    /// of this face.
    ///
    /// On failure the mesh is left empty.
    pub fn construct_mesh(&mut self, shape: &ShapeGenerator) -> Result<ElevationRange, MeshError> {
        let resolution = self.resolution;
        let face = self.face;
        let mapping = self.mapping;
        self.mesh.vertices.clear();
        self.mesh.triangles.clear();

        // Each vertex records into its own range; the ranges are merged once
        // every vertex has been placed.
        let samples = (0..resolution * resolution)
            .into_par_iter()
            .map(|i| {
                let x = i % resolution;
                let y = i / resolution;
                let unit = point_on_unit_sphere(face, x, y, resolution, mapping);
                let mut sample = ElevationRange::new();
                let position = shape.calculate_point_on_planet(unit, &mut sample);
                let elevation = if sample.is_empty() { f32::NAN } else { sample.max };
                if !elevation.is_finite() {
                    return Err(MeshError::NonFiniteElevation { x, y, elevation });
                }
                let vertex = Vertex {
                    position,
                    normal: unit,
                    packed_coord: [x as u8, y as u8, face.index() as u8],
                    uv: Vec2::ZERO,
                    elevation,
                    colour: Vec3::ZERO,
                };
                Ok((vertex, sample))
            })
            .collect::<Result<Vec<(Vertex, ElevationRange)>, MeshError>>()?;

        let mut range = ElevationRange::new();
        let mut vertices = Vec::with_capacity(samples.len());
        for (vertex, sample) in samples {
            range.merge(&sample);
            vertices.push(vertex);
        }

        let triangles = grid_triangles(resolution);
        recalculate_normals(&mut vertices, &triangles);

        debug!(
            face = face.short_name(),
            vertices = vertices.len(),
            triangles = triangles.len() / 3,
            min = range.min,
            max = range.max,
            "constructed face mesh"
        );

        self.mesh.vertices = vertices;
        self.mesh.triangles = triangles;
        Ok(range)
    }

    /// Writes `(elevation_percent, biome_percent)` and the resolved colour into
    /// every vertex. Positions and triangles are untouched.
    pub fn update_uvs(&mut self, colour: &ColourGenerator) {
        let resolution = self.resolution;
        let face = self.face;
        let mapping = self.mapping;

        self.mesh.vertices.par_iter_mut().for_each(|vertex| {
            let [x, y, _] = vertex.packed_coord;
            let unit = point_on_unit_sphere(face, x as u32, y as u32, resolution, mapping);
            let elevation_percent = colour.elevation_percent(vertex.elevation);
            let biome_percent = colour.biome_percent_from_point(unit, elevation_percent);
            vertex.uv = Vec2::new(elevation_percent, biome_percent);
            vertex.colour = colour.sample_colour(vertex.uv);
        });
    }
}
