//! Cube face grids and their projection onto the unit sphere.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::face::FaceId;

/// How a point on the unit cube is projected onto the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SphereMapping {
    /// Plain normalization. Vertices bunch up towards cube corners.
    #[default]
    Normalize,
    /// Analytical spherification, with less area distortion at the corners.
    Spherify,
}

/// Tangent axes of a face: `axis_a = (up.y, up.z, up.x)`, `axis_b = up × axis_a`.
///
/// `axis_a × axis_b == up`, so triangles wound `a -> b` face outwards.
pub fn face_axes(local_up: Vec3) -> (Vec3, Vec3) {
    let axis_a = Vec3::new(local_up.y, local_up.z, local_up.x);
    let axis_b = local_up.cross(axis_a);
    (axis_a, axis_b)
}

/// Maps grid index `(x, y)` of a `resolution × resolution` face grid onto the unit cube.
///
/// Grid edges land exactly on the cube edges (`percent` 0 and 1 map to ±1).
pub fn point_on_unit_cube(face: FaceId, x: u32, y: u32, resolution: u32) -> Vec3 {
    debug_assert!(resolution >= 2);
    let local_up = face.local_up();
    let (axis_a, axis_b) = face_axes(local_up);

    let step = (resolution - 1) as f32;
    let px = x as f32 / step;
    let py = y as f32 / step;

    local_up + (px - 0.5) * 2.0 * axis_a + (py - 0.5) * 2.0 * axis_b
}

/// Transforms a point on the unit cube surface to the unit sphere using the
/// analytical spherification formula.
///
/// # Example
/// ```
/// use glam::Vec3;
/// use planetgen::geometry::spherify_point;
///
/// let p = spherify_point(Vec3::new(1.0, 0.5, -0.25));
/// assert!((p.length() - 1.0).abs() < 1e-5);
/// ```
pub fn spherify_point(cube_pos: Vec3) -> Vec3 {
    let x2 = cube_pos.x * cube_pos.x;
    let y2 = cube_pos.y * cube_pos.y;
    let z2 = cube_pos.z * cube_pos.z;

    Vec3::new(
        cube_pos.x * (1.0 - y2 / 2.0 - z2 / 2.0 + y2 * z2 / 3.0).max(0.0).sqrt(),
        cube_pos.y * (1.0 - x2 / 2.0 - z2 / 2.0 + x2 * z2 / 3.0).max(0.0).sqrt(),
        cube_pos.z * (1.0 - x2 / 2.0 - y2 / 2.0 + x2 * y2 / 3.0).max(0.0).sqrt(),
    )
}

/// Projects a cube surface point onto the unit sphere.
pub fn cube_to_sphere(cube_point: Vec3, mapping: SphereMapping) -> Vec3 {
    match mapping {
        SphereMapping::Normalize => cube_point.normalize(),
        SphereMapping::Spherify => spherify_point(cube_point),
    }
}

/// Grid index `(x, y)` of a face straight onto the unit sphere.
pub fn point_on_unit_sphere(
    face: FaceId,
    x: u32,
    y: u32,
    resolution: u32,
    mapping: SphereMapping,
) -> Vec3 {
    cube_to_sphere(point_on_unit_cube(face, x, y, resolution), mapping)
}
