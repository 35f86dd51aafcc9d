//! Cube-sphere geometry module.
//!
//! Provides the six cube faces, their tangent frames and grid sampling, and
//! the projection of cube points onto the unit sphere.

mod face;
mod cube_sphere;

pub use face::{FaceId, FaceMask};
pub use cube_sphere::{
    SphereMapping, face_axes, point_on_unit_cube, point_on_unit_sphere,
    cube_to_sphere, spherify_point,
};
