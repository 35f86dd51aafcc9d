//! Cube face identification and face visibility selection.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identifies one of the six faces of the cube that is inflated into the planet.
///
/// The order matches the render mask order (`FaceMask::Top` selects index 0, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FaceId {
    /// +Y face.
    Top = 0,
    /// -Y face.
    Bottom = 1,
    /// -X face.
    Left = 2,
    /// +X face.
    Right = 3,
    /// +Z face.
    Front = 4,
    /// -Z face.
    Back = 5,
}

impl FaceId {
    /// Returns all six cube faces in order.
    pub const fn all() -> [FaceId; 6] {
        [
            FaceId::Top,
            FaceId::Bottom,
            FaceId::Left,
            FaceId::Right,
            FaceId::Front,
            FaceId::Back,
        ]
    }

    /// Returns the face index (0-5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Creates a face from an index (0-5).
    pub const fn from_index(index: usize) -> Option<FaceId> {
        match index {
            0 => Some(FaceId::Top),
            1 => Some(FaceId::Bottom),
            2 => Some(FaceId::Left),
            3 => Some(FaceId::Right),
            4 => Some(FaceId::Front),
            5 => Some(FaceId::Back),
            _ => None,
        }
    }

    /// Outward axis of this face on the unit cube.
    pub fn local_up(self) -> Vec3 {
        match self {
            FaceId::Top => Vec3::Y,
            FaceId::Bottom => Vec3::NEG_Y,
            FaceId::Left => Vec3::NEG_X,
            FaceId::Right => Vec3::X,
            FaceId::Front => Vec3::Z,
            FaceId::Back => Vec3::NEG_Z,
        }
    }

    /// Returns a short name for the face, used in export file names.
    pub const fn short_name(self) -> &'static str {
        match self {
            FaceId::Top => "top",
            FaceId::Bottom => "bottom",
            FaceId::Left => "left",
            FaceId::Right => "right",
            FaceId::Front => "front",
            FaceId::Back => "back",
        }
    }
}

/// Selects which faces are generated: every face, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaceMask {
    #[default]
    All,
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl FaceMask {
    /// Returns true if `face` is visible under this mask.
    pub fn shows(self, face: FaceId) -> bool {
        match self.single() {
            None => true,
            Some(only) => only == face,
        }
    }

    /// The single selected face, or `None` for `All`.
    pub fn single(self) -> Option<FaceId> {
        match self {
            FaceMask::All => None,
            FaceMask::Top => Some(FaceId::Top),
            FaceMask::Bottom => Some(FaceId::Bottom),
            FaceMask::Left => Some(FaceId::Left),
            FaceMask::Right => Some(FaceId::Right),
            FaceMask::Front => Some(FaceId::Front),
            FaceMask::Back => Some(FaceId::Back),
        }
    }
}
