//! Result of a solve call.

use robots_geometry::{Frame, TriangleMesh};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Joint values, link frames and optional display meshes for one target.
///
/// Created fresh by every solve; the caller owns it. Meshes are duplicates
/// of the mechanism geometry, so they can be modified freely.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicSolution {
    /// One value per joint, in working units.
    pub joints: Vec<f64>,
    /// Joint count + 1 frames; frame 0 is the base.
    pub frames: Vec<Frame>,
    /// Joint count + 1 positioned meshes, or empty if meshes were not requested.
    pub meshes: Vec<TriangleMesh>,
    /// Human-readable problems found while solving (for example range violations).
    pub errors: Vec<String>,
}

impl KinematicSolution {
    /// Check that no problems were reported.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The base frame (frame 0).
    #[must_use]
    pub fn base_frame(&self) -> Option<&Frame> {
        self.frames.first()
    }

    /// The frame of the last link.
    #[must_use]
    pub fn end_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}
