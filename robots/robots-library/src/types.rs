//! Parsed mechanism descriptions.
//!
//! These mirror the description document one to one. Ranges stay in
//! degrees here; the [`Mechanism`](robots_kinematics::Mechanism) converts
//! them on construction.

use robots_geometry::{frame_from_quaternion_parts, Frame, TriangleMesh};
use robots_kinematics::{Joint, JointKind, JointRange, Manufacturer, MechanismKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Base pose as position plus unit quaternion (`q1` is the scalar part).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::struct_field_names)]
pub struct BasePose {
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Z position.
    pub z: f64,
    /// Quaternion scalar part.
    pub q1: f64,
    /// Quaternion X part.
    pub q2: f64,
    /// Quaternion Y part.
    pub q3: f64,
    /// Quaternion Z part.
    pub q4: f64,
}

impl Default for BasePose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            q1: 1.0,
            q2: 0.0,
            q3: 0.0,
            q4: 0.0,
        }
    }
}

impl BasePose {
    /// The base frame in world coordinates.
    #[must_use]
    pub fn to_frame(&self) -> Frame {
        frame_from_quaternion_parts(self.x, self.y, self.z, self.q1, self.q2, self.q3, self.q4)
    }
}

/// One joint element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointDescription {
    /// Rotational or translational.
    pub kind: JointKind,
    /// External axis number, 0-based.
    pub number: usize,
    /// Link offset length.
    pub a: f64,
    /// Link displacement.
    pub d: f64,
    /// Lower bound in degrees (length for prismatic joints).
    pub min_range: f64,
    /// Upper bound in degrees (length for prismatic joints).
    pub max_range: f64,
    /// Maximum speed in working units: rad/s for revolute, length/s for prismatic.
    pub max_speed: f64,
}

impl JointDescription {
    /// Build the joint at chain position `index` with its display geometry.
    #[must_use]
    pub fn to_joint(&self, index: usize, mesh: TriangleMesh) -> Joint {
        Joint::new(
            self.kind,
            index,
            self.number,
            JointRange::new(self.min_range, self.max_range),
        )
        .with_link(self.a, self.d)
        .with_max_speed(self.max_speed)
        .with_mesh(mesh)
    }
}

/// One mechanism element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MechanismDescription {
    /// Mechanism type, from the element name.
    pub kind: MechanismKind,
    /// Manufacturer.
    pub manufacturer: Manufacturer,
    /// Model name without manufacturer prefix.
    pub model: String,
    /// Rated payload.
    pub payload: f64,
    /// Whether moving this mechanism also moves a robot mounted on it.
    pub moves_robot: bool,
    /// Base pose.
    pub base: BasePose,
    /// Joints in chain order.
    pub joints: Vec<JointDescription>,
}

impl MechanismDescription {
    /// Name used for geometry lookup, e.g. `Track.ABB.IRBT4004`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}.{}", self.kind, self.manufacturer, self.model)
    }
}
