//! Joint descriptions for kinematic chains.

use robots_geometry::{Frame, TriangleMesh};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type of a joint.
///
/// The tag carries no behavior in the engine; kinematic families read it to
/// decide whether a joint value is an angle or a linear displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// Rotation about a single axis; values in radians.
    Revolute,
    /// Translation along a single axis; values in length units.
    Prismatic,
}

impl JointKind {
    /// Check if this joint rotates.
    #[must_use]
    pub const fn is_revolute(self) -> bool {
        matches!(self, Self::Revolute)
    }
}

impl std::fmt::Display for JointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Revolute => write!(f, "Revolute"),
            Self::Prismatic => write!(f, "Prismatic"),
        }
    }
}

impl std::str::FromStr for JointKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Revolute" => Ok(Self::Revolute),
            "Prismatic" => Ok(Self::Prismatic),
            other => Err(other.to_string()),
        }
    }
}

/// Closed interval of permitted joint values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointRange {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl JointRange {
    /// Create a range from its bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check that the bounds are finite and ordered.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Check if `value` lies inside the range, both bounds included.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Width of the range.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the range.
    #[must_use]
    pub fn mid(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// Clamp `value` into the range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Apply `f` to both bounds, reordering them if `f` flips the sign.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let a = f(self.min);
        let b = f(self.max);
        Self::new(a.min(b), a.max(b))
    }
}

/// One link of a kinematic chain.
///
/// All fields are set when the joint is created. The owning
/// [`Mechanism`](crate::Mechanism) converts `range` to working units and
/// assigns `local_frame` from its start configuration exactly once during
/// construction; afterwards joints are read-only.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Joint {
    /// Rotational or translational.
    pub kind: JointKind,
    /// Position in the chain (0-based).
    pub index: usize,
    /// External axis number (0-based), used when reporting problems.
    pub number: usize,
    /// Link offset length (Denavit-Hartenberg `a`).
    pub a: f64,
    /// Link displacement (Denavit-Hartenberg `d`).
    pub d: f64,
    /// Permitted values: radians for revolute joints, length for prismatic.
    pub range: JointRange,
    /// Maximum rate of change (rad/s or length/s).
    pub max_speed: f64,
    /// Joint frame in the mechanism's un-posed configuration, relative to its base.
    pub local_frame: Frame,
    /// Display geometry authored in the un-posed configuration.
    pub mesh: TriangleMesh,
}

impl Joint {
    /// Create a joint with a world local frame and no geometry.
    #[must_use]
    pub fn new(kind: JointKind, index: usize, number: usize, range: JointRange) -> Self {
        Self {
            kind,
            index,
            number,
            a: 0.0,
            d: 0.0,
            range,
            max_speed: 0.0,
            local_frame: Frame::world(),
            mesh: TriangleMesh::new(),
        }
    }

    /// Set the link parameters.
    #[must_use]
    pub fn with_link(mut self, a: f64, d: f64) -> Self {
        self.a = a;
        self.d = d;
        self
    }

    /// Set the maximum speed.
    #[must_use]
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Set the display geometry.
    #[must_use]
    pub fn with_mesh(mut self, mesh: TriangleMesh) -> Self {
        self.mesh = mesh;
        self
    }

    /// The 1-based axis number shown to users.
    #[must_use]
    pub const fn display_number(&self) -> usize {
        self.number + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        let range = JointRange::new(-1.0, 1.0);
        assert!(range.contains(-1.0));
        assert!(range.contains(1.0));
        assert!(range.contains(0.0));
        assert!(!range.contains(1.0 + 1e-12));
        assert!(!range.contains(-1.0 - 1e-12));
    }

    #[test]
    fn range_validity() {
        assert!(JointRange::new(0.0, 0.0).is_valid());
        assert!(!JointRange::new(1.0, 0.0).is_valid());
        assert!(!JointRange::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn range_map_reorders_bounds() {
        let range = JointRange::new(-10.0, 30.0).map(|v| -v);
        assert_eq!(range, JointRange::new(-30.0, 10.0));
    }

    #[test]
    fn joint_kind_parse() {
        assert_eq!("Revolute".parse::<JointKind>(), Ok(JointKind::Revolute));
        assert_eq!("Prismatic".parse::<JointKind>(), Ok(JointKind::Prismatic));
        assert!("Spherical".parse::<JointKind>().is_err());
    }

    #[test]
    fn display_number_is_one_based() {
        let joint = Joint::new(JointKind::Revolute, 0, 6, JointRange::new(0.0, 1.0));
        assert_eq!(joint.display_number(), 7);
    }
}
