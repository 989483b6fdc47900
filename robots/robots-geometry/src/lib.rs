//! Rigid-body geometry for kinematic chains.
//!
//! This crate provides the small set of geometric building blocks the
//! kinematics engine is written against:
//!
//! - [`Frame`] - A rigid pose: origin plus an orthonormal basis
//! - [`Transform`] - A 4x4 homogeneous transformation matrix
//! - [`TriangleMesh`] - A triangulated surface used for visualization
//! - [`Aabb`] - Axis-aligned bounds of a mesh
//! - The [`convert`] functions between frames, transforms and quaternions
//!
//! # Layer 0 Crate
//!
//! Pure math with no rendering or host-application dependencies. All
//! functions are side-effect free; inputs are assumed to be well-formed.
//!
//! # Units
//!
//! Angles are radians everywhere. Use [`deg_to_rad`] and [`rad_to_deg`] at
//! API boundaries where values are authored in degrees.
//!
//! # Example
//!
//! ```
//! use robots_geometry::{Frame, Transform, frame_from_quaternion, Point3};
//!
//! // A frame 1 unit up the Z axis, rotated 90 degrees about Z.
//! let s = std::f64::consts::FRAC_1_SQRT_2;
//! let frame = frame_from_quaternion(Point3::new(0.0, 0.0, 1.0), [s, 0.0, 0.0, s]);
//!
//! // Its local X axis points along world Y.
//! assert!((frame.x_axis().y - 1.0).abs() < 1e-12);
//!
//! // The transform that carries the world frame onto it.
//! let t = Transform::frame_to_frame(&Frame::world(), &frame);
//! let p = t.transform_point(&Point3::new(1.0, 0.0, 0.0));
//! assert!((p.y - 1.0).abs() < 1e-12);
//! assert!((p.z - 1.0).abs() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod convert;
mod frame;
mod mesh;
mod transform;

pub use convert::{
    deg_to_rad, frame_from_quaternion, frame_from_quaternion_parts, frame_to_transform,
    quaternion_from_frame, rad_to_deg, transform_to_frame,
};
pub use frame::Frame;
pub use mesh::{Aabb, TriangleMesh};
pub use transform::Transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Isometry3, Matrix4, Point3, UnitQuaternion, Vector3};

/// Tolerance for comparing distances (length units).
pub const DISTANCE_TOL: f64 = 0.001;

/// Tolerance for comparing angles (radians).
pub const ANGLE_TOL: f64 = 0.001;

/// Tolerance for comparing times (seconds).
pub const TIME_TOL: f64 = 0.000_01;

/// Tolerance for unit-length checks.
pub const UNIT_TOL: f64 = 0.000_001;

/// Tolerance used by kinematic families to detect singular configurations.
pub const SINGULARITY_TOL: f64 = 0.0001;
