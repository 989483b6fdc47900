//! 4x4 homogeneous transformation matrices.

use std::ops::Mul;

use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Frame;

/// A 3D transformation represented as a 4x4 matrix.
///
/// In this crate transforms are rigid (rotation plus translation), but the
/// matrix form is kept so meshes and points can be moved with a single
/// multiplication.
///
/// # Example
///
/// ```
/// use robots_geometry::{Transform, Point3};
///
/// let up = Transform::translation(0.0, 0.0, 1.0);
/// let turn = Transform::rotation_z(std::f64::consts::FRAC_PI_2);
///
/// // Translate first, then rotate.
/// let p = up.then(&turn).transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert!((p.y - 1.0).abs() < 1e-12);
/// assert!((p.z - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    /// The 4x4 transformation matrix in column-major order.
    matrix: Matrix4<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a new transformation from a 4x4 matrix.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Create the identity transformation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a transformation from an isometry.
    #[must_use]
    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        Self {
            matrix: iso.to_homogeneous(),
        }
    }

    /// Create a translation transformation.
    #[must_use]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(tx, ty, tz)),
        }
    }

    /// Create a rotation around the Z axis.
    ///
    /// # Arguments
    ///
    /// * `angle` - Rotation angle in radians
    #[must_use]
    pub fn rotation_z(angle: f64) -> Self {
        Self::rotation_axis(Vector3::z(), angle)
    }

    /// Create a rotation around an arbitrary axis through the origin.
    ///
    /// Returns the identity if `axis` is zero.
    #[must_use]
    pub fn rotation_axis(axis: Vector3<f64>, angle: f64) -> Self {
        if axis.norm() < f64::EPSILON {
            return Self::identity();
        }
        Self {
            matrix: Matrix4::from_scaled_axis(axis.normalize() * angle),
        }
    }

    /// The transform that carries frame `from` onto frame `to`.
    ///
    /// Geometry authored relative to `from` ends up at the same relative
    /// placement with respect to `to`.
    #[must_use]
    pub fn frame_to_frame(from: &Frame, to: &Frame) -> Self {
        Self::from_isometry(&(to.to_isometry() * from.to_isometry().inverse()))
    }

    /// Get the underlying 4x4 matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Compose this transformation with another (self then other).
    ///
    /// The result applies `self` first, then `other`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Compute the inverse transformation.
    ///
    /// Returns `None` if the matrix is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|m| Self { matrix: m })
    }

    /// Transform a point (applies translation).
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    /// Transform a direction vector (ignores translation).
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transform_vector(vector)
    }
}

impl Mul for Transform {
    type Output = Self;

    /// Matrix product: `a * b` applies `b` first, then `a`.
    fn mul(self, rhs: Self) -> Self {
        Self {
            matrix: self.matrix * rhs.matrix,
        }
    }
}
