//! Rigid frames (position and orientation).

use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Transform;

/// A rigid pose: an origin plus an orthonormal 3-axis basis.
///
/// The basis is stored as a unit quaternion, so the frame is orthonormal
/// by construction. Equivalently this is a 4x4 homogeneous transform with
/// no scale or shear, see [`Frame::to_transform`].
///
/// # Example
///
/// ```
/// use robots_geometry::{Frame, Point3};
///
/// let frame = Frame::from_origin(Point3::new(1.0, 2.0, 3.0));
/// let world = frame.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(world, Point3::new(2.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Origin in the parent coordinate space.
    pub origin: Point3<f64>,
    /// Orientation of the basis relative to the parent space.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::world()
    }
}

impl Frame {
    /// The world reference frame: origin with the identity basis.
    #[must_use]
    pub fn world() -> Self {
        Self {
            origin: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a frame from an origin and an orientation.
    #[must_use]
    pub const fn new(origin: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { origin, rotation }
    }

    /// Create a frame at `origin` with the identity basis.
    #[must_use]
    pub fn from_origin(origin: Point3<f64>) -> Self {
        Self {
            origin,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a frame from an origin, an X direction and a direction in the XY plane.
    ///
    /// The basis is orthonormalized: X is `x_dir` normalized, Z is
    /// perpendicular to both inputs and Y completes the right-handed basis.
    ///
    /// Returns `None` if either direction is zero or they are parallel.
    #[must_use]
    pub fn from_axes(origin: Point3<f64>, x_dir: Vector3<f64>, y_dir: Vector3<f64>) -> Option<Self> {
        let x = x_dir.try_normalize(f64::EPSILON)?;
        let z = x.cross(&y_dir).try_normalize(f64::EPSILON)?;
        let y = z.cross(&x);

        let basis = Matrix3::from_columns(&[x, y, z]);
        let rotation =
            UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis));
        Some(Self { origin, rotation })
    }

    /// Create a frame from an isometry.
    #[must_use]
    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        Self {
            origin: Point3::from(iso.translation.vector),
            rotation: iso.rotation,
        }
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(self.origin.coords.into(), self.rotation)
    }

    /// The transform that carries the world frame onto this frame.
    #[must_use]
    pub fn to_transform(&self) -> Transform {
        Transform::from_isometry(&self.to_isometry())
    }

    /// Local X axis in parent coordinates.
    #[must_use]
    pub fn x_axis(&self) -> Vector3<f64> {
        self.rotation * Vector3::x()
    }

    /// Local Y axis in parent coordinates.
    #[must_use]
    pub fn y_axis(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }

    /// Local Z axis (the frame normal) in parent coordinates.
    #[must_use]
    pub fn z_axis(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    /// Transform a point from local to parent coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.origin + self.rotation * local.coords
    }

    /// Compute the inverse frame.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            origin: Point3::from(-(inv_rotation * self.origin.coords)),
            rotation: inv_rotation,
        }
    }

    /// Compose two frames: `other` expressed in this frame's local space
    /// is re-expressed in this frame's parent space.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            origin: self.transform_point(&other.origin),
            rotation: self.rotation * other.rotation,
        }
    }

    /// Apply a rigid transform to this frame.
    ///
    /// Any scale or shear in `transform` is discarded from the basis.
    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        let origin = transform.transform_point(&self.origin);
        let x = transform.transform_vector(&self.x_axis());
        let y = transform.transform_vector(&self.y_axis());
        Self::from_axes(origin, x, y).unwrap_or(Self {
            origin,
            rotation: self.rotation,
        })
    }

    /// Check if the frame contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.origin.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }

    /// Compare two frames within a tolerance.
    ///
    /// The origins must be within `tol` of each other and the unit
    /// quaternions of the two bases, taken up to sign, must differ by at
    /// most `tol`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        let a = self.rotation.coords;
        let b = other.rotation.coords;
        let rotation_gap = (a - b).norm().min((a + b).norm());
        (self.origin - other.origin).norm() <= tol && rotation_gap <= tol
    }
}
