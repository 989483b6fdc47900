//! Conversions between frames, transforms, quaternions and angle units.
//!
//! All conversions are relative to the fixed world reference frame
//! (origin, identity basis). Quaternions are written scalar first,
//! `[q0, q1, q2, q3] = [w, x, y, z]`, the convention used by robot
//! controller files for base and tool poses.

use nalgebra::{Matrix3, Point3, Quaternion, Rotation3, UnitQuaternion};

use crate::{Frame, Transform};

/// Build a frame from a position and a quaternion `[w, x, y, z]`.
///
/// The quaternion is normalized before use.
#[must_use]
pub fn frame_from_quaternion(point: Point3<f64>, quaternion: [f64; 4]) -> Frame {
    let [w, x, y, z] = quaternion;
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z));
    Frame::new(point, rotation)
}

/// Build a frame from seven scalars `x, y, z, q1, q2, q3, q4`.
///
/// `q1` is the scalar part. This is the layout of base poses in mechanism
/// description files.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn frame_from_quaternion_parts(
    x: f64,
    y: f64,
    z: f64,
    q1: f64,
    q2: f64,
    q3: f64,
    q4: f64,
) -> Frame {
    frame_from_quaternion(Point3::new(x, y, z), [q1, q2, q3, q4])
}

/// Extract `[x, y, z, q0, q1, q2, q3]` from a frame.
///
/// The rotation is relative to the world frame. Since `q` and `-q`
/// describe the same rotation, the sign is chosen so that `q0 >= 0`.
#[must_use]
pub fn quaternion_from_frame(frame: &Frame) -> [f64; 7] {
    let q = frame.rotation.quaternion();
    let sign = if q.w < 0.0 { -1.0 } else { 1.0 };
    [
        frame.origin.x,
        frame.origin.y,
        frame.origin.z,
        sign * q.w,
        sign * q.i,
        sign * q.j,
        sign * q.k,
    ]
}

/// The transform that carries the world frame onto `frame`.
#[must_use]
pub fn frame_to_transform(frame: &Frame) -> Transform {
    frame.to_transform()
}

/// The frame obtained by applying a rigid `transform` to the world frame.
///
/// The rotation block is assumed orthonormal.
#[must_use]
pub fn transform_to_frame(transform: &Transform) -> Frame {
    let m = transform.matrix();
    let basis: Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis));
    let origin = Point3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    Frame::new(origin, rotation)
}

/// Convert degrees to radians.
#[inline]
#[must_use]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Convert radians to degrees.
#[inline]
#[must_use]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    #[test]
    fn quaternion_round_trip() {
        let frame = frame_from_quaternion_parts(1.0, -2.0, 0.5, 0.5, 0.5, -0.5, 0.5);
        let q = quaternion_from_frame(&frame);

        assert_relative_eq!(q[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(q[1], -2.0, epsilon = 1e-12);
        assert_relative_eq!(q[2], 0.5, epsilon = 1e-12);
        assert_relative_eq!(q[3], 0.5, epsilon = 1e-12);
        assert_relative_eq!(q[4], 0.5, epsilon = 1e-12);
        assert_relative_eq!(q[5], -0.5, epsilon = 1e-12);
        assert_relative_eq!(q[6], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn quaternion_sign_is_normalized() {
        let frame = frame_from_quaternion(Point3::origin(), [-FRAC_1_SQRT_2, 0.0, 0.0, -FRAC_1_SQRT_2]);
        let q = quaternion_from_frame(&frame);
        assert!(q[3] >= 0.0);
        assert_relative_eq!(q[6], FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn unnormalized_quaternion_is_accepted() {
        let frame = frame_from_quaternion(Point3::origin(), [2.0, 0.0, 0.0, 0.0]);
        assert!(frame.approx_eq(&Frame::world(), 1e-12));
    }

    #[test]
    fn transform_frame_round_trip() {
        let frame = frame_from_quaternion(Point3::new(3.0, 4.0, 5.0), [0.9, 0.1, -0.3, 0.2]);
        let back = transform_to_frame(&frame_to_transform(&frame));
        assert!(back.approx_eq(&frame, 1e-12));
    }

    #[test]
    fn half_turn_survives_round_trip() {
        let frame = frame_from_quaternion(Point3::origin(), [0.0, 0.0, 0.0, 1.0]);
        let back = transform_to_frame(&frame_to_transform(&frame));
        assert!(back.approx_eq(&frame, 1e-12));
    }

    #[test]
    fn degree_radian_conversion() {
        assert_relative_eq!(deg_to_rad(180.0), PI, epsilon = 1e-15);
        assert_relative_eq!(rad_to_deg(PI / 2.0), 90.0, epsilon = 1e-12);
        for v in [-720.0, -33.3, 0.0, 45.0, 359.9] {
            assert_relative_eq!(rad_to_deg(deg_to_rad(v)), v, epsilon = 1e-9);
        }
    }
}
