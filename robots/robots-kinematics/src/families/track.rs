//! Linear track kinematics.

use robots_geometry::{Frame, Point3, Vector3};

use super::external_values;
use crate::error::Result;
use crate::family::KinematicFamily;
use crate::joint::Joint;
use crate::target::Target;

/// Gantry-style linear axes.
///
/// Axis `i` translates along world X, Y, Z in turn (`i % 3`), each carried
/// by the previous one. Values are lengths, so unit conversion is the
/// identity. Every axis sits at `(a, 0, d)` from its predecessor.
#[derive(Debug, Clone, Default)]
pub struct TrackFamily {
    external_offset: usize,
}

impl TrackFamily {
    /// A track reading its values from the first external axes.
    #[must_use]
    pub const fn new() -> Self {
        Self { external_offset: 0 }
    }

    /// Read values starting at external axis `offset`.
    #[must_use]
    pub const fn with_external_offset(mut self, offset: usize) -> Self {
        self.external_offset = offset;
        self
    }

    fn direction(index: usize) -> Vector3<f64> {
        match index % 3 {
            0 => Vector3::x(),
            1 => Vector3::y(),
            _ => Vector3::z(),
        }
    }
}

impl KinematicFamily for TrackFamily {
    fn name(&self) -> &'static str {
        "track"
    }

    fn solve_joints(
        &self,
        joints: &[Joint],
        target: &Target,
        _previous: Option<&[f64]>,
    ) -> Result<Vec<f64>> {
        external_values(self.name(), joints, target, self.external_offset, |v, i| {
            self.degree_to_radian(v, i)
        })
    }

    fn solve_frames(&self, joints: &[Joint], values: &[f64], _target: &Target) -> Result<Vec<Frame>> {
        let mut current = Frame::world();
        Ok(joints
            .iter()
            .zip(values)
            .map(|(joint, &value)| {
                let offset = Vector3::new(joint.a, 0.0, joint.d) + Self::direction(joint.index) * value;
                current = current.compose(&Frame::from_origin(Point3::from(offset)));
                current
            })
            .collect())
    }

    fn degree_to_radian(&self, degree: f64, _index: usize) -> f64 {
        degree
    }

    fn radian_to_degree(&self, radian: f64, _index: usize) -> f64 {
        radian
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{JointKind, JointRange};
    use approx::assert_relative_eq;

    fn axes(n: usize) -> Vec<Joint> {
        (0..n)
            .map(|i| Joint::new(JointKind::Prismatic, i, 6 + i, JointRange::new(-5000.0, 5000.0)))
            .collect()
    }

    #[test]
    fn unit_conversion_is_identity() {
        let track = TrackFamily::new();
        assert_relative_eq!(track.degree_to_radian(1234.5, 0), 1234.5);
        assert_relative_eq!(track.radian_to_degree(-7.0, 0), -7.0);
    }

    #[test]
    fn gantry_translates_cumulatively() {
        let track = TrackFamily::new();
        let joints = axes(3);
        let target = Target::external(vec![100.0, 200.0, -50.0]);

        let values = track.solve_joints(&joints, &target, None).unwrap();
        let frames = track.solve_frames(&joints, &values, &target).unwrap();

        assert_relative_eq!(frames[0].origin, Point3::new(100.0, 0.0, 0.0));
        assert_relative_eq!(frames[1].origin, Point3::new(100.0, 200.0, 0.0));
        assert_relative_eq!(frames[2].origin, Point3::new(100.0, 200.0, -50.0));
        assert_eq!(frames[2].rotation, Frame::world().rotation);
    }

    #[test]
    fn link_offsets_are_applied() {
        let track = TrackFamily::new();
        let joints = vec![Joint::new(JointKind::Prismatic, 0, 6, JointRange::new(0.0, 10.0)).with_link(1.0, 2.0)];
        let frames = track
            .solve_frames(&joints, &[3.0], &Target::external(vec![3.0]))
            .unwrap();
        assert_relative_eq!(frames[0].origin, Point3::new(4.0, 0.0, 2.0));
    }

    #[test]
    fn external_offset_skips_leading_axes() {
        let track = TrackFamily::new().with_external_offset(1);
        let joints = axes(1);
        let values = track
            .solve_joints(&joints, &Target::external(vec![90.0, 750.0]), None)
            .unwrap();
        assert_eq!(values, vec![750.0]);
    }

    #[test]
    fn missing_external_values() {
        let track = TrackFamily::new();
        assert!(track
            .solve_joints(&axes(2), &Target::joints(vec![0.0; 6]), None)
            .is_err());
    }
}
