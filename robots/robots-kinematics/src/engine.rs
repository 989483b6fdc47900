//! The per-call solving procedure shared by every mechanism.
//!
//! The engine owns everything that does not depend on the hardware family:
//!
//! 1. place frame 0 at the base, re-expressed under an override if given
//! 2. ask the family for joint values
//! 3. annotate range violations without aborting
//! 4. ask the family for base-relative link frames
//! 5. carry every link frame onto the base
//! 6. optionally position a duplicate of every mesh
//!
//! No state survives between calls.

use robots_geometry::{Frame, Transform, TriangleMesh};
use tracing::{debug, warn};

use crate::error::{KinematicsError, Result};
use crate::joint::Joint;
use crate::mechanism::Mechanism;
use crate::solution::KinematicSolution;
use crate::target::Target;

pub(crate) fn solve(
    mechanism: &Mechanism,
    target: &Target,
    previous: Option<&[f64]>,
    compute_meshes: bool,
    base_override: Option<&Frame>,
) -> Result<KinematicSolution> {
    let joints = mechanism.joints();
    let family = mechanism.family();

    debug!(
        mechanism = %mechanism,
        joints = joints.len(),
        compute_meshes,
        base_override = base_override.is_some(),
        "solving"
    );

    if let Some(previous) = previous {
        if previous.len() != joints.len() {
            return Err(KinematicsError::PreviousJointsLength {
                expected: joints.len(),
                actual: previous.len(),
            });
        }
    }

    let base = base_override.map_or(*mechanism.base_frame(), |o| o.compose(mechanism.base_frame()));
    if !base.is_finite() {
        return Err(KinematicsError::non_finite_base(mechanism.model()));
    }

    let values = family.solve_joints(joints, target, previous)?;
    if values.len() != joints.len() {
        return Err(KinematicsError::FamilyOutputLength {
            family: family.name(),
            what: "joint values",
            expected: joints.len(),
            actual: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(KinematicsError::NonFinite {
            family: family.name(),
            what: "joint values",
        });
    }

    let errors = range_violations(joints, &values);

    let local = family.solve_frames(joints, &values, target)?;
    if local.len() != joints.len() {
        return Err(KinematicsError::FamilyOutputLength {
            family: family.name(),
            what: "frames",
            expected: joints.len(),
            actual: local.len(),
        });
    }
    if local.iter().any(|f| !f.is_finite()) {
        return Err(KinematicsError::NonFinite {
            family: family.name(),
            what: "frames",
        });
    }

    let mut frames = Vec::with_capacity(joints.len() + 1);
    frames.push(base);
    frames.extend(local.iter().map(|f| base.compose(f)));

    let meshes = if compute_meshes {
        position_meshes(mechanism.base_mesh(), joints, &frames)
    } else {
        Vec::new()
    };

    Ok(KinematicSolution {
        joints: values,
        frames,
        meshes,
        errors,
    })
}

fn range_violations(joints: &[Joint], values: &[f64]) -> Vec<String> {
    joints
        .iter()
        .zip(values)
        .filter(|(joint, value)| !joint.range.contains(**value))
        .map(|(joint, &value)| {
            warn!(
                axis = joint.display_number(),
                value,
                min = joint.range.min,
                max = joint.range.max,
                "joint outside range"
            );
            format!("Axis {} is outside the permitted range.", joint.display_number())
        })
        .collect()
}

/// Duplicate every mesh and move it from its authored pose to the solved pose.
fn position_meshes(base_mesh: &TriangleMesh, joints: &[Joint], frames: &[Frame]) -> Vec<TriangleMesh> {
    let mut meshes = Vec::with_capacity(frames.len());
    meshes.push(base_mesh.transformed(&frames[0].to_transform()));
    for (joint, frame) in joints.iter().zip(&frames[1..]) {
        let placement = Transform::frame_to_frame(&joint.local_frame, frame);
        meshes.push(joint.mesh.transformed(&placement));
    }
    meshes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::KinematicFamily;
    use crate::joint::{JointKind, JointRange};
    use crate::kind::{Manufacturer, MechanismKind};
    use crate::mechanism::MechanismParts;
    use approx::assert_relative_eq;
    use robots_geometry::{deg_to_rad, Point3, UnitQuaternion, Vector3};

    /// Planar arm with unit links: every joint rotates about Z, then walks
    /// one unit along its new X axis.
    #[derive(Debug, Default)]
    struct PlanarFamily {
        fixed: Option<Vec<f64>>,
    }

    impl KinematicFamily for PlanarFamily {
        fn name(&self) -> &'static str {
            "planar"
        }

        fn solve_joints(
            &self,
            _joints: &[Joint],
            target: &Target,
            _previous: Option<&[f64]>,
        ) -> Result<Vec<f64>> {
            if let Some(fixed) = &self.fixed {
                return Ok(fixed.clone());
            }
            match &target.pose {
                crate::TargetPose::Joints(values) => Ok(values.clone()),
                crate::TargetPose::Frame(_) => Err(KinematicsError::UnsupportedTarget {
                    family: "planar",
                    target: "frame",
                }),
            }
        }

        fn solve_frames(&self, _joints: &[Joint], values: &[f64], _target: &Target) -> Result<Vec<Frame>> {
            let mut current = Frame::world();
            Ok(values
                .iter()
                .map(|&value| {
                    let step = Frame::new(
                        Point3::origin(),
                        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), value),
                    )
                    .compose(&Frame::from_origin(Point3::new(1.0, 0.0, 0.0)));
                    current = current.compose(&step);
                    current
                })
                .collect())
        }
    }

    /// Single axis with two solutions for the same target: +x and -x.
    #[derive(Debug)]
    struct TwoBranchFamily;

    impl KinematicFamily for TwoBranchFamily {
        fn name(&self) -> &'static str {
            "two-branch"
        }

        fn solve_joints(
            &self,
            _joints: &[Joint],
            target: &Target,
            previous: Option<&[f64]>,
        ) -> Result<Vec<f64>> {
            let x = *target
                .external
                .first()
                .ok_or_else(|| KinematicsError::missing_target_data("external axes", "one value"))?;
            let branch = match previous {
                Some(p) if (p[0] + x).abs() < (p[0] - x).abs() => -x,
                _ => x,
            };
            Ok(vec![branch])
        }

        fn solve_frames(&self, _joints: &[Joint], values: &[f64], _target: &Target) -> Result<Vec<Frame>> {
            Ok(vec![Frame::new(
                Point3::origin(),
                UnitQuaternion::from_axis_angle(&Vector3::z_axis(), values[0]),
            )])
        }
    }

    fn unit_square() -> TriangleMesh {
        TriangleMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    fn planar(fixed: Option<Vec<f64>>) -> Mechanism {
        let joint = |i: usize, a: f64| {
            Joint::new(JointKind::Revolute, i, i, JointRange::new(-180.0, 180.0))
                .with_link(a, 0.0)
                .with_mesh(unit_square())
        };
        let parts = MechanismParts {
            model: "Planar2".to_string(),
            manufacturer: Manufacturer::Other,
            kind: MechanismKind::RobotArm,
            payload: 1.0,
            base_frame: Frame::world(),
            base_mesh: unit_square(),
            joints: vec![joint(0, 0.0), joint(1, 1.0)],
            moves_robot: false,
        };
        Mechanism::new(parts, Box::new(PlanarFamily { fixed })).unwrap()
    }

    #[test]
    fn planar_two_link_end_to_end() {
        let mech = planar(Some(vec![deg_to_rad(30.0), deg_to_rad(45.0)]));
        let solution = mech
            .kinematics(&Target::joints(vec![0.0, 0.0]), None, false, None)
            .unwrap();

        assert_eq!(solution.joints.len(), 2);
        assert_eq!(solution.frames.len(), 3);
        assert!(solution.meshes.is_empty());
        assert!(solution.is_valid());
        assert_relative_eq!(solution.joints[0], 0.523_598_8, epsilon = 1e-6);
        assert_relative_eq!(solution.joints[1], 0.785_398_2, epsilon = 1e-6);

        let end = solution.end_frame().unwrap();
        let (s30, c30) = deg_to_rad(30.0).sin_cos();
        let (s75, c75) = deg_to_rad(75.0).sin_cos();
        assert_relative_eq!(end.origin.x, c30 + c75, epsilon = 1e-6);
        assert_relative_eq!(end.origin.y, s30 + s75, epsilon = 1e-6);
        assert_relative_eq!(end.origin.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn frame_count_is_independent_of_meshes() {
        let mech = planar(None);
        let target = Target::joints(vec![0.1, 0.2]);
        let without = mech.kinematics(&target, None, false, None).unwrap();
        let with = mech.kinematics(&target, None, true, None).unwrap();

        assert_eq!(without.frames.len(), 3);
        assert_eq!(with.frames.len(), 3);
        assert_eq!(with.meshes.len(), with.frames.len());
        assert_eq!(without.frames, with.frames);
    }

    #[test]
    fn base_mesh_follows_frame_zero() {
        let mut mech = planar(None);
        let base = Frame::new(
            Point3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.4),
        );
        mech.set_base_frame(base).unwrap();

        let solution = mech
            .kinematics(&Target::joints(vec![0.3, -0.2]), None, true, None)
            .unwrap();
        let expected = mech.base_mesh().transformed(&base.to_transform());
        for (got, want) in solution.meshes[0].vertices.iter().zip(&expected.vertices) {
            assert_relative_eq!(got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn home_configuration_leaves_meshes_in_place() {
        let mech = planar(None);
        let solution = mech
            .kinematics(&Target::joints(vec![0.0, 0.0]), None, true, None)
            .unwrap();
        for (mesh, joint) in solution.meshes[1..].iter().zip(mech.joints()) {
            for (got, want) in mesh.vertices.iter().zip(&joint.mesh.vertices) {
                assert_relative_eq!(got, want, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn joint_meshes_move_with_their_frames() {
        let mech = planar(None);
        let solution = mech
            .kinematics(&Target::joints(vec![std::f64::consts::FRAC_PI_2, 0.0]), None, true, None)
            .unwrap();
        // joint 0 rotates a quarter turn about the origin: (1,0,0) -> (0,1,0)
        let moved = solution.meshes[1].vertices[1];
        assert_relative_eq!(moved, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn base_override_is_a_rigid_repropagation() {
        let mech = planar(None);
        let target = Target::joints(vec![0.4, -1.1]);
        let b1 = Frame::new(
            Point3::new(0.5, -1.0, 2.0),
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        );
        let b2 = Frame::new(
            Point3::new(-3.0, 4.0, 0.0),
            UnitQuaternion::from_euler_angles(-0.5, 0.0, 1.2),
        );

        let s1 = mech.kinematics(&target, None, false, Some(&b1)).unwrap();
        let s2 = mech.kinematics(&target, None, false, Some(&b2)).unwrap();

        let carry = b2.compose(&b1.inverse());
        for (f1, f2) in s1.frames.iter().zip(&s2.frames) {
            assert!(carry.compose(f1).approx_eq(f2, 1e-9));
        }
    }

    #[test]
    fn override_composes_with_existing_base() {
        let mut mech = planar(None);
        let base = Frame::from_origin(Point3::new(0.0, 0.0, 1.0));
        mech.set_base_frame(base).unwrap();
        let over = Frame::from_origin(Point3::new(5.0, 0.0, 0.0));

        let solution = mech
            .kinematics(&Target::joints(vec![0.0, 0.0]), None, false, Some(&over))
            .unwrap();
        let frame0 = solution.base_frame().unwrap();
        assert_relative_eq!(frame0.origin, Point3::new(5.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn range_bounds_are_not_reported() {
        let mech = planar(None);
        let max = mech.joints()[0].range.max;
        let min = mech.joints()[1].range.min;
        let solution = mech
            .kinematics(&Target::joints(vec![max, min]), None, false, None)
            .unwrap();
        assert!(solution.is_valid(), "{:?}", solution.errors);
    }

    #[test]
    fn out_of_range_is_reported_once_per_joint() {
        let mech = planar(None);
        let over = mech.joints()[1].range.max + 1e-6;
        let solution = mech
            .kinematics(&Target::joints(vec![0.0, over]), None, false, None)
            .unwrap();

        assert_eq!(solution.errors, vec!["Axis 2 is outside the permitted range.".to_string()]);
        // the solve still completes
        assert_eq!(solution.frames.len(), 3);
        assert_relative_eq!(solution.joints[1], over);
    }

    #[test]
    fn previous_length_mismatch_is_fatal() {
        let mech = planar(None);
        let err = mech
            .kinematics(&Target::joints(vec![0.0, 0.0]), Some(&[0.0]), false, None)
            .unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::PreviousJointsLength {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn short_family_output_is_fatal() {
        let mech = planar(None);
        let err = mech
            .kinematics(&Target::joints(vec![0.0]), None, false, None)
            .unwrap_err();
        assert!(matches!(err, KinematicsError::FamilyOutputLength { .. }));
    }

    #[test]
    fn non_finite_output_is_fatal() {
        let mech = planar(None);
        let err = mech
            .kinematics(&Target::joints(vec![0.0, f64::NAN]), None, false, None)
            .unwrap_err();
        assert!(matches!(err, KinematicsError::NonFinite { .. }));
    }

    #[test]
    fn unsupported_target_propagates() {
        let mech = planar(None);
        let err = mech
            .kinematics(&Target::frame(Frame::world()), None, false, None)
            .unwrap_err();
        assert!(matches!(err, KinematicsError::UnsupportedTarget { .. }));
    }

    #[test]
    fn previous_solution_selects_branch() {
        let parts = MechanismParts {
            model: "Flip".to_string(),
            manufacturer: Manufacturer::Other,
            kind: MechanismKind::Positioner,
            payload: 0.0,
            base_frame: Frame::world(),
            base_mesh: TriangleMesh::new(),
            joints: vec![Joint::new(JointKind::Revolute, 0, 0, JointRange::new(-180.0, 180.0))],
            moves_robot: false,
        };
        let mech = Mechanism::new(parts, Box::new(TwoBranchFamily)).unwrap();
        let target = Target::external(vec![1.0]);

        let default = mech.kinematics(&target, None, false, None).unwrap();
        assert_relative_eq!(default.joints[0], 1.0);

        let near_negative = mech.kinematics(&target, Some(&[-0.9]), false, None).unwrap();
        assert_relative_eq!(near_negative.joints[0], -1.0);

        let near_positive = mech.kinematics(&target, Some(&[0.8]), false, None).unwrap();
        assert_relative_eq!(near_positive.joints[0], 1.0);
    }

    #[test]
    fn degree_radian_round_trip() {
        let mech = planar(None);
        for i in 0..mech.joint_count() {
            for v in [-720.0, -180.0, -33.3, 0.0, 1e-7, 90.0, 359.999] {
                let back = mech.radian_to_degree(mech.degree_to_radian(v, i), i);
                assert_relative_eq!(back, v, epsilon = 1e-9);
            }
        }
        let degrees = mech.joints_to_degrees(&[std::f64::consts::PI, -std::f64::consts::FRAC_PI_2]);
        assert_relative_eq!(degrees[0], 180.0, epsilon = 1e-9);
        assert_relative_eq!(degrees[1], -90.0, epsilon = 1e-9);
    }

    #[test]
    fn non_finite_override_is_fatal() {
        let mech = planar(None);
        let broken = Frame::from_origin(Point3::new(f64::NAN, 0.0, 0.0));
        let err = mech
            .kinematics(&Target::joints(vec![0.1, 0.2]), None, true, Some(&broken))
            .unwrap_err();
        assert!(matches!(err, KinematicsError::NonFiniteBase { .. }));
    }
}
