//! Mechanism: an immutable kinematic chain with a movable base.

use std::fmt;

use robots_geometry::{Frame, TriangleMesh};
use tracing::info;

use crate::engine;
use crate::error::{KinematicsError, Result};
use crate::family::KinematicFamily;
use crate::joint::Joint;
use crate::kind::{Manufacturer, MechanismKind};
use crate::solution::KinematicSolution;
use crate::target::Target;

/// Everything needed to build a [`Mechanism`], as read from a description.
///
/// Joint ranges are in degrees (length units for prismatic joints); the
/// mechanism converts them once during construction.
#[derive(Debug, Clone)]
pub struct MechanismParts {
    /// Model name without manufacturer prefix.
    pub model: String,
    /// Manufacturer.
    pub manufacturer: Manufacturer,
    /// Mechanism type.
    pub kind: MechanismKind,
    /// Rated payload.
    pub payload: f64,
    /// Base frame in world coordinates.
    pub base_frame: Frame,
    /// Base display geometry, authored relative to the base.
    pub base_mesh: TriangleMesh,
    /// Joints in chain order.
    pub joints: Vec<Joint>,
    /// Whether moving this mechanism also moves a robot mounted on it.
    pub moves_robot: bool,
}

/// A kinematic chain: robot arm, positioner or track.
///
/// The joint sequence and ranges are fixed for the lifetime of the value.
/// Only the base frame can be reassigned, for example when the mechanism
/// rides on a track. Solving takes `&self`, so a mechanism can be shared
/// between threads for concurrent solves; repositioning needs `&mut self`.
#[derive(Debug)]
pub struct Mechanism {
    model: String,
    manufacturer: Manufacturer,
    kind: MechanismKind,
    payload: f64,
    base_frame: Frame,
    base_mesh: TriangleMesh,
    joints: Box<[Joint]>,
    moves_robot: bool,
    display_mesh: TriangleMesh,
    family: Box<dyn KinematicFamily>,
}

impl Mechanism {
    /// Build a mechanism from its parts and kinematic family.
    ///
    /// Converts every joint range to working units with the family's
    /// [`degree_to_radian`](KinematicFamily::degree_to_radian), caches the
    /// composite display mesh and lets the family establish its start
    /// state, which fixes each joint's local frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain is empty, the base frame is not
    /// finite, joint indices are out of order, a range is empty or not
    /// finite, or the family cannot place the home configuration.
    pub fn new(parts: MechanismParts, mut family: Box<dyn KinematicFamily>) -> Result<Self> {
        let MechanismParts {
            model,
            manufacturer,
            kind,
            payload,
            base_frame,
            base_mesh,
            mut joints,
            moves_robot,
        } = parts;

        if joints.is_empty() {
            return Err(KinematicsError::no_joints(format!("{manufacturer}.{model}")));
        }
        if !base_frame.is_finite() {
            return Err(KinematicsError::non_finite_base(format!("{manufacturer}.{model}")));
        }

        for (position, joint) in joints.iter_mut().enumerate() {
            if joint.index != position {
                return Err(KinematicsError::JointIndexMismatch {
                    position,
                    index: joint.index,
                });
            }
            if !joint.range.is_valid() {
                return Err(KinematicsError::InvalidRange {
                    number: joint.display_number(),
                    min: joint.range.min,
                    max: joint.range.max,
                });
            }
            joint.range = joint
                .range
                .map(|degree| family.degree_to_radian(degree, position));
        }

        let display_mesh = composite_mesh(&base_mesh, &joints, &base_frame);

        let start_frames = family.start_state(&joints)?;
        if start_frames.len() != joints.len() {
            return Err(KinematicsError::FamilyOutputLength {
                family: family.name(),
                what: "start frames",
                expected: joints.len(),
                actual: start_frames.len(),
            });
        }
        for (joint, frame) in joints.iter_mut().zip(start_frames) {
            joint.local_frame = frame;
        }

        info!(
            model = %format!("{manufacturer}.{model}"),
            kind = %kind,
            joints = joints.len(),
            "mechanism constructed"
        );

        Ok(Self {
            model,
            manufacturer,
            kind,
            payload,
            base_frame,
            base_mesh,
            joints: joints.into_boxed_slice(),
            moves_robot,
            display_mesh,
            family,
        })
    }

    /// Solve `target` and return the per-joint configuration.
    ///
    /// * `previous` - last joint solution, used to stay on the same branch
    /// * `compute_meshes` - also return positioned display meshes
    /// * `base_override` - place the base relative to this frame instead of
    ///   the world origin
    ///
    /// Range violations are reported in [`KinematicSolution::errors`] and do
    /// not stop the solve.
    ///
    /// # Errors
    ///
    /// Returns an error if `previous` has the wrong length, the target lacks
    /// data the family needs, or the family output is malformed.
    pub fn kinematics(
        &self,
        target: &Target,
        previous: Option<&[f64]>,
        compute_meshes: bool,
        base_override: Option<&Frame>,
    ) -> Result<KinematicSolution> {
        engine::solve(self, target, previous, compute_meshes, base_override)
    }

    /// Model name with manufacturer prefix, e.g. `ABB.IRBT4004`.
    #[must_use]
    pub fn model(&self) -> String {
        format!("{}.{}", self.manufacturer, self.model)
    }

    /// Model name as written in the description.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.model
    }

    /// Fully qualified name used for asset lookup, e.g. `Track.ABB.IRBT4004`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}.{}", self.kind, self.manufacturer, self.model)
    }

    /// Manufacturer.
    #[must_use]
    pub const fn manufacturer(&self) -> Manufacturer {
        self.manufacturer
    }

    /// Mechanism type.
    #[must_use]
    pub const fn kind(&self) -> MechanismKind {
        self.kind
    }

    /// Rated payload.
    #[must_use]
    pub const fn payload(&self) -> f64 {
        self.payload
    }

    /// Whether moving this mechanism also moves a robot mounted on it.
    #[must_use]
    pub const fn moves_robot(&self) -> bool {
        self.moves_robot
    }

    /// Current base frame.
    #[must_use]
    pub const fn base_frame(&self) -> &Frame {
        &self.base_frame
    }

    /// Reposition the base.
    ///
    /// Joint count and ranges are unaffected; the cached display mesh is
    /// rebuilt at the new base.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::NonFiniteBase`] and keeps the current base
    /// if `base_frame` holds `NaN` or infinite values.
    pub fn set_base_frame(&mut self, base_frame: Frame) -> Result<()> {
        if !base_frame.is_finite() {
            return Err(KinematicsError::non_finite_base(self.model()));
        }
        self.base_frame = base_frame;
        self.display_mesh = composite_mesh(&self.base_mesh, &self.joints, &self.base_frame);
        Ok(())
    }

    /// Base geometry, relative to the base frame.
    #[must_use]
    pub const fn base_mesh(&self) -> &TriangleMesh {
        &self.base_mesh
    }

    /// Joints in chain order.
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Number of joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Base and joint geometry in the un-posed configuration, placed at the base.
    #[must_use]
    pub const fn display_mesh(&self) -> &TriangleMesh {
        &self.display_mesh
    }

    /// The kinematic family solving this mechanism.
    #[must_use]
    pub fn family(&self) -> &dyn KinematicFamily {
        self.family.as_ref()
    }

    /// Convert a value in degrees to working units for joint `index`.
    #[must_use]
    pub fn degree_to_radian(&self, degree: f64, index: usize) -> f64 {
        self.family.degree_to_radian(degree, index)
    }

    /// Convert a working-unit value of joint `index` to degrees.
    #[must_use]
    pub fn radian_to_degree(&self, radian: f64, index: usize) -> f64 {
        self.family.radian_to_degree(radian, index)
    }

    /// Convert a full set of joint values to degrees for display.
    #[must_use]
    pub fn joints_to_degrees(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| self.radian_to_degree(v, i))
            .collect()
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}.{})", self.kind, self.manufacturer, self.model)
    }
}

/// Base geometry plus every joint's geometry, moved onto the base frame.
fn composite_mesh(base_mesh: &TriangleMesh, joints: &[Joint], base_frame: &Frame) -> TriangleMesh {
    let mut mesh = base_mesh.clone();
    for joint in joints {
        mesh.append(&joint.mesh);
    }
    mesh.transform(&base_frame.to_transform());
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::{PositionerFamily, TrackFamily};
    use crate::joint::{JointKind, JointRange};
    use approx::assert_relative_eq;
    use robots_geometry::{deg_to_rad, frame_from_quaternion_parts, rad_to_deg, Point3, Transform};

    fn square(z: f64) -> TriangleMesh {
        TriangleMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, z),
                Point3::new(1.0, 0.0, z),
                Point3::new(1.0, 1.0, z),
                Point3::new(0.0, 1.0, z),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    fn track_parts(base_frame: Frame) -> MechanismParts {
        MechanismParts {
            model: "IRBT4004".to_string(),
            manufacturer: Manufacturer::ABB,
            kind: MechanismKind::Track,
            payload: 3000.0,
            base_frame,
            base_mesh: square(0.0),
            joints: vec![Joint::new(
                JointKind::Prismatic,
                0,
                6,
                JointRange::new(0.0, 4000.0),
            )
            .with_mesh(square(0.5))],
            moves_robot: true,
        }
    }

    #[test]
    fn identity_and_accessors() {
        let mech = Mechanism::new(track_parts(Frame::world()), Box::new(TrackFamily::new())).unwrap();

        assert_eq!(mech.model(), "ABB.IRBT4004");
        assert_eq!(mech.full_name(), "Track.ABB.IRBT4004");
        assert_eq!(mech.to_string(), "Track (ABB.IRBT4004)");
        assert_eq!(mech.joint_count(), 1);
        assert!(mech.moves_robot());
        assert_relative_eq!(mech.payload(), 3000.0);
    }

    #[test]
    fn display_mesh_is_placed_at_base() {
        let base = Frame::from_origin(Point3::new(10.0, 0.0, 0.0));
        let mech = Mechanism::new(track_parts(base), Box::new(TrackFamily::new())).unwrap();

        let display = mech.display_mesh();
        assert_eq!(display.vertex_count(), 8);
        assert_eq!(display.face_count(), 4);
        assert_relative_eq!(display.vertices[0].x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(display.vertices[4].z, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn set_base_frame_refreshes_display_mesh() {
        let mut mech =
            Mechanism::new(track_parts(Frame::world()), Box::new(TrackFamily::new())).unwrap();
        let before = mech.display_mesh().clone();

        let moved = Frame::from_origin(Point3::new(0.0, 0.0, 2.0));
        mech.set_base_frame(moved).unwrap();

        assert_eq!(mech.base_frame(), &moved);
        assert_eq!(mech.joint_count(), 1);
        assert_eq!(
            mech.display_mesh(),
            &before.transformed(&Transform::translation(0.0, 0.0, 2.0))
        );
    }

    #[test]
    fn empty_chain_is_rejected() {
        let mut parts = track_parts(Frame::world());
        parts.joints.clear();
        let err = Mechanism::new(parts, Box::new(TrackFamily::new())).unwrap_err();
        assert!(matches!(err, KinematicsError::NoJoints { .. }));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut parts = track_parts(Frame::world());
        parts.joints[0].range = JointRange::new(10.0, -10.0);
        let err = Mechanism::new(parts, Box::new(TrackFamily::new())).unwrap_err();
        assert!(matches!(err, KinematicsError::InvalidRange { number: 7, .. }));
    }

    #[test]
    fn out_of_order_index_is_rejected() {
        let mut parts = track_parts(Frame::world());
        parts.joints[0].index = 3;
        let err = Mechanism::new(parts, Box::new(TrackFamily::new())).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::JointIndexMismatch {
                position: 0,
                index: 3
            }
        ));
    }

    #[test]
    fn non_finite_base_is_rejected() {
        let zero_quaternion = frame_from_quaternion_parts(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(!zero_quaternion.is_finite());
        let err = Mechanism::new(track_parts(zero_quaternion), Box::new(TrackFamily::new()))
            .unwrap_err();
        assert!(matches!(err, KinematicsError::NonFiniteBase { .. }));

        let nan_origin = Frame::from_origin(Point3::new(f64::NAN, 0.0, 0.0));
        assert!(Mechanism::new(track_parts(nan_origin), Box::new(TrackFamily::new())).is_err());
    }

    #[test]
    fn set_base_frame_keeps_base_on_non_finite_input() {
        let base = Frame::from_origin(Point3::new(1.0, 0.0, 0.0));
        let mut mech = Mechanism::new(track_parts(base), Box::new(TrackFamily::new())).unwrap();
        let display = mech.display_mesh().clone();

        let err = mech
            .set_base_frame(Frame::from_origin(Point3::new(0.0, f64::INFINITY, 0.0)))
            .unwrap_err();
        assert!(matches!(err, KinematicsError::NonFiniteBase { .. }));
        assert_eq!(mech.base_frame(), &base);
        assert_eq!(mech.display_mesh(), &display);
    }

    /// Positioner whose first axis counts in the opposite direction.
    #[derive(Debug)]
    struct FlippedFirstAxis(PositionerFamily);

    impl KinematicFamily for FlippedFirstAxis {
        fn name(&self) -> &'static str {
            "flipped"
        }

        fn solve_joints(
            &self,
            joints: &[Joint],
            target: &Target,
            _previous: Option<&[f64]>,
        ) -> Result<Vec<f64>> {
            Ok(target
                .external
                .iter()
                .take(joints.len())
                .enumerate()
                .map(|(i, &v)| self.degree_to_radian(v, i))
                .collect())
        }

        fn solve_frames(&self, joints: &[Joint], values: &[f64], target: &Target) -> Result<Vec<Frame>> {
            self.0.solve_frames(joints, values, target)
        }

        fn degree_to_radian(&self, degree: f64, index: usize) -> f64 {
            if index == 0 {
                -deg_to_rad(degree)
            } else {
                deg_to_rad(degree)
            }
        }

        fn radian_to_degree(&self, radian: f64, index: usize) -> f64 {
            if index == 0 {
                -rad_to_deg(radian)
            } else {
                rad_to_deg(radian)
            }
        }
    }

    fn flipped_positioner() -> Mechanism {
        let parts = MechanismParts {
            model: "IRBP".to_string(),
            manufacturer: Manufacturer::Other,
            kind: MechanismKind::Positioner,
            payload: 500.0,
            base_frame: Frame::world(),
            base_mesh: TriangleMesh::new(),
            joints: vec![
                Joint::new(JointKind::Revolute, 0, 6, JointRange::new(-30.0, 120.0)),
                Joint::new(JointKind::Revolute, 1, 7, JointRange::new(-360.0, 360.0)),
            ],
            moves_robot: false,
        };
        Mechanism::new(parts, Box::new(FlippedFirstAxis(PositionerFamily::new()))).unwrap()
    }

    #[test]
    fn per_axis_conversion_reorders_range() {
        let mech = flipped_positioner();
        let flipped = mech.joints()[0].range;
        assert_relative_eq!(flipped.min, deg_to_rad(-120.0), epsilon = 1e-12);
        assert_relative_eq!(flipped.max, deg_to_rad(30.0), epsilon = 1e-12);
        assert!(flipped.is_valid());

        let plain = mech.joints()[1].range;
        assert_relative_eq!(plain.min, deg_to_rad(-360.0), epsilon = 1e-12);
        assert_relative_eq!(plain.max, deg_to_rad(360.0), epsilon = 1e-12);
    }

    #[test]
    fn per_axis_conversion_checks_flipped_bound() {
        let mech = flipped_positioner();

        // 120 degrees authored is the flipped lower bound, and stays inside
        let edge = mech
            .kinematics(&Target::external(vec![120.0, 0.0]), None, false, None)
            .unwrap();
        assert!(edge.is_valid(), "{:?}", edge.errors);

        let past = mech
            .kinematics(&Target::external(vec![120.5, 0.0]), None, false, None)
            .unwrap();
        assert_eq!(past.errors, vec!["Axis 7 is outside the permitted range.".to_string()]);

        // -30 is the authored lower bound, -31 falls past the flipped upper bound
        let below = mech
            .kinematics(&Target::external(vec![-31.0, 0.0]), None, false, None)
            .unwrap();
        assert_eq!(below.errors.len(), 1);
    }

    #[test]
    fn per_axis_conversion_round_trips() {
        let mech = flipped_positioner();
        for index in 0..mech.joint_count() {
            for degree in [-720.0, -120.0, -0.5, 0.0, 17.25, 90.0, 359.9] {
                let back = mech.radian_to_degree(mech.degree_to_radian(degree, index), index);
                assert_relative_eq!(back, degree, epsilon = 1e-9);
            }
        }
        assert_relative_eq!(mech.degree_to_radian(90.0, 0), -mech.degree_to_radian(90.0, 1));

        let solution = mech
            .kinematics(&Target::external(vec![45.0, -10.0]), None, false, None)
            .unwrap();
        let degrees = mech.joints_to_degrees(&solution.joints);
        assert_relative_eq!(degrees[0], 45.0, epsilon = 1e-9);
        assert_relative_eq!(degrees[1], -10.0, epsilon = 1e-9);
    }
}
