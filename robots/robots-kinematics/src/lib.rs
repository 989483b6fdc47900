//! Forward kinematics for industrial mechanisms.
//!
//! This crate solves kinematic chains: robot arms, rotary positioners and
//! linear tracks. A [`Mechanism`] holds an immutable chain of [`Joint`]s
//! plus a repositionable base, and delegates the hardware-specific
//! equations to a [`KinematicFamily`]:
//!
//! - [`Mechanism`] - The chain, its identity and its cached display mesh
//! - [`KinematicFamily`] - Strategy mapping targets to joint values and
//!   joint values to link frames
//! - [`Target`] - What a solve call asks for
//! - [`KinematicSolution`] - Joint values, frames, meshes and range messages
//! - [`families`] - Built-in track and positioner strategies
//!
//! # Solving
//!
//! [`Mechanism::kinematics`] runs the same procedure for every family:
//! place the base, ask the family for joint values, check them against
//! each joint range, ask the family for link frames, carry those frames
//! onto the base and optionally position a copy of every mesh.
//!
//! Range violations do not fail the solve. They are listed in
//! [`KinematicSolution::errors`] so a caller can still show the pose.
//!
//! # Units
//!
//! Descriptions author revolute ranges in degrees. The mechanism converts
//! them once, on construction, through the family's
//! [`degree_to_radian`](KinematicFamily::degree_to_radian). Everything
//! after that is in radians (or length units for prismatic joints).
//!
//! # Example
//!
//! ```
//! use robots_geometry::{Frame, TriangleMesh};
//! use robots_kinematics::{
//!     families::TrackFamily, Joint, JointKind, JointRange, Manufacturer, Mechanism,
//!     MechanismKind, MechanismParts, Target,
//! };
//!
//! let parts = MechanismParts {
//!     model: "IRBT4004".to_string(),
//!     manufacturer: Manufacturer::ABB,
//!     kind: MechanismKind::Track,
//!     payload: 3000.0,
//!     base_frame: Frame::world(),
//!     base_mesh: TriangleMesh::new(),
//!     joints: vec![Joint::new(JointKind::Prismatic, 0, 6, JointRange::new(0.0, 4000.0))],
//!     moves_robot: true,
//! };
//! let track = Mechanism::new(parts, Box::new(TrackFamily::new())).unwrap();
//!
//! let solution = track
//!     .kinematics(&Target::external(vec![1500.0]), None, false, None)
//!     .unwrap();
//! assert!(solution.is_valid());
//! assert_eq!(solution.frames.len(), 2);
//! assert_eq!(solution.frames[1].origin.x, 1500.0);
//! ```
//!
//! # Thread Safety
//!
//! Solving borrows the mechanism immutably, so a shared `&Mechanism` can be
//! solved from several threads. Moving the base needs `&mut Mechanism`.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod engine;
mod error;
pub mod families;
mod family;
mod joint;
mod kind;
mod mechanism;
mod solution;
mod target;

pub use error::{KinematicsError, Result};
pub use family::KinematicFamily;
pub use joint::{Joint, JointKind, JointRange};
pub use kind::{Manufacturer, MechanismKind};
pub use mechanism::{Mechanism, MechanismParts};
pub use solution::KinematicSolution;
pub use target::{Target, TargetPose, Tool};
