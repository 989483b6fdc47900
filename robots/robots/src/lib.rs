//! Forward kinematics for industrial robot cells.
//!
//! This umbrella crate re-exports the robots-* crates, providing a unified
//! API for describing, loading and solving kinematic chains: robot arms,
//! rotary positioners and linear tracks.
//!
//! # Quick Start
//!
//! ```no_run
//! use robots::prelude::*;
//!
//! // Open a library folder of descriptions and STL geometry
//! let library = Library::open(&LibraryConfig::new("Robots")).unwrap();
//! let track = library.load("Track.ABB.IRBT4004").unwrap();
//!
//! // Drive the track to 1500 mm and position its meshes
//! let solution = track
//!     .kinematics(&Target::external(vec![1500.0]), None, true, None)
//!     .unwrap();
//! for message in &solution.errors {
//!     eprintln!("{message}");
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`geometry`] - Frames, transforms, quaternion conversion, triangle meshes
//! - [`kinematics`] - Mechanisms, joints, targets and the solving procedure
//! - [`library`] - Description parsing, geometry stores and loading
//!
//! # Feature Flags
//!
//! - `serde` - `Serialize`/`Deserialize` for value types in every crate

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Frames, transforms, quaternion conversion and triangle meshes.
pub use robots_geometry as geometry;

/// Mechanisms, joints, targets and the solving procedure.
pub use robots_kinematics as kinematics;

/// Description parsing, geometry stores and mechanism loading.
pub use robots_library as library;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for loading and solving mechanisms.
///
/// # Usage
///
/// ```
/// use robots::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use robots_geometry::{Frame, Point3, Transform, TriangleMesh, UnitQuaternion, Vector3};

    // Kinematics
    pub use robots_kinematics::families::{PositionerFamily, TrackFamily};
    pub use robots_kinematics::{
        Joint, JointKind, JointRange, KinematicFamily, KinematicSolution, KinematicsError,
        Manufacturer, Mechanism, MechanismKind, MechanismParts, Target, TargetPose, Tool,
    };

    // Loading
    pub use robots_library::{
        FamilyRegistry, GeometryStore, Library, LibraryConfig, LibraryError, MechanismLoader,
        MemoryStore,
    };
}
