//! Loading mechanisms from descriptions and geometry.
//!
//! This crate turns description documents and mesh files into
//! [`Mechanism`](robots_kinematics::Mechanism)s:
//!
//! - [`parse_descriptions_str`] - XML description parser
//! - [`GeometryStore`] - Where meshes come from: [`FolderStore`],
//!   [`MemoryStore`] and the lazy [`CachedStore`]
//! - [`FamilyRegistry`] - Which kinematic family solves which mechanism
//! - [`MechanismLoader`] - Description + geometry + family to mechanism
//! - [`Library`] - A configured folder of descriptions and geometry
//!
//! # Library Folder Layout
//!
//! ```text
//! Robots/
//!   manifest.xml        geometry manifest: model name -> mesh files
//!   tracks.xml          one or more mechanism descriptions
//!   positioners.xml
//!   meshes/...          STL files referenced by the manifest
//! ```
//!
//! # Example
//!
//! ```
//! use robots_geometry::TriangleMesh;
//! use robots_library::{MechanismLoader, MemoryStore};
//!
//! let xml = r#"
//!     <Track model="IRBT4004" manufacturer="ABB" payload="3000" movesRobot="true">
//!         <Base x="0" y="0" z="0" q1="1" q2="0" q3="0" q4="0"/>
//!         <Joints>
//!             <Prismatic number="7" a="0" d="0" minrange="0" maxrange="4000" maxspeed="2000"/>
//!         </Joints>
//!     </Track>
//! "#;
//!
//! let store = MemoryStore::new()
//!     .with_model("Track.ABB.IRBT4004", vec![TriangleMesh::new(), TriangleMesh::new()]);
//! let track = MechanismLoader::new(store).load_str(xml).unwrap();
//! assert_eq!(track.to_string(), "Track (ABB.IRBT4004)");
//! ```
//!
//! # Errors
//!
//! Every failure while loading is fatal and reported as a [`LibraryError`];
//! no partially built mechanism is returned.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod config;
mod error;
mod library;
mod loader;
mod parser;
mod registry;
mod stl;
mod store;
mod types;

pub use config::LibraryConfig;
pub use error::{LibraryError, Result};
pub use library::Library;
pub use loader::MechanismLoader;
pub use parser::{parse_description_str, parse_descriptions_str, parse_manifest_str};
pub use registry::{FamilyFactory, FamilyRegistry};
pub use stl::{load_stl, read_stl};
pub use store::{CachedStore, FolderStore, GeometryStore, MemoryStore};
pub use types::{BasePose, JointDescription, MechanismDescription};
