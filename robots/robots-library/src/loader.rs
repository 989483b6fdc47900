//! Description + geometry to [`Mechanism`].

use std::fs;
use std::path::Path;

use robots_kinematics::{Mechanism, MechanismParts};
use tracing::info;

use crate::error::{LibraryError, Result};
use crate::parser::parse_description_str;
use crate::registry::FamilyRegistry;
use crate::store::GeometryStore;
use crate::types::MechanismDescription;

/// Builds mechanisms from descriptions, geometry and registered families.
#[derive(Debug, Clone)]
pub struct MechanismLoader<S> {
    store: S,
    registry: FamilyRegistry,
}

impl<S: GeometryStore> MechanismLoader<S> {
    /// Create a loader with the default family registry.
    pub fn new(store: S) -> Self {
        Self {
            store,
            registry: FamilyRegistry::with_defaults(),
        }
    }

    /// Replace the family registry.
    #[must_use]
    pub fn with_registry(mut self, registry: FamilyRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The geometry store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The family registry.
    pub const fn registry(&self) -> &FamilyRegistry {
        &self.registry
    }

    /// Mutable access to the family registry, for registering arm families.
    pub fn registry_mut(&mut self) -> &mut FamilyRegistry {
        &mut self.registry
    }

    /// Build a mechanism from a parsed description.
    ///
    /// # Errors
    ///
    /// Returns an error if no family is registered for the mechanism, its
    /// geometry is missing or has the wrong number of meshes, or the
    /// mechanism itself is invalid.
    pub fn build(&self, desc: &MechanismDescription) -> Result<Mechanism> {
        let full_name = desc.full_name();
        let family = self.registry.create(desc.kind, desc.manufacturer)?;

        let meshes = self.store.meshes(&full_name)?;
        if meshes.len() != desc.joints.len() + 1 {
            return Err(LibraryError::MeshCountMismatch {
                model: full_name,
                expected: desc.joints.len() + 1,
                actual: meshes.len(),
            });
        }

        let mut meshes = meshes.into_iter();
        let base_mesh = meshes.next().unwrap_or_default();
        let joints = desc
            .joints
            .iter()
            .zip(meshes)
            .enumerate()
            .map(|(index, (joint, mesh))| joint.to_joint(index, mesh))
            .collect();

        let parts = MechanismParts {
            model: desc.model.clone(),
            manufacturer: desc.manufacturer,
            kind: desc.kind,
            payload: desc.payload,
            base_frame: desc.base.to_frame(),
            base_mesh,
            joints,
            moves_robot: desc.moves_robot,
        };
        let mechanism = Mechanism::new(parts, family)?;

        info!(model = %full_name, family = mechanism.family().name(), "mechanism loaded");
        Ok(mechanism)
    }

    /// Parse a description document and build its (first) mechanism.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or building fails.
    pub fn load_str(&self, xml: &str) -> Result<Mechanism> {
        let desc = parse_description_str(xml)?;
        self.build(&desc)
    }

    /// Read a description file and build its (first) mechanism.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or built.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Mechanism> {
        let content = fs::read_to_string(path)?;
        self.load_str(&content)
    }
}
