//! Which kinematic family solves which mechanism.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use robots_kinematics::families::{PositionerFamily, TrackFamily};
use robots_kinematics::{KinematicFamily, Manufacturer, MechanismKind};

use crate::error::{LibraryError, Result};

/// Creates a fresh family instance for each mechanism.
pub type FamilyFactory = Arc<dyn Fn() -> Box<dyn KinematicFamily> + Send + Sync>;

/// Maps a mechanism type and manufacturer to a kinematic family.
///
/// An entry registered without a manufacturer applies to every
/// manufacturer that has no entry of its own.
///
/// # Example
///
/// ```
/// use robots_kinematics::{Manufacturer, MechanismKind};
/// use robots_library::FamilyRegistry;
///
/// let registry = FamilyRegistry::with_defaults();
/// assert!(registry.supports(MechanismKind::Track, Manufacturer::KUKA));
/// // Arm kinematics are registered by the application.
/// assert!(!registry.supports(MechanismKind::RobotArm, Manufacturer::ABB));
/// ```
#[derive(Clone, Default)]
pub struct FamilyRegistry {
    factories: HashMap<(MechanismKind, Option<Manufacturer>), FamilyFactory>,
}

impl FamilyRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in track and positioner families for any
    /// manufacturer.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .with(MechanismKind::Track, None, || Box::new(TrackFamily::new()))
            .with(MechanismKind::Positioner, None, || Box::new(PositionerFamily::new()))
    }

    /// Register `factory` for `kind`, for one manufacturer or for all.
    ///
    /// Replaces any previous entry for the same key.
    pub fn register<F>(&mut self, kind: MechanismKind, manufacturer: Option<Manufacturer>, factory: F)
    where
        F: Fn() -> Box<dyn KinematicFamily> + Send + Sync + 'static,
    {
        self.factories.insert((kind, manufacturer), Arc::new(factory));
    }

    /// Register a factory, builder style.
    #[must_use]
    pub fn with<F>(mut self, kind: MechanismKind, manufacturer: Option<Manufacturer>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn KinematicFamily> + Send + Sync + 'static,
    {
        self.register(kind, manufacturer, factory);
        self
    }

    /// Check if a family is registered for this combination.
    #[must_use]
    pub fn supports(&self, kind: MechanismKind, manufacturer: Manufacturer) -> bool {
        self.factory(kind, manufacturer).is_some()
    }

    /// Create the family for a mechanism.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::UnsupportedMechanism`] if nothing is
    /// registered for this combination.
    pub fn create(
        &self,
        kind: MechanismKind,
        manufacturer: Manufacturer,
    ) -> Result<Box<dyn KinematicFamily>> {
        self.factory(kind, manufacturer)
            .map(|factory| factory())
            .ok_or(LibraryError::UnsupportedMechanism { kind, manufacturer })
    }

    fn factory(&self, kind: MechanismKind, manufacturer: Manufacturer) -> Option<&FamilyFactory> {
        self.factories
            .get(&(kind, Some(manufacturer)))
            .or_else(|| self.factories.get(&(kind, None)))
    }
}

impl fmt::Debug for FamilyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyRegistry")
            .field("entries", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
