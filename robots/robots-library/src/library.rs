//! A folder of mechanism descriptions and their geometry.

use std::collections::BTreeMap;
use std::fs;

use robots_kinematics::Mechanism;
use tracing::{debug, info, warn};

use crate::config::LibraryConfig;
use crate::error::{LibraryError, Result};
use crate::loader::MechanismLoader;
use crate::parser::parse_descriptions_str;
use crate::registry::FamilyRegistry;
use crate::store::{CachedStore, FolderStore, GeometryStore};
use crate::types::MechanismDescription;

/// Every mechanism described in a library folder.
///
/// Opening a library reads all description files up front; geometry is
/// read when a mechanism is loaded, and kept in memory if the
/// configuration asks for it.
#[derive(Debug)]
pub struct Library {
    config: LibraryConfig,
    descriptions: BTreeMap<String, MechanismDescription>,
    loader: MechanismLoader<Box<dyn GeometryStore>>,
}

impl Library {
    /// Open the library folder named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder or its manifest is missing, or a
    /// description file cannot be read or parsed.
    pub fn open(config: &LibraryConfig) -> Result<Self> {
        let root = &config.library_path;
        if !root.is_dir() {
            return Err(LibraryError::LibraryNotFound { path: root.clone() });
        }

        let folder = FolderStore::open(root, &config.manifest_name)?;
        let store: Box<dyn GeometryStore> = if config.cache_geometry {
            Box::new(CachedStore::new(folder))
        } else {
            Box::new(folder)
        };

        let mut files: Vec<_> = fs::read_dir(root)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().is_some_and(|e| e == config.description_extension.as_str())
                    && path.file_name().is_some_and(|n| n != config.manifest_name.as_str())
            })
            .collect();
        files.sort();

        let mut descriptions = BTreeMap::new();
        for path in files {
            debug!(path = %path.display(), "reading descriptions");
            for desc in parse_descriptions_str(&fs::read_to_string(&path)?)? {
                let name = desc.full_name();
                if descriptions.insert(name.clone(), desc).is_some() {
                    warn!(model = %name, path = %path.display(), "description replaces an earlier one");
                }
            }
        }

        info!(
            path = %root.display(),
            mechanisms = descriptions.len(),
            "library opened"
        );

        Ok(Self {
            config: config.clone(),
            descriptions,
            loader: MechanismLoader::new(store),
        })
    }

    /// Replace the family registry.
    #[must_use]
    pub fn with_registry(mut self, registry: FamilyRegistry) -> Self {
        self.loader = self.loader.with_registry(registry);
        self
    }

    /// Mutable access to the family registry, for registering arm families.
    pub fn registry_mut(&mut self) -> &mut FamilyRegistry {
        self.loader.registry_mut()
    }

    /// The configuration this library was opened with.
    #[must_use]
    pub const fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Fully qualified names of every described mechanism, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptions.keys().map(String::as_str)
    }

    /// Number of described mechanisms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    /// Check if the library describes no mechanisms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// The description of `full_name`, if any.
    #[must_use]
    pub fn description(&self, full_name: &str) -> Option<&MechanismDescription> {
        self.descriptions.get(full_name)
    }

    /// Build the mechanism `full_name`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::UnknownModel`] if the library has no such
    /// description, or any error from building it.
    pub fn load(&self, full_name: &str) -> Result<Mechanism> {
        let desc = self
            .descriptions
            .get(full_name)
            .ok_or_else(|| LibraryError::UnknownModel(full_name.to_string()))?;
        self.loader.build(desc)
    }
}
