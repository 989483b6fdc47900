//! Library folder configuration.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a [`Library`](crate::Library) finds its descriptions and geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LibraryConfig {
    /// Folder holding description files, the geometry manifest and meshes.
    pub library_path: PathBuf,
    /// File name of the geometry manifest inside the folder.
    pub manifest_name: String,
    /// Extension of description files (without the dot).
    pub description_extension: String,
    /// Keep geometry in memory after the first load.
    pub cache_geometry: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from("Robots"),
            manifest_name: "manifest.xml".to_string(),
            description_extension: "xml".to_string(),
            cache_geometry: true,
        }
    }
}

impl LibraryConfig {
    /// Default settings for the folder at `library_path`.
    #[must_use]
    pub fn new(library_path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: library_path.into(),
            ..Self::default()
        }
    }

    /// Set the manifest file name.
    #[must_use]
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    /// Set the description file extension.
    #[must_use]
    pub fn with_description_extension(mut self, extension: impl Into<String>) -> Self {
        self.description_extension = extension.into();
        self
    }

    /// Enable or disable the geometry cache.
    #[must_use]
    pub fn with_cache_geometry(mut self, cache: bool) -> Self {
        self.cache_geometry = cache;
        self
    }
}
