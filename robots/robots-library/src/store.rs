//! Geometry stores: where mechanism meshes come from.
//!
//! A store maps a fully qualified model name (`Kind.Manufacturer.model`) to
//! an ordered list of meshes. Mesh 0 is the base; mesh `i + 1` belongs to
//! joint `i`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use robots_geometry::TriangleMesh;
use tracing::{debug, warn};

use crate::error::{LibraryError, Result};
use crate::parser::parse_manifest_str;
use crate::stl::load_stl;

/// Source of mechanism geometry.
pub trait GeometryStore: fmt::Debug + Send + Sync {
    /// The meshes of `full_name`, base first.
    ///
    /// The returned meshes are owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::AssetNotFound`] if the store has no entry
    /// for the model, or another error if the geometry cannot be read.
    fn meshes(&self, full_name: &str) -> Result<Vec<TriangleMesh>>;

    /// Check if the store has an entry for `full_name`.
    fn contains(&self, full_name: &str) -> bool;
}

impl<S: GeometryStore + ?Sized> GeometryStore for Box<S> {
    fn meshes(&self, full_name: &str) -> Result<Vec<TriangleMesh>> {
        (**self).meshes(full_name)
    }

    fn contains(&self, full_name: &str) -> bool {
        (**self).contains(full_name)
    }
}

/// Geometry read from STL files listed in a folder manifest.
#[derive(Debug, Clone)]
pub struct FolderStore {
    root: PathBuf,
    models: HashMap<String, Vec<String>>,
}

impl FolderStore {
    /// Open the folder `root` and read its manifest file `manifest_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn open(root: impl Into<PathBuf>, manifest_name: &str) -> Result<Self> {
        let root = root.into();
        let manifest = root.join(manifest_name);
        debug!(path = %manifest.display(), "reading geometry manifest");
        let models = parse_manifest_str(&fs::read_to_string(&manifest)?)?;
        Ok(Self { root, models })
    }

    /// The folder mesh paths are relative to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Model names listed in the manifest.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

impl GeometryStore for FolderStore {
    fn meshes(&self, full_name: &str) -> Result<Vec<TriangleMesh>> {
        let files = self
            .models
            .get(full_name)
            .ok_or_else(|| LibraryError::asset_not_found(full_name))?;

        files
            .iter()
            .map(|file| {
                let path = self.root.join(file);
                debug!(model = full_name, path = %path.display(), "reading mesh");
                load_stl(&path)
            })
            .collect()
    }

    fn contains(&self, full_name: &str) -> bool {
        self.models.contains_key(full_name)
    }
}

/// Geometry held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    models: HashMap<String, Vec<TriangleMesh>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the meshes of a model.
    pub fn insert(&mut self, full_name: impl Into<String>, meshes: Vec<TriangleMesh>) {
        self.models.insert(full_name.into(), meshes);
    }

    /// Add a model, builder style.
    #[must_use]
    pub fn with_model(mut self, full_name: impl Into<String>, meshes: Vec<TriangleMesh>) -> Self {
        self.insert(full_name, meshes);
        self
    }

    /// Number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if the store holds no models.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl GeometryStore for MemoryStore {
    fn meshes(&self, full_name: &str) -> Result<Vec<TriangleMesh>> {
        self.models
            .get(full_name)
            .cloned()
            .ok_or_else(|| LibraryError::asset_not_found(full_name))
    }

    fn contains(&self, full_name: &str) -> bool {
        self.models.contains_key(full_name)
    }
}

/// Lazily populated, thread-safe cache in front of another store.
///
/// A model is read from the inner store the first time it is requested and
/// served from memory afterwards. Failures are not cached, so a model whose
/// files are fixed on disk loads on the next request.
#[derive(Debug)]
pub struct CachedStore<S> {
    inner: S,
    cache: RwLock<HashMap<String, Arc<[TriangleMesh]>>>,
    failed: RwLock<HashSet<String>>,
}

impl<S: GeometryStore> CachedStore<S> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            failed: RwLock::new(HashSet::new()),
        }
    }

    /// The wrapped store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Check if `full_name` is already cached.
    pub fn is_cached(&self, full_name: &str) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(full_name)
    }

    /// Number of cached models.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached model.
    pub fn clear(&self) {
        self.cache.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.failed.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl<S: GeometryStore> GeometryStore for CachedStore<S> {
    fn meshes(&self, full_name: &str) -> Result<Vec<TriangleMesh>> {
        if let Some(meshes) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(full_name)
        {
            debug!(model = full_name, "geometry cache hit");
            return Ok(meshes.to_vec());
        }

        if self
            .failed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(full_name)
        {
            warn!(model = full_name, "retrying geometry that failed to load before");
        }

        match self.inner.meshes(full_name) {
            Ok(meshes) => {
                let shared: Arc<[TriangleMesh]> = meshes.into();
                let result = shared.to_vec();
                self.failed
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(full_name);
                self.cache
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(full_name.to_string(), shared);
                Ok(result)
            }
            Err(e) => {
                self.failed
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(full_name.to_string());
                Err(e)
            }
        }
    }

    fn contains(&self, full_name: &str) -> bool {
        self.is_cached(full_name) || self.inner.contains(full_name)
    }
}
