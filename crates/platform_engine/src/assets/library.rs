//! Mesh library with cache-or-load semantics
//!
//! Keyed by name: the first import caches the mesh, later requests reuse the
//! shared handle. Multiple scene nodes may hold the same `Arc<Mesh>`.

use super::{obj_loader, AssetError, Mesh};
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Named cache of shared mesh resources
#[derive(Debug, Default)]
pub struct MeshLibrary {
    cache: HashMap<String, Arc<Mesh>>,
}

impl MeshLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedurally built mesh under a name
    ///
    /// Replaces any mesh previously cached under the same name and returns
    /// the shared handle.
    pub fn insert(&mut self, name: impl Into<String>, mesh: Mesh) -> Arc<Mesh> {
        let name = name.into();
        let handle = Arc::new(mesh);
        self.cache.insert(name, Arc::clone(&handle));
        handle
    }

    /// Look up a cached mesh by name
    ///
    /// Missing names are an error; callers treat model lookup as fail-fast
    /// during level setup.
    pub fn get(&self, name: &str) -> Result<Arc<Mesh>, AssetError> {
        self.cache
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::MeshNotFound(name.to_string()))
    }

    /// Fetch a mesh by name, importing it from an OBJ file on a cache miss
    ///
    /// If the name is already cached the file is not touched. Import failure
    /// is unrecoverable for the caller and nothing is cached.
    pub fn import_or_get<P: AsRef<Path>>(
        &mut self,
        name: &str,
        path: P,
    ) -> Result<Arc<Mesh>, AssetError> {
        if let Some(mesh) = self.cache.get(name) {
            return Ok(Arc::clone(mesh));
        }
        debug!("importing mesh '{}' from {:?}", name, path.as_ref());
        let mesh = obj_loader::load_obj(path)?;
        Ok(self.insert(name.to_string(), mesh))
    }

    /// Whether a mesh is cached under the given name
    pub fn contains(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Number of cached meshes
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
