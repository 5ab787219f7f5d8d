//! Asset loading and caching
//!
//! The engine keeps mesh resources behind shared handles (`Arc<Mesh>`) so a
//! single imported model can back any number of scene nodes. The
//! [`MeshLibrary`] provides cache-or-load semantics keyed by name: import
//! failure is fatal to the caller, never silently retried.

mod library;
mod mesh;
pub mod obj_loader;

pub use library::MeshLibrary;
pub use mesh::Mesh;

use thiserror::Error;

/// Asset system errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// Lookup of a name that was never registered or imported
    #[error("mesh '{0}' is not in the library")]
    MeshNotFound(String),

    /// A mesh was built with no triangles
    #[error("mesh '{0}' has no geometry")]
    EmptyMesh(String),

    /// A triangle index referenced a vertex that does not exist
    #[error("mesh '{name}' has index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Name of the offending mesh
        name: String,
        /// The out-of-range index value
        index: u32,
        /// Number of vertices actually present
        vertex_count: usize,
    },

    /// OBJ import failed
    #[error("failed to import '{path}': {source}")]
    ImportFailed {
        /// Path that was being imported
        path: String,
        /// Underlying loader error
        #[source]
        source: obj_loader::ObjError,
    },
}
