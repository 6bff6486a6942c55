//! remote: object storage capability used for persisting snapshots.
//!
//! Состав:
//! - RemoteStore: trait (ensure_namespace / list / put / get), paths are
//!   "/<namespace>/<object name>" strings.
//! - DirStore: filesystem-backed store (mounted or synced folder).
//! - MemoryStore: in-process store with fault injection.
//!
//! Contract:
//! - `list` of a namespace that does not exist returns `RemoteError::NotFound`;
//!   callers treat that as "no objects".
//! - `put` must not leave a partially written object under the final name.
//! - Access/credential failures surface as `RemoteError::Auth`.

use std::io::{Read, Write};

use serde::Serialize;

use crate::error::RemoteError;

pub mod dir;
pub mod memory;

pub use dir::DirStore;
pub use memory::MemoryStore;

/// One listed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntry {
    /// Object name (last path component).
    pub name: String,
    /// Namespace-qualified path, usable with `get`.
    pub path: String,
    pub size: u64,
}

pub trait RemoteStore {
    /// Create the namespace if it does not exist yet.
    fn ensure_namespace(&self, namespace: &str) -> Result<(), RemoteError>;

    /// Objects directly under `namespace`.
    fn list(&self, namespace: &str) -> Result<Vec<RemoteEntry>, RemoteError>;

    /// Store the whole stream under `path`; returns the number of bytes stored.
    fn put(&self, path: &str, src: &mut dyn Read) -> Result<u64, RemoteError>;

    /// Stream the object at `path` into `dst`; returns the number of bytes read.
    fn get(&self, path: &str, dst: &mut dyn Write) -> Result<u64, RemoteError>;
}

/// "/ns/valheim_x.zip" -> ("/ns", "valheim_x.zip")
pub(crate) fn split_object_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_paths() {
        assert_eq!(split_object_path("/ns/a.zip"), ("/ns", "a.zip"));
        assert_eq!(split_object_path("/a.zip"), ("", "a.zip"));
        assert_eq!(split_object_path("a.zip"), ("", "a.zip"));
    }
}
