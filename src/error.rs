//! Error taxonomy.
//!
//! - `RemoteError`:  what a `RemoteStore` reports (transport level).
//! - `ArchiveError`: what an `ArchiveCodec` reports.
//! - `VaultError`:   what the core operations return to the caller.
//!
//! Only `VaultError::Auth` is fatal; everything else aborts a single operation
//! and carries enough detail for one diagnostic line.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// Namespace or object does not exist.
    #[error("remote path not found: {0}")]
    NotFound(String),

    /// Credentials rejected / access denied.
    #[error("remote access denied: {0}")]
    Auth(String),

    #[error("remote i/o on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive i/o: {0}")]
    Io(#[from] io::Error),

    #[error("archive format: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Member name that is not a plain file name (directories, `..`, absolute paths).
    #[error("unsafe archive member name '{0}'")]
    UnsafeMember(String),
}

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("remote store authorization failed: {0}")]
    Auth(String),

    #[error("no files to back up for world '{world}' in {}", .dir.display())]
    NoFiles { world: String, dir: PathBuf },

    #[error("malformed snapshot name '{name}': {reason}")]
    MalformedName { name: String, reason: &'static str },

    #[error("archive failed for {target}: {source}")]
    Archive {
        target: String,
        #[source]
        source: ArchiveError,
    },

    #[error("upload of {name} failed: {source}")]
    Upload {
        name: String,
        #[source]
        source: RemoteError,
    },

    #[error("download of {path} failed: {source}")]
    Download {
        path: String,
        #[source]
        source: RemoteError,
    },

    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(#[source] RemoteError),

    #[error("local file operation on {} failed: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl VaultError {
    /// Fatal errors terminate the process; the rest are reported per operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VaultError::Auth(_))
    }

    pub(crate) fn malformed(name: &str, reason: &'static str) -> Self {
        VaultError::MalformedName {
            name: name.to_string(),
            reason,
        }
    }

    pub(crate) fn local(path: impl Into<PathBuf>, source: io::Error) -> Self {
        VaultError::LocalIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(target: impl Into<String>, source: impl Into<ArchiveError>) -> Self {
        VaultError::Archive {
            target: target.into(),
            source: source.into(),
        }
    }

    /// Upload failure; an auth rejection stays fatal.
    pub(crate) fn upload(name: &str, source: RemoteError) -> Self {
        match source {
            RemoteError::Auth(msg) => VaultError::Auth(msg),
            other => VaultError::Upload {
                name: name.to_string(),
                source: other,
            },
        }
    }

    /// Download failure; an auth rejection stays fatal.
    pub(crate) fn download(path: &str, source: RemoteError) -> Self {
        match source {
            RemoteError::Auth(msg) => VaultError::Auth(msg),
            other => VaultError::Download {
                path: path.to_string(),
                source: other,
            },
        }
    }

    /// Listing / namespace failure; an auth rejection stays fatal.
    pub(crate) fn remote(source: RemoteError) -> Self {
        match source {
            RemoteError::Auth(msg) => VaultError::Auth(msg),
            other => VaultError::RemoteUnavailable(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_is_the_only_fatal_kind() {
        assert!(VaultError::Auth("token".into()).is_fatal());
        assert!(!VaultError::NoFiles {
            world: "ghost".into(),
            dir: PathBuf::from("/saves"),
        }
        .is_fatal());
        assert!(!VaultError::malformed("x", "missing prefix").is_fatal());
    }

    #[test]
    fn remote_auth_maps_to_fatal() {
        let e = VaultError::upload("valheim_a.zip", RemoteError::Auth("denied".into()));
        assert!(e.is_fatal());
        let e = VaultError::download("/ns/x", RemoteError::NotFound("/ns/x".into()));
        assert!(matches!(e, VaultError::Download { .. }));
        let e = VaultError::remote(RemoteError::Auth("denied".into()));
        assert!(e.is_fatal());
    }

    #[test]
    fn messages_fit_one_line() {
        let e = VaultError::NoFiles {
            world: "ghost".into(),
            dir: PathBuf::from("/saves"),
        };
        let s = e.to_string();
        assert!(s.contains("ghost"));
        assert!(!s.contains('\n'));
    }
}
