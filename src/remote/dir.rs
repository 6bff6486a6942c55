//! DirStore: remote store rooted at a local directory.
//!
//! Layout: <root>/<namespace>/<object name>. The root is typically a mounted
//! share or a folder kept in sync by an external client.
//!
//! Запись объекта: <name>.part + fsync + rename, так что под финальным
//! именем никогда не виден недописанный архив.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use super::{split_object_path, RemoteEntry, RemoteStore};
use crate::config::VaultConfig;
use crate::error::{RemoteError, VaultError};

const PART_EXT: &str = "part";

pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open the store, creating the root directory when needed.
    /// An inaccessible root is reported as `RemoteError::Auth`.
    pub fn open_or_create(root: &Path) -> Result<Self, RemoteError> {
        fs::create_dir_all(root).map_err(|e| map_io(&root.display().to_string(), e))?;
        // Пробное чтение: права на корень проверяем сразу, а не на первой операции.
        fs::read_dir(root).map_err(|e| map_io(&root.display().to_string(), e))?;
        debug!("remote: dir store at {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Open `cfg.remote_dir` and make sure `cfg.namespace` exists.
    pub fn connect(cfg: &VaultConfig) -> Result<Self, VaultError> {
        let store = Self::open_or_create(&cfg.remote_dir).map_err(VaultError::remote)?;
        store
            .ensure_namespace(&cfg.namespace)
            .map_err(VaultError::remote)?;
        info!(
            "remote: connected root={}, namespace={}",
            cfg.remote_dir.display(),
            cfg.namespace
        );
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map "/ns/name" to <root>/ns/name; rejects `..` and prefix components.
    fn resolve(&self, remote_path: &str) -> Result<PathBuf, RemoteError> {
        let rel = Path::new(remote_path.trim_start_matches('/'));
        let mut out = self.root.clone();
        for comp in rel.components() {
            match comp {
                Component::Normal(c) => out.push(c),
                Component::CurDir => {}
                _ => {
                    return Err(RemoteError::Io {
                        path: remote_path.to_string(),
                        source: io::Error::new(io::ErrorKind::InvalidInput, "path escapes store root"),
                    })
                }
            }
        }
        Ok(out)
    }
}

impl RemoteStore for DirStore {
    fn ensure_namespace(&self, namespace: &str) -> Result<(), RemoteError> {
        let dir = self.resolve(namespace)?;
        if dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&dir).map_err(|e| map_io(namespace, e))?;
        info!("remote: created namespace {}", namespace);
        Ok(())
    }

    fn list(&self, namespace: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        let dir = self.resolve(namespace)?;
        let rd = fs::read_dir(&dir).map_err(|e| map_io(namespace, e))?;
        let ns = namespace.trim_end_matches('/');

        let mut out = Vec::new();
        for entry in rd {
            let entry = entry.map_err(|e| map_io(namespace, e))?;
            let meta = entry.metadata().map_err(|e| map_io(namespace, e))?;
            if !meta.is_file() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(s) => s,
                Err(_) => continue,
            };
            if Path::new(&name).extension().and_then(|e| e.to_str()) == Some(PART_EXT) {
                continue;
            }
            out.push(RemoteEntry {
                path: format!("{ns}/{name}"),
                name,
                size: meta.len(),
            });
        }
        // read_dir порядок не гарантирует
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn put(&self, path: &str, src: &mut dyn Read) -> Result<u64, RemoteError> {
        let (ns, name) = split_object_path(path);
        let ns_dir = self.resolve(ns)?;
        if !ns_dir.is_dir() {
            return Err(RemoteError::NotFound(ns.to_string()));
        }
        let dst = self.resolve(path)?;
        let tmp = ns_dir.join(format!("{name}.{PART_EXT}"));

        let written = write_part(&tmp, src);

        let n = match written {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&tmp);
                return Err(map_io(path, e));
            }
        };
        if let Err(e) = fs::rename(&tmp, &dst) {
            let _ = fs::remove_file(&tmp);
            return Err(map_io(path, e));
        }
        debug!("remote: put {} ({} B)", path, n);
        Ok(n)
    }

    fn get(&self, path: &str, dst: &mut dyn Write) -> Result<u64, RemoteError> {
        let src = self.resolve(path)?;
        let mut f = File::open(&src).map_err(|e| map_io(path, e))?;
        let n = io::copy(&mut f, dst).map_err(|e| map_io(path, e))?;
        debug!("remote: get {} ({} B)", path, n);
        Ok(n)
    }
}

fn write_part(tmp: &Path, src: &mut dyn Read) -> io::Result<u64> {
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(tmp)?;
    let n = io::copy(src, &mut f)?;
    f.flush()?;
    f.sync_all()?;
    Ok(n)
}

fn map_io(path: &str, e: io::Error) -> RemoteError {
    match e.kind() {
        io::ErrorKind::NotFound => RemoteError::NotFound(path.to_string()),
        io::ErrorKind::PermissionDenied => RemoteError::Auth(format!("{path}: {e}")),
        _ => RemoteError::Io {
            path: path.to_string(),
            source: e,
        },
    }
}
