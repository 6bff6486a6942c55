//! MemoryStore: in-process RemoteStore.
//!
//! Keeps objects in a BTreeMap keyed by full path. Counters and failure
//! switches let callers observe and provoke transport behaviour.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Read, Write};
use std::sync::{Mutex, MutexGuard};

use super::{split_object_path, RemoteEntry, RemoteStore};
use crate::error::RemoteError;

#[derive(Default)]
struct Inner {
    namespaces: BTreeSet<String>,
    objects: BTreeMap<String, Vec<u8>>,
    put_calls: u64,
    get_calls: u64,
    fail_puts: bool,
    fail_gets: bool,
    deny: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Place an object directly (namespace is created implicitly).
    pub fn insert(&self, path: &str, bytes: Vec<u8>) {
        let mut g = self.lock();
        let (ns, _) = split_object_path(path);
        g.namespaces.insert(ns.to_string());
        g.objects.insert(path.to_string(), bytes);
    }

    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(path).cloned()
    }

    pub fn object_paths(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    pub fn put_calls(&self) -> u64 {
        self.lock().put_calls
    }

    pub fn get_calls(&self) -> u64 {
        self.lock().get_calls
    }

    /// Make every following `put` fail with an i/o error.
    pub fn fail_puts(&self, on: bool) {
        self.lock().fail_puts = on;
    }

    /// Make every following `get` fail with an i/o error.
    pub fn fail_gets(&self, on: bool) {
        self.lock().fail_gets = on;
    }

    /// Reject all operations as unauthorized.
    pub fn deny_access(&self, on: bool) {
        self.lock().deny = on;
    }
}

fn ns_key(namespace: &str) -> String {
    namespace.trim_end_matches('/').to_string()
}

fn denied(path: &str) -> RemoteError {
    RemoteError::Auth(format!("{path}: access token rejected"))
}

fn injected(path: &str) -> RemoteError {
    RemoteError::Io {
        path: path.to_string(),
        source: io::Error::new(io::ErrorKind::ConnectionReset, "injected transport failure"),
    }
}

impl RemoteStore for MemoryStore {
    fn ensure_namespace(&self, namespace: &str) -> Result<(), RemoteError> {
        let mut g = self.lock();
        if g.deny {
            return Err(denied(namespace));
        }
        g.namespaces.insert(ns_key(namespace));
        Ok(())
    }

    fn list(&self, namespace: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        let g = self.lock();
        if g.deny {
            return Err(denied(namespace));
        }
        let ns = ns_key(namespace);
        if !g.namespaces.contains(&ns) {
            return Err(RemoteError::NotFound(namespace.to_string()));
        }
        let out = g
            .objects
            .iter()
            .filter(|(path, _)| split_object_path(path).0 == ns)
            .map(|(path, bytes)| RemoteEntry {
                name: split_object_path(path).1.to_string(),
                path: path.clone(),
                size: bytes.len() as u64,
            })
            .collect();
        Ok(out)
    }

    fn put(&self, path: &str, src: &mut dyn Read) -> Result<u64, RemoteError> {
        let mut g = self.lock();
        g.put_calls += 1;
        if g.deny {
            return Err(denied(path));
        }
        if g.fail_puts {
            return Err(injected(path));
        }
        let (ns, _) = split_object_path(path);
        if !g.namespaces.contains(ns) {
            return Err(RemoteError::NotFound(ns.to_string()));
        }
        let mut buf = Vec::new();
        src.read_to_end(&mut buf).map_err(|e| RemoteError::Io {
            path: path.to_string(),
            source: e,
        })?;
        let n = buf.len() as u64;
        g.objects.insert(path.to_string(), buf);
        Ok(n)
    }

    fn get(&self, path: &str, dst: &mut dyn Write) -> Result<u64, RemoteError> {
        let mut g = self.lock();
        g.get_calls += 1;
        if g.deny {
            return Err(denied(path));
        }
        if g.fail_gets {
            return Err(injected(path));
        }
        let bytes = g
            .objects
            .get(path)
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))?;
        dst.write_all(bytes).map_err(|e| RemoteError::Io {
            path: path.to_string(),
            source: e,
        })?;
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_lifecycle() {
        let s = MemoryStore::new();
        assert!(s.list("/ns").unwrap_err().is_not_found());
        s.ensure_namespace("/ns/").unwrap();
        assert!(s.list("/ns").unwrap().is_empty());
    }

    #[test]
    fn listing_is_scoped_to_namespace() {
        let s = MemoryStore::new();
        s.insert("/ns/a.zip", vec![1, 2, 3]);
        s.insert("/other/b.zip", vec![4]);
        let entries = s.list("/ns").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.zip");
        assert_eq!(entries[0].size, 3);
    }

    #[test]
    fn failure_switches() {
        let s = MemoryStore::new();
        s.ensure_namespace("/ns").unwrap();
        s.fail_puts(true);
        assert!(matches!(
            s.put("/ns/a.zip", &mut &b"x"[..]),
            Err(RemoteError::Io { .. })
        ));
        assert_eq!(s.put_calls(), 1);
        assert!(s.object("/ns/a.zip").is_none());

        s.deny_access(true);
        assert!(matches!(s.list("/ns"), Err(RemoteError::Auth(_))));
    }
}
