//! Centralized configuration for worldvault.
//!
//! Everything that used to be a process-wide constant (saves path, remote
//! namespace, store location) lives here and is handed to `SnapshotManager` /
//! `RestoreEngine` at construction.
//!
//! Sources, in increasing priority:
//! - defaults (home-relative paths, namespace `/Valheim_Worlds`);
//! - ENV: WV_SAVES_DIR, WV_REMOTE_DIR, WV_NAMESPACE, WV_WORK_DIR;
//! - fluent `with_*` setters (the CLI maps its flags onto them).

use std::fmt;
use std::path::PathBuf;

use crate::consts::{DEFAULT_NAMESPACE, DEFAULT_REMOTE_SUBDIR, DEFAULT_SAVES_SUBDIR};

#[derive(Clone, Debug)]
pub struct VaultConfig {
    /// Directory holding the world files (discovery, backup source, restore target).
    /// Env: WV_SAVES_DIR
    pub saves_dir: PathBuf,

    /// Root of the filesystem-backed remote store.
    /// Env: WV_REMOTE_DIR
    pub remote_dir: PathBuf,

    /// Remote namespace (folder) for snapshot objects, e.g. "/Valheim_Worlds".
    /// Env: WV_NAMESPACE
    pub namespace: String,

    /// Where scratch archives are created. None -> system temp dir.
    /// Env: WV_WORK_DIR
    pub work_dir: Option<PathBuf>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            saves_dir: home.join(DEFAULT_SAVES_SUBDIR),
            remote_dir: home.join(DEFAULT_REMOTE_SUBDIR),
            namespace: DEFAULT_NAMESPACE.to_string(),
            work_dir: None,
        }
    }
}

impl VaultConfig {
    /// Defaults overridden by environment variables (empty values are ignored).
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(v) = env_nonempty("WV_SAVES_DIR") {
            cfg.saves_dir = PathBuf::from(v);
        }
        if let Some(v) = env_nonempty("WV_REMOTE_DIR") {
            cfg.remote_dir = PathBuf::from(v);
        }
        if let Some(v) = env_nonempty("WV_NAMESPACE") {
            cfg.namespace = normalize_namespace(&v);
        }
        if let Some(v) = env_nonempty("WV_WORK_DIR") {
            cfg.work_dir = Some(PathBuf::from(v));
        }

        cfg
    }

    pub fn with_saves_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.saves_dir = dir.into();
        self
    }

    pub fn with_remote_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.remote_dir = dir.into();
        self
    }

    pub fn with_namespace<S: AsRef<str>>(mut self, ns: S) -> Self {
        self.namespace = normalize_namespace(ns.as_ref());
        self
    }

    pub fn with_work_dir<P: Into<PathBuf>>(mut self, dir: Option<P>) -> Self {
        self.work_dir = dir.map(Into::into);
        self
    }

    /// Finish the builder chain.
    pub fn build(self) -> Self {
        self
    }

    /// Effective scratch directory.
    pub fn scratch_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Remote path of an object inside the namespace.
    pub fn object_path(&self, name: &str) -> String {
        format!("{}/{}", self.namespace.trim_end_matches('/'), name)
    }
}

impl fmt::Display for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VaultConfig {{ saves_dir: {}, remote_dir: {}, namespace: {}, work_dir: {} }}",
            self.saves_dir.display(),
            self.remote_dir.display(),
            self.namespace,
            self.work_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "default(temp)".to_string()),
        )
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// "Valheim_Worlds/" -> "/Valheim_Worlds"
fn normalize_namespace(ns: &str) -> String {
    let trimmed = ns.trim().trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_normalization() {
        assert_eq!(normalize_namespace("Valheim_Worlds"), "/Valheim_Worlds");
        assert_eq!(normalize_namespace("/Valheim_Worlds/"), "/Valheim_Worlds");
        assert_eq!(normalize_namespace(" /a/b "), "/a/b");
    }

    #[test]
    fn builder_overrides() {
        let cfg = VaultConfig::default()
            .with_saves_dir("/saves")
            .with_remote_dir("/remote")
            .with_namespace("backups")
            .with_work_dir(Some("/scratch"))
            .build();
        assert_eq!(cfg.saves_dir, PathBuf::from("/saves"));
        assert_eq!(cfg.namespace, "/backups");
        assert_eq!(cfg.scratch_dir(), PathBuf::from("/scratch"));
        assert_eq!(cfg.object_path("valheim_a.zip"), "/backups/valheim_a.zip");
    }

    #[test]
    fn default_namespace_and_temp_scratch() {
        let cfg = VaultConfig::default();
        assert_eq!(cfg.namespace, DEFAULT_NAMESPACE);
        assert_eq!(cfg.scratch_dir(), std::env::temp_dir());
        assert!(cfg.to_string().contains("default(temp)"));
    }
}
