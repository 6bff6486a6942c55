//! SnapshotManager: create-backup and list-backups.
//!
//! Backup:
//!   locate world files -> pack into a scratch archive -> put under
//!   <namespace>/<flat name>. Nothing is uploaded unless packing succeeded;
//!   the scratch archive is gone on every exit path.
//!
//! Listing:
//!   list the namespace, keep names of snapshot shape, decode, group by world.
//!   Foreign or undecodable objects are skipped, never fatal.

use std::collections::BTreeMap;
use std::io;

use log::{debug, info, warn};
use serde::Serialize;

use crate::archive::{ArchiveCodec, ArchiveMember};
use crate::config::VaultConfig;
use crate::error::VaultError;
use crate::metrics::{record_backup_created, record_backup_failed, record_listing_skip};
use crate::naming::{CreatedAt, SnapshotCodec};
use crate::remote::{RemoteEntry, RemoteStore};
use crate::scratch::ScratchArchive;
use crate::util::sha256_hex_reader;
use crate::worlds::WorldRegistry;

/// Size and digest of a packed archive; leaves it rewound for upload.
fn measure(scratch: &mut ScratchArchive) -> io::Result<(u64, String)> {
    scratch.rewind()?;
    let digest = sha256_hex_reader(scratch.file_mut())?;
    scratch.rewind()?;
    Ok((scratch.len()?, digest))
}

/// A snapshot object found in the remote namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Flat object name.
    pub name: String,
    pub world_name: String,
    pub created_at: CreatedAt,
    /// Namespace-qualified path (input of `RemoteStore::get`).
    pub remote_path: String,
    pub size_bytes: u64,
}

/// world_name -> snapshots in listing order.
pub type BackupCatalog = BTreeMap<String, Vec<Snapshot>>;

#[derive(Debug, Clone, Serialize)]
pub struct BackupResult {
    pub world: String,
    pub name: String,
    pub remote_path: String,
    /// Member names packed into the archive (canonical order).
    pub members: Vec<String>,
    /// Canonical files that did not exist and were skipped.
    pub missing: Vec<String>,
    pub size_bytes: u64,
    pub sha256: String,
}

pub struct SnapshotManager<'a> {
    cfg: &'a VaultConfig,
    store: &'a dyn RemoteStore,
    archive: &'a dyn ArchiveCodec,
    registry: WorldRegistry,
    codec: SnapshotCodec,
}

impl<'a> SnapshotManager<'a> {
    pub fn new(
        cfg: &'a VaultConfig,
        store: &'a dyn RemoteStore,
        archive: &'a dyn ArchiveCodec,
    ) -> Self {
        Self {
            cfg,
            store,
            archive,
            registry: WorldRegistry::new(),
            codec: SnapshotCodec::new(),
        }
    }

    pub fn codec(&self) -> &SnapshotCodec {
        &self.codec
    }

    /// Back up `world_name` with the current local time.
    pub fn create_backup(&self, world_name: &str) -> Result<BackupResult, VaultError> {
        self.create_backup_at(world_name, &CreatedAt::now())
    }

    /// Back up `world_name` stamped with an explicit `created_at`.
    pub fn create_backup_at(
        &self,
        world_name: &str,
        created_at: &CreatedAt,
    ) -> Result<BackupResult, VaultError> {
        let res = self.backup_inner(world_name, created_at);
        match &res {
            Ok(r) => record_backup_created(r.size_bytes),
            Err(e) => {
                record_backup_failed();
                warn!("backup: world='{}' failed: {}", world_name, e);
            }
        }
        res
    }

    fn backup_inner(
        &self,
        world_name: &str,
        created_at: &CreatedAt,
    ) -> Result<BackupResult, VaultError> {
        let saves = &self.cfg.saves_dir;
        info!("backup: start world='{}', saves={}", world_name, saves.display());

        let files = self.registry.locate(saves, world_name);
        for name in &files.missing {
            warn!("backup: {} not found, skipping", name);
        }
        if files.present.is_empty() {
            return Err(VaultError::NoFiles {
                world: world_name.to_string(),
                dir: saves.clone(),
            });
        }

        let name = self.codec.encode(world_name, created_at)?;
        let remote_path = self.cfg.object_path(&name);

        let members: Vec<ArchiveMember> = files
            .present
            .iter()
            .map(|(file_name, path)| ArchiveMember::new(file_name.clone(), path.clone()))
            .collect();

        // Scratch живёт до конца функции: удаляется и при успехе, и на любом `?`.
        let mut scratch = ScratchArchive::create(&self.cfg.scratch_dir(), "backup")
            .map_err(|e| VaultError::archive(name.as_str(), e))?;
        self.archive
            .pack(&members, scratch.file_mut())
            .map_err(|e| VaultError::archive(name.as_str(), e))?;

        let (size_bytes, sha256) =
            measure(&mut scratch).map_err(|e| VaultError::archive(name.as_str(), e))?;
        for m in &members {
            debug!("backup: + {}", m.name);
        }

        info!(
            "backup: uploading {} ({} B) to {}",
            name, size_bytes, remote_path
        );
        let uploaded = self
            .store
            .put(&remote_path, scratch.file_mut())
            .map_err(|e| VaultError::upload(&name, e))?;

        info!(
            "backup: done world='{}', name={}, members={}, bytes={}",
            world_name,
            name,
            members.len(),
            uploaded
        );

        Ok(BackupResult {
            world: world_name.to_string(),
            name,
            remote_path,
            members: members.into_iter().map(|m| m.name).collect(),
            missing: files.missing,
            size_bytes,
            sha256,
        })
    }

    /// All snapshots in the namespace grouped by world.
    /// A missing namespace is an empty catalog.
    pub fn list_backups(&self) -> Result<BackupCatalog, VaultError> {
        let ns = &self.cfg.namespace;
        let entries = match self.store.list(ns) {
            Ok(v) => v,
            Err(e) if e.is_not_found() => {
                info!("list: namespace {} not found, no backups", ns);
                return Ok(BackupCatalog::new());
            }
            Err(e) => return Err(VaultError::remote(e)),
        };

        let total = entries.len();
        let mut catalog = BackupCatalog::new();
        for entry in entries {
            if let Some(snap) = self.decode_entry(entry) {
                catalog
                    .entry(snap.world_name.clone())
                    .or_default()
                    .push(snap);
            }
        }
        debug!(
            "list: {} object(s) in {}, {} world(s)",
            total,
            ns,
            catalog.len()
        );
        Ok(catalog)
    }

    /// Look a snapshot up by its flat name.
    pub fn find_backup(&self, name: &str) -> Result<Option<Snapshot>, VaultError> {
        let id = self.codec.decode(name)?;
        let catalog = self.list_backups()?;
        Ok(catalog
            .get(&id.world_name)
            .and_then(|group| group.iter().find(|s| s.name == name).cloned()))
    }

    fn decode_entry(&self, entry: RemoteEntry) -> Option<Snapshot> {
        if !self.codec.matches_shape(&entry.name) {
            debug!("list: foreign object {} ignored", entry.name);
            return None;
        }
        match self.codec.decode(&entry.name) {
            Ok(id) => Some(Snapshot {
                name: entry.name,
                world_name: id.world_name,
                created_at: id.created_at,
                remote_path: entry.path,
                size_bytes: entry.size,
            }),
            Err(e) => {
                record_listing_skip();
                debug!("list: skip {}: {}", entry.name, e);
                None
            }
        }
    }
}
