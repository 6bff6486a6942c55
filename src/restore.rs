//! RestoreEngine: restore a snapshot into the saves directory.
//!
//! Порядок:
//! 1) get -> scratch archive (scratch удаляется на любом выходе);
//! 2) список членов архива без распаковки, проверка имён;
//! 3) каждый существующий одноимённый файл -> <name>.bak (старый .bak перезаписывается);
//! 4) распаковка, только после шага 3 для ВСЕХ членов.
//!
//! Члены с суффиксом .bak отклоняются на шаге 2. Если переименование на шаге 3
//! не удалось, уже сделанные переименования откатываются.
//!
//! Known gap: if extraction fails after step 3, the `.bak` renames stay in
//! place (the originals are recoverable by hand, nothing is rolled back).
//! Files that are not archive members are never touched.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::archive::{is_plain_member_name, ArchiveCodec};
use crate::config::VaultConfig;
use crate::consts::ROLLBACK_SUFFIX;
use crate::error::{ArchiveError, VaultError};
use crate::manager::Snapshot;
use crate::metrics::{record_restore_completed, record_restore_failed, record_rollback_rename};
use crate::remote::RemoteStore;
use crate::scratch::ScratchArchive;

#[derive(Debug, Clone, Serialize)]
pub struct RestoreResult {
    pub name: String,
    pub world_name: String,
    /// Members written into the saves directory.
    pub restored: Vec<String>,
    /// `.bak` files created from previously existing members.
    pub backed_up: Vec<String>,
    pub bytes_downloaded: u64,
}

pub struct RestoreEngine<'a> {
    cfg: &'a VaultConfig,
    store: &'a dyn RemoteStore,
    archive: &'a dyn ArchiveCodec,
}

impl<'a> RestoreEngine<'a> {
    pub fn new(
        cfg: &'a VaultConfig,
        store: &'a dyn RemoteStore,
        archive: &'a dyn ArchiveCodec,
    ) -> Self {
        Self {
            cfg,
            store,
            archive,
        }
    }

    pub fn restore(&self, snap: &Snapshot) -> Result<RestoreResult, VaultError> {
        let res = self.restore_inner(snap);
        match &res {
            Ok(r) => record_restore_completed(r.restored.len()),
            Err(e) => {
                record_restore_failed();
                warn!("restore: {} failed: {}", snap.name, e);
            }
        }
        res
    }

    fn restore_inner(&self, snap: &Snapshot) -> Result<RestoreResult, VaultError> {
        let target = &self.cfg.saves_dir;
        info!(
            "restore: start name={}, from={}, target={}",
            snap.name,
            snap.remote_path,
            target.display()
        );

        let scratch_dir = self.cfg.scratch_dir();
        let mut scratch = ScratchArchive::create(&scratch_dir, "restore")
            .map_err(|e| VaultError::local(scratch_dir, e))?;

        let bytes_downloaded = self
            .store
            .get(&snap.remote_path, scratch.file_mut())
            .map_err(|e| VaultError::download(&snap.remote_path, e))?;

        let members = self
            .archive
            .list_members(scratch.file_mut())
            .map_err(|e| VaultError::archive(snap.name.as_str(), e))?;
        if let Some(bad) = members.iter().find(|m| !is_restorable_member(m)) {
            return Err(VaultError::archive(
                snap.name.as_str(),
                ArchiveError::UnsafeMember(bad.clone()),
            ));
        }

        fs::create_dir_all(target).map_err(|e| VaultError::local(target.clone(), e))?;

        let backed_up = protect_existing(target, &members)?;

        let restored = self
            .archive
            .unpack_into(scratch.file_mut(), target)
            .map_err(|e| {
                if !backed_up.is_empty() {
                    warn!(
                        "restore: extraction aborted, {} original file(s) left as {}: {}",
                        backed_up.len(),
                        ROLLBACK_SUFFIX,
                        backed_up.join(", ")
                    );
                }
                VaultError::archive(snap.name.as_str(), e)
            })?;

        for name in &restored {
            info!("restore: restored {}", name);
        }
        info!(
            "restore: done name={}, members={}, backups={}, bytes={}",
            snap.name,
            restored.len(),
            backed_up.len(),
            bytes_downloaded
        );

        Ok(RestoreResult {
            name: snap.name.clone(),
            world_name: snap.world_name.clone(),
            restored,
            backed_up,
            bytes_downloaded,
        })
    }
}

/// A member may be extracted: plain file name, and not itself a `.bak` name
/// (extracting it would overwrite the copy made by `protect_existing`).
fn is_restorable_member(name: &str) -> bool {
    is_plain_member_name(name) && !name.ends_with(ROLLBACK_SUFFIX)
}

/// Rename every existing `<target>/<member>` to `<member>.bak` before extraction.
/// Returns the `.bak` names created, in member order.
///
/// All or nothing: if one rename fails, the renames already done are reverted
/// before the error is returned.
fn protect_existing(target: &Path, members: &[String]) -> Result<Vec<String>, VaultError> {
    let mut seen = BTreeSet::new();
    let mut moved: Vec<(String, String)> = Vec::new();
    for name in members {
        if !seen.insert(name.as_str()) {
            continue;
        }
        let current = target.join(name);
        if fs::symlink_metadata(&current).is_err() {
            continue;
        }
        let bak_name = format!("{name}{ROLLBACK_SUFFIX}");
        // fs::rename заменяет существующий .bak-файл на всех платформах
        if let Err(e) = fs::rename(&current, target.join(&bak_name)) {
            undo_renames(target, &moved);
            return Err(VaultError::local(current, e));
        }
        record_rollback_rename();
        info!("restore: {} -> {}", name, bak_name);
        moved.push((name.clone(), bak_name));
    }
    Ok(moved.into_iter().map(|(_, bak)| bak).collect())
}

/// Best effort: move `.bak` files back; whatever cannot be moved is reported.
fn undo_renames(target: &Path, moved: &[(String, String)]) {
    for (name, bak_name) in moved.iter().rev() {
        match fs::rename(target.join(bak_name), target.join(name)) {
            Ok(()) => info!("restore: reverted {} -> {}", bak_name, name),
            Err(e) => warn!(
                "restore: could not revert {} -> {}, original left as {}: {}",
                bak_name, name, bak_name, e
            ),
        }
    }
}
