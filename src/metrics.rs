//! Lightweight global metrics for worldvault.
//!
//! Потокобезопасные атомарные счётчики:
//! - Backups (created / failed / bytes uploaded)
//! - Restores (completed / members written / files moved to .bak)
//! - Listing (objects skipped as undecodable)

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// ----- Backup -----
static BACKUPS_CREATED: AtomicU64 = AtomicU64::new(0);
static BACKUPS_FAILED: AtomicU64 = AtomicU64::new(0);
static BACKUP_BYTES_UPLOADED: AtomicU64 = AtomicU64::new(0);

// ----- Restore -----
static RESTORES_COMPLETED: AtomicU64 = AtomicU64::new(0);
static RESTORES_FAILED: AtomicU64 = AtomicU64::new(0);
static RESTORE_MEMBERS_WRITTEN: AtomicU64 = AtomicU64::new(0);
static RESTORE_FILES_ROLLED_BACK: AtomicU64 = AtomicU64::new(0);

// ----- Listing -----
static LISTING_OBJECTS_SKIPPED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub backups_created: u64,
    pub backups_failed: u64,
    pub backup_bytes_uploaded: u64,

    pub restores_completed: u64,
    pub restores_failed: u64,
    pub restore_members_written: u64,
    pub restore_files_rolled_back: u64,

    pub listing_objects_skipped: u64,
}

impl MetricsSnapshot {
    pub fn avg_backup_bytes(&self) -> f64 {
        if self.backups_created == 0 {
            0.0
        } else {
            self.backup_bytes_uploaded as f64 / self.backups_created as f64
        }
    }
}

// ----- Recorders -----
pub fn record_backup_created(bytes: u64) {
    BACKUPS_CREATED.fetch_add(1, Ordering::Relaxed);
    BACKUP_BYTES_UPLOADED.fetch_add(bytes, Ordering::Relaxed);
}

pub fn record_backup_failed() {
    BACKUPS_FAILED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_restore_completed(members: usize) {
    RESTORES_COMPLETED.fetch_add(1, Ordering::Relaxed);
    RESTORE_MEMBERS_WRITTEN.fetch_add(members as u64, Ordering::Relaxed);
}

pub fn record_restore_failed() {
    RESTORES_FAILED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_rollback_rename() {
    RESTORE_FILES_ROLLED_BACK.fetch_add(1, Ordering::Relaxed);
}

pub fn record_listing_skip() {
    LISTING_OBJECTS_SKIPPED.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        backups_created: BACKUPS_CREATED.load(Ordering::Relaxed),
        backups_failed: BACKUPS_FAILED.load(Ordering::Relaxed),
        backup_bytes_uploaded: BACKUP_BYTES_UPLOADED.load(Ordering::Relaxed),

        restores_completed: RESTORES_COMPLETED.load(Ordering::Relaxed),
        restores_failed: RESTORES_FAILED.load(Ordering::Relaxed),
        restore_members_written: RESTORE_MEMBERS_WRITTEN.load(Ordering::Relaxed),
        restore_files_rolled_back: RESTORE_FILES_ROLLED_BACK.load(Ordering::Relaxed),

        listing_objects_skipped: LISTING_OBJECTS_SKIPPED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    BACKUPS_CREATED.store(0, Ordering::Relaxed);
    BACKUPS_FAILED.store(0, Ordering::Relaxed);
    BACKUP_BYTES_UPLOADED.store(0, Ordering::Relaxed);

    RESTORES_COMPLETED.store(0, Ordering::Relaxed);
    RESTORES_FAILED.store(0, Ordering::Relaxed);
    RESTORE_MEMBERS_WRITTEN.store(0, Ordering::Relaxed);
    RESTORE_FILES_ROLLED_BACK.store(0, Ordering::Relaxed);

    LISTING_OBJECTS_SKIPPED.store(0, Ordering::Relaxed);
}
