// Базовые модули
pub mod consts;
pub mod error;
pub mod config;
pub mod metrics;
pub mod util;

// Локальная сторона: миры, scratch-файлы, архивы
pub mod worlds;
pub mod scratch;
pub mod archive; // src/archive/{mod,zip_codec}.rs

// Удалённое хранилище
pub mod remote; // src/remote/{mod,dir,memory}.rs

// Имена снапшотов и операции над ними
pub mod naming;
pub mod manager;
pub mod restore;

// Удобные реэкспорты
pub use archive::{ArchiveCodec, ArchiveMember, ZipCodec};
pub use config::VaultConfig;
pub use error::{ArchiveError, RemoteError, VaultError};
pub use manager::{BackupCatalog, BackupResult, Snapshot, SnapshotManager};
pub use naming::{CreatedAt, SnapshotCodec, SnapshotId};
pub use remote::{DirStore, MemoryStore, RemoteEntry, RemoteStore};
pub use restore::{RestoreEngine, RestoreResult};
pub use worlds::{WorldFiles, WorldRegistry};
