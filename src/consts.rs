//! Fixed names shared by the registry, the codec and the CLI.

/// Prefix of every snapshot object name in the remote namespace.
pub const OBJECT_PREFIX: &str = "valheim_";

/// Suffix of every snapshot object name (the archive format).
pub const OBJECT_SUFFIX: &str = ".zip";

/// Delimiter between the world name and the timestamp tokens.
pub const NAME_DELIMITER: char = '_';

/// Number of delimiter-separated tokens a timestamp contributes to a flat name.
pub const TIMESTAMP_TOKENS: usize = 5;

/// chrono layout of `CreatedAt`: date, hour, minute, second, millisecond.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d_%H_%M_%S_%3f";

/// Primary world metadata file extension.
pub const WORLD_META_EXT: &str = ".fwl";

/// Canonical world files, in archive order: meta, meta backup, data, data backup.
pub const WORLD_FILE_SUFFIXES: [&str; 4] = [".fwl", ".fwl.old", ".db", ".db.old"];

/// Suffix appended to local files displaced by a restore.
pub const ROLLBACK_SUFFIX: &str = ".bak";

/// Default remote namespace (folder) for snapshots.
pub const DEFAULT_NAMESPACE: &str = "/Valheim_Worlds";

/// Saves location relative to the user's home directory.
pub const DEFAULT_SAVES_SUBDIR: &str = "AppData/LocalLow/IronGate/Valheim/worlds_local";

/// Default root of the filesystem-backed remote store, relative to home.
pub const DEFAULT_REMOTE_SUBDIR: &str = ".worldvault/remote";

/// Prefix of scratch archives created in the work directory.
pub const SCRATCH_PREFIX: &str = "worldvault-";
