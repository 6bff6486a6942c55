use anyhow::{Context, Result};

use worldvault::{DirStore, SnapshotManager, VaultConfig, ZipCodec};

/// CLI `backup`: запаковать файлы мира и загрузить архив в namespace.
///
/// Пример:
///   worldvault backup --world Meadow
pub fn exec(cfg: &VaultConfig, world: &str, json: bool) -> Result<()> {
    let store = DirStore::connect(cfg).context("connect remote store")?;
    let codec = ZipCodec::new();
    let manager = SnapshotManager::new(cfg, &store, &codec);

    let res = manager
        .create_backup(world)
        .with_context(|| format!("backup world '{}'", world))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&res)?);
        return Ok(());
    }
    for name in &res.missing {
        println!("- skipped (not found): {}", name);
    }
    for name in &res.members {
        println!("- added: {}", name);
    }
    println!(
        "backup: OK (name={}, size={} B, sha256={})",
        res.name, res.size_bytes, res.sha256
    );
    Ok(())
}
