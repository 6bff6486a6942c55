use anyhow::{Context, Result};

use worldvault::{DirStore, SnapshotManager, VaultConfig, ZipCodec};

use super::util::print_catalog;

pub fn exec(cfg: &VaultConfig, json: bool) -> Result<()> {
    let store = DirStore::connect(cfg).context("connect remote store")?;
    let codec = ZipCodec::new();
    let catalog = SnapshotManager::new(cfg, &store, &codec)
        .list_backups()
        .context("list backups")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }
    if catalog.is_empty() {
        println!("(no backups in {})", cfg.namespace);
        return Ok(());
    }
    print_catalog(&mut std::io::stdout().lock(), &catalog)?;
    Ok(())
}
