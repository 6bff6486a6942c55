use anyhow::{anyhow, Context, Result};
use std::io;

use worldvault::{DirStore, RestoreEngine, SnapshotManager, VaultConfig, ZipCodec};

use super::util::{confirm, parse_selection, pick};

/// CLI `restore`: скачать снапшот и распаковать его в saves_dir.
///
/// Примеры:
///   worldvault restore --select 1.2
///   worldvault restore --name valheim_Meadow_2024-05-01_18_42_07_123.zip --yes
///
/// Каждый существующий одноимённый файл сначала переименовывается в <name>.bak.
pub fn exec(
    cfg: &VaultConfig,
    select: Option<String>,
    name: Option<String>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let store = DirStore::connect(cfg).context("connect remote store")?;
    let codec = ZipCodec::new();
    let manager = SnapshotManager::new(cfg, &store, &codec);

    let snap = match (select, name) {
        (Some(sel), _) => {
            let catalog = manager.list_backups().context("list backups")?;
            pick(&catalog, parse_selection(&sel)?)?.clone()
        }
        (None, Some(name)) => manager
            .find_backup(&name)
            .with_context(|| format!("look up {}", name))?
            .ok_or_else(|| anyhow!("backup '{}' not found in {}", name, cfg.namespace))?,
        (None, None) => anyhow::bail!("provide --select <i.j> or --name <backup name>"),
    };

    if !yes {
        let prompt = format!(
            "Restore world '{}' from backup {}?",
            snap.world_name,
            snap.created_at.display()
        );
        // Вопрос идёт в stderr: stdout остаётся только для результата.
        let ok = confirm(&mut io::stdin().lock(), &mut io::stderr(), &prompt)?;
        if !ok {
            println!("restore: cancelled");
            return Ok(());
        }
    }

    let res = RestoreEngine::new(cfg, &store, &codec)
        .restore(&snap)
        .with_context(|| format!("restore {}", snap.name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&res)?);
        return Ok(());
    }
    for bak in &res.backed_up {
        println!("- saved previous file as {}", bak);
    }
    for m in &res.restored {
        println!("- restored: {}", m);
    }
    println!(
        "restore: OK (name={}, world='{}', target={})",
        res.name,
        res.world_name,
        cfg.saves_dir.display()
    );
    Ok(())
}
