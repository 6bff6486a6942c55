use anyhow::{Context, Result};
use serde_json::json;

use worldvault::{VaultConfig, WorldRegistry};

pub fn exec(cfg: &VaultConfig, json: bool) -> Result<()> {
    let worlds = WorldRegistry::new()
        .discover_worlds(&cfg.saves_dir)
        .with_context(|| format!("read saves dir {}", cfg.saves_dir.display()))?;

    if json {
        let v = json!({
            "saves_dir": cfg.saves_dir.display().to_string(),
            "worlds": worlds,
        });
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    if worlds.is_empty() {
        println!("(no worlds in {})", cfg.saves_dir.display());
        return Ok(());
    }
    for (i, w) in worlds.iter().enumerate() {
        println!("{}. {}", i + 1, w);
    }
    Ok(())
}
