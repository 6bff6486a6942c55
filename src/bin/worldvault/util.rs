use anyhow::{anyhow, Result};
use std::io::{self, BufRead, Write};

use worldvault::metrics;
use worldvault::{BackupCatalog, Snapshot, VaultConfig, VaultError};

use crate::cli::GlobalArgs;

/// ENV (WV_*) + CLI flags поверх.
pub fn load_config(g: &GlobalArgs) -> VaultConfig {
    let mut cfg = VaultConfig::from_env();
    if let Some(d) = &g.saves_dir {
        cfg = cfg.with_saves_dir(d);
    }
    if let Some(d) = &g.remote_dir {
        cfg = cfg.with_remote_dir(d);
    }
    if let Some(ns) = &g.namespace {
        cfg = cfg.with_namespace(ns);
    }
    if g.work_dir.is_some() {
        cfg = cfg.with_work_dir(g.work_dir.clone());
    }
    cfg.build()
}

/// True when the error chain carries a fatal `VaultError` (store authorization).
pub fn is_fatal(e: &anyhow::Error) -> bool {
    e.chain()
        .filter_map(|c| c.downcast_ref::<VaultError>())
        .any(VaultError::is_fatal)
}

/// "1.2" -> (1, 2); both parts 1-based.
pub fn parse_selection(s: &str) -> Result<(usize, usize)> {
    let (a, b) = s
        .trim()
        .split_once('.')
        .ok_or_else(|| anyhow!("selection must look like <world>.<backup>, e.g. 1.2"))?;
    let i: usize = a.trim().parse().map_err(|_| anyhow!("invalid world index '{}'", a))?;
    let j: usize = b.trim().parse().map_err(|_| anyhow!("invalid backup index '{}'", b))?;
    if i == 0 || j == 0 {
        return Err(anyhow!("indices start at 1"));
    }
    Ok((i, j))
}

/// Resolve a 1-based (world, backup) pair in catalog order.
pub fn pick(catalog: &BackupCatalog, (i, j): (usize, usize)) -> Result<&Snapshot> {
    let (world, group) = catalog
        .iter()
        .nth(i - 1)
        .ok_or_else(|| anyhow!("no world #{} (have {})", i, catalog.len()))?;
    group
        .get(j - 1)
        .ok_or_else(|| anyhow!("no backup #{}.{} for world '{}'", i, j, world))
}

/// Grouped listing:
///   World: <name>
///     i.j | <date> | <size> bytes
pub fn print_catalog(out: &mut dyn Write, catalog: &BackupCatalog) -> io::Result<()> {
    for (i, (world, group)) in catalog.iter().enumerate() {
        writeln!(out, "\nWorld: {}", world)?;
        for (j, s) in group.iter().enumerate() {
            writeln!(
                out,
                "  {}.{} | {} | {} bytes",
                i + 1,
                j + 1,
                s.created_at.display(),
                s.size_bytes
            )?;
        }
    }
    Ok(())
}

pub fn prompt_line(input: &mut dyn BufRead, out: &mut dyn Write, prompt: &str) -> io::Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

/// y/n; anything but "y"/"yes" (any case) is a no.
pub fn confirm(input: &mut dyn BufRead, out: &mut dyn Write, prompt: &str) -> io::Result<bool> {
    let answer = prompt_line(input, out, &format!("{} (y/n): ", prompt))?;
    Ok(matches!(
        answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("y") | Some("yes")
    ))
}

pub fn print_metrics() {
    let m = metrics::snapshot();
    println!("metrics:");
    println!("  backups_created           = {}", m.backups_created);
    println!("  backups_failed            = {}", m.backups_failed);
    println!("  backup_bytes_uploaded     = {}", m.backup_bytes_uploaded);
    println!("  avg_backup_bytes          = {:.1}", m.avg_backup_bytes());
    println!("  restores_completed        = {}", m.restores_completed);
    println!("  restores_failed           = {}", m.restores_failed);
    println!("  restore_members_written   = {}", m.restore_members_written);
    println!("  restore_files_rolled_back = {}", m.restore_files_rolled_back);
    println!("  listing_objects_skipped   = {}", m.listing_objects_skipped);
}
