use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use worldvault::{
    DirStore, RemoteStore, RestoreEngine, SnapshotManager, VaultConfig, WorldRegistry, ZipCodec,
};

use super::util::{confirm, is_fatal, parse_selection, pick, print_catalog, prompt_line};

/// CLI `menu`: интерактивный цикл (создать бэкап / восстановить / выход).
///
/// Неверный ввод сообщается и запрашивается заново; ошибка одной операции
/// печатается и цикл продолжается. Ошибка авторизации хранилища завершает цикл.
pub fn exec(cfg: &VaultConfig) -> Result<()> {
    let store = DirStore::connect(cfg).context("connect remote store")?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run_menu(cfg, &store, &mut input, &mut out)
}

pub fn run_menu(
    cfg: &VaultConfig,
    store: &dyn RemoteStore,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    loop {
        writeln!(out, "\n=== Valheim world backup ===")?;
        writeln!(out, "1. Create a world backup")?;
        writeln!(out, "2. Restore a world from backup")?;
        writeln!(out, "3. Exit")?;

        let choice = match prompt_line(input, out, "\nChoose an action: ")? {
            Some(c) => c,
            None => return Ok(()),
        };
        let res = match choice.as_str() {
            "1" => menu_create(cfg, store, input, out),
            "2" => menu_restore(cfg, store, input, out),
            "3" => {
                writeln!(out, "\nBye!")?;
                return Ok(());
            }
            _ => {
                writeln!(out, "\ninvalid choice, try again")?;
                continue;
            }
        };
        if let Err(e) = res {
            if is_fatal(&e) {
                return Err(e);
            }
            writeln!(out, "\nerror: {:#}", e)?;
        }
    }
}

fn menu_create(
    cfg: &VaultConfig,
    store: &dyn RemoteStore,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let worlds = WorldRegistry::new()
        .discover_worlds(&cfg.saves_dir)
        .with_context(|| format!("read saves dir {}", cfg.saves_dir.display()))?;
    if worlds.is_empty() {
        writeln!(out, "\nno local worlds found")?;
        writeln!(out, "check the saves directory: {}", cfg.saves_dir.display())?;
        return Ok(());
    }

    writeln!(out, "\nAvailable worlds:")?;
    for (i, w) in worlds.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, w)?;
    }
    let Some(answer) = prompt_line(input, out, "\nWorld to back up: ")? else {
        return Ok(());
    };
    let world = match answer.parse::<usize>() {
        Ok(n) if (1..=worlds.len()).contains(&n) => &worlds[n - 1],
        Ok(_) => {
            writeln!(out, "\ninvalid choice")?;
            return Ok(());
        }
        Err(_) => {
            writeln!(out, "\nenter a number")?;
            return Ok(());
        }
    };

    let codec = ZipCodec::new();
    let res = SnapshotManager::new(cfg, store, &codec)
        .create_backup(world)
        .with_context(|| format!("backup world '{}'", world))?;
    for name in &res.missing {
        writeln!(out, "- skipped (not found): {}", name)?;
    }
    for name in &res.members {
        writeln!(out, "- added: {}", name)?;
    }
    writeln!(out, "\nbackup uploaded: {}", res.name)?;
    Ok(())
}

fn menu_restore(
    cfg: &VaultConfig,
    store: &dyn RemoteStore,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let codec = ZipCodec::new();
    let catalog = SnapshotManager::new(cfg, store, &codec)
        .list_backups()
        .context("list backups")?;
    if catalog.is_empty() {
        writeln!(out, "\nno backups in {}", cfg.namespace)?;
        return Ok(());
    }

    writeln!(out, "\nAvailable backups:")?;
    print_catalog(out, &catalog)?;
    let Some(answer) = prompt_line(input, out, "\nBackup number (e.g. 1.2): ")? else {
        return Ok(());
    };
    let snap = match parse_selection(&answer).and_then(|sel| pick(&catalog, sel)) {
        Ok(s) => s,
        Err(e) => {
            writeln!(out, "\ninvalid choice: {}", e)?;
            return Ok(());
        }
    };

    let prompt = format!(
        "\nRestore world '{}' from backup {}?",
        snap.world_name,
        snap.created_at.display()
    );
    if !confirm(input, out, &prompt)? {
        return Ok(());
    }

    let res = RestoreEngine::new(cfg, store, &codec)
        .restore(snap)
        .with_context(|| format!("restore {}", snap.name))?;
    for bak in &res.backed_up {
        writeln!(out, "- saved previous file as {}", bak)?;
    }
    for m in &res.restored {
        writeln!(out, "- restored: {}", m)?;
    }
    writeln!(out, "\nworld restored")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use worldvault::MemoryStore;

    fn setup() -> (tempfile::TempDir, VaultConfig, MemoryStore) {
        let tmp = tempfile::tempdir().unwrap();
        let saves = tmp.path().join("saves");
        fs::create_dir_all(&saves).unwrap();
        fs::write(saves.join("Meadow.fwl"), b"meta-v1").unwrap();
        fs::write(saves.join("Meadow.db"), b"data-v1").unwrap();
        let cfg = VaultConfig::default()
            .with_saves_dir(&saves)
            .with_work_dir(Some(tmp.path().join("work")))
            .with_namespace("/Valheim_Worlds")
            .build();
        let store = MemoryStore::new();
        store.ensure_namespace(&cfg.namespace).unwrap();
        (tmp, cfg, store)
    }

    fn drive(cfg: &VaultConfig, store: &MemoryStore, script: &str) -> (Result<()>, String) {
        let mut out = Vec::new();
        let res = run_menu(cfg, store, &mut script.as_bytes(), &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn backup_then_restore() {
        let (_tmp, cfg, store) = setup();
        let (res, _) = drive(&cfg, &store, "1\n1\n");
        res.unwrap();
        assert_eq!(store.object_paths().len(), 1);

        fs::write(cfg.saves_dir.join("Meadow.db"), b"data-v2").unwrap();
        let (res, text) = drive(&cfg, &store, "2\n1.1\ny\n3\n");
        res.unwrap();
        assert!(text.contains("World: Meadow"));
        assert!(text.contains("world restored"));
        assert_eq!(fs::read(cfg.saves_dir.join("Meadow.db")).unwrap(), b"data-v1");
        assert_eq!(fs::read(cfg.saves_dir.join("Meadow.db.bak")).unwrap(), b"data-v2");
    }

    #[test]
    fn bad_input_is_reprompted() {
        let (_tmp, cfg, store) = setup();
        let (res, text) = drive(&cfg, &store, "x\n1\n9\n2\n7.7\n3\n");
        res.unwrap();
        assert!(text.contains("invalid choice, try again"));
        assert!(text.contains("\ninvalid choice\n"));
        assert!(text.contains("no backups in /Valheim_Worlds"));
        assert!(text.contains("Bye!"));
        assert_eq!(store.put_calls(), 0);
    }

    #[test]
    fn declined_confirmation_touches_nothing() {
        let (_tmp, cfg, store) = setup();
        drive(&cfg, &store, "1\n1\n").0.unwrap();
        let (res, _) = drive(&cfg, &store, "2\n1.1\nn\n3\n");
        res.unwrap();
        assert_eq!(store.get_calls(), 0);
        assert!(!cfg.saves_dir.join("Meadow.fwl.bak").exists());
    }

    #[test]
    fn auth_failure_ends_the_loop() {
        let (_tmp, cfg, store) = setup();
        store.deny_access(true);
        let (res, _) = drive(&cfg, &store, "2\n3\n");
        let err = res.unwrap_err();
        assert!(is_fatal(&err));
    }
}
