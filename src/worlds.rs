//! World discovery in the local saves directory.
//!
//! A world `<name>` is backed by up to four files:
//!   <name>.fwl, <name>.fwl.old, <name>.db, <name>.db.old
//! Discovery keys on the primary metadata file (`.fwl`) only.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::consts::{WORLD_FILE_SUFFIXES, WORLD_META_EXT};

/// Presence split of a world's canonical files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldFiles {
    /// Existing files: (file name, full path), canonical order.
    pub present: Vec<(String, PathBuf)>,
    /// File names that do not exist.
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorldRegistry;

impl WorldRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Sorted, distinct world names found in `dir`. Missing directory -> empty.
    pub fn discover_worlds(&self, dir: &Path) -> io::Result<Vec<String>> {
        let rd = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("worlds: saves dir {} not found", dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut worlds = Vec::new();
        for entry in rd {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(s) => s,
                Err(_) => continue, // не-UTF8 имена пропускаем
            };
            if let Some(world) = world_of_meta_file(&name) {
                worlds.push(world.to_string());
            }
        }
        worlds.sort();
        worlds.dedup();

        debug!("worlds: {} world(s) in {}", worlds.len(), dir.display());
        Ok(worlds)
    }

    /// The four canonical file names; presence is not checked.
    pub fn files_for_world(&self, world_name: &str) -> [String; 4] {
        WORLD_FILE_SUFFIXES.map(|sfx| format!("{world_name}{sfx}"))
    }

    pub fn locate(&self, dir: &Path, world_name: &str) -> WorldFiles {
        let mut out = WorldFiles::default();
        for name in self.files_for_world(world_name) {
            let path = dir.join(&name);
            if path.is_file() {
                out.present.push((name, path));
            } else {
                out.missing.push(name);
            }
        }
        out
    }
}

/// `Meadow.fwl` -> `Meadow`; `Meadow.fwl.old` and bare `.fwl` -> None.
fn world_of_meta_file(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(WORLD_META_EXT)
        .filter(|stem| !stem.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_file_matching() {
        assert_eq!(world_of_meta_file("Meadow.fwl"), Some("Meadow"));
        assert_eq!(world_of_meta_file("Meadow_Two.fwl"), Some("Meadow_Two"));
        assert_eq!(world_of_meta_file("Meadow.fwl.old"), None);
        assert_eq!(world_of_meta_file("Meadow.db"), None);
        assert_eq!(world_of_meta_file(".fwl"), None);
    }

    #[test]
    fn canonical_files_order() {
        let files = WorldRegistry::new().files_for_world("Meadow");
        assert_eq!(
            files,
            [
                "Meadow.fwl".to_string(),
                "Meadow.fwl.old".to_string(),
                "Meadow.db".to_string(),
                "Meadow.db.old".to_string(),
            ]
        );
    }
}
