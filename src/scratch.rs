//! Scratch archives: temporary local files for packing and downloading.
//!
//! A `ScratchArchive` is created in the configured work directory and deleted
//! when dropped, so every exit path of backup/restore (success, `?`, panic
//! unwinding) releases it. Callers never remove scratch files by hand.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use log::debug;
use tempfile::{Builder, NamedTempFile};

use crate::consts::SCRATCH_PREFIX;

pub struct ScratchArchive {
    file: NamedTempFile,
}

impl ScratchArchive {
    /// Create an empty scratch file `<dir>/worldvault-<label>-XXXX.zip`.
    pub fn create(dir: &Path, label: &str) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let file = Builder::new()
            .prefix(&format!("{SCRATCH_PREFIX}{label}-"))
            .suffix(".zip")
            .tempfile_in(dir)?;
        debug!("scratch: acquired {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn file_mut(&mut self) -> &mut File {
        self.file.as_file_mut()
    }

    /// Rewind to the start (after writing, before reading back).
    pub fn rewind(&mut self) -> io::Result<()> {
        self.file.as_file_mut().seek(SeekFrom::Start(0))?;
        Ok(())
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.as_file().metadata()?.len())
    }
}

impl Drop for ScratchArchive {
    fn drop(&mut self) {
        // Сам файл удаляет NamedTempFile.
        debug!("scratch: released {}", self.file.path().display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn removed_on_drop() {
        let dir = std::env::temp_dir().join(format!("wvtest-scratch-{}", std::process::id()));
        let path = {
            let mut s = ScratchArchive::create(&dir, "t").unwrap();
            s.file_mut().write_all(b"abc").unwrap();
            assert_eq!(s.len().unwrap(), 3);
            assert!(s.path().exists());
            let name = s.path().file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("worldvault-t-"));
            s.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
