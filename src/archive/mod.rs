//! archive: packing a world's files into one blob and back.
//!
//! Members are flat: the member name is the file's base name, there is no
//! directory structure. `is_plain_member_name` is the single check every
//! extraction path relies on.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::ArchiveError;

mod zip_codec;

pub use zip_codec::ZipCodec;

/// One file to pack: member name inside the archive + source path on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    pub name: String,
    pub source: PathBuf,
}

impl ArchiveMember {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(name: S, source: P) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

pub trait ArchiveCodec {
    /// Write all members into `dest` (positioned at its start).
    fn pack(&self, members: &[ArchiveMember], dest: &mut File) -> Result<(), ArchiveError>;

    /// Member names in archive order, without extracting anything.
    fn list_members(&self, src: &mut File) -> Result<Vec<String>, ArchiveError>;

    /// Whole archive in memory: member name -> content.
    fn unpack(&self, src: &mut File) -> Result<BTreeMap<String, Vec<u8>>, ArchiveError>;

    /// Extract every member into `target`, overwriting same-named files.
    /// Returns the member names written.
    fn unpack_into(&self, src: &mut File, target: &Path) -> Result<Vec<String>, ArchiveError> {
        let members = self.unpack(src)?;
        let mut written = Vec::with_capacity(members.len());
        for (name, bytes) in members {
            if !is_plain_member_name(&name) {
                return Err(ArchiveError::UnsafeMember(name));
            }
            fs::write(target.join(&name), bytes)?;
            written.push(name);
        }
        Ok(written)
    }
}

/// A member name is safe to join onto a directory if it is one normal path component.
pub fn is_plain_member_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    !name.contains('/') && !name.contains('\\') && !name.contains(':') && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_member_names() {
        assert!(is_plain_member_name("Meadow.fwl"));
        assert!(is_plain_member_name("Meadow.db.old"));
        assert!(!is_plain_member_name(""));
        assert!(!is_plain_member_name(".."));
        assert!(!is_plain_member_name("../Meadow.fwl"));
        assert!(!is_plain_member_name("worlds/Meadow.fwl"));
        assert!(!is_plain_member_name("C:\\Meadow.fwl"));
        assert!(!is_plain_member_name("/etc/passwd"));
    }
}
