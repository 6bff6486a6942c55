//! ZipCodec: deflated zip archives (the format of existing remote snapshots).

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{is_plain_member_name, ArchiveCodec, ArchiveMember};
use crate::error::ArchiveError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipCodec;

impl ZipCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveCodec for ZipCodec {
    fn pack(&self, members: &[ArchiveMember], dest: &mut File) -> Result<(), ArchiveError> {
        dest.set_len(0)?;
        dest.seek(SeekFrom::Start(0))?;
        {
            let mut zw = ZipWriter::new(&mut *dest);
            for m in members {
                let mut src = File::open(&m.source)?;
                let len = src.metadata()?.len();
                let options = FileOptions::default()
                    .compression_method(CompressionMethod::Deflated)
                    .large_file(len >= u32::MAX as u64);
                zw.start_file(m.name.as_str(), options)?;
                io::copy(&mut src, &mut zw)?;
                debug!("archive: packed {} ({} B)", m.name, len);
            }
            zw.finish()?;
        }
        dest.flush()?;
        Ok(())
    }

    fn list_members(&self, src: &mut File) -> Result<Vec<String>, ArchiveError> {
        src.seek(SeekFrom::Start(0))?;
        let mut za = ZipArchive::new(&mut *src)?;
        let mut names = Vec::with_capacity(za.len());
        for i in 0..za.len() {
            let entry = za.by_index(i)?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    fn unpack(&self, src: &mut File) -> Result<BTreeMap<String, Vec<u8>>, ArchiveError> {
        src.seek(SeekFrom::Start(0))?;
        let mut za = ZipArchive::new(&mut *src)?;
        let mut out = BTreeMap::new();
        for i in 0..za.len() {
            let mut entry = za.by_index(i)?;
            let mut buf = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut buf)?;
            out.insert(entry.name().to_string(), buf);
        }
        Ok(out)
    }

    /// Streams each member straight to disk (world .db files can be large).
    fn unpack_into(&self, src: &mut File, target: &Path) -> Result<Vec<String>, ArchiveError> {
        src.seek(SeekFrom::Start(0))?;
        let mut za = ZipArchive::new(&mut *src)?;
        let mut written = Vec::with_capacity(za.len());
        for i in 0..za.len() {
            let mut entry = za.by_index(i)?;
            let name = entry.name().to_string();
            if !is_plain_member_name(&name) {
                return Err(ArchiveError::UnsafeMember(name));
            }
            let mut out = File::create(target.join(&name))?;
            io::copy(&mut entry, &mut out)?;
            out.flush()?;
            written.push(name);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_ID: AtomicU64 = AtomicU64::new(1);

    fn unique_root(prefix: &str) -> PathBuf {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let p = std::env::temp_dir().join(format!(
            "wvtest-zip-{prefix}-{}-{id}",
            std::process::id()
        ));
        fs::create_dir_all(&p).unwrap();
        p
    }

    #[test]
    fn pack_list_unpack() {
        let root = unique_root("plu");
        fs::write(root.join("Meadow.fwl"), b"meta").unwrap();
        fs::write(root.join("Meadow.db"), vec![7u8; 10_000]).unwrap();

        let members = vec![
            ArchiveMember::new("Meadow.fwl", root.join("Meadow.fwl")),
            ArchiveMember::new("Meadow.db", root.join("Meadow.db")),
        ];
        let mut f = tempfile::tempfile().unwrap();
        let codec = ZipCodec::new();
        codec.pack(&members, &mut f).unwrap();

        assert_eq!(codec.list_members(&mut f).unwrap(), ["Meadow.fwl", "Meadow.db"]);

        let map = codec.unpack(&mut f).unwrap();
        assert_eq!(map["Meadow.fwl"], b"meta");
        assert_eq!(map["Meadow.db"].len(), 10_000);

        let out = unique_root("plu-out");
        let written = codec.unpack_into(&mut f, &out).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(fs::read(out.join("Meadow.fwl")).unwrap(), b"meta");
    }

    #[test]
    fn garbage_is_a_format_error() {
        let mut f = tempfile::tempfile().unwrap();
        f.write_all(b"definitely not a zip").unwrap();
        let err = ZipCodec::new().list_members(&mut f).unwrap_err();
        assert!(matches!(err, ArchiveError::Zip(_)));
    }

    #[test]
    fn missing_source_is_io_error() {
        let root = unique_root("miss");
        let mut f = tempfile::tempfile().unwrap();
        let err = ZipCodec::new()
            .pack(&[ArchiveMember::new("x.fwl", root.join("x.fwl"))], &mut f)
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }
}
