//! Sidecar index for multi-file archives.
//!
//! The index lives next to the archive at `<archive>.meta` and is a JSON list
//! of `{"name": ..., "size": ...}` objects, one per frame, in frame order.
//! `size` is the compressed payload size and is the only way to find where a
//! frame ends.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::IndexCorruption;
use crate::path::with_appended_suffix;
use crate::{Error, Result};

pub const INDEX_SUFFIX: &str = ".meta";

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Base file name, as stored in the frame.
    pub name: String,

    /// The exact length of the compressed payload.
    #[serde(rename = "size")]
    pub compressed_size: u64,

    /// Length of the content when decompressed. Absent in indexes written by
    /// older tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
}

impl ArchiveEntry {
    pub fn new(name: String, compressed_size: u64) -> ArchiveEntry {
        ArchiveEntry {
            name,
            compressed_size,
            original_size: None,
        }
    }
}

#[inline(always)]
pub fn index_path<P: AsRef<Path>>(archive: P) -> PathBuf {
    with_appended_suffix(archive, INDEX_SUFFIX)
}

/// Persist `entries` to the index of `archive`, flushing before returning.
pub fn save<P: AsRef<Path>>(archive: P, entries: &[ArchiveEntry]) -> Result<PathBuf> {
    let path = index_path(archive);

    let file = File::create(&path).map_err(Error::io(&path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, entries).map_err(|e| Error::Io {
        path: path.clone(),
        source: e.into(),
    })?;
    writer.flush().map_err(Error::io(&path))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(Error::io(&path))?;

    tracing::debug!(path = %path.display(), count = entries.len(), "saved index");
    Ok(path)
}

/// Load the index of `archive`.
pub fn load<P: AsRef<Path>>(archive: P) -> Result<Vec<ArchiveEntry>> {
    let path = index_path(archive);

    let file = match File::open(&path) {
        Ok(v) => v,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::IndexMissing { path })
        }
        Err(e) => return Err(Error::Io { path, source: e }),
    };

    let entries: Vec<ArchiveEntry> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::IndexCorrupt {
            path: path.clone(),
            source: IndexCorruption::Parse(e),
        })?;

    tracing::debug!(path = %path.display(), count = entries.len(), "loaded index");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn index_path_appends_suffix() {
        assert_eq!(index_path("pack.lzma"), PathBuf::from("pack.lzma.meta"));
    }

    #[test]
    fn reads_index_without_original_size() {
        let entries: Vec<ArchiveEntry> =
            serde_json::from_str(r#"[{"name": "a.txt", "size": 60}, {"name": "b.bin", "size": 64}]"#)
                .unwrap();
        assert_eq!(
            entries,
            vec![
                ArchiveEntry::new("a.txt".into(), 60),
                ArchiveEntry::new("b.bin".into(), 64)
            ]
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pack.lzma");
        let entries = vec![
            ArchiveEntry {
                name: "a.txt".into(),
                compressed_size: 60,
                original_size: Some(3),
            },
            ArchiveEntry::new("b.bin".into(), 64),
        ];

        let path = save(&archive, &entries).unwrap();
        assert_eq!(path, dir.path().join("pack.lzma.meta"));

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains(r#""size":60"#));
        assert_eq!(load(&archive).unwrap(), entries);
    }

    #[test]
    fn missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("nothing.lzma")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexMissing);
    }

    #[test]
    fn unparsable_index() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pack.lzma");
        std::fs::write(index_path(&archive), "{not json").unwrap();

        let err = load(&archive).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexCorrupt);
    }
}
