use std::fs::File;
use std::io::{BufReader, Chain, Cursor, Read};
use std::path::{Path, PathBuf};

use super::writer::{ensure_source_file, same_file};
use crate::{
    compression,
    error::IndexCorruption,
    frame::{self, NameWidth},
    header::{self, Mode, Preamble},
    index::{self, ArchiveEntry},
    options::{DecompressOptions, Derivation, OutputPath},
    path::output_path,
    Error, Result,
};

/// Archive bytes positioned at the first frame. Bytes consumed while probing
/// an untagged archive for its preamble are replayed from the cursor.
type FrameStream = Chain<Cursor<Vec<u8>>, BufReader<File>>;

/// Contents of a single-file archive.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SingleEntry {
    /// Original file name recorded in the archive. Bare `.xz` streams carry
    /// no name.
    pub name: Option<String>,
    pub data: Vec<u8>,
}

/// A multi-file archive opened through its index.
#[derive(Debug)]
pub struct ArchiveReader {
    path: PathBuf,
    entries: Vec<ArchiveEntry>,
}

impl ArchiveReader {
    /// Open the archive at `path`. Fails if the archive or its index is missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ArchiveReader> {
        let path = path.as_ref().to_path_buf();
        ensure_source_file(&path)?;
        let entries = index::load(&path)?;

        Ok(ArchiveReader { path, entries })
    }

    /// Entries in archive order, as recorded by the index.
    #[inline(always)]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Decompress every entry into memory, in archive order.
    pub fn read_all(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut out = Vec::with_capacity(self.entries.len());
        self.for_each_entry(|entry, data| {
            out.push((entry.name.clone(), data));
            Ok(())
        })?;
        Ok(out)
    }

    /// Extract every entry into `dest`, creating it if needed. Existing files
    /// are overwritten. Any failure aborts the extraction; files written for
    /// earlier entries stay on disk.
    pub fn extract_all<P: AsRef<Path>>(&self, dest: P) -> Result<Vec<PathBuf>> {
        let dest = dest.as_ref();

        // An entry sharing the archive's name must not clobber it mid-read.
        let own_paths = [self.path.clone(), index::index_path(&self.path)];
        for entry in self.entries.iter() {
            let out = output_path(dest, &entry.name)?;
            if own_paths.iter().any(|x| same_file(x, &out)) {
                return Err(Error::OutputIsInput { path: out });
            }
        }

        std::fs::create_dir_all(dest).map_err(Error::io(dest))?;

        let mut paths = Vec::with_capacity(self.entries.len());
        self.for_each_entry(|entry, data| {
            let out = output_path(dest, &entry.name)?;
            if out.exists() {
                tracing::warn!(path = %out.display(), "overwriting existing file");
            }

            std::fs::write(&out, &data).map_err(Error::io(&out))?;
            tracing::debug!(path = %out.display(), bytes = data.len(), "extracted");
            paths.push(out);
            Ok(())
        })?;

        tracing::info!(
            archive = %self.path.display(),
            dest = %dest.display(),
            count = paths.len(),
            "extracted archive"
        );
        Ok(paths)
    }

    /// Walk the frames in index order, cross-checking each against the index
    /// before handing its decompressed contents to `f`.
    fn for_each_entry<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&ArchiveEntry, Vec<u8>) -> Result<()>,
    {
        let (mut stream, _) = open_stream(&self.path, Mode::Multi)?;

        for (position, entry) in self.entries.iter().enumerate() {
            let frame = frame::read_frame_at(&mut stream, NameWidth::U16, entry.compressed_size)
                .map_err(|e| e.at_path(&self.path))?;

            if frame.name != entry.name {
                return Err(self.corrupt(IndexCorruption::NameMismatch {
                    position,
                    expected: entry.name.clone(),
                    found: frame.name,
                }));
            }

            // Reject unsafe names before spending time on decompression.
            output_path("", &entry.name)?;

            let data = compression::decompress(&frame.payload)?;
            if let Some(expected) = entry.original_size {
                if data.len() as u64 != expected {
                    return Err(self.corrupt(IndexCorruption::SizeMismatch {
                        name: entry.name.clone(),
                        expected,
                        found: data.len() as u64,
                    }));
                }
            }

            f(entry, data)?;
        }

        let trailing = std::io::copy(&mut stream, &mut std::io::sink())
            .map_err(Error::io(&self.path))?;
        if trailing > 0 {
            return Err(self.corrupt(IndexCorruption::TrailingData { bytes: trailing }));
        }

        Ok(())
    }

    fn corrupt(&self, source: IndexCorruption) -> Error {
        Error::IndexCorrupt {
            path: index::index_path(&self.path),
            source,
        }
    }
}

/// Entries of the multi-file archive at `archive`, in archive order.
pub fn list<P: AsRef<Path>>(archive: P) -> Result<Vec<ArchiveEntry>> {
    index::load(archive)
}

/// Extract every entry of the multi-file archive at `archive` into `dest`.
pub fn extract_all<P: AsRef<Path>, Q: AsRef<Path>>(archive: P, dest: Q) -> Result<Vec<PathBuf>> {
    ArchiveReader::open(archive)?.extract_all(dest)
}

/// Read and decompress a single-file archive.
///
/// An untagged file that is nothing but an `.xz` stream is accepted as well;
/// its entry has no name.
pub fn read_single<P: AsRef<Path>>(archive: P) -> Result<SingleEntry> {
    let archive = archive.as_ref();
    let (mut stream, tagged) = open_stream(archive, Mode::Single)?;

    let mut bytes = vec![];
    stream.read_to_end(&mut bytes).map_err(Error::io(archive))?;

    if !tagged && bytes.starts_with(compression::XZ_MAGIC) {
        tracing::debug!(path = %archive.display(), "bare xz stream");
        return Ok(SingleEntry {
            name: None,
            data: compression::decompress(&bytes)?,
        });
    }

    let frame = frame::read_frame(&mut bytes.as_slice(), NameWidth::U32)
        .map_err(|e| e.at_path(archive))?;
    let data = compression::decompress(&frame.payload)?;

    Ok(SingleEntry {
        name: Some(frame.name),
        data,
    })
}

/// Extract a single-file archive. Returns the path written.
///
/// A derived output path never resolves to the archive itself; if the
/// embedded name would, the suffix-stripping rule is used instead.
pub fn extract_one<P: AsRef<Path>>(archive: P, options: &DecompressOptions) -> Result<PathBuf> {
    let archive = archive.as_ref();
    let entry = read_single(archive)?;

    let output = match &options.output {
        OutputPath::Explicit(path) => {
            if same_file(path, archive) {
                return Err(Error::OutputIsInput { path: path.clone() });
            }
            path.clone()
        }
        OutputPath::Derive(derivation) => {
            let path = derivation.derive(archive, entry.name.as_deref());
            if same_file(&path, archive) {
                Derivation::StripSuffix.derive(archive, None)
            } else {
                path
            }
        }
    };

    std::fs::write(&output, &entry.data).map_err(Error::io(&output))?;

    tracing::info!(
        archive = %archive.display(),
        output = %output.display(),
        name = ?entry.name,
        bytes = entry.data.len(),
        "decompressed file"
    );
    Ok(output)
}

/// Report which kind of archive `path` is, if it carries a preamble.
/// Untagged archives yield `None`; their kind is only known to the caller.
pub fn detect<P: AsRef<Path>>(path: P) -> Result<Option<Mode>> {
    let path = path.as_ref();
    ensure_source_file(path)?;

    let file = File::open(path).map_err(Error::io(path))?;
    let mut reader = BufReader::new(file);

    match header::read_header(&mut reader).map_err(Error::io(path))? {
        Preamble::Tagged(Ok(mode)) => Ok(Some(mode)),
        Preamble::Tagged(Err(mode)) => Err(Error::UnknownMode {
            path: path.to_path_buf(),
            mode,
        }),
        Preamble::Untagged(_) => Ok(None),
    }
}

/// Open `path` positioned at its first frame. The flag tells whether a
/// preamble was present.
fn open_stream(path: &Path, expected: Mode) -> Result<(FrameStream, bool)> {
    ensure_source_file(path)?;

    let file = File::open(path).map_err(Error::io(path))?;
    let mut reader = BufReader::new(file);

    let (replay, tagged) = match header::read_header(&mut reader).map_err(Error::io(path))? {
        Preamble::Tagged(Ok(mode)) if mode == expected => (vec![], true),
        Preamble::Tagged(Ok(found)) => {
            return Err(Error::ModeMismatch {
                path: path.to_path_buf(),
                expected,
                found,
            })
        }
        Preamble::Tagged(Err(mode)) => {
            return Err(Error::UnknownMode {
                path: path.to_path_buf(),
                mode,
            })
        }
        Preamble::Untagged(bytes) => {
            tracing::debug!(path = %path.display(), mode = %expected, "archive has no preamble");
            (bytes, false)
        }
    };

    Ok((Cursor::new(replay).chain(reader), tagged))
}
