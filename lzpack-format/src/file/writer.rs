use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{
    compression,
    frame::{self, NameWidth},
    header::{self, Mode},
    index::{self, ArchiveEntry},
    options::{CompressOptions, OutputPath},
    path::entry_name,
    Error, Result,
};

/// A finished multi-file archive together with its index.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ArchiveHandle {
    pub path: PathBuf,
    pub index_path: PathBuf,
    pub entries: Vec<ArchiveEntry>,
}

/// Writes a multi-file archive frame by frame, then its index.
///
/// The index is only written by [`ArchiveWriter::finish`]. A writer dropped
/// early, or one that failed halfway, leaves a truncated archive with no
/// index behind; nothing is rolled back.
#[derive(Debug)]
pub struct ArchiveWriter {
    file: BufWriter<File>,
    path: PathBuf,
    entries: Vec<ArchiveEntry>,
    names: HashSet<String>,
}

impl ArchiveWriter {
    /// Create (or truncate) the archive at `path` and write its preamble.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<ArchiveWriter> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(Error::io(&path))?;

        let mut writer = ArchiveWriter {
            file: BufWriter::new(file),
            path,
            entries: vec![],
            names: HashSet::new(),
        };

        header::write_header(&mut writer.file, Mode::Multi).map_err(Error::io(&writer.path))?;
        Ok(writer)
    }

    /// Entries written so far, in archive order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Compress `data` and append it as a frame named `name`.
    pub fn insert(&mut self, name: &str, data: &[u8]) -> Result<&ArchiveEntry> {
        // Check there isn't already an entry with this name
        if self.names.contains(name) {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }
        frame::check_name(name, NameWidth::U16)?;

        let payload = compression::compress(data)?;
        frame::write_frame(&mut self.file, name, &payload, NameWidth::U16)
            .map_err(|e| e.at_path(&self.path))?;

        self.names.insert(name.to_string());
        self.entries.push(ArchiveEntry {
            name: name.to_string(),
            compressed_size: payload.len() as u64,
            original_size: Some(data.len() as u64),
        });

        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Read the file at `source` and append it under its base name.
    pub fn insert_file<P: AsRef<Path>>(&mut self, source: P) -> Result<&ArchiveEntry> {
        let source = source.as_ref();
        ensure_source_file(source)?;

        let name = entry_name(source)?;
        let data = std::fs::read(source).map_err(Error::io(source))?;
        tracing::debug!(source = %source.display(), %name, bytes = data.len(), "adding file");

        self.insert(&name, &data)
    }

    /// Flush the archive to disk, then persist the index beside it.
    pub fn finish(mut self) -> Result<ArchiveHandle> {
        self.file.flush().map_err(Error::io(&self.path))?;
        self.file
            .get_ref()
            .sync_all()
            .map_err(Error::io(&self.path))?;

        let index_path = index::save(&self.path, &self.entries)?;

        tracing::info!(
            path = %self.path.display(),
            count = self.entries.len(),
            "archive finished"
        );

        Ok(ArchiveHandle {
            path: self.path,
            index_path,
            entries: self.entries,
        })
    }
}

/// Build a multi-file archive at `archive` from `files`, in the given order.
///
/// Every source is checked up front (exists, is a regular file, has a name
/// that fits the frame, no two share a base name, none is the archive or its
/// index), so those failures happen before the archive is created.
pub fn build<I, P, Q>(files: I, archive: Q) -> Result<ArchiveHandle>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let archive = archive.as_ref();
    let files = files
        .into_iter()
        .map(|x| x.as_ref().to_path_buf())
        .collect::<Vec<_>>();

    let own_paths = [archive.to_path_buf(), index::index_path(archive)];
    let mut names = HashSet::new();

    for file in files.iter() {
        ensure_source_file(file)?;

        if own_paths.iter().any(|x| same_file(x, file)) {
            return Err(Error::OutputIsInput { path: file.clone() });
        }

        let name = entry_name(file)?;
        frame::check_name(&name, NameWidth::U16)?;
        if !names.insert(name.clone()) {
            return Err(Error::DuplicateName { name });
        }
    }

    let mut writer = ArchiveWriter::create(archive)?;
    for file in files.iter() {
        writer.insert_file(file)?;
    }
    writer.finish()
}

/// Compress a single file into a self-contained archive that records the
/// original file name and needs no index. Returns the archive path.
pub fn compress_one<P: AsRef<Path>>(input: P, options: &CompressOptions) -> Result<PathBuf> {
    let input = input.as_ref();
    ensure_source_file(input)?;

    let output = match &options.output {
        OutputPath::Explicit(path) => path.clone(),
        OutputPath::Derive(derivation) => derivation.derive(input, None),
    };
    if same_file(&output, input) {
        return Err(Error::OutputIsInput { path: output });
    }

    let name = entry_name(input)?;
    frame::check_name(&name, NameWidth::U32)?;

    let data = std::fs::read(input).map_err(Error::io(input))?;
    let payload = compression::compress(&data)?;

    let file = File::create(&output).map_err(Error::io(&output))?;
    let mut writer = BufWriter::new(file);
    header::write_header(&mut writer, Mode::Single).map_err(Error::io(&output))?;
    frame::write_frame(&mut writer, &name, &payload, NameWidth::U32)
        .map_err(|e| e.at_path(&output))?;
    writer.flush().map_err(Error::io(&output))?;
    writer.get_ref().sync_all().map_err(Error::io(&output))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        original = data.len(),
        compressed = payload.len(),
        "compressed file"
    );
    Ok(output)
}

pub(crate) fn ensure_source_file(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(Error::SourceNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::SourceNotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(Error::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Whether `a` and `b` name the same file. Paths that do not exist yet are
/// compared as written.
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
