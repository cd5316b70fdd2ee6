//! Reader and writer for lzpack archives: LZMA-compressed files framed with
//! a length-prefixed name, plus a JSON sidecar index for multi-file archives.

pub mod compression;
mod error;
mod file;
pub mod frame;
mod header;
pub mod index;
mod options;
pub mod path;

pub use error::{Error, ErrorKind, IndexCorruption, Result};
pub use file::{
    build, compress_one, detect, extract_all, extract_one, list, read_single, ArchiveHandle,
    ArchiveReader, ArchiveWriter, SingleEntry,
};
pub use frame::{Frame, NameWidth};
pub use header::{Mode, HEADER_LEN, MAGIC_BYTES};
pub use index::{ArchiveEntry, INDEX_SUFFIX};
pub use options::{
    CompressOptions, DecompressOptions, Derivation, OutputPath, ARCHIVE_SUFFIX, RESTORED_SUFFIX,
};
