pub mod reader;
pub mod writer;

pub use self::reader::{detect, extract_all, extract_one, list, read_single, ArchiveReader, SingleEntry};
pub use self::writer::{build, compress_one, ArchiveHandle, ArchiveWriter};
