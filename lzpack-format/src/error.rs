use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure an archive operation can report.
///
/// The set is closed: a front end can match on [`Error::kind`] exhaustively
/// and render a distinct message for each category.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Source `{}` does not exist or is not a regular file", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Archive truncated in name length field: expected {expected} bytes, found {found}")]
    TruncatedHeader { expected: usize, found: usize },

    #[error("Archive truncated in entry name: expected {expected} bytes, found {found}")]
    TruncatedName { expected: u64, found: u64 },

    #[error("Archive truncated in payload of `{name}`: expected {expected} bytes, found {found}")]
    TruncatedPayload {
        name: String,
        expected: u64,
        found: u64,
    },

    #[error("Entry name is not valid UTF-8")]
    InvalidNameEncoding {
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Data is not a valid LZMA stream")]
    Codec {
        #[source]
        source: std::io::Error,
    },

    #[error("Index `{}` not found", .path.display())]
    IndexMissing { path: PathBuf },

    #[error("Index `{}` is corrupt", .path.display())]
    IndexCorrupt {
        path: PathBuf,
        #[source]
        source: IndexCorruption,
    },

    #[error("Name `{}` is {len} bytes long; the name field holds at most {max}", truncate_name(.name))]
    NameTooLong { name: String, len: usize, max: u64 },

    #[error("An entry named `{name}` is already present in the archive")]
    DuplicateName { name: String },

    #[error("Entry name `{name}` cannot be extracted safely")]
    UnsafeName { name: String },

    #[error("Output path `{}` is the input file itself", .path.display())]
    OutputIsInput { path: PathBuf },

    #[error("Archive `{}` has unknown mode byte {mode:#04x}", .path.display())]
    UnknownMode { path: PathBuf, mode: u8 },

    #[error("Archive `{}` is a {found} archive, not a {expected} archive", .path.display())]
    ModeMismatch {
        path: PathBuf,
        expected: crate::Mode,
        found: crate::Mode,
    },

    #[error("I/O error on archive stream")]
    Stream {
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ways an index can disagree with itself or with the archive it describes.
#[derive(Debug, thiserror::Error)]
pub enum IndexCorruption {
    #[error("cannot parse index document")]
    Parse(#[from] serde_json::Error),

    #[error("entry {position} is named `{expected}` in the index but `{found}` in the archive")]
    NameMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("{bytes} bytes follow the last indexed entry")]
    TrailingData { bytes: u64 },

    #[error("`{name}` decompressed to {found} bytes but the index records {expected}")]
    SizeMismatch {
        name: String,
        expected: u64,
        found: u64,
    },
}

/// Category of an [`Error`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SourceNotFound,
    TruncatedHeader,
    TruncatedName,
    TruncatedPayload,
    InvalidNameEncoding,
    Codec,
    IndexMissing,
    IndexCorrupt,
    NameTooLong,
    DuplicateName,
    UnsafeName,
    OutputIsInput,
    UnknownMode,
    ModeMismatch,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Error::TruncatedHeader { .. } => ErrorKind::TruncatedHeader,
            Error::TruncatedName { .. } => ErrorKind::TruncatedName,
            Error::TruncatedPayload { .. } => ErrorKind::TruncatedPayload,
            Error::InvalidNameEncoding { .. } => ErrorKind::InvalidNameEncoding,
            Error::Codec { .. } => ErrorKind::Codec,
            Error::IndexMissing { .. } => ErrorKind::IndexMissing,
            Error::IndexCorrupt { .. } => ErrorKind::IndexCorrupt,
            Error::NameTooLong { .. } => ErrorKind::NameTooLong,
            Error::DuplicateName { .. } => ErrorKind::DuplicateName,
            Error::UnsafeName { .. } => ErrorKind::UnsafeName,
            Error::OutputIsInput { .. } => ErrorKind::OutputIsInput,
            Error::UnknownMode { .. } => ErrorKind::UnknownMode,
            Error::ModeMismatch { .. } => ErrorKind::ModeMismatch,
            Error::Stream { .. } | Error::Io { .. } => ErrorKind::Io,
        }
    }

    /// Whether the archive bytes themselves are malformed, as opposed to a
    /// missing input or a filesystem failure.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::TruncatedHeader
                | ErrorKind::TruncatedName
                | ErrorKind::TruncatedPayload
                | ErrorKind::InvalidNameEncoding
                | ErrorKind::Codec
                | ErrorKind::IndexCorrupt
                | ErrorKind::UnknownMode
        )
    }

    pub(crate) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }

    /// Attach `path` to an unlabelled stream error.
    pub(crate) fn at_path<P: Into<PathBuf>>(self, path: P) -> Error {
        match self {
            Error::Stream { source } => Error::Io {
                path: path.into(),
                source,
            },
            e => e,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Stream { source }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// A name at the length limit is 64 KiB; keep messages readable.
fn truncate_name(name: &str) -> String {
    const MAX_CHARS: usize = 48;

    if name.chars().count() <= MAX_CHARS {
        return name.to_string();
    }

    let head: String = name.chars().take(MAX_CHARS).collect();
    format!("{}...", head)
}
