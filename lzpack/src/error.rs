use std::path::PathBuf;

use lzpack_format::ErrorKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot compress `{}`", .path.display())]
    Compress {
        path: PathBuf,
        #[source]
        source: lzpack_format::Error,
    },

    #[error("Cannot decompress `{}`", .path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: lzpack_format::Error,
    },

    #[error("Cannot create archive `{}`", .path.display())]
    CreateArchive {
        path: PathBuf,
        #[source]
        source: lzpack_format::Error,
    },

    #[error("Cannot list archive `{}`", .path.display())]
    ListArchive {
        path: PathBuf,
        #[source]
        source: lzpack_format::Error,
    },

    #[error("Cannot extract archive `{}`", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: lzpack_format::Error,
    },

    #[error("Cannot determine current directory")]
    CurrentDir {
        #[source]
        source: std::io::Error,
    },

    #[error("No files specified to add to archive")]
    NoFilesSpecified,
}

/// Process exit codes, one per failure category.
pub mod exit_code {
    pub const FATAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const BAD_ARCHIVE: i32 = 3;
    pub const BAD_INDEX: i32 = 4;
    pub const BAD_INPUT: i32 = 5;
    pub const IO_ERROR: i32 = 6;
    pub const BAD_ARGS: i32 = 64;
}

impl Error {
    fn source_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Compress { source, .. }
            | Error::Decompress { source, .. }
            | Error::CreateArchive { source, .. }
            | Error::ListArchive { source, .. }
            | Error::Extract { source, .. } => Some(source.kind()),
            Error::CurrentDir { .. } | Error::NoFilesSpecified => None,
        }
    }

    /// A short explanation of what went wrong, suitable for end users.
    pub fn hint(&self) -> &'static str {
        let kind = match self.source_kind() {
            Some(v) => v,
            None => match self {
                Error::NoFilesSpecified => return "Specify one or more files to archive.",
                _ => return "The operation could not be completed.",
            },
        };

        match kind {
            ErrorKind::SourceNotFound => "Input file not found.",
            ErrorKind::TruncatedHeader | ErrorKind::TruncatedName | ErrorKind::TruncatedPayload => {
                "The archive is damaged or truncated."
            }
            ErrorKind::InvalidNameEncoding => "The archive stores a file name that is not valid UTF-8.",
            ErrorKind::Codec => "The file is not a valid LZMA archive.",
            ErrorKind::IndexMissing => {
                "The archive index (.meta file) is missing; multi-file archives need it."
            }
            ErrorKind::IndexCorrupt => "The archive index (.meta file) is damaged or does not match the archive.",
            ErrorKind::NameTooLong => "A file name is too long to be stored in the archive.",
            ErrorKind::DuplicateName => "Two input files share the same name.",
            ErrorKind::UnsafeName => "The archive contains a file name that would escape the output directory.",
            ErrorKind::OutputIsInput => "The output path would overwrite the input.",
            ErrorKind::UnknownMode => "The archive was written by a newer or unknown version.",
            ErrorKind::ModeMismatch => {
                "Wrong archive type: use decompress for single-file archives and extract for multi-file archives."
            }
            ErrorKind::Io => "A filesystem operation failed.",
        }
    }

    pub fn exit_code(&self) -> i32 {
        use self::exit_code::*;

        let kind = match self.source_kind() {
            Some(v) => v,
            None => match self {
                Error::NoFilesSpecified => return BAD_ARGS,
                _ => return FATAL_ERROR,
            },
        };

        match kind {
            ErrorKind::SourceNotFound => NOT_FOUND,
            ErrorKind::TruncatedHeader
            | ErrorKind::TruncatedName
            | ErrorKind::TruncatedPayload
            | ErrorKind::InvalidNameEncoding
            | ErrorKind::Codec
            | ErrorKind::UnknownMode
            | ErrorKind::ModeMismatch
            | ErrorKind::UnsafeName => BAD_ARCHIVE,
            ErrorKind::IndexMissing | ErrorKind::IndexCorrupt => BAD_INDEX,
            ErrorKind::NameTooLong | ErrorKind::DuplicateName | ErrorKind::OutputIsInput => BAD_INPUT,
            ErrorKind::Io => IO_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_category() {
        let err = Error::Decompress {
            path: "x".into(),
            source: lzpack_format::Error::Codec {
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, "bad"),
            },
        };
        assert_eq!(err.exit_code(), exit_code::BAD_ARCHIVE);
        assert_eq!(err.hint(), "The file is not a valid LZMA archive.");

        let err = Error::ListArchive {
            path: "x".into(),
            source: lzpack_format::Error::IndexMissing { path: "x.meta".into() },
        };
        assert_eq!(err.exit_code(), exit_code::BAD_INDEX);

        assert_eq!(Error::NoFilesSpecified.exit_code(), exit_code::BAD_ARGS);
    }
}
