use std::path::{Path, PathBuf};

use crate::path::with_appended_suffix;

/// Suffix given to single-file archives when no output path is supplied.
pub const ARCHIVE_SUFFIX: &str = ".lzma";

/// Suffix used when neither the embedded name nor suffix stripping yields a
/// usable output path.
pub const RESTORED_SUFFIX: &str = ".restored";

/// Where an operation writes its result.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OutputPath {
    Explicit(PathBuf),
    Derive(Derivation),
}

impl Default for OutputPath {
    fn default() -> Self {
        OutputPath::Derive(Derivation::default())
    }
}

/// How an output path is derived from the input path when none is given.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Derivation {
    /// `<input>.lzma`.
    AppendSuffix,
    /// Sibling of the archive named after the embedded original name.
    EmbeddedName,
    /// Strip a trailing `.lzma`, or append `.restored` if there is none.
    StripSuffix,
}

impl Default for Derivation {
    fn default() -> Self {
        Derivation::EmbeddedName
    }
}

impl Derivation {
    /// Derive an output path for `input`. `embedded` is the original name
    /// recorded in the archive, when reading one.
    pub fn derive(self, input: &Path, embedded: Option<&str>) -> PathBuf {
        match self {
            Derivation::AppendSuffix => with_appended_suffix(input, ARCHIVE_SUFFIX),
            Derivation::EmbeddedName => match embedded.filter(|x| is_plain_name(x)) {
                Some(name) => input.with_file_name(name),
                None => Derivation::StripSuffix.derive(input, None),
            },
            Derivation::StripSuffix => {
                let name = input.file_name().and_then(|x| x.to_str());
                match name.and_then(|x| x.strip_suffix(ARCHIVE_SUFFIX)) {
                    Some(stem) if !stem.is_empty() => input.with_file_name(stem),
                    _ => with_appended_suffix(input, RESTORED_SUFFIX),
                }
            }
        }
    }
}

fn is_plain_name(name: &str) -> bool {
    crate::path::output_path("", name).is_ok()
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompressOptions {
    pub output: OutputPath,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            output: OutputPath::Derive(Derivation::AppendSuffix),
        }
    }
}

impl CompressOptions {
    pub fn with_output<P: Into<PathBuf>>(path: P) -> CompressOptions {
        CompressOptions {
            output: OutputPath::Explicit(path.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DecompressOptions {
    pub output: OutputPath,
}

impl DecompressOptions {
    pub fn with_output<P: Into<PathBuf>>(path: P) -> DecompressOptions {
        DecompressOptions {
            output: OutputPath::Explicit(path.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_suffix() {
        assert_eq!(
            Derivation::AppendSuffix.derive(Path::new("dir/a.txt"), None),
            PathBuf::from("dir/a.txt.lzma")
        );
    }

    #[test]
    fn embedded_name_is_sibling() {
        assert_eq!(
            Derivation::EmbeddedName.derive(Path::new("dir/x.lzma"), Some("a.txt")),
            PathBuf::from("dir/a.txt")
        );
    }

    #[test]
    fn unsafe_embedded_name_falls_back() {
        assert_eq!(
            Derivation::EmbeddedName.derive(Path::new("dir/a.txt.lzma"), Some("../a.txt")),
            PathBuf::from("dir/a.txt")
        );
    }

    #[test]
    fn strip_suffix_or_restore() {
        assert_eq!(
            Derivation::StripSuffix.derive(Path::new("a.txt.lzma"), None),
            PathBuf::from("a.txt")
        );
        assert_eq!(
            Derivation::StripSuffix.derive(Path::new("a.bin"), None),
            PathBuf::from("a.bin.restored")
        );
        assert_eq!(
            Derivation::StripSuffix.derive(Path::new(".lzma"), None),
            PathBuf::from(".lzma.restored")
        );
    }
}
