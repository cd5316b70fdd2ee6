use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Name under which a source file is stored: its final path component.
pub fn entry_name<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    path.file_name()
        .and_then(|x| x.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::SourceNotFound {
            path: path.to_path_buf(),
        })
}

/// Resolve where an entry named `name` lands under `dest`.
///
/// Names are allowed to be anything when written, but on the way out a name
/// must be exactly one normal path component so extraction cannot escape
/// `dest` or clobber it.
pub fn output_path<P: AsRef<Path>>(dest: P, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(dest.as_ref().join(part)),
        _ => Err(Error::UnsafeName {
            name: name.to_string(),
        }),
    }
}

/// `<path><suffix>`, without touching any existing extension.
pub fn with_appended_suffix<P: AsRef<Path>>(path: P, suffix: &str) -> PathBuf {
    let mut s = path.as_ref().as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn entry_name_is_base_name() {
        assert_eq!(entry_name("some/dir/file.txt").unwrap(), "file.txt");
        assert_eq!(entry_name("file.txt").unwrap(), "file.txt");
    }

    #[test]
    fn entry_name_without_file_name() {
        assert_eq!(entry_name("..").unwrap_err().kind(), ErrorKind::SourceNotFound);
    }

    #[test]
    fn output_path_accepts_plain_names() {
        assert_eq!(
            output_path("out", "a.txt").unwrap(),
            Path::new("out").join("a.txt")
        );
        assert_eq!(
            output_path("out", "with space").unwrap(),
            Path::new("out").join("with space")
        );
    }

    #[test]
    fn output_path_rejects_escapes() {
        for name in &["", ".", "..", "../evil", "/etc/passwd", "a/b", "a/"] {
            assert_eq!(
                output_path("out", name).unwrap_err().kind(),
                ErrorKind::UnsafeName,
                "{:?}",
                name
            );
        }
    }

    #[test]
    fn appended_suffix_keeps_extension() {
        assert_eq!(
            with_appended_suffix("dir/a.tar", ".lzma"),
            PathBuf::from("dir/a.tar.lzma")
        );
    }
}
