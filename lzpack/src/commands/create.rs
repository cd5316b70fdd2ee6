use std::path::PathBuf;

use crate::error::{Error, Result};

pub fn run(archive: PathBuf, files: Vec<PathBuf>, verbose: bool) -> Result<()> {
    if files.is_empty() {
        return Err(Error::NoFilesSpecified);
    }

    let handle = lzpack_format::build(&files, &archive).map_err(|source| Error::CreateArchive {
        path: archive.clone(),
        source,
    })?;

    if verbose {
        for entry in handle.entries.iter() {
            println!("{}", entry.name);
        }
    }

    println!(
        "Archived {} files to: {} (index: {})",
        handle.entries.len(),
        handle.path.display(),
        handle.index_path.display()
    );
    Ok(())
}
