use std::path::PathBuf;

use crate::error::{Error, Result};

pub fn run(archive: PathBuf, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    let output_path = match output {
        Some(v) => v,
        None => std::env::current_dir().map_err(|source| Error::CurrentDir { source })?,
    };

    let paths = lzpack_format::extract_all(&archive, &output_path).map_err(|source| {
        Error::Extract {
            path: archive.clone(),
            source,
        }
    })?;

    if verbose {
        for path in paths.iter() {
            println!("{}", path.display());
        }
    }

    println!(
        "Extracted {} files to {}",
        paths.len(),
        output_path.display()
    );
    Ok(())
}
