use std::path::PathBuf;

use lzpack_format::DecompressOptions;

use crate::error::{Error, Result};

pub fn run(archive: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let options = match output {
        Some(path) => DecompressOptions::with_output(path),
        None => DecompressOptions::default(),
    };

    let out_path = lzpack_format::extract_one(&archive, &options).map_err(|source| {
        Error::Decompress {
            path: archive.clone(),
            source,
        }
    })?;

    println!("Decompressed to: {}", out_path.display());
    Ok(())
}
