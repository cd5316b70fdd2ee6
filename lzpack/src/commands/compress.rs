use std::path::PathBuf;

use lzpack_format::CompressOptions;

use crate::error::{Error, Result};

pub fn run(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let options = match output {
        Some(path) => CompressOptions::with_output(path),
        None => CompressOptions::default(),
    };

    let out_path = lzpack_format::compress_one(&input, &options).map_err(|source| {
        Error::Compress {
            path: input.clone(),
            source,
        }
    })?;

    println!("Compressed to: {}", out_path.display());
    Ok(())
}
