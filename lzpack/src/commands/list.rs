use std::path::PathBuf;

use humansize::{file_size_opts as options, FileSize};

use crate::error::{Error, Result};

#[inline(always)]
fn human(size: u64) -> String {
    size.file_size(options::BINARY)
        .unwrap_or_else(|_| size.to_string())
}

pub fn run(archive: PathBuf) -> Result<()> {
    let entries = lzpack_format::list(&archive).map_err(|source| Error::ListArchive {
        path: archive.clone(),
        source,
    })?;

    println!("Compressed     Length         Name");
    println!("-------------  -------------  --------");
    for entry in entries.iter() {
        let length = entry
            .original_size
            .map(human)
            .unwrap_or_else(|| "-".into());

        println!(
            "{:>13}  {:>13}  {}",
            human(entry.compressed_size),
            length,
            entry.name
        );
    }

    Ok(())
}
