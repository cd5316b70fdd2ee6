//! LZMA codec adapter.
//!
//! Payloads are whole `.xz` streams produced with the encoder's default
//! preset. Only the decoder is required to be stable across versions; the
//! compressed bytes for a given input may differ between encoder releases.

use std::io::Cursor;

use comde::xz::{XzCompressor, XzDecompressor};
use comde::{Compressor, Decompressor};

use crate::{Error, Result};

/// Leading bytes of every `.xz` stream.
pub const XZ_MAGIC: &[u8; 6] = b"\xfd7zXZ\x00";

/// Compress `raw` into a single self-delimiting LZMA stream.
pub fn compress(raw: &[u8]) -> Result<Vec<u8>> {
    let mut writer = Cursor::new(Vec::with_capacity(raw.len() / 2 + 64));
    let mut reader = Cursor::new(raw);

    let bytes = XzCompressor
        .compress(&mut writer, &mut reader)
        .map_err(|source| Error::Codec { source })?;

    tracing::debug!(read = bytes.read, write = bytes.write, "compressed block");
    Ok(writer.into_inner())
}

/// Decompress one LZMA stream.
///
/// Fails with [`Error::Codec`] when `blob` is empty, truncated, corrupted or
/// not an LZMA stream at all.
pub fn decompress(blob: &[u8]) -> Result<Vec<u8>> {
    if blob.is_empty() {
        return Err(Error::Codec {
            source: std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "empty compressed stream",
            ),
        });
    }

    let mut out = Vec::with_capacity(blob.len() * 2);
    XzDecompressor
        .copy(Cursor::new(blob), &mut out)
        .map_err(|source| Error::Codec { source })?;

    tracing::debug!(read = blob.len(), write = out.len(), "decompressed block");
    Ok(out)
}
