//! Frame encoding: `[name length, big-endian][name, UTF-8][payload]`.
//!
//! A frame carries no payload length. Single-file archives let the payload run
//! to end of stream; multi-file archives take each payload size from the index.

use std::io::{Read, Write};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::{Error, Result};

/// Width of the name length field.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum NameWidth {
    U16,
    U32,
}

impl NameWidth {
    #[inline(always)]
    pub const fn bytes(self) -> usize {
        match self {
            NameWidth::U16 => 2,
            NameWidth::U32 => 4,
        }
    }

    /// Largest name, in bytes, the field can describe.
    #[inline(always)]
    pub const fn max_len(self) -> u64 {
        match self {
            NameWidth::U16 => u16::MAX as u64,
            NameWidth::U32 => u32::MAX as u64,
        }
    }
}

/// One decoded frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Frame {
    pub name: String,
    /// Bytes occupied by the name field, excluding the length prefix.
    pub name_len: u64,
    pub payload: Vec<u8>,
}

/// Fails with [`Error::NameTooLong`] if `name` does not fit in `width`.
pub fn check_name(name: &str, width: NameWidth) -> Result<()> {
    let len = name.len();
    if len as u64 > width.max_len() {
        return Err(Error::NameTooLong {
            name: name.to_string(),
            len,
            max: width.max_len(),
        });
    }
    Ok(())
}

/// Write one frame. The name is validated before anything reaches `writer`.
pub fn write_frame<W: Write>(
    writer: &mut W,
    name: &str,
    payload: &[u8],
    width: NameWidth,
) -> Result<u64> {
    check_name(name, width)?;

    writer.write_uint::<BigEndian>(name.len() as u64, width.bytes())?;
    writer.write_all(name.as_bytes())?;
    writer.write_all(payload)?;

    let bytes = (width.bytes() + name.len() + payload.len()) as u64;
    tracing::debug!(%name, bytes, payload = payload.len(), "wrote frame");
    Ok(bytes)
}

/// Read a single-file frame: the payload is everything left in `reader`.
pub fn read_frame<R: Read>(reader: &mut R, width: NameWidth) -> Result<Frame> {
    let (name, name_len) = read_name(reader, width)?;

    let mut payload = vec![];
    reader.read_to_end(&mut payload)?;

    tracing::debug!(%name, payload = payload.len(), "read frame");
    Ok(Frame {
        name,
        name_len,
        payload,
    })
}

/// Read a multi-file frame whose payload size comes from the index.
pub fn read_frame_at<R: Read>(reader: &mut R, width: NameWidth, declared: u64) -> Result<Frame> {
    let (name, name_len) = read_name(reader, width)?;

    let mut payload = vec![];
    let found = reader.by_ref().take(declared).read_to_end(&mut payload)? as u64;
    if found < declared {
        return Err(Error::TruncatedPayload {
            name,
            expected: declared,
            found,
        });
    }

    tracing::debug!(%name, payload = found, "read frame");
    Ok(Frame {
        name,
        name_len,
        payload,
    })
}

fn read_name<R: Read>(reader: &mut R, width: NameWidth) -> Result<(String, u64)> {
    let mut buf = [0u8; 4];
    let field = &mut buf[..width.bytes()];
    let found = read_full(reader, field)?;
    if found < field.len() {
        return Err(Error::TruncatedHeader {
            expected: field.len(),
            found,
        });
    }
    let name_len = BigEndian::read_uint(field, width.bytes());

    // `take` keeps a bogus length from allocating more than the stream holds.
    let mut name = Vec::new();
    let found = reader.by_ref().take(name_len).read_to_end(&mut name)? as u64;
    if found < name_len {
        return Err(Error::TruncatedName {
            expected: name_len,
            found,
        });
    }

    let name = String::from_utf8(name).map_err(|source| Error::InvalidNameEncoding { source })?;
    Ok((name, name_len))
}

/// Fill `buf` as far as the stream allows and return the number of bytes read.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
