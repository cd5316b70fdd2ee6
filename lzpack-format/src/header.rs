use std::fmt;
use std::io::{Read, Write};

use crate::frame::NameWidth;

// Make some attempt to not accidentally load plain text files,
// and also make it break almost immediately in any UTF-8 compliant text parser.
pub const MAGIC_BYTES: &[u8; 4] = b"\xffLZP";

/// Length of the preamble: magic bytes followed by the mode byte.
pub const HEADER_LEN: usize = MAGIC_BYTES.len() + 1;

pub mod constants {
    pub const MODE_SINGLE: u8 = 0x01;
    pub const MODE_MULTI: u8 = 0x02;
}

use self::constants::*;

/// The two archive families. They differ in the width of the name length
/// field and in whether a sidecar index is required.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Exactly one frame, payload runs to end of file, no index.
    Single,
    /// Any number of frames, payload sizes live in the sidecar index.
    Multi,
}

impl Mode {
    pub const fn id(self) -> u8 {
        match self {
            Mode::Single => MODE_SINGLE,
            Mode::Multi => MODE_MULTI,
        }
    }

    pub const fn from_id(id: u8) -> Option<Mode> {
        match id {
            MODE_SINGLE => Some(Mode::Single),
            MODE_MULTI => Some(Mode::Multi),
            _ => None,
        }
    }

    pub const fn name_width(self) -> NameWidth {
        match self {
            Mode::Single => NameWidth::U32,
            Mode::Multi => NameWidth::U16,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Single => "single-file",
            Mode::Multi => "multi-file",
        };

        write!(f, "{}", s)
    }
}

/// What was found at the start of an archive.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum Preamble {
    /// Magic bytes matched; the mode byte is known (or unrecognised).
    Tagged(std::result::Result<Mode, u8>),
    /// No magic bytes. The archive was written without a preamble and the
    /// consumed bytes belong to the first frame.
    Untagged(Vec<u8>),
}

pub(crate) fn write_header<W: Write>(writer: &mut W, mode: Mode) -> std::io::Result<()> {
    writer.write_all(MAGIC_BYTES)?;
    writer.write_all(&[mode.id()])
}

/// Read the preamble, if any. Bytes consumed while looking for the magic are
/// handed back in [`Preamble::Untagged`] so the caller can replay them.
pub(crate) fn read_header<R: Read>(reader: &mut R) -> std::io::Result<Preamble> {
    let mut buf = [0u8; HEADER_LEN];
    let n = crate::frame::read_full(reader, &mut buf)?;

    if n == HEADER_LEN && &buf[..MAGIC_BYTES.len()] == MAGIC_BYTES {
        let id = buf[MAGIC_BYTES.len()];
        return Ok(Preamble::Tagged(Mode::from_id(id).ok_or(id)));
    }

    Ok(Preamble::Untagged(buf[..n].to_vec()))
}
