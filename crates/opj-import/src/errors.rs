use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::decode::SectionKind;
use crate::version::FormatRevision;

/// The header line could not be interpreted; nothing else in the file can be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("no header line terminator in the first {searched} bytes")]
    MissingTerminator { searched: usize },
    #[error("header line too short ({len} bytes)")]
    TooShort { len: usize },
    #[error("not a project file (magic {found:?})")]
    BadMagic { found: String },
    #[error("header {field} is not numeric")]
    NonNumeric { field: &'static str },
}

/// A read ran past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("read of {needed} bytes at offset {offset} exceeds buffer ({remaining} bytes remaining)")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("seek to offset {target} outside buffer of {len} bytes")]
    SeekOutOfBounds { target: usize, len: usize },
}

/// Failure while decoding one section.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Cursor(#[from] CursorError),
    #[error("expected block delimiter 0x0A at offset {offset}, found 0x{found:02X}")]
    BadDelimiter { offset: usize, found: u8 },
    #[error("{kind} at offset {offset}: expected {expected}, found {found}")]
    Unexpected {
        kind: SectionKind,
        offset: usize,
        expected: String,
        found: String,
    },
    #[error("no {kind} decoder for format revision {revision}")]
    Unsupported {
        kind: SectionKind,
        revision: FormatRevision,
    },
}

impl DecodeError {
    pub(crate) fn unexpected(
        kind: SectionKind,
        offset: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        DecodeError::Unexpected {
            kind,
            offset,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// `true` when the failure came from running out of input.
    pub fn is_truncation(&self) -> bool {
        matches!(self, DecodeError::Cursor(CursorError::OutOfBounds { .. }))
    }
}

/// A section that was skipped, with where it started.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to decode {kind} at offset {offset}: {source}")]
pub struct SectionDecodeError {
    pub kind: SectionKind,
    pub offset: usize,
    #[source]
    pub source: DecodeError,
}

/// Indexed accessor misuse on an already parsed file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("{collection} index {index} out of range (len={len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid project header: {0}")]
    Header(#[from] HeaderError),
}
