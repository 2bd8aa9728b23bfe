//! Block framing shared by every section of the file body.
//!
//! A block is a little-endian `u32` size followed by `\n`; when the size is non-zero, that many
//! payload bytes follow, then another `\n`. A zero-size block is an end mark that terminates
//! lists (datasets, windows, layers, ...).

use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;

pub(crate) const BLOCK_DELIMITER: u8 = b'\n';

/// One framed block. `data` borrows from the file buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// File offset of the size field.
    pub offset: usize,
    /// File offset of the first payload byte.
    pub data_offset: usize,
    pub data: &'a [u8],
}

impl<'a> Block<'a> {
    pub fn is_end_mark(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cursor over the payload that reports absolute file offsets.
    pub fn cursor(&self) -> BinaryCursor<'a> {
        BinaryCursor::with_base(self.data, self.data_offset)
    }
}

fn expect_delimiter(cursor: &mut BinaryCursor<'_>) -> Result<(), DecodeError> {
    let offset = cursor.absolute_position();
    let found = cursor.read_u8()?;
    if found != BLOCK_DELIMITER {
        return Err(DecodeError::BadDelimiter { offset, found });
    }
    Ok(())
}

/// Read a block size marker (`u32` + `\n`) without any payload.
///
/// Some structures store a bare count this way.
pub(crate) fn read_block_size(cursor: &mut BinaryCursor<'_>) -> Result<u32, DecodeError> {
    let start = cursor.position();
    let result = cursor
        .read_u32()
        .map_err(DecodeError::from)
        .and_then(|size| expect_delimiter(cursor).map(|()| size));
    if result.is_err() {
        // Leave the cursor where it was so callers can report the section start.
        let _ = cursor.seek(start);
    }
    result
}

/// Read one complete block (size marker, payload, trailing delimiter).
pub(crate) fn read_block<'a>(cursor: &mut BinaryCursor<'a>) -> Result<Block<'a>, DecodeError> {
    let start = cursor.position();
    let result = read_block_at(cursor);
    if result.is_err() {
        let _ = cursor.seek(start);
    }
    result
}

fn read_block_at<'a>(cursor: &mut BinaryCursor<'a>) -> Result<Block<'a>, DecodeError> {
    let offset = cursor.absolute_position();
    let size = read_block_size(cursor)? as usize;
    let data_offset = cursor.absolute_position();
    if size == 0 {
        return Ok(Block {
            offset,
            data_offset,
            data: &[],
        });
    }
    let data = cursor.read_bytes(size)?;
    expect_delimiter(cursor)?;
    Ok(Block {
        offset,
        data_offset,
        data,
    })
}

/// Read a block and require it to be an end mark.
pub(crate) fn expect_end_mark(
    cursor: &mut BinaryCursor<'_>,
    kind: crate::decode::SectionKind,
) -> Result<(), DecodeError> {
    let block = read_block(cursor)?;
    if !block.is_end_mark() {
        return Err(DecodeError::unexpected(
            kind,
            block.offset,
            "end mark",
            format!("{}-byte block", block.len()),
        ));
    }
    Ok(())
}

/// Read a block that must hold a single little-endian `u32` (counts in the project tree).
pub(crate) fn read_count_block(
    cursor: &mut BinaryCursor<'_>,
    kind: crate::decode::SectionKind,
) -> Result<u32, DecodeError> {
    let block = read_block(cursor)?;
    if block.len() < 4 {
        return Err(DecodeError::unexpected(
            kind,
            block.offset,
            "4-byte count block",
            format!("{}-byte block", block.len()),
        ));
    }
    Ok(block.cursor().read_u32()?)
}

#[cfg(test)]
pub(crate) fn encode_block(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 6);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.push(BLOCK_DELIMITER);
    if !payload.is_empty() {
        out.extend_from_slice(payload);
        out.push(BLOCK_DELIMITER);
    }
    out
}
