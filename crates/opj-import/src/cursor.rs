//! Bounds-checked byte cursor over an in-memory file.
//!
//! Every read either returns data that lies entirely inside the buffer or fails with
//! [`CursorError::OutOfBounds`]; the offset is left unchanged on failure.

use crate::errors::CursorError;
use crate::strings::{decode_ansi, decode_nul_padded};

/// Generates a little-endian reader, a big-endian reader, and a non-advancing peek.
macro_rules! read_primitive {
    ($ty:ty, $le:ident, $be:ident, $peek:ident) => {
        pub fn $le(&mut self) -> Result<$ty, CursorError> {
            Ok(<$ty>::from_le_bytes(self.read_array()?))
        }

        pub fn $be(&mut self) -> Result<$ty, CursorError> {
            Ok(<$ty>::from_be_bytes(self.read_array()?))
        }

        pub fn $peek(&self) -> Result<$ty, CursorError> {
            let bytes = self.peek_bytes(std::mem::size_of::<$ty>())?;
            let mut arr = [0u8; std::mem::size_of::<$ty>()];
            arr.copy_from_slice(bytes);
            Ok(<$ty>::from_le_bytes(arr))
        }
    };
}

#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Offset of `buf[0]` within the whole file; only used to report absolute offsets.
    base: usize,
}

impl<'a> BinaryCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_base(buf, 0)
    }

    /// Cursor over a sub-slice that starts at file offset `base`.
    pub fn with_base(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base }
    }

    /// Offset relative to the start of this cursor's buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Offset within the whole file.
    pub fn absolute_position(&self) -> usize {
        self.base.saturating_add(self.pos)
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// Move to `target` (relative to this cursor's buffer). Seeking to the very end is allowed.
    pub fn seek(&mut self, target: usize) -> Result<(), CursorError> {
        if target > self.buf.len() {
            return Err(CursorError::SeekOutOfBounds {
                target: self.base.saturating_add(target),
                len: self.base.saturating_add(self.buf.len()),
            });
        }
        self.pos = target;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), CursorError> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn peek_u8(&self) -> Result<u8, CursorError> {
        self.peek_bytes(1).map(|b| b[0])
    }

    pub fn peek_bytes(&self, n: usize) -> Result<&'a [u8], CursorError> {
        let end = self.pos.checked_add(n).ok_or_else(|| self.out_of_bounds(n))?;
        self.buf.get(self.pos..end).ok_or_else(|| self.out_of_bounds(n))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        let bytes = self.peek_bytes(n)?;
        self.pos += n;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let bytes = self.read_bytes(N)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(bytes);
        Ok(arr)
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        self.read_bytes(1).map(|b| b[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, CursorError> {
        self.read_u8().map(|b| b as i8)
    }

    read_primitive!(u16, read_u16, read_u16_be, peek_u16);
    read_primitive!(i16, read_i16, read_i16_be, peek_i16);
    read_primitive!(u32, read_u32, read_u32_be, peek_u32);
    read_primitive!(i32, read_i32, read_i32_be, peek_i32);
    read_primitive!(u64, read_u64, read_u64_be, peek_u64);
    read_primitive!(i64, read_i64, read_i64_be, peek_i64);
    read_primitive!(f32, read_f32, read_f32_be, peek_f32);
    read_primitive!(f64, read_f64, read_f64_be, peek_f64);

    /// Fixed-width NUL-padded text field.
    pub fn read_fixed_string(&mut self, len: usize, codepage: u16) -> Result<String, CursorError> {
        let bytes = self.read_bytes(len)?;
        Ok(decode_nul_padded(codepage, bytes))
    }

    /// NUL-terminated text of at most `max` bytes (terminator excluded).
    ///
    /// Consumes the terminator when present. Reaching `max` bytes or the end of the buffer
    /// without a terminator ends the string there.
    pub fn read_cstring(&mut self, max: usize, codepage: u16) -> Result<String, CursorError> {
        let window = &self.buf[self.pos.min(self.buf.len())..];
        let window = &window[..window.len().min(max)];
        let (text_len, consumed) = match window.iter().position(|&b| b == 0) {
            Some(nul) => (nul, nul + 1),
            None => (window.len(), window.len()),
        };
        let bytes = self.read_bytes(consumed)?;
        Ok(decode_ansi(codepage, &bytes[..text_len]))
    }

    /// Text prefixed by a little-endian `u32` byte length.
    pub fn read_len_prefixed_string(&mut self, codepage: u16) -> Result<String, CursorError> {
        let start = self.pos;
        let len = self.read_u32()? as usize;
        match self.read_bytes(len) {
            Ok(bytes) => Ok(decode_ansi(codepage, bytes)),
            Err(err) => {
                self.pos = start;
                Err(err)
            }
        }
    }

    /// Bytes up to (not including) the next `\n`, consuming the `\n`.
    pub fn read_line(&mut self) -> Result<&'a [u8], CursorError> {
        let rest = &self.buf[self.pos.min(self.buf.len())..];
        let Some(end) = rest.iter().position(|&b| b == b'\n') else {
            return Err(self.out_of_bounds(rest.len() + 1));
        };
        let line = self.read_bytes(end)?;
        self.pos += 1;
        Ok(line)
    }

    fn out_of_bounds(&self, needed: usize) -> CursorError {
        CursorError::OutOfBounds {
            offset: self.absolute_position(),
            needed,
            remaining: self.remaining(),
        }
    }
}
