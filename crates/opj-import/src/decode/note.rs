use opj_model::Note;

use crate::blocks::read_block;
use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::version::FormatVersion;

use super::window::{block_text, decode_window_layout, require_len, WINDOW_HEADER_MIN_LEN};
use super::{DecodeContext, Record, SectionKind};

/// Note element before revision 6.0: layout header and content.
pub fn decode_legacy_note(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let header = read_block(cursor)?;
    require_len(&header, WINDOW_HEADER_MIN_LEN, SectionKind::Note, "note header")?;
    let content = read_block(cursor)?;

    let window = decode_window_layout(&header, version, ctx)?;
    Ok(Record::Note(Note {
        window,
        text: block_text(&content, ctx.codepage),
    }))
}

/// Note element from revision 6.0: layout header, name and content.
pub fn decode_note(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let header = read_block(cursor)?;
    require_len(&header, WINDOW_HEADER_MIN_LEN, SectionKind::Note, "note header")?;
    let name = read_block(cursor)?;
    let content = read_block(cursor)?;

    let mut window = decode_window_layout(&header, version, ctx)?;
    let name = name.cursor().read_cstring(name.len(), ctx.codepage)?;
    if !name.is_empty() {
        window.name = name;
    }
    Ok(Record::Note(Note {
        window,
        text: block_text(&content, ctx.codepage),
    }))
}
