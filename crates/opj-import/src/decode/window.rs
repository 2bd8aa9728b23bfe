//! Layout shared by every window section: the window header block and the layer list.

use opj_model::{julian_day_to_datetime, Rect, Window, WindowState, WindowTitle};

use crate::blocks::{read_block, Block};
use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::version::{FormatRevision, FormatVersion};

use super::{DecodeContext, SectionKind};

pub(crate) const WINDOW_HEADER_MIN_LEN: usize = 0x33;
pub(crate) const WINDOW_NAME_LEN: usize = 25;

const NAME_OFFSET: usize = 0x02;
const FRAME_OFFSET: usize = 0x1B;
const KIND_OFFSET: usize = 0x2D;
const STATE_OFFSET: usize = 0x32;
const TITLE_OFFSET: usize = 0x69;
const CREATED_OFFSET: usize = 0x73;
const MODIFIED_OFFSET: usize = 0x7B;
const DATES_MIN_LEN: usize = 0x83;
const ACTIVE_SHEET_OFFSET: usize = 0x8B;

pub(crate) const KIND_GRAPH: u8 = 0x00;
pub(crate) const KIND_SPREADSHEET: u8 = 0x18;
pub(crate) const KIND_EXCEL: u8 = 0x28;
pub(crate) const KIND_MATRIX: u8 = 0x50;

const STATE_MINIMIZED: u8 = 0x01;
const STATE_MAXIMIZED: u8 = 0x02;
const STATE_HIDDEN: u8 = 0x04;

const TITLE_LABEL: u8 = 0x01;
const TITLE_NAME: u8 = 0x02;

/// Decoded window header block.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct WindowHeader {
    pub window: Window,
    pub kind: u8,
    /// Excel workbooks only (revision 800 and later).
    pub active_sheet: Option<u8>,
}

/// Blocks of one layer. Only block boundaries are known here; each window kind interprets them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LayerBlocks<'a> {
    pub header: Block<'a>,
    /// `(header, text)` pairs.
    pub annotations: Vec<(Block<'a>, Block<'a>)>,
    /// `(header, data)` pairs: column formats for worksheets, curves for graphs.
    pub curves: Vec<(Block<'a>, Block<'a>)>,
    pub axes: Vec<Block<'a>>,
}

pub(crate) fn section_for_window_kind(kind: u8) -> SectionKind {
    match kind {
        KIND_GRAPH => SectionKind::Graph,
        KIND_SPREADSHEET => SectionKind::Spreadsheet,
        KIND_MATRIX => SectionKind::Matrix,
        KIND_EXCEL => SectionKind::Excel,
        _ => SectionKind::Window,
    }
}

/// Look at the window header under the cursor without consuming it.
pub(crate) fn peek_window_kind(cursor: &BinaryCursor<'_>) -> Result<SectionKind, DecodeError> {
    let mut probe = cursor.clone();
    let block = read_block(&mut probe)?;
    require_len(&block, WINDOW_HEADER_MIN_LEN, SectionKind::Window, "window header")?;
    Ok(section_for_window_kind(block.data[KIND_OFFSET]))
}

/// Number of axis blocks that close every graph layer.
pub(crate) fn graph_axis_count(version: &FormatVersion) -> usize {
    if version.is_at_least(FormatRevision::V800) {
        3
    } else {
        2
    }
}

/// Fail with an `Unexpected` error when `block` is shorter than `min`.
pub(crate) fn require_len(
    block: &Block<'_>,
    min: usize,
    kind: SectionKind,
    what: &str,
) -> Result<(), DecodeError> {
    if block.len() < min {
        return Err(DecodeError::unexpected(
            kind,
            block.offset,
            format!("{what} of at least {min} bytes"),
            format!("{} bytes", block.len()),
        ));
    }
    Ok(())
}

pub(crate) fn read_rect(cursor: &mut BinaryCursor<'_>) -> Result<Rect, DecodeError> {
    Ok(Rect::new(
        cursor.read_i16()?,
        cursor.read_i16()?,
        cursor.read_i16()?,
        cursor.read_i16()?,
    ))
}

/// Read and decode the header block of a window of section `kind`.
///
/// The kind byte is checked against `kind` unless `kind` is [`SectionKind::Window`].
pub(crate) fn read_window_header(
    cursor: &mut BinaryCursor<'_>,
    kind: SectionKind,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<WindowHeader, DecodeError> {
    let block = read_block(cursor)?;
    require_len(&block, WINDOW_HEADER_MIN_LEN, kind, "window header")?;

    let found = section_for_window_kind(block.data[KIND_OFFSET]);
    if kind != SectionKind::Window && found != kind {
        return Err(DecodeError::unexpected(
            kind,
            block.offset + KIND_OFFSET,
            format!("{kind} kind byte"),
            format!("0x{:02X} ({found})", block.data[KIND_OFFSET]),
        ));
    }

    decode_window_layout(&block, version, ctx).map(|window| WindowHeader {
        window,
        kind: block.data[KIND_OFFSET],
        active_sheet: (version.is_at_least(FormatRevision::V800)
            && block.len() > ACTIVE_SHEET_OFFSET)
            .then(|| block.data[ACTIVE_SHEET_OFFSET]),
    })
}

/// Window fields of a header block (also used by notes, which share the layout).
pub(crate) fn decode_window_layout(
    block: &Block<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Window, DecodeError> {
    let mut c = block.cursor();
    c.seek(NAME_OFFSET)?;
    let mut window = Window::new(c.read_fixed_string(WINDOW_NAME_LEN, ctx.codepage)?);

    c.seek(FRAME_OFFSET)?;
    window.frame = read_rect(&mut c)?;

    c.seek(STATE_OFFSET)?;
    let state = c.read_u8()?;
    window.state = if state & STATE_MAXIMIZED != 0 {
        WindowState::Maximized
    } else if state & STATE_MINIMIZED != 0 {
        WindowState::Minimized
    } else {
        WindowState::Normal
    };
    window.hidden = version.is_at_least(FormatRevision::V700) && state & STATE_HIDDEN != 0;

    if block.len() > TITLE_OFFSET {
        c.seek(TITLE_OFFSET)?;
        window.title = match c.read_u8()? {
            TITLE_LABEL => WindowTitle::Label,
            TITLE_NAME => WindowTitle::Name,
            _ => WindowTitle::Both,
        };
    }

    if version.is_at_least(FormatRevision::V500) && block.len() >= DATES_MIN_LEN {
        c.seek(CREATED_OFFSET)?;
        let created = c.read_f64()?;
        c.seek(MODIFIED_OFFSET)?;
        let modified = c.read_f64()?;
        window.created = julian_day_to_datetime(created);
        window.modified = julian_day_to_datetime(modified);
        if window.created.is_none() && created != 0.0 {
            ctx.log.warn(
                Some(block.data_offset + CREATED_OFFSET),
                format!("window `{}` has an invalid creation date {created}", window.name),
            );
        }
    }

    Ok(window)
}

fn read_pairs<'a>(
    cursor: &mut BinaryCursor<'a>,
) -> Result<Vec<(Block<'a>, Block<'a>)>, DecodeError> {
    let mut out = Vec::new();
    loop {
        let first = read_block(cursor)?;
        if first.is_end_mark() {
            return Ok(out);
        }
        let second = read_block(cursor)?;
        out.push((first, second));
    }
}

/// Read the layer list that follows a window header, up to and including its end mark.
pub(crate) fn read_layers<'a>(
    cursor: &mut BinaryCursor<'a>,
    axis_blocks: usize,
) -> Result<Vec<LayerBlocks<'a>>, DecodeError> {
    let mut layers = Vec::new();
    loop {
        let header = read_block(cursor)?;
        if header.is_end_mark() {
            return Ok(layers);
        }
        let annotations = read_pairs(cursor)?;
        let curves = read_pairs(cursor)?;
        let axes = (0..axis_blocks)
            .map(|_| read_block(cursor))
            .collect::<Result<Vec<_>, _>>()?;
        layers.push(LayerBlocks {
            header,
            annotations,
            curves,
            axes,
        });
    }
}

/// Text payload with trailing NULs removed.
pub(crate) fn block_text(block: &Block<'_>, codepage: u16) -> String {
    let end = block
        .data
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    crate::strings::decode_ansi(codepage, &block.data[..end])
}
