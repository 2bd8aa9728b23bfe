use opj_model::{ColumnType, SpreadColumn, SpreadSheet, ValueType};

use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::version::{FormatRevision, FormatVersion};

use super::window::{block_text, read_layers, read_window_header, require_len, LayerBlocks};
use super::{DecodeContext, Record, SectionKind};

const MAX_ROWS_OFFSET: usize = 0x2B;

const COLUMN_TYPE_OFFSET: usize = 0x11;
const COLUMN_NAME_OFFSET: usize = 0x12;
const COLUMN_NAME_LEN: usize = 25;
const VALUE_TYPE_OFFSET: usize = 0x3C;
const WIDTH_OFFSET: usize = 0x4C;
const COLUMN_FORMAT_MIN_LEN: usize = WIDTH_OFFSET + 2;

fn column_type(code: u8) -> ColumnType {
    match code {
        3 => ColumnType::X,
        0 => ColumnType::Y,
        5 => ColumnType::Z,
        6 => ColumnType::XError,
        2 => ColumnType::YError,
        4 => ColumnType::Label,
        _ => ColumnType::None,
    }
}

/// Max row count and column formats of a worksheet layer (spreadsheets and excel sheets).
///
/// Columns carry no data yet; their datasets are attached when the project is assembled.
pub(crate) fn decode_worksheet_layer(
    layer: &LayerBlocks<'_>,
    kind: SectionKind,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<(u32, Vec<SpreadColumn>), DecodeError> {
    let wide_rows = version.is_at_least(FormatRevision::V600);
    let header_min = MAX_ROWS_OFFSET + if wide_rows { 4 } else { 2 };
    require_len(&layer.header, header_min, kind, "worksheet layer header")?;

    let mut c = layer.header.cursor();
    c.seek(MAX_ROWS_OFFSET)?;
    let max_rows = if wide_rows {
        c.read_u32()?
    } else {
        u32::from(c.read_u16()?)
    };

    let mut columns = Vec::with_capacity(layer.curves.len());
    for (format, data) in &layer.curves {
        require_len(format, COLUMN_FORMAT_MIN_LEN, kind, "column format")?;
        let mut c = format.cursor();
        c.seek(COLUMN_TYPE_OFFSET)?;
        let code = c.read_u8()?;
        let name = c.read_fixed_string(COLUMN_NAME_LEN, ctx.codepage)?;
        c.seek(VALUE_TYPE_OFFSET)?;
        let value_type = ValueType::from_code(c.read_u8()?);
        c.seek(WIDTH_OFFSET)?;
        let width = c.read_u16()? / 10;

        let mut column = SpreadColumn::new(name, String::new(), 0);
        column.column_type = column_type(code);
        column.value_type = value_type;
        column.width = width;

        let text = block_text(data, ctx.codepage);
        if version.is_at_least(FormatRevision::V700) {
            let mut parts = text.splitn(3, "\r\n");
            column.long_name = parts.next().unwrap_or_default().to_string();
            column.units = parts.next().unwrap_or_default().to_string();
            column.comment = parts.next().unwrap_or_default().to_string();
        } else {
            column.comment = text;
        }
        columns.push(column);
    }
    Ok((max_rows, columns))
}

pub fn decode_spreadsheet_window(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let header = read_window_header(cursor, SectionKind::Spreadsheet, version, ctx)?;
    let layers = read_layers(cursor, 0)?;

    let mut sheet = SpreadSheet {
        window: header.window,
        ..SpreadSheet::default()
    };
    if let Some((first, rest)) = layers.split_first() {
        let (max_rows, columns) =
            decode_worksheet_layer(first, SectionKind::Spreadsheet, version, ctx)?;
        sheet.max_rows = max_rows;
        sheet.columns = columns;
        if !rest.is_empty() {
            ctx.log.warn(
                Some(rest[0].header.offset),
                format!(
                    "spreadsheet `{}` has {} extra layers; ignoring them",
                    sheet.window.name,
                    rest.len()
                ),
            );
        }
    }
    Ok(Record::Spreadsheet(sheet))
}
