//! Dataset elements: a header block, a data block and a mask block.
//!
//! Worksheet columns, matrix contents and functions are all stored as datasets; the header's
//! data type and the dataset name decide what a dataset becomes.

use opj_model::{CellValue, Function, FunctionKind};

use crate::blocks::{read_block, Block};
use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::strings::decode_nul_padded;
use crate::version::{FormatRevision, FormatVersion};

use super::window::{block_text, require_len};
use super::{DecodeContext, Record, SectionKind};

pub(crate) const DATASET_HEADER_MIN_LEN: usize = 0x71;

const FUNCTION_KIND_OFFSET: usize = 0x0A;
const DATA_TYPE_OFFSET: usize = 0x16;
const TOTAL_POINTS_OFFSET: usize = 0x21;
const BEGIN_OFFSET: usize = 0x25;
const STEP_OFFSET: usize = 0x2D;
const VALUE_SIZE_OFFSET_V350: usize = 0x36;
const VALUE_SIZE_OFFSET: usize = 0x3D;
const FLAGS_OFFSET: usize = 0x3F;
const NAME_OFFSET: usize = 0x58;
const NAME_LEN: usize = 25;

pub const DATA_TYPE_FUNCTION: u16 = 0x6081;
pub const DATA_TYPE_TEXT: u16 = 0x1008;
pub const DATA_TYPE_TEXT_NUMERIC: u16 = 0x2001;
pub const DATA_TYPE_FLOAT: u16 = 0x6803;

const FUNCTION_KIND_POLAR: u16 = 0x1194;
const FLAG_UNSIGNED: u8 = 0x08;

/// One decoded dataset, before it is attached to a worksheet, matrix or the loose list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetRecord {
    pub name: String,
    pub data_type: u16,
    pub value_size: u8,
    pub unsigned: bool,
    pub values: Vec<CellValue>,
    pub masked_rows: Vec<u32>,
}

/// Header fields shared by plain datasets and functions.
struct DatasetHeader {
    name: String,
    data_type: u16,
    function_kind: u16,
    total_points: u32,
    begin: f64,
    step: f64,
    value_size: u8,
    unsigned: bool,
}

fn read_header(
    block: &Block<'_>,
    kind: SectionKind,
    version: &FormatVersion,
    codepage: u16,
) -> Result<DatasetHeader, DecodeError> {
    require_len(block, DATASET_HEADER_MIN_LEN, kind, "dataset header")?;
    let mut c = block.cursor();

    c.seek(FUNCTION_KIND_OFFSET)?;
    let function_kind = c.read_u16()?;
    c.seek(DATA_TYPE_OFFSET)?;
    let data_type = c.read_u16()?;
    c.seek(TOTAL_POINTS_OFFSET)?;
    let total_points = c.read_u32()?;
    let begin = c.read_f64()?;
    let step = c.read_f64()?;

    c.seek(if version.revision == FormatRevision::V350 {
        VALUE_SIZE_OFFSET_V350
    } else {
        VALUE_SIZE_OFFSET
    })?;
    let value_size = c.read_u8()?;

    c.seek(FLAGS_OFFSET)?;
    let unsigned = c.read_u8()? & FLAG_UNSIGNED != 0;

    c.seek(NAME_OFFSET)?;
    let name = c.read_fixed_string(NAME_LEN, codepage)?;

    Ok(DatasetHeader {
        name,
        data_type,
        function_kind,
        total_points,
        begin,
        step,
        value_size,
        unsigned,
    })
}

/// Peek the dataset header under the cursor and say which decoder it needs.
///
/// Functions are datasets of type `0x6081` whose name has no `_` separator.
pub(crate) fn classify_dataset(
    cursor: &BinaryCursor<'_>,
    version: &FormatVersion,
    codepage: u16,
) -> Result<SectionKind, DecodeError> {
    let mut probe = cursor.clone();
    let block = read_block(&mut probe)?;
    let header = read_header(&block, SectionKind::Dataset, version, codepage)?;
    if header.data_type == DATA_TYPE_FUNCTION && !header.name.contains('_') {
        Ok(SectionKind::Function)
    } else {
        Ok(SectionKind::Dataset)
    }
}

fn read_mask(block: &Block<'_>) -> Result<Vec<u32>, DecodeError> {
    let mut c = block.cursor();
    let mut rows = Vec::with_capacity(block.len() / 4);
    while c.remaining() >= 4 {
        rows.push(c.read_u32()?);
    }
    Ok(rows)
}

fn read_numeric(
    c: &mut BinaryCursor<'_>,
    header: &DatasetHeader,
) -> Result<f64, DecodeError> {
    Ok(match (header.value_size, header.unsigned) {
        (8, _) => c.read_f64()?,
        (4, _) if header.data_type == DATA_TYPE_FLOAT => f64::from(c.read_f32()?),
        (4, true) => f64::from(c.read_u32()?),
        (4, false) => f64::from(c.read_i32()?),
        (2, true) => f64::from(c.read_u16()?),
        (2, false) => f64::from(c.read_i16()?),
        (1, true) => f64::from(c.read_u8()?),
        (1, false) => f64::from(c.read_i8()?),
        _ => {
            return Err(DecodeError::unexpected(
                SectionKind::Dataset,
                c.absolute_position(),
                "numeric value size of 1, 2, 4 or 8",
                format!("{}", header.value_size),
            ))
        }
    })
}

fn read_values(
    block: &Block<'_>,
    header: &DatasetHeader,
    ctx: &mut DecodeContext<'_>,
) -> Result<Vec<CellValue>, DecodeError> {
    let size = usize::from(header.value_size);
    if size == 0 {
        return Err(DecodeError::unexpected(
            SectionKind::Dataset,
            block.offset,
            "non-zero value size",
            "0",
        ));
    }
    let rows = block.len() / size;
    if block.len() % size != 0 {
        ctx.log.warn(
            Some(block.data_offset),
            format!(
                "dataset `{}` has {} trailing bytes after {rows} values",
                header.name,
                block.len() % size
            ),
        );
    }

    let mut c = block.cursor();
    let mut values = Vec::with_capacity(rows);
    for _ in 0..rows {
        let cell = c.read_bytes(size)?;
        let mut cell_cursor = BinaryCursor::with_base(cell, c.absolute_position() - size);
        let value = match header.data_type {
            DATA_TYPE_TEXT => match decode_nul_padded(ctx.codepage, cell) {
                text if text.is_empty() => CellValue::Empty,
                text => CellValue::Text(text),
            },
            DATA_TYPE_TEXT_NUMERIC if size > 8 => {
                let flag = cell_cursor.read_u8()?;
                cell_cursor.seek(2)?;
                if flag == 0 {
                    CellValue::from_stored_f64(cell_cursor.read_f64()?)
                } else {
                    match decode_nul_padded(ctx.codepage, &cell[2..]) {
                        text if text.is_empty() => CellValue::Empty,
                        text => CellValue::Text(text),
                    }
                }
            }
            _ => CellValue::from_stored_f64(read_numeric(&mut cell_cursor, header)?),
        };
        values.push(value);
    }
    Ok(values)
}

/// Decode a worksheet column, matrix or loose dataset.
pub fn decode_dataset(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let header_block = read_block(cursor)?;
    let header = read_header(&header_block, SectionKind::Dataset, version, ctx.codepage)?;
    let data = read_block(cursor)?;
    let mask = read_block(cursor)?;

    let values = read_values(&data, &header, ctx)?;
    let masked_rows = read_mask(&mask)?;

    Ok(Record::Dataset(DatasetRecord {
        name: header.name,
        data_type: header.data_type,
        value_size: header.value_size,
        unsigned: header.unsigned,
        values,
        masked_rows,
    }))
}

/// Decode a function dataset: the data block holds the formula text.
pub fn decode_function(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let header_block = read_block(cursor)?;
    let header = read_header(&header_block, SectionKind::Function, version, ctx.codepage)?;
    if header.data_type != DATA_TYPE_FUNCTION {
        return Err(DecodeError::unexpected(
            SectionKind::Function,
            header_block.data_offset + DATA_TYPE_OFFSET,
            format!("data type 0x{DATA_TYPE_FUNCTION:04X}"),
            format!("0x{:04X}", header.data_type),
        ));
    }
    let data = read_block(cursor)?;
    // Functions carry no mask, but the block is always present.
    read_block(cursor)?;

    let end = header.begin + header.step * f64::from(header.total_points.saturating_sub(1));
    Ok(Record::Function(Function {
        name: header.name,
        kind: if header.function_kind == FUNCTION_KIND_POLAR {
            FunctionKind::Polar
        } else {
            FunctionKind::Normal
        },
        formula: block_text(&data, ctx.codepage),
        begin: header.begin,
        end,
        total_points: header.total_points,
        dataset_index: 0,
    }))
}
