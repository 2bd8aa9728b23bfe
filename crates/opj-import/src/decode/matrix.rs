use opj_model::{Matrix, MatrixSheet};

use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::version::FormatVersion;

use super::window::{read_layers, read_window_header, require_len};
use super::{DecodeContext, Record, SectionKind};

const COLUMN_COUNT_OFFSET: usize = 0x2B;
const ROW_COUNT_OFFSET: usize = 0x52;
const LAYER_HEADER_MIN_LEN: usize = ROW_COUNT_OFFSET + 2;

/// Dataset name that holds the contents of sheet `index` (0-based) of matrix `window`.
pub(crate) fn matrix_sheet_dataset_name(window: &str, index: usize) -> String {
    if index == 0 {
        window.to_string()
    } else {
        format!("{window}@{}", index + 1)
    }
}

/// Matrix window: one layer per sheet. Cell values arrive later from the matching dataset.
pub fn decode_matrix_window(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let header = read_window_header(cursor, SectionKind::Matrix, version, ctx)?;
    let layers = read_layers(cursor, 0)?;

    let mut matrix = Matrix {
        window: header.window,
        sheets: Vec::with_capacity(layers.len()),
    };
    for (index, layer) in layers.iter().enumerate() {
        require_len(
            &layer.header,
            LAYER_HEADER_MIN_LEN,
            SectionKind::Matrix,
            "matrix layer header",
        )?;
        let mut c = layer.header.cursor();
        c.seek(COLUMN_COUNT_OFFSET)?;
        let columns = c.read_u16()?;
        c.seek(ROW_COUNT_OFFSET)?;
        let rows = c.read_u16()?;
        matrix.sheets.push(MatrixSheet::new(
            matrix_sheet_dataset_name(&matrix.window.name, index),
            rows,
            columns,
        ));
    }
    Ok(Record::Matrix(matrix))
}
