use opj_model::{Excel, SpreadSheet, Window};

use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::version::FormatVersion;

use super::spreadsheet::decode_worksheet_layer;
use super::window::{read_layers, read_window_header};
use super::{DecodeContext, Record, SectionKind};

/// Display name of worksheet `index` (0-based).
pub(crate) fn excel_sheet_name(index: usize) -> String {
    format!("Sheet{}", index + 1)
}

/// Excel workbook window: one layer per worksheet.
pub fn decode_excel_window(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let header = read_window_header(cursor, SectionKind::Excel, version, ctx)?;
    let layers = read_layers(cursor, 0)?;

    let mut excel = Excel {
        window: header.window,
        active_sheet: header.active_sheet.map_or(0, usize::from),
        sheets: Vec::with_capacity(layers.len()),
        loose: false,
    };
    for (index, layer) in layers.iter().enumerate() {
        let (max_rows, columns) = decode_worksheet_layer(layer, SectionKind::Excel, version, ctx)?;
        excel.sheets.push(SpreadSheet {
            window: Window::new(excel_sheet_name(index)),
            max_rows,
            columns,
            loose: false,
        });
    }
    if !excel.sheets.is_empty() && excel.active_sheet >= excel.sheets.len() {
        ctx.log.warn(
            None,
            format!(
                "excel `{}` names active sheet {} of {}; using the first",
                excel.window.name,
                excel.active_sheet,
                excel.sheets.len()
            ),
        );
        excel.active_sheet = 0;
    }
    Ok(Record::Excel(excel))
}
