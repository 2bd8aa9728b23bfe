use crate::blocks::{expect_end_mark, read_block};
use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::version::FormatVersion;

use super::{DecodeContext, Record, SectionKind};

const DECLARED_VERSION_OFFSET: usize = 0x1B;

/// Project-wide header that precedes the dataset list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlobalHeader {
    /// Version number the writer stored in the body (for example `7.0552`).
    pub declared_version: Option<f64>,
}

pub fn decode_global_header(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let block = read_block(cursor)?;
    let declared_version = if block.len() >= DECLARED_VERSION_OFFSET + 8 {
        let mut c = block.cursor();
        c.seek(DECLARED_VERSION_OFFSET)?;
        Some(c.read_f64()?)
    } else {
        None
    };
    expect_end_mark(cursor, SectionKind::GlobalHeader)?;

    if let Some(declared) = declared_version {
        ctx.log.info(
            Some(block.data_offset + DECLARED_VERSION_OFFSET),
            format!("Project header declares version {declared:.4}"),
        );
        // The header line wins; the body value is only a cross-check.
        if declared.is_finite() && (declared - version.as_f64()).abs() >= 1.0 {
            ctx.log.warn(
                Some(block.data_offset + DECLARED_VERSION_OFFSET),
                format!(
                    "declared version {declared:.4} does not match detected version {}",
                    version.revision
                ),
            );
        }
    }

    Ok(Record::GlobalHeader(GlobalHeader { declared_version }))
}
