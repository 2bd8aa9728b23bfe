use opj_model::Parameter;

use crate::blocks::{expect_end_mark, BLOCK_DELIMITER};
use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::strings::decode_ansi;
use crate::version::FormatVersion;

use super::{DecodeContext, Record, SectionKind};

/// Named numeric parameters: `name \n f64 \n` pairs closed by a NUL name and an end mark.
pub fn decode_parameters(
    cursor: &mut BinaryCursor<'_>,
    _version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let mut parameters = Vec::new();
    loop {
        let line = cursor.read_line()?;
        if line.first() == Some(&0) {
            break;
        }
        let name = decode_ansi(ctx.codepage, line);
        let value = cursor.read_f64()?;
        let offset = cursor.absolute_position();
        let found = cursor.read_u8()?;
        if found != BLOCK_DELIMITER {
            return Err(DecodeError::BadDelimiter { offset, found });
        }
        parameters.push(Parameter::new(name, value));
    }
    expect_end_mark(cursor, SectionKind::Parameters)?;
    Ok(Record::Parameters(parameters))
}
