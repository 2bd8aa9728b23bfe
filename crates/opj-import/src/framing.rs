//! Framing-only scan of sections.
//!
//! Framing follows block boundaries without interpreting payloads, so the parser can step over
//! a section whose contents fail to decode and carry on with the next one.

use std::ops::Range;

use crate::blocks::{expect_end_mark, read_block, read_block_size, read_count_block, BLOCK_DELIMITER};
use crate::cursor::BinaryCursor;
use crate::decode::window::{graph_axis_count, read_layers};
use crate::decode::SectionKind;
use crate::errors::DecodeError;
use crate::version::{FormatRevision, FormatVersion};

/// Find the extent of the `kind` section that starts at the cursor.
///
/// Returns positions relative to the cursor's buffer. The cursor itself is not moved.
pub fn frame_section(
    kind: SectionKind,
    cursor: &BinaryCursor<'_>,
    version: &FormatVersion,
) -> Result<Range<usize>, DecodeError> {
    let mut c = cursor.clone();
    let start = c.position();
    match kind {
        SectionKind::GlobalHeader => {
            read_block(&mut c)?;
            expect_end_mark(&mut c, kind)?;
        }
        SectionKind::Dataset | SectionKind::Function => {
            for _ in 0..3 {
                read_block(&mut c)?;
            }
        }
        SectionKind::Graph => {
            read_block(&mut c)?;
            read_layers(&mut c, graph_axis_count(version))?;
        }
        SectionKind::Spreadsheet | SectionKind::Matrix | SectionKind::Excel | SectionKind::Window => {
            read_block(&mut c)?;
            read_layers(&mut c, 0)?;
        }
        SectionKind::Parameters => frame_parameters(&mut c)?,
        SectionKind::Note => {
            let blocks = if version.is_at_least(FormatRevision::V600) {
                3
            } else {
                2
            };
            for _ in 0..blocks {
                read_block(&mut c)?;
            }
        }
        SectionKind::ProjectTree => frame_project_tree(&mut c)?,
    }
    Ok(start..c.position())
}

fn frame_parameters(c: &mut BinaryCursor<'_>) -> Result<(), DecodeError> {
    loop {
        let line = c.read_line()?;
        if line.first() == Some(&0) {
            break;
        }
        c.skip(8)?;
        let offset = c.absolute_position();
        let found = c.read_u8()?;
        if found != BLOCK_DELIMITER {
            return Err(DecodeError::BadDelimiter { offset, found });
        }
    }
    expect_end_mark(c, SectionKind::Parameters)
}

/// Blocks of one folder up to its subfolder count.
fn frame_folder_head(c: &mut BinaryCursor<'_>) -> Result<u32, DecodeError> {
    read_block(c)?;
    read_block(c)?;
    for _ in 0..read_block_size(c)? {
        read_block(c)?;
    }
    for _ in 0..read_count_block(c, SectionKind::ProjectTree)? {
        for _ in 0..3 {
            read_block(c)?;
        }
    }
    read_count_block(c, SectionKind::ProjectTree)
}

fn frame_project_tree(c: &mut BinaryCursor<'_>) -> Result<(), DecodeError> {
    read_block(c)?;
    read_block(c)?;
    let mut pending = vec![frame_folder_head(c)?];
    while let Some(remaining) = pending.last_mut() {
        if *remaining == 0 {
            pending.pop();
            expect_end_mark(c, SectionKind::ProjectTree)?;
        } else {
            *remaining -= 1;
            pending.push(frame_folder_head(c)?);
        }
    }
    read_block(c)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::encode_block;

    #[test]
    fn frames_dataset_without_decoding() {
        // Header too short to decode, but the framing is intact.
        let bytes = [
            encode_block(&[0u8; 4]),
            encode_block(&[1u8; 16]),
            encode_block(b""),
            encode_block(b"next"),
        ]
        .concat();
        let version = FormatVersion::for_revision(FormatRevision::V704);
        let c = BinaryCursor::new(&bytes);
        let range = frame_section(SectionKind::Dataset, &c, &version).unwrap();
        assert_eq!(range, 0..10 + 22 + 5);
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn note_block_count_depends_on_revision() {
        let bytes = [encode_block(b"h"), encode_block(b"n"), encode_block(b"c")].concat();
        let c = BinaryCursor::new(&bytes);
        let old = frame_section(
            SectionKind::Note,
            &c,
            &FormatVersion::for_revision(FormatRevision::V500),
        )
        .unwrap();
        let new = frame_section(
            SectionKind::Note,
            &c,
            &FormatVersion::for_revision(FormatRevision::V600),
        )
        .unwrap();
        assert_eq!(old.end, 14);
        assert_eq!(new.end, bytes.len());
    }

    #[test]
    fn truncated_window_fails_to_frame() {
        let bytes = [encode_block(&[0u8; 0x40]), encode_block(&[0u8; 0x30])].concat();
        let c = BinaryCursor::new(&bytes);
        let err = frame_section(
            SectionKind::Spreadsheet,
            &c,
            &FormatVersion::for_revision(FormatRevision::V704),
        )
        .unwrap_err();
        assert!(err.is_truncation());
    }
}
