//! Project tree section (revision 6.0 and later).
//!
//! The folder hierarchy is nested in the file. The decoder flattens it into pre-order
//! [`TreeRecord`]s carrying their depth; the tree builder turns those back into a tree.

use chrono::{DateTime, Utc};
use opj_model::julian_day_to_datetime;

use crate::blocks::{expect_end_mark, read_block, read_block_size, read_count_block};
use crate::cursor::BinaryCursor;
use crate::errors::DecodeError;
use crate::version::{FormatRevision, FormatVersion};

use super::window::require_len;
use super::{DecodeContext, Record, SectionKind};

const FOLDER_HEADER_MIN_LEN: usize = 0x20;
const FOLDER_ACTIVE_OFFSET: usize = 0x02;
const FOLDER_CREATED_OFFSET: usize = 0x10;
const FOLDER_MODIFIED_OFFSET: usize = 0x18;

/// Leaf object type of notes; every other type refers to a window.
pub const LEAF_TYPE_NOTE: u32 = 0x0010_0000;
const LEAF_FLAG_HIDDEN: u32 = 0x01;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FolderInfo {
    pub name: String,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TreeItem {
    Folder(FolderInfo),
    /// Reference to a note (by note index) or a window (by window order).
    Leaf {
        object_type: u32,
        object_id: u32,
        hidden: bool,
    },
}

/// One flattened tree entry. Depth 0 entries are children of the project root.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeRecord {
    pub depth: usize,
    /// File offset of the entry's first block.
    pub offset: usize,
    pub item: TreeItem,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeSection {
    /// The project folder itself.
    pub root: FolderInfo,
    pub entries: Vec<TreeRecord>,
}

fn read_leaf(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    depth: usize,
) -> Result<TreeRecord, DecodeError> {
    let offset = cursor.absolute_position();
    read_block(cursor)?;
    let data = read_block(cursor)?;
    read_block(cursor)?;

    let with_flags = version.is_at_least(FormatRevision::V931);
    require_len(
        &data,
        if with_flags { 12 } else { 8 },
        SectionKind::ProjectTree,
        "project leaf",
    )?;
    let mut c = data.cursor();
    let object_type = c.read_u32()?;
    let object_id = c.read_u32()?;
    let hidden = with_flags && c.read_u32()? & LEAF_FLAG_HIDDEN != 0;

    Ok(TreeRecord {
        depth,
        offset,
        item: TreeItem::Leaf {
            object_type,
            object_id,
            hidden,
        },
    })
}

/// Read a folder up to (not including) its subfolders. Returns the folder and its subfolder count.
///
/// Folders at `level > 0` are appended to `entries` ahead of their leaves; the project folder
/// (`level == 0`) is only returned.
fn read_folder_head(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    codepage: u16,
    level: usize,
    entries: &mut Vec<TreeRecord>,
) -> Result<(FolderInfo, u32), DecodeError> {
    let offset = cursor.absolute_position();
    let header = read_block(cursor)?;
    require_len(
        &header,
        FOLDER_HEADER_MIN_LEN,
        SectionKind::ProjectTree,
        "folder header",
    )?;
    let mut c = header.cursor();
    c.seek(FOLDER_ACTIVE_OFFSET)?;
    let active = c.read_u8()? != 0;
    c.seek(FOLDER_CREATED_OFFSET)?;
    let created = julian_day_to_datetime(c.read_f64()?);
    c.seek(FOLDER_MODIFIED_OFFSET)?;
    let modified = julian_day_to_datetime(c.read_f64()?);

    let name = read_block(cursor)?;
    let name = name.cursor().read_cstring(name.len(), codepage)?;

    let properties = read_block_size(cursor)?;
    for _ in 0..properties {
        read_block(cursor)?;
    }

    let info = FolderInfo {
        name,
        created,
        modified,
        active,
    };
    if level > 0 {
        entries.push(TreeRecord {
            depth: level - 1,
            offset,
            item: TreeItem::Folder(info.clone()),
        });
    }

    let files = read_count_block(cursor, SectionKind::ProjectTree)?;
    for _ in 0..files {
        entries.push(read_leaf(cursor, version, level)?);
    }
    let subfolders = read_count_block(cursor, SectionKind::ProjectTree)?;
    Ok((info, subfolders))
}

pub fn decode_project_tree(
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    read_block(cursor)?;
    read_block(cursor)?;

    let mut entries = Vec::new();
    let (root, subfolders) = read_folder_head(cursor, version, ctx.codepage, 0, &mut entries)?;

    // Subfolders still to read for each open folder, innermost last.
    let mut pending = vec![subfolders];
    while let Some(remaining) = pending.last_mut() {
        if *remaining == 0 {
            pending.pop();
            expect_end_mark(cursor, SectionKind::ProjectTree)?;
            continue;
        }
        *remaining -= 1;
        let level = pending.len();
        let (_, subfolders) = read_folder_head(cursor, version, ctx.codepage, level, &mut entries)?;
        pending.push(subfolders);
    }

    read_block(cursor)?;
    Ok(Record::ProjectTree(TreeSection { root, entries }))
}
