//! Section decoders.
//!
//! Each record family has one decoder per range of format revisions. [`decode_section`] picks
//! the decoder from [`DECODERS`] by `(kind, revision)`; decoders branch internally for the
//! smaller layout differences inside their range.

use std::fmt;
use std::ops::RangeInclusive;

use opj_model::{Excel, Function, Graph, Matrix, Note, Parameter, SpreadSheet};

use crate::cursor::BinaryCursor;
use crate::diagnostics::DiagnosticsLog;
use crate::errors::DecodeError;
use crate::version::{FormatRevision, FormatVersion};

pub(crate) mod dataset;
pub(crate) mod excel;
pub(crate) mod global;
pub(crate) mod graph;
pub(crate) mod matrix;
pub(crate) mod note;
pub(crate) mod parameters;
pub(crate) mod project;
pub(crate) mod spreadsheet;
pub(crate) mod window;

pub use dataset::{decode_dataset, decode_function, DatasetRecord};
pub use excel::decode_excel_window;
pub use global::{decode_global_header, GlobalHeader};
pub use graph::decode_graph_window;
pub use matrix::decode_matrix_window;
pub use note::{decode_legacy_note, decode_note};
pub use parameters::decode_parameters;
pub use project::{decode_project_tree, FolderInfo, TreeItem, TreeRecord, TreeSection};
pub use spreadsheet::decode_spreadsheet_window;

/// Record families found in the file body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    GlobalHeader,
    Dataset,
    Function,
    Spreadsheet,
    Matrix,
    Graph,
    Excel,
    /// A window whose kind byte is not one of the known window kinds.
    Window,
    Parameters,
    Note,
    ProjectTree,
}

impl SectionKind {
    pub fn is_window(self) -> bool {
        matches!(
            self,
            SectionKind::Spreadsheet
                | SectionKind::Matrix
                | SectionKind::Graph
                | SectionKind::Excel
                | SectionKind::Window
        )
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SectionKind::GlobalHeader => "global header",
            SectionKind::Dataset => "dataset",
            SectionKind::Function => "function",
            SectionKind::Spreadsheet => "spreadsheet window",
            SectionKind::Matrix => "matrix window",
            SectionKind::Graph => "graph window",
            SectionKind::Excel => "excel window",
            SectionKind::Window => "window",
            SectionKind::Parameters => "parameter list",
            SectionKind::Note => "note",
            SectionKind::ProjectTree => "project tree",
        })
    }
}

/// One decoded section.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    GlobalHeader(GlobalHeader),
    Dataset(DatasetRecord),
    Function(Function),
    Spreadsheet(SpreadSheet),
    Matrix(Matrix),
    Graph(Graph),
    Excel(Excel),
    Parameters(Vec<Parameter>),
    Note(Note),
    ProjectTree(TreeSection),
}

/// Per-parse state handed to every decoder.
#[derive(Debug)]
pub struct DecodeContext<'l> {
    pub codepage: u16,
    pub log: &'l mut DiagnosticsLog,
}

impl<'l> DecodeContext<'l> {
    pub fn new(codepage: u16, log: &'l mut DiagnosticsLog) -> Self {
        Self { codepage, log }
    }
}

pub type DecodeFn = fn(
    &mut BinaryCursor<'_>,
    &FormatVersion,
    &mut DecodeContext<'_>,
) -> Result<Record, DecodeError>;

pub struct DecoderEntry {
    pub kind: SectionKind,
    pub revisions: RangeInclusive<FormatRevision>,
    pub decode: DecodeFn,
}

const FIRST: FormatRevision = FormatRevision::V350;
const LAST: FormatRevision = FormatRevision::V941;

/// `(kind, revision range) -> decoder`. Ranges of one kind never overlap.
pub static DECODERS: &[DecoderEntry] = &[
    DecoderEntry {
        kind: SectionKind::GlobalHeader,
        revisions: FIRST..=LAST,
        decode: decode_global_header,
    },
    DecoderEntry {
        kind: SectionKind::Dataset,
        revisions: FIRST..=LAST,
        decode: decode_dataset,
    },
    DecoderEntry {
        kind: SectionKind::Function,
        revisions: FIRST..=LAST,
        decode: decode_function,
    },
    DecoderEntry {
        kind: SectionKind::Spreadsheet,
        revisions: FIRST..=LAST,
        decode: decode_spreadsheet_window,
    },
    DecoderEntry {
        kind: SectionKind::Matrix,
        revisions: FIRST..=LAST,
        decode: decode_matrix_window,
    },
    DecoderEntry {
        kind: SectionKind::Graph,
        revisions: FIRST..=LAST,
        decode: decode_graph_window,
    },
    DecoderEntry {
        kind: SectionKind::Excel,
        revisions: FormatRevision::V800..=LAST,
        decode: decode_excel_window,
    },
    DecoderEntry {
        kind: SectionKind::Parameters,
        revisions: FIRST..=LAST,
        decode: decode_parameters,
    },
    DecoderEntry {
        kind: SectionKind::Note,
        revisions: FIRST..=FormatRevision::V500,
        decode: decode_legacy_note,
    },
    DecoderEntry {
        kind: SectionKind::Note,
        revisions: FormatRevision::V600..=LAST,
        decode: decode_note,
    },
    DecoderEntry {
        kind: SectionKind::ProjectTree,
        revisions: FormatRevision::V600..=LAST,
        decode: decode_project_tree,
    },
];

pub fn find_decoder(kind: SectionKind, revision: FormatRevision) -> Option<DecodeFn> {
    DECODERS
        .iter()
        .find(|entry| entry.kind == kind && entry.revisions.contains(&revision))
        .map(|entry| entry.decode)
}

/// Decode one section of `kind` starting at the cursor.
///
/// On success the cursor sits on the first byte after the section.
pub fn decode_section(
    kind: SectionKind,
    cursor: &mut BinaryCursor<'_>,
    version: &FormatVersion,
    ctx: &mut DecodeContext<'_>,
) -> Result<Record, DecodeError> {
    let decode = find_decoder(kind, version.revision).ok_or(DecodeError::Unsupported {
        kind,
        revision: version.revision,
    })?;
    log::debug!(
        "decoding {kind} at offset {} (revision {})",
        cursor.absolute_position(),
        version.revision
    );
    decode(cursor, version, ctx)
}
