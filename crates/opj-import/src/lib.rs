//! Legacy Origin project (`.opj`) import support.
//!
//! The importer is best-effort: the header line must be readable, but any section of the body
//! that fails to decode is skipped and recorded in the [`DiagnosticsLog`], so a partially
//! corrupt project still yields whatever could be recovered.
//!
//! ```no_run
//! let file = opj_import::OriginFile::open("project.opj")?;
//! println!("version {:.2}, {} spreadsheets", file.version(), file.spread_count());
//! # Ok::<(), opj_import::ImportError>(())
//! ```

use std::path::{Path, PathBuf};

use opj_model::{
    Excel, Function, Graph, Matrix, Note, Parameter, Project, ProjectTree, SpreadColumn,
    SpreadSheet,
};

mod blocks;
pub mod cursor;
pub mod decode;
pub mod diagnostics;
pub mod errors;
pub mod framing;
mod parser;
mod strings;
pub mod tree_builder;
pub mod version;


pub use cursor::BinaryCursor;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsLog};
pub use errors::{AccessError, CursorError, DecodeError, HeaderError, ImportError, SectionDecodeError};
pub use strings::DEFAULT_CODEPAGE;
pub use version::{detect_format_version, read_version_line, FormatRevision, FormatVersion};

/// Caller-selected decoding options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Windows codepage of 8-bit strings in the file.
    pub codepage: u16,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            codepage: DEFAULT_CODEPAGE,
        }
    }
}

/// Whether every section of the body decoded.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ParseStatus {
    #[default]
    Complete,
    /// Some sections were skipped (or the body could not be followed to its end).
    Partial { errors: Vec<SectionDecodeError> },
}

impl ParseStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, ParseStatus::Complete)
    }

    pub fn errors(&self) -> &[SectionDecodeError] {
        match self {
            ParseStatus::Complete => &[],
            ParseStatus::Partial { errors } => errors,
        }
    }
}

/// Everything one parse produced. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseResult {
    pub project: Project,
    pub version: FormatVersion,
    pub log: DiagnosticsLog,
    pub status: ParseStatus,
}

fn read_file(path: &Path) -> Result<Vec<u8>, ImportError> {
    std::fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Import a project from disk.
pub fn import_opj_path(path: impl AsRef<Path>) -> Result<ParseResult, ImportError> {
    import_opj_bytes_with_options(&read_file(path.as_ref())?, &ParseOptions::default())
}

/// Import a project held in memory.
pub fn import_opj_bytes(bytes: &[u8]) -> Result<ParseResult, ImportError> {
    import_opj_bytes_with_options(bytes, &ParseOptions::default())
}

pub fn import_opj_bytes_with_options(
    bytes: &[u8],
    options: &ParseOptions,
) -> Result<ParseResult, ImportError> {
    let mut log = DiagnosticsLog::new();
    let (version, body_start) = version::detect_from_file(bytes, &mut log)?;
    Ok(parser::parse_project(bytes, body_start, version, options, log))
}

fn indexed<'a, T>(items: &'a [T], index: usize, collection: &'static str) -> Result<&'a T, AccessError> {
    items.get(index).ok_or(AccessError::IndexOutOfRange {
        collection,
        index,
        len: items.len(),
    })
}

/// An opened project file: the bytes, the detected version, and the most recent parse.
#[derive(Debug)]
pub struct OriginFile {
    path: Option<PathBuf>,
    bytes: Vec<u8>,
    body_start: usize,
    version: FormatVersion,
    options: ParseOptions,
    /// Version-detection entries every parse starts from.
    header_log: DiagnosticsLog,
    result: ParseResult,
}

impl OriginFile {
    /// Read `path`, detect its version and parse it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        Self::open_with_options(path, ParseOptions::default())
    }

    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: ParseOptions,
    ) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let mut file = Self::from_bytes_with_options(read_file(path)?, options)?;
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, ImportError> {
        Self::from_bytes_with_options(bytes, ParseOptions::default())
    }

    pub fn from_bytes_with_options(
        bytes: impl Into<Vec<u8>>,
        options: ParseOptions,
    ) -> Result<Self, ImportError> {
        let bytes = bytes.into();
        let mut header_log = DiagnosticsLog::new();
        let (version, body_start) = version::detect_from_file(&bytes, &mut header_log)?;
        let result =
            parser::parse_project(&bytes, body_start, version, &options, header_log.clone());
        Ok(Self {
            path: None,
            bytes,
            body_start,
            version,
            options,
            header_log,
            result,
        })
    }

    /// Decode the body again with the already detected version, replacing the previous result.
    pub fn parse(&mut self) -> ParseStatus {
        self.result = parser::parse_project(
            &self.bytes,
            self.body_start,
            self.version,
            &self.options,
            self.header_log.clone(),
        );
        self.result.status.clone()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Resolved format version as a number, e.g. `7.04`.
    pub fn version(&self) -> f64 {
        self.version.as_f64()
    }

    pub fn format_version(&self) -> &FormatVersion {
        &self.version
    }

    pub fn result(&self) -> &ParseResult {
        &self.result
    }

    pub fn status(&self) -> &ParseStatus {
        &self.result.status
    }

    pub fn project(&self) -> &ProjectTree {
        &self.result.project.tree
    }

    pub fn dataset_count(&self) -> usize {
        self.result.project.datasets.len()
    }

    pub fn dataset(&self, index: usize) -> Result<&SpreadColumn, AccessError> {
        indexed(&self.result.project.datasets, index, "dataset")
    }

    pub fn spread_count(&self) -> usize {
        self.result.project.spreadsheets.len()
    }

    pub fn spread(&self, index: usize) -> Result<&SpreadSheet, AccessError> {
        indexed(&self.result.project.spreadsheets, index, "spreadsheet")
    }

    pub fn matrix_count(&self) -> usize {
        self.result.project.matrices.len()
    }

    pub fn matrix(&self, index: usize) -> Result<&Matrix, AccessError> {
        indexed(&self.result.project.matrices, index, "matrix")
    }

    pub fn function_count(&self) -> usize {
        self.result.project.functions.len()
    }

    pub fn function(&self, index: usize) -> Result<&Function, AccessError> {
        indexed(&self.result.project.functions, index, "function")
    }

    /// Index of the function called `name` (ASCII case-insensitive).
    pub fn function_index(&self, name: &str) -> Option<usize> {
        self.result.project.function_index(name)
    }

    pub fn graph_count(&self) -> usize {
        self.result.project.graphs.len()
    }

    pub fn graph(&self, index: usize) -> Result<&Graph, AccessError> {
        indexed(&self.result.project.graphs, index, "graph")
    }

    pub fn note_count(&self) -> usize {
        self.result.project.notes.len()
    }

    pub fn note(&self, index: usize) -> Result<&Note, AccessError> {
        indexed(&self.result.project.notes, index, "note")
    }

    pub fn excel_count(&self) -> usize {
        self.result.project.excels.len()
    }

    pub fn excel(&self, index: usize) -> Result<&Excel, AccessError> {
        indexed(&self.result.project.excels, index, "excel")
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.result.project.parameters
    }

    /// Diagnostics of the most recent parse, one entry per line.
    pub fn results_log(&self) -> String {
        self.result.log.text()
    }
}
