//! Whole-file decoding: walks the section lists, skips sections that fail to decode, and
//! assembles the decoded records into a [`Project`].

use opj_model::{
    CellValue, Excel, NodeId, NodeKind, Note, Project, ProjectNode, ProjectTree, SpreadColumn,
    SpreadSheet, ValueType, Window,
};

use crate::blocks::read_block_size;
use crate::cursor::BinaryCursor;
use crate::decode::dataset::{classify_dataset, DATA_TYPE_TEXT};
use crate::decode::excel::excel_sheet_name;
use crate::decode::matrix::matrix_sheet_dataset_name;
use crate::decode::project::LEAF_TYPE_NOTE;
use crate::decode::window::peek_window_kind;
use crate::decode::{
    decode_section, DatasetRecord, DecodeContext, Record, SectionKind, TreeItem, TreeSection,
};
use crate::diagnostics::DiagnosticsLog;
use crate::errors::{DecodeError, SectionDecodeError};
use crate::framing::frame_section;
use crate::strings::unsupported_codepage_message;
use crate::tree_builder::{NodeDescriptor, TreeBuilder};
use crate::version::{FormatRevision, FormatVersion};
use crate::{ParseOptions, ParseResult, ParseStatus};

/// Highest excel sheet number a `Book@N_Column` dataset name may route to.
const MAX_EXCEL_SHEETS: usize = 4096;

/// Outcome of one list element whose extent could be framed.
enum Element {
    Decoded(Record),
    Skipped,
}

/// Where a window of the window list ended up.
#[derive(Clone, Copy)]
struct WindowSlot {
    kind: NodeKind,
    index: usize,
}

struct Parser<'a> {
    bytes: &'a [u8],
    version: FormatVersion,
    codepage: u16,
    log: DiagnosticsLog,
    errors: Vec<SectionDecodeError>,

    dataset_count: usize,
    datasets: Vec<(usize, DatasetRecord)>,
    project: Project,
    /// Window-list order; `None` for windows that were skipped.
    windows: Vec<Option<Record>>,
    /// Note-list order; `None` for notes that were skipped.
    notes: Vec<Option<Note>>,
    tree: Option<TreeSection>,
}

/// Decode the body of a file whose header has already been read.
///
/// `log` already holds the version-detection entries.
pub(crate) fn parse_project(
    bytes: &[u8],
    body_start: usize,
    version: FormatVersion,
    options: &ParseOptions,
    log: DiagnosticsLog,
) -> ParseResult {
    let mut parser = Parser {
        bytes,
        version,
        codepage: options.codepage,
        log,
        errors: Vec::new(),
        dataset_count: 0,
        datasets: Vec::new(),
        project: Project::default(),
        windows: Vec::new(),
        notes: Vec::new(),
        tree: None,
    };
    if let Some(message) = unsupported_codepage_message(parser.codepage) {
        parser.log.warn(None, message);
    }

    let mut cursor = BinaryCursor::new(bytes);
    let framed = cursor
        .seek(body_start)
        .map_err(|source| SectionDecodeError {
            kind: SectionKind::GlobalHeader,
            offset: body_start,
            source: source.into(),
        })
        .and_then(|()| parser.read_sections(&mut cursor));

    match framed {
        Ok(()) => {
            let trailing = cursor.remaining();
            if trailing > 0 {
                parser.log.info(
                    Some(cursor.absolute_position()),
                    format!("{trailing} trailing bytes (attachments) not decoded"),
                );
            }
        }
        Err(err) => {
            parser.log.section_skipped(&err);
            parser.log.warn(
                Some(err.offset),
                format!(
                    "cannot locate further sections; {} bytes left undecoded",
                    parser.bytes.len().saturating_sub(err.offset)
                ),
            );
            parser.errors.push(err);
        }
    }

    parser.assemble();
    let Parser {
        project,
        log,
        errors,
        ..
    } = parser;
    let status = if errors.is_empty() {
        ParseStatus::Complete
    } else {
        ParseStatus::Partial { errors }
    };
    ParseResult {
        project,
        version,
        log,
        status,
    }
}

impl<'a> Parser<'a> {
    fn read_sections(&mut self, cursor: &mut BinaryCursor<'a>) -> Result<(), SectionDecodeError> {
        self.element(SectionKind::GlobalHeader, cursor, None)?;
        self.read_datasets(cursor)?;
        self.read_windows(cursor)?;

        if let Element::Decoded(Record::Parameters(parameters)) =
            self.element(SectionKind::Parameters, cursor, None)?
        {
            self.project.parameters = parameters;
        }

        self.read_notes(cursor)?;

        if self.version.is_at_least(FormatRevision::V600) {
            if let Element::Decoded(Record::ProjectTree(tree)) =
                self.element(SectionKind::ProjectTree, cursor, None)?
            {
                self.tree = Some(tree);
            }
        }
        Ok(())
    }

    /// Consume the end mark that closes a list, if it is next.
    fn at_list_end(
        &self,
        cursor: &mut BinaryCursor<'a>,
        kind: SectionKind,
    ) -> Result<bool, SectionDecodeError> {
        let mut probe = cursor.clone();
        match read_block_size(&mut probe) {
            Ok(0) => {
                *cursor = probe;
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(source) => Err(SectionDecodeError {
                kind,
                offset: cursor.absolute_position(),
                source,
            }),
        }
    }

    /// Frame, decode and step over one section.
    ///
    /// A section that frames but fails to decode is logged and skipped. A framing failure is
    /// returned: nothing after it can be located.
    fn element(
        &mut self,
        kind: SectionKind,
        cursor: &mut BinaryCursor<'a>,
        precheck: Option<DecodeError>,
    ) -> Result<Element, SectionDecodeError> {
        let offset = cursor.absolute_position();
        let frame = frame_section(kind, cursor, &self.version).map_err(|source| {
            SectionDecodeError {
                kind,
                offset,
                source,
            }
        })?;

        let mut section = cursor.clone();
        let decoded = match precheck {
            Some(err) => Err(err),
            None => {
                let mut ctx = DecodeContext::new(self.codepage, &mut self.log);
                decode_section(kind, &mut section, &self.version, &mut ctx)
            }
        };
        cursor.seek(frame.end).map_err(|source| SectionDecodeError {
            kind,
            offset,
            source: source.into(),
        })?;

        match decoded {
            Ok(record) => {
                if section.position() != frame.end {
                    self.log.warn(
                        Some(offset),
                        format!(
                            "{kind} decoded {} bytes but spans {}",
                            section.position().saturating_sub(frame.start),
                            frame.len()
                        ),
                    );
                }
                Ok(Element::Decoded(record))
            }
            Err(source) => {
                let err = SectionDecodeError {
                    kind,
                    offset,
                    source,
                };
                self.log.section_skipped(&err);
                self.errors.push(err);
                Ok(Element::Skipped)
            }
        }
    }

    fn read_datasets(&mut self, cursor: &mut BinaryCursor<'a>) -> Result<(), SectionDecodeError> {
        while !self.at_list_end(cursor, SectionKind::Dataset)? {
            let (kind, precheck) = match classify_dataset(cursor, &self.version, self.codepage) {
                Ok(kind) => (kind, None),
                Err(err) => (SectionKind::Dataset, Some(err)),
            };
            let ordinal = self.dataset_count;
            self.dataset_count += 1;
            match self.element(kind, cursor, precheck)? {
                Element::Decoded(Record::Dataset(dataset)) => self.datasets.push((ordinal, dataset)),
                Element::Decoded(Record::Function(mut function)) => {
                    function.dataset_index = ordinal;
                    self.project.functions.push(function);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn read_windows(&mut self, cursor: &mut BinaryCursor<'a>) -> Result<(), SectionDecodeError> {
        while !self.at_list_end(cursor, SectionKind::Window)? {
            let (kind, precheck) = match peek_window_kind(cursor) {
                Ok(kind) => (kind, None),
                Err(err) => (SectionKind::Window, Some(err)),
            };
            match self.element(kind, cursor, precheck)? {
                Element::Decoded(record) => self.windows.push(Some(record)),
                Element::Skipped => self.windows.push(None),
            }
        }
        Ok(())
    }

    fn read_notes(&mut self, cursor: &mut BinaryCursor<'a>) -> Result<(), SectionDecodeError> {
        while !self.at_list_end(cursor, SectionKind::Note)? {
            match self.element(SectionKind::Note, cursor, None)? {
                Element::Decoded(Record::Note(note)) => self.notes.push(Some(note)),
                _ => self.notes.push(None),
            }
        }
        Ok(())
    }

    fn assemble(&mut self) {
        let window_slots = self.place_windows();
        self.route_datasets();
        self.drop_columns_without_data();

        let note_slots: Vec<Option<usize>> = std::mem::take(&mut self.notes)
            .into_iter()
            .map(|note| {
                note.map(|note| {
                    self.project.notes.push(note);
                    self.project.notes.len() - 1
                })
            })
            .collect();

        self.project.tree = match self.tree.take() {
            Some(section) => self.build_encoded_tree(section, &window_slots, &note_slots),
            None => {
                if self.version.is_at_least(FormatRevision::V600) {
                    self.log.warn(
                        None,
                        "project tree unavailable; listing windows and notes at the top level",
                    );
                }
                self.build_flat_tree(&window_slots, &note_slots)
            }
        };
    }

    /// Move decoded windows into their collections, remembering where each went.
    fn place_windows(&mut self) -> Vec<Option<WindowSlot>> {
        let project = &mut self.project;
        std::mem::take(&mut self.windows)
            .into_iter()
            .map(|record| {
                let (kind, index) = match record? {
                    Record::Spreadsheet(sheet) => {
                        project.spreadsheets.push(sheet);
                        (NodeKind::SpreadSheet, project.spreadsheets.len() - 1)
                    }
                    Record::Matrix(matrix) => {
                        project.matrices.push(matrix);
                        (NodeKind::Matrix, project.matrices.len() - 1)
                    }
                    Record::Graph(graph) => {
                        project.graphs.push(graph);
                        (NodeKind::Graph, project.graphs.len() - 1)
                    }
                    Record::Excel(excel) => {
                        project.excels.push(excel);
                        (NodeKind::Excel, project.excels.len() - 1)
                    }
                    _ => return None,
                };
                Some(WindowSlot { kind, index })
            })
            .collect()
    }

    fn route_datasets(&mut self) {
        let excel_names = self.version.is_at_least(FormatRevision::V800);
        for (ordinal, dataset) in std::mem::take(&mut self.datasets) {
            let Some((book, column)) = dataset.name.split_once('_') else {
                self.route_loose_dataset(ordinal, dataset);
                continue;
            };
            let (book, column) = (book.to_string(), column.to_string());

            let excel_sheet = excel_names
                .then(|| book.split_once('@'))
                .flatten()
                .and_then(|(base, sheet)| Some((base.to_string(), sheet.parse::<usize>().ok()?)))
                .filter(|&(_, sheet)| sheet >= 1);

            let past_limit = excel_sheet.as_ref().map(|&(_, s)| s).filter(|&s| s > MAX_EXCEL_SHEETS);
            if let Some(sheet) = past_limit {
                self.log.warn(
                    None,
                    format!(
                        "dataset `{}` names excel sheet {sheet}, past the {MAX_EXCEL_SHEETS} sheet limit; kept loose",
                        dataset.name
                    ),
                );
                self.route_loose_dataset(ordinal, dataset);
                continue;
            }

            let target = match excel_sheet {
                Some((base, sheet)) => self.excel_sheet_mut(&base, sheet - 1),
                None => match self.project.spreadsheet_index(&book) {
                    Some(index) => &mut self.project.spreadsheets[index],
                    None if excel_names && self.project.excel_index(&book).is_some() => {
                        self.excel_sheet_mut(&book, 0)
                    }
                    None => {
                        self.log.info(
                            None,
                            format!("dataset `{}` has no window; adding loose workbook `{book}`", dataset.name),
                        );
                        let mut sheet = SpreadSheet::new(book);
                        sheet.loose = true;
                        self.project.spreadsheets.push(sheet);
                        let last = self.project.spreadsheets.len() - 1;
                        &mut self.project.spreadsheets[last]
                    }
                },
            };
            attach_column(target, column, ordinal, dataset);
        }
    }

    /// Sheet `index` of excel workbook `name`, creating the workbook or sheets if missing.
    fn excel_sheet_mut(&mut self, name: &str, index: usize) -> &mut SpreadSheet {
        let excel_index = match self.project.excel_index(name) {
            Some(i) => i,
            None => {
                self.log.info(
                    None,
                    format!("datasets of excel `{name}` have no window; adding loose workbook"),
                );
                let mut excel = Excel::new(name);
                excel.loose = true;
                self.project.excels.push(excel);
                self.project.excels.len() - 1
            }
        };
        let excel = &mut self.project.excels[excel_index];
        while excel.sheets.len() <= index {
            let mut sheet = SpreadSheet::new(excel_sheet_name(excel.sheets.len()));
            sheet.loose = true;
            excel.sheets.push(sheet);
        }
        &mut excel.sheets[index]
    }

    fn route_loose_dataset(&mut self, ordinal: usize, dataset: DatasetRecord) {
        let multi_sheet = self.version.is_at_least(FormatRevision::V800);
        let claim = self.project.matrices.iter().enumerate().find_map(|(m, matrix)| {
            matrix
                .sheets
                .iter()
                .enumerate()
                .take(if multi_sheet { usize::MAX } else { 1 })
                .find(|(s, sheet)| {
                    sheet.dataset_index.is_none()
                        && matrix_sheet_dataset_name(&matrix.window.name, *s) == dataset.name
                })
                .map(|(s, _)| (m, s))
        });

        let Some((m, s)) = claim else {
            self.project
                .datasets
                .push(column_from_dataset(dataset.name.clone(), ordinal, dataset));
            return;
        };

        let sheet = &mut self.project.matrices[m].sheets[s];
        let expected = usize::from(sheet.row_count) * usize::from(sheet.column_count);
        if dataset.values.len() != expected {
            self.log.warn(
                None,
                format!(
                    "matrix dataset `{}` holds {} values for a {}x{} sheet",
                    dataset.name,
                    dataset.values.len(),
                    sheet.row_count,
                    sheet.column_count
                ),
            );
        }
        sheet.dataset_index = Some(ordinal);
        sheet.data = dataset.values.iter().map(CellValue::as_number).collect();
    }

    /// Column formats that never received a dataset carry nothing to show.
    fn drop_columns_without_data(&mut self) {
        let log = &mut self.log;
        let sheets = self
            .project
            .spreadsheets
            .iter_mut()
            .chain(self.project.excels.iter_mut().flat_map(|e| e.sheets.iter_mut()));
        for sheet in sheets {
            let name = sheet.window.name.clone();
            sheet.columns.retain(|column| {
                let keep = !column.dataset_name.is_empty();
                if !keep {
                    log.warn(
                        None,
                        format!("column `{}` of `{name}` has no dataset; dropped", column.name),
                    );
                }
                keep
            });
        }
    }

    fn window_of(&self, slot: WindowSlot) -> Option<&Window> {
        let project = &self.project;
        match slot.kind {
            NodeKind::SpreadSheet => project.spreadsheets.get(slot.index).map(|s| &s.window),
            NodeKind::Matrix => project.matrices.get(slot.index).map(|m| &m.window),
            NodeKind::Graph => project.graphs.get(slot.index).map(|g| &g.window),
            NodeKind::Excel => project.excels.get(slot.index).map(|e| &e.window),
            NodeKind::Note => project.notes.get(slot.index).map(|n| &n.window),
            NodeKind::Folder => None,
        }
    }

    fn leaf_node(&self, slot: WindowSlot, hidden: bool) -> Option<ProjectNode> {
        let window = self.window_of(slot)?;
        let mut node = ProjectNode::new(window.name.clone(), slot.kind);
        node.created = window.created;
        node.modified = window.modified;
        node.hidden = hidden || window.hidden;
        node.object = Some(slot.index);
        Some(node)
    }

    fn build_flat_tree(
        &mut self,
        window_slots: &[Option<WindowSlot>],
        note_slots: &[Option<usize>],
    ) -> ProjectTree {
        let notes = note_slots.iter().flatten().map(|&index| WindowSlot {
            kind: NodeKind::Note,
            index,
        });
        let nodes: Vec<ProjectNode> = window_slots
            .iter()
            .flatten()
            .copied()
            .chain(notes)
            .filter_map(|slot| self.leaf_node(slot, false))
            .collect();

        let mut builder = TreeBuilder::new();
        for node in nodes {
            builder.push(NodeDescriptor::new(0, node), &mut self.log);
        }
        builder.finish()
    }

    fn build_encoded_tree(
        &mut self,
        section: TreeSection,
        window_slots: &[Option<WindowSlot>],
        note_slots: &[Option<usize>],
    ) -> ProjectTree {
        let mut tree = ProjectTree::new();
        if let Some(root) = tree.get_mut(NodeId::ROOT) {
            root.name = section.root.name;
            root.created = section.root.created;
            root.modified = section.root.modified;
            root.active = section.root.active;
        }

        let mut descriptors = Vec::with_capacity(section.entries.len());
        for entry in section.entries {
            let node = match entry.item {
                TreeItem::Folder(folder) => {
                    let mut node = ProjectNode::new(folder.name, NodeKind::Folder);
                    node.created = folder.created;
                    node.modified = folder.modified;
                    node.active = folder.active;
                    Some(node)
                }
                TreeItem::Leaf {
                    object_type,
                    object_id,
                    hidden,
                } => {
                    let slot = if object_type == LEAF_TYPE_NOTE {
                        note_slots
                            .get(object_id as usize)
                            .copied()
                            .flatten()
                            .map(|index| WindowSlot {
                                kind: NodeKind::Note,
                                index,
                            })
                    } else {
                        window_slots.get(object_id as usize).copied().flatten()
                    };
                    let node = slot.and_then(|slot| self.leaf_node(slot, hidden));
                    if node.is_none() {
                        let what = if object_type == LEAF_TYPE_NOTE {
                            "note"
                        } else {
                            "window"
                        };
                        self.log.warn(
                            Some(entry.offset),
                            format!("project tree refers to missing {what} #{object_id}; entry dropped"),
                        );
                    }
                    node
                }
            };
            if let Some(node) = node {
                descriptors.push(NodeDescriptor {
                    depth: entry.depth,
                    offset: Some(entry.offset),
                    node,
                });
            }
        }

        let mut builder = TreeBuilder::with_tree(tree);
        for descriptor in descriptors {
            builder.push(descriptor, &mut self.log);
        }
        builder.finish()
    }
}

fn column_from_dataset(name: String, ordinal: usize, dataset: DatasetRecord) -> SpreadColumn {
    let mut column = SpreadColumn::new(name, dataset.name, ordinal);
    if dataset.data_type == DATA_TYPE_TEXT {
        column.value_type = ValueType::Text;
    }
    column.data = dataset.values;
    column.masked_rows = dataset.masked_rows;
    column
}

/// Fill the column format named `column` with the dataset, or append a new column.
fn attach_column(sheet: &mut SpreadSheet, column: String, ordinal: usize, dataset: DatasetRecord) {
    match sheet
        .columns
        .iter_mut()
        .find(|c| c.name == column && c.dataset_name.is_empty())
    {
        Some(existing) => {
            existing.dataset_name = dataset.name;
            existing.dataset_index = ordinal;
            existing.data = dataset.values;
            existing.masked_rows = dataset.masked_rows;
        }
        None => sheet
            .columns
            .push(column_from_dataset(column, ordinal, dataset)),
    }
    let rows = sheet.columns.iter().map(SpreadColumn::row_count).max().unwrap_or(0);
    let rows = u32::try_from(rows).unwrap_or(u32::MAX);
    if rows > sheet.max_rows {
        sheet.max_rows = rows;
    }
}

