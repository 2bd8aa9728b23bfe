#![allow(dead_code)]

use opj_import::{FormatRevision, FormatVersion};

// This builder writes just enough of the project body to exercise the importer. Field offsets
// are named so fixtures stay readable next to the decoders.
const BLOCK_DELIMITER: u8 = b'\n';

const GLOBAL_HEADER_LEN: usize = 0x30;
const GLOBAL_DECLARED_VERSION_OFFSET: usize = 0x1B;

const DATASET_HEADER_LEN: usize = 0x71;
const DATASET_FUNCTION_KIND_OFFSET: usize = 0x0A;
const DATASET_DATA_TYPE_OFFSET: usize = 0x16;
const DATASET_TOTAL_POINTS_OFFSET: usize = 0x21;
const DATASET_BEGIN_OFFSET: usize = 0x25;
const DATASET_STEP_OFFSET: usize = 0x2D;
const DATASET_VALUE_SIZE_OFFSET_V350: usize = 0x36;
const DATASET_VALUE_SIZE_OFFSET: usize = 0x3D;
const DATASET_FLAGS_OFFSET: usize = 0x3F;
const DATASET_NAME_OFFSET: usize = 0x58;

pub const DATA_TYPE_DOUBLE: u16 = 0x6821;
pub const DATA_TYPE_FUNCTION: u16 = 0x6081;
pub const DATA_TYPE_TEXT: u16 = 0x1008;
pub const DATA_TYPE_TEXT_NUMERIC: u16 = 0x2001;
const FUNCTION_KIND_POLAR: u16 = 0x1194;

const WINDOW_HEADER_LEN: usize = 0x90;
const WINDOW_NAME_OFFSET: usize = 0x02;
const WINDOW_FRAME_OFFSET: usize = 0x1B;
const WINDOW_KIND_OFFSET: usize = 0x2D;
const WINDOW_STATE_OFFSET: usize = 0x32;
const WINDOW_TITLE_OFFSET: usize = 0x69;
const WINDOW_CREATED_OFFSET: usize = 0x73;
const WINDOW_MODIFIED_OFFSET: usize = 0x7B;
const WINDOW_ACTIVE_SHEET_OFFSET: usize = 0x8B;

pub const KIND_GRAPH: u8 = 0x00;
pub const KIND_SPREADSHEET: u8 = 0x18;
pub const KIND_EXCEL: u8 = 0x28;
pub const KIND_MATRIX: u8 = 0x50;

pub const STATE_HIDDEN: u8 = 0x04;

const WORKSHEET_LAYER_LEN: usize = 0x30;
const WORKSHEET_MAX_ROWS_OFFSET: usize = 0x2B;
const COLUMN_FORMAT_LEN: usize = 0x4E;
const COLUMN_TYPE_OFFSET: usize = 0x11;
const COLUMN_NAME_OFFSET: usize = 0x12;
const COLUMN_VALUE_TYPE_OFFSET: usize = 0x3C;
const COLUMN_WIDTH_OFFSET: usize = 0x4C;

const MATRIX_LAYER_LEN: usize = 0x54;
const MATRIX_COLUMNS_OFFSET: usize = 0x2B;
const MATRIX_ROWS_OFFSET: usize = 0x52;

const GRAPH_LAYER_LEN: usize = 0x80;
const GRAPH_X_RANGE_OFFSET: usize = 0x0F;
const GRAPH_Y_RANGE_OFFSET: usize = 0x3A;
const GRAPH_FRAME_OFFSET: usize = 0x71;
const ANNOTATION_LEN: usize = 0x56;
const ANNOTATION_FRAME_OFFSET: usize = 0x03;
const ANNOTATION_NAME_OFFSET: usize = 0x46;
const CURVE_LEN: usize = 0x52;
const CURVE_KIND_OFFSET: usize = 0x04;
const CURVE_Y_NAME_OFFSET: usize = 0x12;
const CURVE_X_NAME_OFFSET: usize = 0x2B;
const CURVE_LINE_WIDTH_OFFSET: usize = 0x4C;

const FOLDER_HEADER_LEN: usize = 0x20;
const FOLDER_ACTIVE_OFFSET: usize = 0x02;
const FOLDER_CREATED_OFFSET: usize = 0x10;
const FOLDER_MODIFIED_OFFSET: usize = 0x18;
pub const LEAF_TYPE_NOTE: u32 = 0x0010_0000;
pub const LEAF_TYPE_WINDOW: u32 = 0x0000_0000;

/// 2017-03-01T12:00:00Z as a Julian day.
pub const SAMPLE_JULIAN_DAY: f64 = 2_457_814.0;

pub fn block(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 6);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.push(BLOCK_DELIMITER);
    if !payload.is_empty() {
        out.extend_from_slice(payload);
        out.push(BLOCK_DELIMITER);
    }
    out
}

pub fn end_mark() -> Vec<u8> {
    block(&[])
}

fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// A header line whose build number resolves to `revision`.
pub fn header_line(revision: FormatRevision) -> Vec<u8> {
    let (major, build) = match revision {
        FormatRevision::V350 => (3, 500),
        FormatRevision::V410 => (3, 900),
        _ => (
            4,
            opj_import::version::REVISION_TABLE
                .iter()
                .find(|(_, r)| *r == revision)
                .map_or(3300, |(upper, _)| upper - 1),
        ),
    };
    format!("CPYA {major}.{build:04} 552#\n").into_bytes()
}

fn value_size_offset(revision: FormatRevision) -> usize {
    if revision == FormatRevision::V350 {
        DATASET_VALUE_SIZE_OFFSET_V350
    } else {
        DATASET_VALUE_SIZE_OFFSET
    }
}

pub fn dataset_header(
    revision: FormatRevision,
    name: &str,
    data_type: u16,
    value_size: u8,
) -> Vec<u8> {
    let mut h = vec![0u8; DATASET_HEADER_LEN];
    put(&mut h, DATASET_DATA_TYPE_OFFSET, &data_type.to_le_bytes());
    h[value_size_offset(revision)] = value_size;
    put(&mut h, DATASET_NAME_OFFSET, name.as_bytes());
    h
}

/// Dataset element: header, data and mask blocks.
pub fn dataset_element(header: &[u8], data: &[u8], masked_rows: &[u32]) -> Vec<u8> {
    let mask: Vec<u8> = masked_rows.iter().flat_map(|r| r.to_le_bytes()).collect();
    [block(header), block(data), block(&mask)].concat()
}

pub fn window_header(name: &str, kind: u8, state: u8) -> Vec<u8> {
    let mut h = vec![0u8; WINDOW_HEADER_LEN];
    put(&mut h, WINDOW_NAME_OFFSET, name.as_bytes());
    let frame: Vec<u8> = [10i16, 20, 410, 320].iter().flat_map(|v| v.to_le_bytes()).collect();
    put(&mut h, WINDOW_FRAME_OFFSET, &frame);
    h[WINDOW_KIND_OFFSET] = kind;
    h[WINDOW_STATE_OFFSET] = state;
    h[WINDOW_TITLE_OFFSET] = 0x03;
    put(&mut h, WINDOW_CREATED_OFFSET, &SAMPLE_JULIAN_DAY.to_le_bytes());
    put(&mut h, WINDOW_MODIFIED_OFFSET, &(SAMPLE_JULIAN_DAY + 1.0).to_le_bytes());
    h
}

/// One worksheet column format plus its label text.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: String,
    pub type_code: u8,
    pub value_type: u8,
    pub width: u16,
    /// Stored as-is in the column's data block (`long name\r\nunits\r\ncomment` from 7.0).
    pub label: String,
}

impl ColumnSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_code: 0,
            value_type: 0,
            width: 80,
            label: String::new(),
        }
    }

    pub fn x(mut self) -> Self {
        self.type_code = 3;
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    fn encode(&self) -> Vec<u8> {
        let mut f = vec![0u8; COLUMN_FORMAT_LEN];
        f[COLUMN_TYPE_OFFSET] = self.type_code;
        put(&mut f, COLUMN_NAME_OFFSET, self.name.as_bytes());
        f[COLUMN_VALUE_TYPE_OFFSET] = self.value_type;
        put(&mut f, COLUMN_WIDTH_OFFSET, &self.width.to_le_bytes());
        [block(&f), block(self.label.as_bytes())].concat()
    }
}

fn worksheet_layer(revision: FormatRevision, max_rows: u32, columns: &[ColumnSpec]) -> Vec<u8> {
    let mut header = vec![0u8; WORKSHEET_LAYER_LEN];
    if revision >= FormatRevision::V600 {
        put(&mut header, WORKSHEET_MAX_ROWS_OFFSET, &max_rows.to_le_bytes());
    } else {
        put(&mut header, WORKSHEET_MAX_ROWS_OFFSET, &(max_rows as u16).to_le_bytes());
    }
    let mut out = block(&header);
    out.extend(end_mark());
    for column in columns {
        out.extend(column.encode());
    }
    out.extend(end_mark());
    out
}

#[derive(Clone, Debug, Default)]
pub struct GraphLayerSpec {
    /// `(name, text)`; `Legend`, `XB` and `YL` are the special names.
    pub annotations: Vec<(String, String)>,
    /// `(y dataset, x dataset)`.
    pub curves: Vec<(String, String)>,
    /// Axis titles; missing entries are written untitled.
    pub axis_titles: Vec<String>,
}

impl GraphLayerSpec {
    pub fn curve(mut self, y: &str, x: &str) -> Self {
        self.curves.push((y.to_string(), x.to_string()));
        self
    }

    pub fn annotation(mut self, name: &str, text: &str) -> Self {
        self.annotations.push((name.to_string(), text.to_string()));
        self
    }

    pub fn axis_title(mut self, title: &str) -> Self {
        self.axis_titles.push(title.to_string());
        self
    }

    fn encode(&self, revision: FormatRevision) -> Vec<u8> {
        let mut header = vec![0u8; GRAPH_LAYER_LEN];
        for (i, v) in [0.0f64, 10.0, 2.0].iter().enumerate() {
            put(&mut header, GRAPH_X_RANGE_OFFSET + i * 8, &v.to_le_bytes());
        }
        for (i, v) in [-1.0f64, 1.0, 0.5].iter().enumerate() {
            put(&mut header, GRAPH_Y_RANGE_OFFSET + i * 8, &v.to_le_bytes());
        }
        put(&mut header, GRAPH_FRAME_OFFSET, &[5, 0, 6, 0, 105, 0, 106, 0]);
        let mut out = block(&header);

        for (name, text) in &self.annotations {
            let mut a = vec![0u8; ANNOTATION_LEN];
            put(&mut a, ANNOTATION_FRAME_OFFSET, &[1, 0, 2, 0, 3, 0, 4, 0]);
            put(&mut a, ANNOTATION_NAME_OFFSET, name.as_bytes());
            out.extend(block(&a));
            out.extend(block(text.as_bytes()));
        }
        out.extend(end_mark());

        for (y, x) in &self.curves {
            let mut c = vec![0u8; CURVE_LEN];
            c[CURVE_KIND_OFFSET] = 200;
            put(&mut c, CURVE_Y_NAME_OFFSET, y.as_bytes());
            put(&mut c, CURVE_X_NAME_OFFSET, x.as_bytes());
            put(&mut c, CURVE_LINE_WIDTH_OFFSET, &150u16.to_le_bytes());
            put(&mut c, CURVE_LINE_WIDTH_OFFSET + 2, &[1, 2, 3, 9]);
            out.extend(block(&c));
            out.extend(block(b"curve data"));
        }
        out.extend(end_mark());

        let axes = if revision >= FormatRevision::V800 { 3 } else { 2 };
        for i in 0..axes {
            let mut axis = vec![0u8, i as u8];
            axis.extend_from_slice(&5u16.to_le_bytes());
            axis.extend_from_slice(&1u16.to_le_bytes());
            if let Some(title) = self.axis_titles.get(i) {
                axis.extend_from_slice(title.as_bytes());
            }
            axis.push(0);
            out.extend(block(&axis));
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeLeaf {
    /// Window by window-list order.
    Window(u32),
    HiddenWindow(u32),
    /// Note by note-list order.
    Note(u32),
    Raw { object_type: u32, object_id: u32 },
}

#[derive(Clone, Debug, Default)]
pub struct TreeFolder {
    pub name: String,
    pub active: bool,
    pub leaves: Vec<TreeLeaf>,
    pub folders: Vec<TreeFolder>,
}

impl TreeFolder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn leaf(mut self, leaf: TreeLeaf) -> Self {
        self.leaves.push(leaf);
        self
    }

    pub fn folder(mut self, folder: TreeFolder) -> Self {
        self.folders.push(folder);
        self
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    fn encode(&self, revision: FormatRevision, out: &mut Vec<u8>) {
        let mut header = vec![0u8; FOLDER_HEADER_LEN];
        header[FOLDER_ACTIVE_OFFSET] = u8::from(self.active);
        put(&mut header, FOLDER_CREATED_OFFSET, &SAMPLE_JULIAN_DAY.to_le_bytes());
        put(&mut header, FOLDER_MODIFIED_OFFSET, &SAMPLE_JULIAN_DAY.to_le_bytes());
        out.extend(block(&header));
        out.extend(block(&[self.name.as_bytes(), b"\0"].concat()));

        // One property block.
        out.extend_from_slice(&1u32.to_le_bytes());
        out.push(BLOCK_DELIMITER);
        out.extend(block(b"property"));

        out.extend(block(&(self.leaves.len() as u32).to_le_bytes()));
        for leaf in &self.leaves {
            let (object_type, object_id, flags) = match *leaf {
                TreeLeaf::Window(id) => (LEAF_TYPE_WINDOW, id, 0u32),
                TreeLeaf::HiddenWindow(id) => (LEAF_TYPE_WINDOW, id, 1),
                TreeLeaf::Note(id) => (LEAF_TYPE_NOTE, id, 0),
                TreeLeaf::Raw {
                    object_type,
                    object_id,
                } => (object_type, object_id, 0),
            };
            let mut data = [object_type.to_le_bytes(), object_id.to_le_bytes()].concat();
            if revision >= FormatRevision::V931 {
                data.extend_from_slice(&flags.to_le_bytes());
            }
            out.extend(block(b"leaf"));
            out.extend(block(&data));
            out.extend(end_mark());
        }

        out.extend(block(&(self.folders.len() as u32).to_le_bytes()));
        for folder in &self.folders {
            folder.encode(revision, out);
        }
        out.extend(end_mark());
    }
}

/// Version-aware writer for whole project files.
#[derive(Clone, Debug)]
pub struct OpjBuilder {
    revision: FormatRevision,
    declared_version: Option<f64>,
    datasets: Vec<Vec<u8>>,
    windows: Vec<Vec<u8>>,
    parameters: Vec<(String, f64)>,
    notes: Vec<Vec<u8>>,
    tree: Option<TreeFolder>,
    trailing: Vec<u8>,
}

impl OpjBuilder {
    pub fn new(revision: FormatRevision) -> Self {
        Self {
            revision,
            declared_version: Some(revision.as_f64()),
            datasets: Vec::new(),
            windows: Vec::new(),
            parameters: Vec::new(),
            notes: Vec::new(),
            tree: None,
            trailing: Vec::new(),
        }
    }

    pub fn revision(&self) -> FormatRevision {
        self.revision
    }

    pub fn version(&self) -> FormatVersion {
        FormatVersion::for_revision(self.revision)
    }

    pub fn declared_version(&mut self, version: Option<f64>) -> &mut Self {
        self.declared_version = version;
        self
    }

    pub fn raw_dataset(&mut self, element: Vec<u8>) -> &mut Self {
        self.datasets.push(element);
        self
    }

    pub fn numeric_dataset(&mut self, name: &str, values: &[f64]) -> &mut Self {
        self.masked_dataset(name, values, &[])
    }

    pub fn masked_dataset(&mut self, name: &str, values: &[f64], masked_rows: &[u32]) -> &mut Self {
        let header = dataset_header(self.revision, name, DATA_TYPE_DOUBLE, 8);
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.raw_dataset(dataset_element(&header, &data, masked_rows))
    }

    pub fn text_dataset(&mut self, name: &str, values: &[&str], width: u8) -> &mut Self {
        let header = dataset_header(self.revision, name, DATA_TYPE_TEXT, width);
        let mut data = Vec::new();
        for value in values {
            let mut cell = vec![0u8; usize::from(width)];
            put(&mut cell, 0, value.as_bytes());
            data.extend(cell);
        }
        self.raw_dataset(dataset_element(&header, &data, &[]))
    }

    pub fn function(
        &mut self,
        name: &str,
        formula: &str,
        begin: f64,
        step: f64,
        points: u32,
        polar: bool,
    ) -> &mut Self {
        let mut header = dataset_header(self.revision, name, DATA_TYPE_FUNCTION, 8);
        if polar {
            put(&mut header, DATASET_FUNCTION_KIND_OFFSET, &FUNCTION_KIND_POLAR.to_le_bytes());
        }
        put(&mut header, DATASET_TOTAL_POINTS_OFFSET, &points.to_le_bytes());
        put(&mut header, DATASET_BEGIN_OFFSET, &begin.to_le_bytes());
        put(&mut header, DATASET_STEP_OFFSET, &step.to_le_bytes());
        self.raw_dataset(dataset_element(&header, &[formula.as_bytes(), b"\0"].concat(), &[]))
    }

    pub fn raw_window(&mut self, element: Vec<u8>) -> &mut Self {
        self.windows.push(element);
        self
    }

    pub fn spreadsheet(&mut self, name: &str, max_rows: u32, columns: &[ColumnSpec]) -> &mut Self {
        self.spreadsheet_with_state(name, 0, max_rows, columns)
    }

    pub fn spreadsheet_with_state(
        &mut self,
        name: &str,
        state: u8,
        max_rows: u32,
        columns: &[ColumnSpec],
    ) -> &mut Self {
        let element = [
            block(&window_header(name, KIND_SPREADSHEET, state)),
            worksheet_layer(self.revision, max_rows, columns),
            end_mark(),
        ]
        .concat();
        self.raw_window(element)
    }

    /// Sheets are `(rows, columns)`.
    pub fn matrix(&mut self, name: &str, sheets: &[(u16, u16)]) -> &mut Self {
        let mut element = block(&window_header(name, KIND_MATRIX, 0));
        for &(rows, columns) in sheets {
            let mut layer = vec![0u8; MATRIX_LAYER_LEN];
            put(&mut layer, MATRIX_COLUMNS_OFFSET, &columns.to_le_bytes());
            put(&mut layer, MATRIX_ROWS_OFFSET, &rows.to_le_bytes());
            element.extend(block(&layer));
            element.extend(end_mark());
            element.extend(end_mark());
        }
        element.extend(end_mark());
        self.raw_window(element)
    }

    pub fn graph(&mut self, name: &str, layers: &[GraphLayerSpec]) -> &mut Self {
        let mut element = block(&window_header(name, KIND_GRAPH, 0));
        for layer in layers {
            element.extend(layer.encode(self.revision));
        }
        element.extend(end_mark());
        self.raw_window(element)
    }

    /// Each sheet is its column formats.
    pub fn excel(&mut self, name: &str, active_sheet: u8, sheets: &[Vec<ColumnSpec>]) -> &mut Self {
        let mut header = window_header(name, KIND_EXCEL, 0);
        header[WINDOW_ACTIVE_SHEET_OFFSET] = active_sheet;
        let mut element = block(&header);
        for columns in sheets {
            element.extend(worksheet_layer(self.revision, 0, columns));
        }
        element.extend(end_mark());
        self.raw_window(element)
    }

    pub fn parameter(&mut self, name: &str, value: f64) -> &mut Self {
        self.parameters.push((name.to_string(), value));
        self
    }

    pub fn raw_note(&mut self, element: Vec<u8>) -> &mut Self {
        self.notes.push(element);
        self
    }

    pub fn note(&mut self, name: &str, text: &str) -> &mut Self {
        let content = [text.as_bytes(), b"\0"].concat();
        let element = if self.revision >= FormatRevision::V600 {
            [
                block(&window_header("", 0, 0)),
                block(&[name.as_bytes(), b"\0"].concat()),
                block(&content),
            ]
            .concat()
        } else {
            [block(&window_header(name, 0, 0)), block(&content)].concat()
        };
        self.raw_note(element)
    }

    /// Tree rooted at the project folder. Ignored below 6.0, which has no tree section.
    pub fn tree(&mut self, root: TreeFolder) -> &mut Self {
        self.tree = Some(root);
        self
    }

    pub fn trailing(&mut self, bytes: &[u8]) -> &mut Self {
        self.trailing = bytes.to_vec();
        self
    }

    pub fn global_header(&self) -> Vec<u8> {
        // Without a declared version the block stops short of the field.
        let header = match self.declared_version {
            Some(declared) => {
                let mut header = vec![0u8; GLOBAL_HEADER_LEN];
                put(&mut header, GLOBAL_DECLARED_VERSION_OFFSET, &declared.to_le_bytes());
                header
            }
            None => vec![0u8; GLOBAL_DECLARED_VERSION_OFFSET],
        };
        [block(&header), end_mark()].concat()
    }

    pub fn parameter_list(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, value) in &self.parameters {
            out.extend_from_slice(name.as_bytes());
            out.push(BLOCK_DELIMITER);
            out.extend_from_slice(&value.to_le_bytes());
            out.push(BLOCK_DELIMITER);
        }
        out.extend_from_slice(b"\0\n");
        out.extend(end_mark());
        out
    }

    pub fn tree_section(&self) -> Vec<u8> {
        let Some(root) = &self.tree else {
            return Vec::new();
        };
        if self.revision < FormatRevision::V600 {
            return Vec::new();
        }
        let mut out = [block(b"tree"), block(b"folders")].concat();
        root.encode(self.revision, &mut out);
        out.extend(block(b"tree end"));
        out
    }

    /// Offset of the first window element in the output of [`OpjBuilder::build`].
    pub fn windows_offset(&self) -> usize {
        let datasets: usize = self.datasets.iter().map(Vec::len).sum();
        header_line(self.revision).len() + self.global_header().len() + datasets + end_mark().len()
    }

    /// Offset of the parameter list in the output of [`OpjBuilder::build`].
    pub fn parameters_offset(&self) -> usize {
        let windows: usize = self.windows.iter().map(Vec::len).sum();
        self.windows_offset() + windows + end_mark().len()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = header_line(self.revision);
        out.extend(self.global_header());
        for element in &self.datasets {
            out.extend_from_slice(element);
        }
        out.extend(end_mark());
        for element in &self.windows {
            out.extend_from_slice(element);
        }
        out.extend(end_mark());
        out.extend(self.parameter_list());
        for element in &self.notes {
            out.extend_from_slice(element);
        }
        out.extend(end_mark());
        out.extend(self.tree_section());
        out.extend_from_slice(&self.trailing);
        out
    }
}

/// A small project touching every section family the revision supports.
///
/// Windows, in order: `Book1` (spreadsheet), `MBook1` (1x1 matrix), `Graph1`, then `Book2`
/// (excel, 8.0 and later). One note `Notes1`. From 6.0 the tree puts `Graph1` in `Folder1`.
pub fn sample_project(revision: FormatRevision) -> OpjBuilder {
    let with_excel = revision >= FormatRevision::V800;
    let mut b = OpjBuilder::new(revision);
    b.numeric_dataset("Book1_A", &[1.0, 2.0, 3.0])
        .numeric_dataset("Book1_B", &[10.0, 20.0, 30.0])
        .numeric_dataset("MBook1", &[42.0])
        .function("F1", "sin(x)", 0.0, 0.5, 11, false);
    if with_excel {
        b.numeric_dataset("Book2_A", &[7.0, 8.0]);
    }
    b.spreadsheet(
        "Book1",
        32,
        &[ColumnSpec::new("A").x(), ColumnSpec::new("B")],
    )
    .matrix("MBook1", &[(1, 1)])
    .graph(
        "Graph1",
        &[GraphLayerSpec::default().curve("Book1_B", "Book1_A")],
    );
    if with_excel {
        b.excel("Book2", 0, &[vec![ColumnSpec::new("A")]]);
    }
    b.parameter("PI", std::f64::consts::PI)
        .note("Notes1", "remember the units");

    let mut root = TreeFolder::new("UNTITLED")
        .active()
        .leaf(TreeLeaf::Window(0))
        .leaf(TreeLeaf::Window(1));
    if with_excel {
        root = root.leaf(TreeLeaf::Window(3));
    }
    root = root
        .leaf(TreeLeaf::Note(0))
        .folder(TreeFolder::new("Folder1").leaf(TreeLeaf::Window(2)));
    b.tree(root);
    b
}
