use serde::{Deserialize, Serialize};

use crate::{CellValue, Window};

/// Plot designation of a worksheet column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    X,
    #[default]
    Y,
    Z,
    XError,
    YError,
    Label,
    None,
}

/// Display type of a worksheet column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    Numeric,
    Text,
    Time,
    Date,
    Month,
    Day,
    ColumnHeading,
    TickIndexedDataset,
    TextNumeric,
    Categorical,
}

impl ValueType {
    /// Map the stored value-type byte; unknown codes fall back to numeric.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ValueType::Numeric,
            1 => ValueType::Text,
            2 => ValueType::Time,
            3 => ValueType::Date,
            4 => ValueType::Month,
            5 => ValueType::Day,
            6 => ValueType::ColumnHeading,
            7 => ValueType::TickIndexedDataset,
            9 => ValueType::TextNumeric,
            10 => ValueType::Categorical,
            _ => ValueType::Numeric,
        }
    }
}

/// One worksheet column (or a loose dataset that belongs to no window).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadColumn {
    /// Short column name (`A`, `B`, ...), or the full dataset name for loose datasets.
    pub name: String,
    /// Full dataset name as stored (`Book1_A`).
    pub dataset_name: String,
    #[serde(default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub value_type: ValueType,
    /// Column width in characters.
    #[serde(default)]
    pub width: u16,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub comment: String,
    /// Position of the dataset in the file's dataset list.
    pub dataset_index: usize,
    #[serde(default)]
    pub data: Vec<CellValue>,
    /// Row indices the writer stored in the dataset mask.
    #[serde(default)]
    pub masked_rows: Vec<u32>,
}

impl SpreadColumn {
    pub fn new(name: impl Into<String>, dataset_name: impl Into<String>, dataset_index: usize) -> Self {
        Self {
            name: name.into(),
            dataset_name: dataset_name.into(),
            dataset_index,
            ..Self::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }
}

/// A single-sheet worksheet window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadSheet {
    pub window: Window,
    #[serde(default)]
    pub max_rows: u32,
    #[serde(default)]
    pub columns: Vec<SpreadColumn>,
    /// `true` when dataset columns were found but no window described the sheet.
    #[serde(default)]
    pub loose: bool,
}

impl SpreadSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            window: Window::new(name),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.window.name
    }

    pub fn column(&self, name: &str) -> Option<&SpreadColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A multi-sheet workbook window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Excel {
    pub window: Window,
    #[serde(default)]
    pub active_sheet: usize,
    #[serde(default)]
    pub sheets: Vec<SpreadSheet>,
    #[serde(default)]
    pub loose: bool,
}

impl Excel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            window: Window::new(name),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.window.name
    }
}
