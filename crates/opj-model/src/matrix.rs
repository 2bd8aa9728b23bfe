use serde::{Deserialize, Serialize};

use crate::Window;

/// One sheet of a matrix window. `data` is row-major.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixSheet {
    pub name: String,
    pub row_count: u16,
    pub column_count: u16,
    /// Dataset index backing this sheet, if a dataset was found for it.
    #[serde(default)]
    pub dataset_index: Option<usize>,
    /// Cell values; `None` marks a missing value.
    #[serde(default)]
    pub data: Vec<Option<f64>>,
}

impl MatrixSheet {
    pub fn new(name: impl Into<String>, row_count: u16, column_count: u16) -> Self {
        Self {
            name: name.into(),
            row_count,
            column_count,
            ..Self::default()
        }
    }

    /// Value at (`row`, `col`), or `None` for a missing value or outside the stored data.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        let cols = usize::from(self.column_count);
        if col >= cols {
            return None;
        }
        self.data
            .get(row.checked_mul(cols)?.checked_add(col)?)
            .copied()
            .flatten()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub window: Window,
    #[serde(default)]
    pub sheets: Vec<MatrixSheet>,
}

impl Matrix {
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
