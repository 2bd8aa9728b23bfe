use serde::{Deserialize, Serialize};

use crate::{Excel, Function, Graph, Matrix, Note, Parameter, ProjectTree, SpreadColumn, SpreadSheet};

/// Everything decoded from one project file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub tree: ProjectTree,
    /// Datasets that belong to no workbook, matrix, or function.
    pub datasets: Vec<SpreadColumn>,
    pub spreadsheets: Vec<SpreadSheet>,
    pub matrices: Vec<Matrix>,
    pub functions: Vec<Function>,
    pub graphs: Vec<Graph>,
    pub notes: Vec<Note>,
    pub excels: Vec<Excel>,
    pub parameters: Vec<Parameter>,
}

impl Project {
    pub fn spreadsheet_index(&self, name: &str) -> Option<usize> {
        self.spreadsheets.iter().position(|s| s.name() == name)
    }

    pub fn excel_index(&self, name: &str) -> Option<usize> {
        self.excels.iter().position(|e| e.name() == name)
    }

    pub fn matrix_index(&self, name: &str) -> Option<usize> {
        self.matrices.iter().position(|m| m.name() == name)
    }

    pub fn graph_index(&self, name: &str) -> Option<usize> {
        self.graphs.iter().position(|g| g.name() == name)
    }

    pub fn note_index(&self, name: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.name() == name)
    }

    /// Functions are looked up case-insensitively, matching how formulas refer to them.
    pub fn function_index(&self, name: &str) -> Option<usize> {
        self.functions
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }
}
