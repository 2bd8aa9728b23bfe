//! `opj-model` holds the in-memory records produced by the Origin project importer.
//!
//! The crate has no decoding logic of its own. Collections are flat `Vec`s owned by
//! [`Project`]; the [`ProjectTree`] refers to them by index, never by ownership.

mod date;
mod function;
mod graph;
mod matrix;
mod note;
mod project;
mod spreadsheet;
mod tree;
mod value;
mod window;

pub use date::{datetime_to_julian_day, julian_day_to_datetime};
pub use function::{Function, FunctionKind, Parameter};
pub use graph::{
    AxisPosition, AxisRange, AxisScale, CurveKind, Graph, GraphAxis, GraphCurve, GraphLayer,
    TextBox,
};
pub use matrix::{Matrix, MatrixSheet};
pub use note::Note;
pub use project::Project;
pub use spreadsheet::{ColumnType, Excel, SpreadColumn, SpreadSheet, ValueType};
pub use tree::{NodeId, NodeKind, ProjectNode, ProjectTree, Walk};
pub use value::{CellValue, MISSING_VALUE};
pub use window::{Rect, Window, WindowState, WindowTitle};
