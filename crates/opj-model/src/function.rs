use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    #[default]
    Normal,
    Polar,
}

/// A function dataset: a formula sampled over `[begin, end]` at `total_points` points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub kind: FunctionKind,
    pub formula: String,
    pub begin: f64,
    pub end: f64,
    pub total_points: u32,
    /// Position of the backing dataset in the file's dataset list.
    pub dataset_index: usize,
}

/// A named project parameter (`name = value`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
