use serde::{Deserialize, Serialize};

/// Sentinel double the writer stores for "no value" in numeric datasets.
pub const MISSING_VALUE: f64 = -1.23456789e-300;

/// A single decoded dataset cell.
///
/// Uses the same `{type, value}` tagged layout as the rest of the model so it
/// survives a JSON round trip unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Empty cell, including the writer's missing-value sentinel.
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Map a raw stored double to a cell, folding the missing-value sentinel to `Empty`.
    pub fn from_stored_f64(value: f64) -> Self {
        if value == MISSING_VALUE {
            CellValue::Empty
        } else {
            CellValue::Number(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sentinel_is_empty() {
        assert_eq!(CellValue::from_stored_f64(MISSING_VALUE), CellValue::Empty);
        assert_eq!(CellValue::from_stored_f64(1.5), CellValue::Number(1.5));
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&CellValue::Text("x".into())).unwrap();
        assert_eq!(json, r#"{"type":"text","value":"x"}"#);
    }
}
