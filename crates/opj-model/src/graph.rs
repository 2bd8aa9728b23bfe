use serde::{Deserialize, Serialize};

use crate::{Rect, Window};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub from: f64,
    pub to: f64,
    pub step: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    #[default]
    Linear,
    Log10,
    Probability,
    Probit,
    Reciprocal,
    OffsetReciprocal,
    Logit,
    Ln,
    Log2,
}

impl AxisScale {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => AxisScale::Log10,
            2 => AxisScale::Probability,
            3 => AxisScale::Probit,
            4 => AxisScale::Reciprocal,
            5 => AxisScale::OffsetReciprocal,
            6 => AxisScale::Logit,
            7 => AxisScale::Ln,
            8 => AxisScale::Log2,
            _ => AxisScale::Linear,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisPosition {
    #[default]
    Bottom,
    Left,
    Top,
    Right,
    Front,
    Back,
}

impl AxisPosition {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => AxisPosition::Left,
            2 => AxisPosition::Top,
            3 => AxisPosition::Right,
            4 => AxisPosition::Front,
            5 => AxisPosition::Back,
            _ => AxisPosition::Bottom,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphAxis {
    pub scale: AxisScale,
    pub position: AxisPosition,
    pub major_ticks: u16,
    pub minor_ticks: u16,
    #[serde(default)]
    pub title: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    #[default]
    Line,
    Scatter,
    LineSymbol,
    Column,
    Area,
    Bar,
    Box,
    Contour,
    Other(u8),
}

impl CurveKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            200 => CurveKind::Line,
            201 => CurveKind::Scatter,
            202 => CurveKind::LineSymbol,
            203 => CurveKind::Column,
            204 => CurveKind::Area,
            215 => CurveKind::Bar,
            207 => CurveKind::Box,
            226 => CurveKind::Contour,
            other => CurveKind::Other(other),
        }
    }
}

/// One plotted curve, referring to its datasets by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphCurve {
    pub kind: CurveKind,
    /// `None` when the curve is plotted against row numbers or the writer predates X references.
    #[serde(default)]
    pub x_dataset: Option<String>,
    pub y_dataset: String,
    /// Line width in points.
    #[serde(default)]
    pub line_width: f64,
    #[serde(default)]
    pub line_style: u8,
    #[serde(default)]
    pub color: u8,
    #[serde(default)]
    pub symbol_shape: u8,
    #[serde(default)]
    pub symbol_size: u8,
}

/// A free text label, legend, or axis title placed on a layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub frame: Rect,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphLayer {
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    #[serde(default)]
    pub frame: Rect,
    #[serde(default)]
    pub curves: Vec<GraphCurve>,
    #[serde(default)]
    pub axes: Vec<GraphAxis>,
    #[serde(default)]
    pub legend: Option<TextBox>,
    #[serde(default)]
    pub x_title: Option<TextBox>,
    #[serde(default)]
    pub y_title: Option<TextBox>,
    #[serde(default)]
    pub texts: Vec<TextBox>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub window: Window,
    #[serde(default)]
    pub layers: Vec<GraphLayer>,
}

impl Graph {
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
