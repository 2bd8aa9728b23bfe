use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Window rectangle in the writer's screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

impl Rect {
    pub const fn new(left: i16, top: i16, right: i16, bottom: i16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        i32::from(self.right) - i32::from(self.left)
    }

    pub fn height(&self) -> i32 {
        i32::from(self.bottom) - i32::from(self.top)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// What the window caption shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowTitle {
    Name,
    Label,
    #[default]
    Both,
}

/// Properties shared by every child window (workbooks, matrices, graphs, notes).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub frame: Rect,
    #[serde(default)]
    pub state: WindowState,
    #[serde(default)]
    pub title: WindowTitle,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

impl Window {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
