use serde::{Deserialize, Serialize};

use crate::Window;

/// A notes window: free text attached to the project.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub window: Window,
    #[serde(default)]
    pub text: String,
}

impl Note {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            window: Window::new(name),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.window.name
    }
}
