//! Append-only diagnostics log threaded through a parse.
//!
//! The log is a plain value owned by the parse that produced it, so independent parses never
//! share state. Entries are mirrored to the `log` facade for developers; the rendered
//! [`DiagnosticsLog::text`] is meant for people troubleshooting an import.

use std::fmt;

use crate::errors::SectionDecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Info,
    Warning,
    /// A section failed to decode and was skipped.
    SectionSkipped,
    /// A project-tree node had an impossible parent link and was reattached to the root.
    StructuralCorruption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// File offset the entry refers to, when there is one.
    pub offset: Option<usize>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            DiagnosticKind::Info => "",
            DiagnosticKind::Warning => "warning: ",
            DiagnosticKind::SectionSkipped => "skipped: ",
            DiagnosticKind::StructuralCorruption => "corrupt project tree: ",
        };
        match self.offset {
            Some(offset) => write!(f, "{prefix}{} [offset 0x{offset:X}]", self.message),
            None => write!(f, "{prefix}{}", self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticsLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn info(&mut self, offset: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{message}");
        self.push(DiagnosticKind::Info, offset, message);
    }

    pub fn warn(&mut self, offset: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.push(DiagnosticKind::Warning, offset, message);
    }

    pub fn section_skipped(&mut self, err: &SectionDecodeError) {
        log::warn!("{err}");
        self.push(
            DiagnosticKind::SectionSkipped,
            Some(err.offset),
            format!("{} ({})", err.kind, err.source),
        );
    }

    pub fn structural_corruption(&mut self, offset: Option<usize>, message: impl Into<String>) {
        let message = message.into();
        log::warn!("project tree: {message}");
        self.push(DiagnosticKind::StructuralCorruption, offset, message);
    }

    /// All entries as newline-terminated lines.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }

    fn push(&mut self, kind: DiagnosticKind, offset: Option<usize>, message: String) {
        self.entries.push(Diagnostic {
            kind,
            offset,
            message,
        });
    }
}
