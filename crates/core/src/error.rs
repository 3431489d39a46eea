//! Errors and render diagnostics.

use markdown::message::{Message, Place};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A 1-based line and column in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Line, from 1.
    pub line: usize,
    /// Column, from 1.
    pub column: usize,
}

impl SourceLocation {
    /// First character of the document.
    pub const START: Self = Self { line: 1, column: 1 };

    /// Creates a location.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<&Message> for SourceLocation {
    fn from(message: &Message) -> Self {
        match message.place.as_deref() {
            Some(Place::Point(point)) => Self::new(point.line, point.column),
            Some(Place::Position(position)) => {
                Self::new(position.start.line, position.start.column)
            }
            None => Self::START,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A document body that could not be turned into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkError {
    /// markdown-rs rejected the input.
    #[error("markdown rejected at {location}: {message}")]
    Parse {
        /// Parser message.
        message: String,
        /// Where the parser stopped.
        location: SourceLocation,
    },
}

impl MarkError {
    /// Where the error occurred.
    pub fn location(&self) -> SourceLocation {
        match self {
            MarkError::Parse { location, .. } => *location,
        }
    }
}

impl From<Message> for MarkError {
    fn from(message: Message) -> Self {
        MarkError::Parse {
            location: SourceLocation::from(&message),
            message: message.to_string(),
        }
    }
}

/// How much a diagnostic degraded the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Part of the document was rendered in a fallback form.
    Error,
    /// Input was ignored; the render is otherwise intact.
    Warning,
}

/// A problem that did not stop the render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoverableError {
    /// Human readable message.
    pub message: String,
    /// Where in the source document.
    pub location: SourceLocation,
    /// Severity.
    pub severity: ErrorSeverity,
}

impl RecoverableError {
    fn new(severity: ErrorSeverity, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
            severity,
        }
    }

    /// An error at `line:column`.
    pub fn error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(
            ErrorSeverity::Error,
            message,
            SourceLocation::new(line, column),
        )
    }

    /// A warning at `line:column`.
    pub fn warning(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(
            ErrorSeverity::Warning,
            message,
            SourceLocation::new(line, column),
        )
    }
}

impl fmt::Display for RecoverableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            ErrorSeverity::Error => "error",
            ErrorSeverity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", self.location, label, self.message)
    }
}

/// Diagnostics of one document, in the order they were found.
///
/// Nothing in here stops a render; stages record what they degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostics {
    /// Recorded problems.
    pub entries: Vec<RecoverableError>,
}

impl ParseDiagnostics {
    /// Records a problem.
    pub fn push(&mut self, entry: RecoverableError) {
        self.entries.push(entry);
    }

    /// Returns true if any entry is an error rather than a warning.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.severity == ErrorSeverity::Error)
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

impl Extend<RecoverableError> for ParseDiagnostics {
    fn extend<T: IntoIterator<Item = RecoverableError>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
