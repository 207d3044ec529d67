//! Conversion results and conformance violations.

use std::fmt;

use crate::error::Result;
use crate::osis::{OsisEvent, events_to_string};

/// Kind of recoverable deviation found while converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Marker absent from the registry (strict conformance only).
    UnknownMarker,
    /// Known marker refused under strict conformance (e.g. `\q9`).
    RefusedMarker,
    /// `\xxx*` with no open scope of that name.
    UnmatchedCloseMarker,
    /// Attribute text that could not be parsed; kept as plain text.
    MalformedAttributeSyntax,
    /// Note ended by a verse, chapter or paragraph instead of its closer.
    UnterminatedNote,
    /// Chapter or verse marker without a usable number.
    InvalidNumber,
    /// Notes nested deeper than the configured limit; the inner note is
    /// dropped.
    NoteDepthExceeded,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownMarker => "unknown marker",
            Self::RefusedMarker => "refused marker",
            Self::UnmatchedCloseMarker => "unmatched close marker",
            Self::MalformedAttributeSyntax => "malformed attributes",
            Self::UnterminatedNote => "unterminated note",
            Self::InvalidNumber => "invalid chapter or verse number",
            Self::NoteDepthExceeded => "note nested too deeply",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conformance violation with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    /// The marker as written (`\q1*`).
    pub marker: String,
    /// Byte offset of the marker in the book's text.
    pub offset: usize,
    /// 1-based source line.
    pub line: usize,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} {}", self.line, self.kind, self.marker)
    }
}

/// A converted book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// OSIS book code.
    pub book: String,
    /// Well-nested events of the book's `<div type="book">`.
    pub events: Vec<OsisEvent>,
    pub violations: Vec<Violation>,
}

impl Conversion {
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// The book fragment as XML text.
    pub fn to_xml(&self) -> Result<String> {
        events_to_string(&self.events)
    }
}
