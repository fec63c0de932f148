// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Error types for YAML parsing and for querying parsed documents.

use std::fmt::Write as _;

use derive_more::Display;

use crate::node::NodeKind;
use crate::span::Span;

/// An error encountered while parsing a document.
///
/// Grammar errors carry the line where matching stopped as well as the
/// furthest line any attempted production reached, which is usually closer
/// to the actual mistake.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error
    pub kind: ErrorKind,
    /// Character offsets of the offending input, relative to the start of the document
    pub span: Span,
    /// 1-based line number the error is reported at
    pub line: u32,
    /// The furthest line reached by any attempted production
    pub furthest_line: u32,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// No production matches the input
    #[display("{_0}")]
    Grammar(String),

    /// The input is not valid UTF-8
    #[display("malformed UTF-8 at offset {offset}:{}", hex_bytes(bytes))]
    MalformedEncoding { offset: usize, bytes: Vec<u8> },

    /// An alias refers to an anchor that was not defined earlier in the document
    #[display("unknown alias '{_0}'")]
    UnknownAlias(String),

    /// Reading the input failed
    #[display("{_0}")]
    Io(String),
}

/// Bytes as space-prefixed hex literals, e.g. ` 0xc3 0x28`.
fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().fold(String::new(), |mut out, byte| {
        let _ = write!(out, " {byte:#04x}");
        out
    })
}

impl ErrorKind {
    /// Get a suggestion for how to fix this error.
    ///
    /// Returns `Some(suggestion)` if a helpful fix suggestion is available,
    /// or `None` if no specific suggestion applies.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MalformedEncoding { .. } => Some("YAML input must be encoded as UTF-8"),
            Self::UnknownAlias(_) => Some("Define the anchor with &name before referencing it with *name"),
            Self::Grammar(_) | Self::Io(_) => None,
        }
    }

    /// Returns `true` for errors in a document that matched the grammar.
    #[must_use]
    pub const fn is_content_error(&self) -> bool {
        matches!(self, Self::MalformedEncoding { .. } | Self::UnknownAlias(_))
    }
}

impl ParseError {
    /// Create a new error reported at `line`.
    #[must_use]
    pub const fn new(kind: ErrorKind, span: Span, line: u32) -> Self {
        Self {
            kind,
            span,
            line,
            furthest_line: line,
        }
    }

    /// Record the furthest line reached while parsing.
    #[must_use]
    pub fn with_furthest_line(mut self, furthest_line: u32) -> Self {
        self.furthest_line = furthest_line;
        self
    }

    /// Get a suggestion for how to fix this error.
    ///
    /// Delegates to [`ErrorKind::suggestion()`].
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        self.kind.suggestion()
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let category = if self.kind.is_content_error() {
            "content error"
        } else {
            "parse error"
        };
        write!(f, "{category} at line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// An error from a path query on a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum QueryError {
    #[display("node type mismatch: expected {expected} but was {actual}")]
    TypeMismatch { expected: NodeKind, actual: NodeKind },

    #[display("requested value {_0} not found")]
    KeyNotFound(String),

    #[display("list index {_0} out of range")]
    IndexOutOfRange(usize),
}

impl std::error::Error for QueryError {}
