// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Span types for locating errors in the input.

use chumsky::span::{SimpleSpan, Span as _};

/// A span representing a range in the input.
///
/// This is an alias for chumsky's `SimpleSpan`. Offsets count characters
/// from the start of the document being parsed. The span is a half-open
/// range `[start, end)`.
pub type Span = SimpleSpan<usize>;

/// The span covering `len` characters starting at `start`.
#[must_use]
pub fn span_at(start: usize, len: usize) -> Span {
    Span::new((), start..start + len)
}
