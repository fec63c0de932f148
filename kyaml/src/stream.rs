// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Buffered codepoint stream with marks and backtracking.
//!
//! The stream pulls bytes from any [`Read`] source, decodes them as UTF-8 on
//! demand and keeps every decoded character in a buffer until the parser
//! explicitly [`consume`](CharStream::consume)s it. Marks are plain buffer
//! positions tagged with a generation counter so that a mark taken before a
//! `consume` can be detected instead of silently pointing at the wrong text.

use std::collections::VecDeque;
use std::io::{self, Read};

/// An invalid UTF-8 sequence found while decoding the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingError {
    /// Character offset (from the start of the input) where decoding failed.
    pub offset: usize,
    /// The offending bytes.
    pub bytes: Vec<u8>,
}

/// An opaque stream position returned by [`CharStream::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark {
    generation: u32,
    pos: usize,
}

/// A lazily decoded character stream supporting arbitrary lookahead.
pub struct CharStream {
    source: Box<dyn Read>,
    buffer: VecDeque<char>,
    pos: usize,
    generation: u32,
    /// Characters dropped by `consume` so far.
    dropped: usize,
    /// The last character dropped by `consume`, for `rpeek` at buffer start.
    last_dropped: Option<char>,
    exhausted: bool,
    encoding_error: Option<EncodingError>,
    io_error: Option<io::ErrorKind>,
}

impl std::fmt::Debug for CharStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharStream")
            .field("pos", &self.pos)
            .field("buffered", &self.buffer.len())
            .field("generation", &self.generation)
            .field("offset", &self.offset())
            .finish_non_exhaustive()
    }
}

impl CharStream {
    /// Create a stream reading from `source`.
    #[must_use]
    pub fn new(source: impl Read + 'static) -> Self {
        Self {
            source: Box::new(source),
            buffer: VecDeque::new(),
            pos: 0,
            generation: 0,
            dropped: 0,
            last_dropped: None,
            exhausted: false,
            encoding_error: None,
            io_error: None,
        }
    }

    /// Create a stream over an in-memory string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(io::Cursor::new(text.as_bytes().to_vec()))
    }

    /// Return the next character and advance past it.
    pub fn get(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Return the next character without advancing.
    pub fn peek(&mut self) -> Option<char> {
        self.peek_at(0)
    }

    /// Return the character `ahead` positions past the cursor without advancing.
    pub fn peek_at(&mut self, ahead: usize) -> Option<char> {
        let wanted = self.pos + ahead;
        if self.fill_to(wanted) {
            self.buffer.get(wanted).copied()
        } else {
            None
        }
    }

    /// Return the character just before the cursor, if any was read.
    #[must_use]
    pub fn rpeek(&self) -> Option<char> {
        match self.pos.checked_sub(1) {
            Some(prev) => self.buffer.get(prev).copied(),
            None => self.last_dropped,
        }
    }

    /// Advance the cursor by up to `n` characters, stopping at end of input.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.get().is_none() {
                break;
            }
        }
    }

    /// Returns `true` if no character remains.
    pub fn eof(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Returns `true` while characters remain and no decoding problem occurred.
    pub fn good(&mut self) -> bool {
        !self.eof()
    }

    /// Remember the current position.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        Mark {
            generation: self.generation,
            pos: self.pos,
        }
    }

    /// Move the cursor back (or forward) to `mark`.
    ///
    /// # Panics
    ///
    /// Panics if `mark` was taken before the last [`consume`](Self::consume),
    /// which is a logic error in the caller.
    #[track_caller]
    pub fn unwind(&mut self, mark: Mark) {
        assert!(self.is_valid(mark), "stream mark used after consume");
        self.pos = mark.pos;
    }

    /// Returns `true` if `mark` can still be unwound to.
    #[must_use]
    pub fn is_valid(&self, mark: Mark) -> bool {
        mark.generation == self.generation && mark.pos <= self.buffer.len()
    }

    /// The text between `mark` and the cursor, without consuming it.
    #[must_use]
    pub fn text_since(&self, mark: Mark) -> String {
        if mark.generation != self.generation || mark.pos >= self.pos {
            return String::new();
        }
        self.buffer.range(mark.pos..self.pos).collect()
    }

    /// Return the text between `mark` and the cursor, then drop everything
    /// before the cursor. All marks handed out so far become invalid.
    pub fn consume(&mut self, mark: Mark) -> String {
        let text = self.text_since(mark);
        if self.pos > 0 {
            self.last_dropped = self.buffer.get(self.pos - 1).copied();
        }
        self.buffer.drain(..self.pos);
        self.dropped += self.pos;
        self.pos = 0;
        self.generation = self.generation.wrapping_add(1);
        text
    }

    /// Character offset of the cursor from the start of the input.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.dropped + self.pos
    }

    /// The decoding failure that ended the stream, if any.
    #[must_use]
    pub const fn encoding_error(&self) -> Option<&EncodingError> {
        self.encoding_error.as_ref()
    }

    /// The I/O failure that ended the stream, if any.
    #[must_use]
    pub const fn io_error(&self) -> Option<io::ErrorKind> {
        self.io_error
    }

    /// Decode characters until `index` is buffered. Returns `false` at end of input.
    fn fill_to(&mut self, index: usize) -> bool {
        while self.buffer.len() <= index {
            if self.exhausted {
                return false;
            }
            match self.decode_next() {
                Some(c) => self.buffer.push_back(c),
                None => self.exhausted = true,
            }
        }
        true
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0_u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => return Some(byte[0]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    log::debug!("input read failed: {err}");
                    self.io_error = Some(err.kind());
                    return None;
                }
            }
        }
    }

    fn decode_next(&mut self) -> Option<char> {
        let lead = self.read_byte()?;
        let width = utf8_width(lead);
        if width == 1 {
            return Some(char::from(lead));
        }
        let mut bytes = vec![lead];
        if width == 0 {
            self.fail_encoding(bytes);
            return None;
        }
        while bytes.len() < width {
            match self.read_byte() {
                Some(byte) => bytes.push(byte),
                None => {
                    self.fail_encoding(bytes);
                    return None;
                }
            }
        }
        match std::str::from_utf8(&bytes).ok().and_then(|s| s.chars().next()) {
            Some(c) => Some(c),
            None => {
                self.fail_encoding(bytes);
                None
            }
        }
    }

    fn fail_encoding(&mut self, bytes: Vec<u8>) {
        let offset = self.dropped + self.buffer.len();
        log::debug!("malformed UTF-8 at character {offset}: {bytes:02x?}");
        self.encoding_error = Some(EncodingError { offset, bytes });
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, or 0 if `lead` cannot start one.
#[must_use]
pub const fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}
