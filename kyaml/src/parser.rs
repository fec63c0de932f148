// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Document-at-a-time parsing of a YAML stream.
//!
//! [`Parser::parse`] reads one document per call. Whatever happens, the
//! parser afterwards skips ahead to the next document boundary so an error
//! in one document does not affect the following ones.

use std::io::Read;
use std::rc::Rc;

use crate::builder::{DocumentBuilder, NullBuilder};
use crate::clause::{Clause, all_of, any_of, end_of_input, zero_or_more};
use crate::context::Context;
use crate::error::{ErrorKind, ParseError};
use crate::grammar::chars::{b_break, nb_char};
use crate::grammar::structure::s_l_comments;
use crate::grammar::{end_of_document, l_single_document, l_yaml_stream, start_of_document};
use crate::node::Node;
use crate::node_builder::NodeBuilder;
use crate::span::span_at;
use crate::stream::CharStream;

/// Number of characters quoted in error messages and debug logs.
pub const PEEK_WIDTH: usize = 20;

/// Skips the rest of the current line.
fn eat_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((zero_or_more(nb_char), any_of((b_break, end_of_input)))).attempt(ctx, builder)
}

/// Reads YAML documents from a byte source.
#[derive(Debug)]
pub struct Parser {
    ctx: Context,
    started: bool,
}

impl Parser {
    /// Parse the bytes produced by `reader`.
    #[must_use]
    pub fn new(reader: impl Read + 'static) -> Self {
        Self::from_stream(CharStream::new(reader))
    }

    /// Parse in-memory text.
    #[must_use]
    #[allow(clippy::should_implement_trait, reason = "infallible, unlike FromStr")]
    pub fn from_str(text: &str) -> Self {
        Self::from_stream(CharStream::from_text(text))
    }

    /// Parse in-memory bytes, which need not be valid UTF-8.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(std::io::Cursor::new(bytes.to_vec()))
    }

    fn from_stream(stream: CharStream) -> Self {
        Self {
            ctx: Context::new(stream),
            started: false,
        }
    }

    /// The 1-based line the parser is at.
    #[must_use]
    pub const fn line_number(&self) -> u32 {
        self.ctx.line_number()
    }

    /// The next `n` characters, leaving the position untouched.
    pub fn peek(&mut self, n: usize) -> String {
        let mut text = String::new();
        self.ctx.lookahead(|ctx| {
            text.extend(std::iter::from_fn(|| ctx.stream_mut().get()).take(n));
            false
        });
        text
    }

    /// Parse the next document.
    ///
    /// Returns `Ok(None)` once the input is exhausted. An empty input still
    /// yields one document, the empty scalar.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the document does not match the grammar,
    /// contains malformed UTF-8 or refers to an unknown anchor. Parsing can
    /// continue with the next document afterwards.
    pub fn parse(&mut self) -> Result<Option<Rc<Node>>, ParseError> {
        if self.started && self.ctx.stream_mut().eof() {
            return Ok(None);
        }
        self.started = true;

        let start = self.ctx.stream().offset();
        let result = self.parse_document(start);
        if self.ctx.stream().offset() == start {
            eat_line(&mut self.ctx, &mut NullBuilder);
        }
        self.skip_to_next_document();
        let mark = self.ctx.mark();
        self.ctx.stream_mut().consume(mark);
        result.map(Some)
    }

    fn parse_document(&mut self, start: usize) -> Result<Rc<Node>, ParseError> {
        let start_line = self.ctx.line_number();
        // Peeking decodes ahead, so only do it when the message is wanted.
        let logging = log::log_enabled!(log::Level::Debug);
        if logging {
            log::debug!("start parsing at line {start_line}, head at {:?}", self.peek(PEEK_WIDTH));
        }

        let mut builder = NodeBuilder::new();
        let matched = l_single_document(&mut self.ctx, &mut builder);

        if logging {
            log::debug!(
                "done parsing at line {}, result {}, head at {:?}",
                self.ctx.line_number(),
                if matched { "good" } else { "bad" },
                self.peek(PEEK_WIDTH)
            );
        }

        if let Some(error) = self.stream_error() {
            log::warn!("{error}");
            return Err(error);
        }
        // A document that consumed nothing before another `---` would be
        // returned forever.
        let stuck = self.ctx.stream().offset() == start && !self.ctx.stream_mut().eof();
        if !self.at_document_end() || stuck {
            log::debug!("not at document end, reporting error");
            let message = format!(
                "parsing stopped before the end of document, could not handle \"{}\"",
                self.peek(PEEK_WIDTH)
            );
            return Err(self.grammar_error(message));
        }
        if !matched {
            return Err(self.grammar_error("Could not construct a valid document.".to_owned()));
        }

        builder.build().map_err(|kind| {
            log::warn!("document starting at line {start_line} rejected: {kind}");
            ParseError::new(kind, span_at(self.ctx.stream().offset(), 0), start_line)
        })
    }

    /// A decoding or read failure that cut the input short.
    fn stream_error(&self) -> Option<ParseError> {
        let stream = self.ctx.stream();
        let kind = if let Some(error) = stream.encoding_error() {
            ErrorKind::MalformedEncoding {
                offset: error.offset,
                bytes: error.bytes.clone(),
            }
        } else {
            ErrorKind::Io(format!("read failed: {:?}", stream.io_error()?))
        };
        let offset = stream.offset();
        Some(ParseError::new(kind, span_at(offset, 1), self.ctx.line_number()))
    }

    fn grammar_error(&mut self, message: String) -> ParseError {
        let len = self.peek(PEEK_WIDTH).chars().count();
        ParseError::new(
            ErrorKind::Grammar(message),
            span_at(self.ctx.stream().offset(), len),
            self.ctx.line_number(),
        )
        .with_furthest_line(self.ctx.furthest_line())
    }

    /// Trailing comments, then the start of another document, a document
    /// suffix or the end of input.
    fn at_document_end(&mut self) -> bool {
        s_l_comments(&mut self.ctx, &mut NullBuilder);
        self.ctx.lookahead(|ctx| any_of((start_of_document, end_of_document)).attempt(ctx, &mut NullBuilder))
    }

    /// Skip line by line until the next `---`, past the next `...`, or to the
    /// end of input.
    fn skip_to_next_document(&mut self) {
        self.ctx.reset();
        while !self.ctx.stream_mut().eof() && !self.sync() {
            log::trace!("skipping line {}", self.ctx.line_number());
            eat_line(&mut self.ctx, &mut NullBuilder);
        }
    }

    fn sync(&mut self) -> bool {
        self.ctx.lookahead(|ctx| start_of_document(ctx, &mut NullBuilder))
            || end_of_document(&mut self.ctx, &mut NullBuilder)
    }
}

impl Iterator for Parser {
    type Item = Result<Rc<Node>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse().transpose()
    }
}

/// Parse the first document of `text`.
///
/// # Errors
///
/// Returns a [`ParseError`] if that document is not valid YAML.
pub fn parse(text: &str) -> Result<Rc<Node>, ParseError> {
    Parser::from_str(text)
        .parse()
        .map(|node| node.unwrap_or_else(|| Rc::new(Node::scalar(""))))
}

/// Parse every document of `text`.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse_all(text: &str) -> Result<Vec<Rc<Node>>, ParseError> {
    Parser::from_str(text).collect()
}

/// Returns `true` if the whole of `text` is a well-formed YAML stream.
///
/// Only the grammar is checked; no tree is built, so aliases are not resolved.
#[must_use]
pub fn validate(text: &str) -> bool {
    let mut ctx = Context::from_text(text);
    all_of((l_yaml_stream, end_of_input)).attempt(&mut ctx, &mut NullBuilder)
        && ctx.stream().encoding_error().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn test_peek_does_not_move() {
        let mut parser = Parser::from_str("abc: déf\n");
        assert_eq!(parser.peek(6), "abc: d");
        assert_eq!(parser.peek(100), "abc: déf\n");
        assert_eq!(parser.line_number(), 1);
        let doc = parser.parse().unwrap().unwrap();
        assert_eq!(doc.leaf_value(path!["abc"]), Ok("déf"));
    }

    #[test]
    fn test_documents_in_sequence() {
        let mut parser = Parser::from_str("- a\n---\n- b\n...\n--- c\n");
        assert_eq!(parser.parse().unwrap().unwrap().to_string(), "[a]");
        assert_eq!(parser.parse().unwrap().unwrap().to_string(), "[b]");
        assert_eq!(parser.parse().unwrap().unwrap().to_string(), "c");
        assert_eq!(parser.parse(), Ok(None));
        assert_eq!(parser.parse(), Ok(None));
    }

    #[test]
    fn test_empty_input() {
        let mut parser = Parser::from_str("");
        assert_eq!(parser.parse().unwrap().unwrap().as_scalar(), Ok(""));
        assert_eq!(parser.parse(), Ok(None));
    }

    #[test]
    fn test_recovers_after_error() {
        let mut parser = Parser::from_str("key: [unclosed\nmore\n---\nnext: doc\n");
        let err = parser.parse().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Grammar(_)), "{err:?}");
        let doc = parser.parse().unwrap().unwrap();
        assert_eq!(doc.leaf_value(path!["next"]), Ok("doc"));
        assert_eq!(parser.parse(), Ok(None));
    }

    #[test]
    fn test_unparsable_explicit_document() {
        let mut parser = Parser::from_str("--- ]bad\n--- ok\n");
        assert!(parser.parse().is_err());
        assert_eq!(parser.parse().unwrap().unwrap().as_scalar(), Ok("ok"));
        assert_eq!(parser.parse(), Ok(None));
    }

    #[test]
    fn test_stopped_early_message() {
        let err = parse("a: b\n]oops\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error at line 2: parsing stopped before the end of document, could not handle \"]oops\n\""
        );
    }

    #[test]
    fn test_unknown_alias_reports_document_line() {
        let mut parser = Parser::from_str("a\n---\nx: 1\ny: *nope\n");
        assert!(parser.parse().is_ok());
        let err = parser.parse().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownAlias("nope".to_owned()));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_malformed_encoding() {
        let mut parser = Parser::from_bytes(b"key: va\xc3\x28lue\n");
        let err = parser.parse().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedEncoding { .. }), "{err:?}");
        assert!(err.kind.is_content_error());
    }

    #[test]
    fn test_encoding_error_in_later_document() {
        let mut parser = Parser::from_bytes(b"a: 1\n---\nb: \xff\n");
        assert_eq!(parser.parse().unwrap().unwrap().leaf_value(path!["a"]), Ok("1"));
        let err = parser.parse().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedEncoding { .. }), "{err:?}");
    }

    #[test]
    fn test_iterator() {
        let docs: Vec<_> = Parser::from_str("1\n---\n2\n").map(|doc| doc.unwrap().to_string()).collect();
        assert_eq!(docs, ["1", "2"]);
    }

    #[test]
    fn test_validate() {
        assert!(validate("a: b\n---\n- c\n...\n"));
        assert!(validate(""));
        assert!(!validate("a: [b\n"));
    }
}
