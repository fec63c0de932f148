// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Character productions [1]–[62].
//!
//! Character classes are exposed twice: as `is_*` predicates for direct use
//! and as clauses matching a single character of that class. Clauses here
//! emit nothing except the escape sequences, which report the decoded
//! character as an atom.

use crate::builder::DocumentBuilder;
use crate::clause::{Clause, char_if};
use crate::context::Context;

/// [1] c-printable
#[must_use]
pub const fn is_printable(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{7e}' | '\u{85}'
        | '\u{a0}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}')
}

/// [2] nb-json
#[must_use]
pub const fn is_json(c: char) -> bool {
    matches!(c, '\t' | '\u{20}'..='\u{10ffff}')
}

/// [3] c-byte-order-mark
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// [22] c-indicator
#[must_use]
pub const fn is_indicator(c: char) -> bool {
    matches!(
        c,
        '-' | '?' | ':' | ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%' | '@' | '`'
    )
}

/// [23] c-flow-indicator
#[must_use]
pub const fn is_flow_indicator(c: char) -> bool {
    matches!(c, ',' | '[' | ']' | '{' | '}')
}

/// [26] b-char
#[must_use]
pub const fn is_break(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

/// [27] nb-char
#[must_use]
pub const fn is_nb_char(c: char) -> bool {
    is_printable(c) && !is_break(c) && c != BYTE_ORDER_MARK
}

/// [33] s-white
#[must_use]
pub const fn is_white(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// [34] ns-char
#[must_use]
pub const fn is_ns_char(c: char) -> bool {
    is_nb_char(c) && !is_white(c)
}

/// [38] ns-word-char
#[must_use]
pub const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// The single-character part of [39] ns-uri-char (everything but `%` escapes).
#[must_use]
pub const fn is_uri_char(c: char) -> bool {
    is_word_char(c)
        || matches!(
            c,
            '#' | ';' | '/' | '?' | ':' | '@' | '&' | '=' | '+' | '$' | ',' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')'
                | '[' | ']'
        )
}

/// [102] ns-anchor-char
#[must_use]
pub const fn is_anchor_char(c: char) -> bool {
    is_ns_char(c) && !is_flow_indicator(c)
}

/// [3] c-byte-order-mark
pub fn c_byte_order_mark(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    char_if(|c| c == BYTE_ORDER_MARK).attempt(ctx, builder)
}

/// [28] b-break ::= ( b-carriage-return b-line-feed ) | b-carriage-return | b-line-feed
///
/// Counts the line.
pub fn b_break(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let stream = ctx.stream_mut();
    match stream.peek() {
        Some('\r') => {
            stream.advance(1);
            if stream.peek() == Some('\n') {
                stream.advance(1);
            }
        }
        Some('\n') => stream.advance(1),
        _ => return false,
    }
    ctx.newline();
    true
}

/// [29] b-as-line-feed ::= b-break
///
/// Reports the break as a single `\n` atom.
pub fn b_as_line_feed(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    if b_break(ctx, builder) {
        builder.add_atom('\n');
        true
    } else {
        false
    }
}

/// [30] b-non-content ::= b-break
pub fn b_non_content(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    b_break(ctx, builder)
}

/// [27] nb-char
pub fn nb_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    char_if(is_nb_char).attempt(ctx, builder)
}

/// [31] s-space
pub fn s_space(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    char_if(|c| c == ' ').attempt(ctx, builder)
}

/// [33] s-white
pub fn s_white(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    char_if(is_white).attempt(ctx, builder)
}

/// [34] ns-char
pub fn ns_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    char_if(is_ns_char).attempt(ctx, builder)
}

/// [35] ns-dec-digit
pub fn ns_dec_digit(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    char_if(|c: char| c.is_ascii_digit()).attempt(ctx, builder)
}

/// [38] ns-word-char
pub fn ns_word_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    char_if(is_word_char).attempt(ctx, builder)
}

/// [39] ns-uri-char ::= "%" ns-hex-digit ns-hex-digit | ns-word-char | "#" | ...
pub fn ns_uri_char(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let stream = ctx.stream_mut();
    match stream.peek() {
        Some('%') => {
            let escaped = stream.peek_at(1).is_some_and(|c| c.is_ascii_hexdigit())
                && stream.peek_at(2).is_some_and(|c| c.is_ascii_hexdigit());
            if escaped {
                stream.advance(3);
            }
            escaped
        }
        Some(c) if is_uri_char(c) => {
            stream.advance(1);
            true
        }
        _ => false,
    }
}

/// [40] ns-tag-char ::= ns-uri-char - "!" - c-flow-indicator
pub fn ns_tag_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    match ctx.stream_mut().peek() {
        Some(c) if c == '!' || is_flow_indicator(c) => false,
        _ => ns_uri_char(ctx, builder),
    }
}

/// [102] ns-anchor-char
pub fn ns_anchor_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    char_if(is_anchor_char).attempt(ctx, builder)
}

/// Number of hex digits following the escape letters `x`, `u` and `U`.
const fn hex_escape_width(letter: char) -> Option<usize> {
    match letter {
        'x' => Some(2),
        'u' => Some(4),
        'U' => Some(8),
        _ => None,
    }
}

/// The character denoted by the single-letter escapes [42]–[58].
const fn simple_escape(letter: char) -> Option<char> {
    Some(match letter {
        '0' => '\0',
        'a' => '\u{07}',
        'b' => '\u{08}',
        't' | '\t' => '\t',
        'n' => '\n',
        'v' => '\u{0b}',
        'f' => '\u{0c}',
        'r' => '\r',
        'e' => '\u{1b}',
        ' ' => ' ',
        '"' => '"',
        '/' => '/',
        '\\' => '\\',
        'N' => '\u{85}',
        '_' => '\u{a0}',
        'L' => '\u{2028}',
        'P' => '\u{2029}',
        _ => return None,
    })
}

/// [62] c-ns-esc-char ::= "\" ( ns-esc-null | ... | ns-esc-32-bit )
///
/// Reports the escaped character as an atom. Numeric escapes that do not
/// denote a Unicode scalar value fail.
pub fn c_ns_esc_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let stream = ctx.stream_mut();
    if stream.peek() != Some('\\') {
        return false;
    }
    let Some(letter) = stream.peek_at(1) else {
        return false;
    };
    if let Some(decoded) = simple_escape(letter) {
        stream.advance(2);
        builder.add_atom(decoded);
        return true;
    }
    let Some(width) = hex_escape_width(letter) else {
        return false;
    };
    let mut code = 0_u32;
    for ahead in 0..width {
        match stream.peek_at(2 + ahead).and_then(|c| c.to_digit(16)) {
            Some(digit) => code = code * 16 + digit,
            None => return false,
        }
    }
    match char::from_u32(code) {
        Some(decoded) => {
            stream.advance(2 + width);
            builder.add_atom(decoded);
            true
        }
        None => false,
    }
}
