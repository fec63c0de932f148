// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Structural productions [63]–[81]: indentation, separation, line folding
//! and comments.
//!
//! The indentation level `n` is `ctx.indent_level()`, the context `c` is
//! `ctx.blockflow()`. A negative level counts as zero spaces.

use crate::builder::{DocumentBuilder, NullBuilder};
use crate::clause::{Clause, all_of, any_of, ch, emit, end_of_input, one_or_more, with_blockflow, zero_or_more, zero_or_one};
use crate::context::{BlockFlow, Context};
use crate::grammar::chars::{b_as_line_feed, b_break, b_non_content, is_break, nb_char, s_white};

/// The indentation level as a space count.
fn level(ctx: &Context) -> usize {
    usize::try_from(ctx.indent_level()).unwrap_or(0)
}

/// Number of spaces starting at the cursor.
pub(crate) fn count_spaces(ctx: &mut Context) -> usize {
    let stream = ctx.stream_mut();
    let mut count = 0;
    while stream.peek_at(count) == Some(' ') {
        count += 1;
    }
    count
}

/// [63] s-indent(n) ::= s-space × n
pub fn s_indent(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let n = level(ctx);
    let stream = ctx.stream_mut();
    if (0..n).all(|ahead| stream.peek_at(ahead) == Some(' ')) {
        stream.advance(n);
        true
    } else {
        false
    }
}

/// `s-indent(n)` not followed by a further space: exactly `n` leading spaces.
pub fn s_indent_exact(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let n = level(ctx);
    if count_spaces(ctx) == n {
        ctx.stream_mut().advance(n);
        true
    } else {
        false
    }
}

/// [64] s-indent(<n) ::= s-space × m /* where m < n */
pub fn s_indent_lt(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let m = count_spaces(ctx);
    if i64::try_from(m).is_ok_and(|m| m < i64::from(ctx.indent_level())) {
        ctx.stream_mut().advance(m);
        true
    } else {
        false
    }
}

/// [65] s-indent(≤n) ::= s-space × m /* where m ≤ n */
pub fn s_indent_le(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let m = count_spaces(ctx);
    if i64::try_from(m).is_ok_and(|m| m <= i64::from(ctx.indent_level())) {
        ctx.stream_mut().advance(m);
        true
    } else {
        false
    }
}

/// Scan ahead (without consuming) past empty lines and return the number of
/// leading spaces on the first line with content, or on the last line when
/// the input ends first.
pub fn detect_indent(ctx: &mut Context) -> usize {
    let mut detected = 0;
    ctx.lookahead(|ctx| {
        loop {
            detected = count_spaces(ctx);
            ctx.stream_mut().advance(detected);
            if !b_break(ctx, &mut NullBuilder) {
                return false;
            }
        }
    });
    detected
}

/// Scan ahead (without consuming) over the empty lines before the next
/// content line and return the most spaces found on any of them. Returns 0
/// when the input ends before any content.
pub fn widest_leading_blank(ctx: &mut Context) -> usize {
    let mut widest = 0;
    ctx.lookahead(|ctx| {
        loop {
            let spaces = count_spaces(ctx);
            ctx.stream_mut().advance(spaces);
            if !b_break(ctx, &mut NullBuilder) {
                if ctx.stream_mut().eof() {
                    widest = 0;
                }
                return false;
            }
            widest = widest.max(spaces);
        }
    });
    widest
}

/// start-of-line: the cursor is at the beginning of the input or right after a line break.
pub fn start_of_line(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    ctx.stream().rpeek().is_none_or(is_break)
}

/// [66] s-separate-in-line ::= s-white+ | start-of-line
pub fn s_separate_in_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((one_or_more(s_white), start_of_line)).attempt(ctx, builder)
}

/// [67] s-line-prefix(n,c)
pub fn s_line_prefix(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    match ctx.blockflow() {
        BlockFlow::BlockOut | BlockFlow::BlockIn => s_block_line_prefix(ctx, builder),
        _ => s_flow_line_prefix(ctx, builder),
    }
}

/// [68] s-block-line-prefix(n) ::= s-indent(n)
pub fn s_block_line_prefix(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    s_indent(ctx, builder)
}

/// [69] s-flow-line-prefix(n) ::= s-indent(n) s-separate-in-line?
pub fn s_flow_line_prefix(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((s_indent, zero_or_one(s_separate_in_line))).attempt(ctx, builder)
}

/// [70] l-empty(n,c) ::= ( s-line-prefix(n,c) | s-indent(<n) ) b-as-line-feed
pub fn l_empty(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((any_of((s_line_prefix, s_indent_lt)), b_as_line_feed)).attempt(ctx, builder)
}

/// [71] b-l-trimmed(n,c) ::= b-non-content l-empty(n,c)+
pub fn b_l_trimmed(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((b_non_content, one_or_more(l_empty))).attempt(ctx, builder)
}

/// [72] b-as-space ::= b-break
pub fn b_as_space(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    emit(' ', b_break).attempt(ctx, builder)
}

/// [73] b-l-folded(n,c) ::= b-l-trimmed(n,c) | b-as-space
pub fn b_l_folded(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((b_l_trimmed, b_as_space)).attempt(ctx, builder)
}

/// [74] s-flow-folded(n) ::= s-separate-in-line? b-l-folded(n,flow-in) s-flow-line-prefix(n)
pub fn s_flow_folded(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        zero_or_one(s_separate_in_line),
        with_blockflow(BlockFlow::FlowIn, b_l_folded),
        s_flow_line_prefix,
    ))
    .attempt(ctx, builder)
}

/// [75] c-nb-comment-text ::= "#" nb-char*
pub fn c_nb_comment_text(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((ch('#'), zero_or_more(nb_char))).attempt(ctx, builder)
}

/// [76] b-comment ::= b-non-content | /* End of file */
pub fn b_comment(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((b_non_content, end_of_input)).attempt(ctx, builder)
}

/// [77] s-b-comment ::= ( s-separate-in-line c-nb-comment-text? )? b-comment
pub fn s_b_comment(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        zero_or_one(all_of((s_separate_in_line, zero_or_one(c_nb_comment_text)))),
        b_comment,
    ))
    .attempt(ctx, builder)
}

/// [78] l-comment ::= s-separate-in-line c-nb-comment-text? b-comment
pub fn l_comment(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((s_separate_in_line, zero_or_one(c_nb_comment_text), b_comment)).attempt(ctx, builder)
}

/// [79] s-l-comments ::= ( s-b-comment | start-of-line ) l-comment*
pub fn s_l_comments(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((any_of((s_b_comment, start_of_line)), zero_or_more(l_comment))).attempt(ctx, builder)
}

/// [80] s-separate(n,c)
pub fn s_separate(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    if ctx.blockflow().is_key() {
        s_separate_in_line(ctx, builder)
    } else {
        s_separate_lines(ctx, builder)
    }
}

/// [81] s-separate-lines(n) ::= ( s-l-comments s-flow-line-prefix(n) ) | s-separate-in-line
pub fn s_separate_lines(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((all_of((s_l_comments, s_flow_line_prefix)), s_separate_in_line)).attempt(ctx, builder)
}
