// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Block scalars [162]–[182] and block collections [183]–[201].

use crate::builder::DocumentBuilder;
use crate::clause::{
    Clause, all_of, any_of, capture, ch, emit, end_of_input, indented, not, one_or_more, scalar, state_scope, times,
    with_blockflow, zero_or_more, zero_or_one,
};
use crate::context::{BlockFlow, Chomp, Context, State};
use crate::grammar::chars::{b_as_line_feed, b_non_content, nb_char, ns_char, s_space, s_white};
use crate::grammar::document::c_forbidden;
use crate::grammar::flow::{c_ns_properties, c_s_implicit_json_key, ns_flow_node, ns_s_implicit_yaml_key};
use crate::grammar::structure::{
    b_comment, b_l_folded, c_nb_comment_text, count_spaces, detect_indent, l_comment, l_empty, s_b_comment, s_indent,
    s_indent_exact, s_indent_le, s_indent_lt, s_l_comments, s_separate, widest_leading_blank,
};
use crate::grammar::{e_node, end_mapping, end_sequence, start_mapping, start_sequence};

// ============================================================================
// Block scalar headers
// ============================================================================

/// [163] c-indentation-indicator(m) ::= ns-dec-digit - "0"
///
/// An explicit indicator sets the indentation level to `n+m`. Without one the
/// level is left alone; `0` is rejected.
pub fn c_indentation_indicator(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let Some(digit) = ctx.stream_mut().peek().and_then(|c| c.to_digit(10)) else {
        return true;
    };
    if digit == 0 {
        log::trace!("indentation indicator 0 at line {}", ctx.line_number());
        return false;
    }
    ctx.stream_mut().advance(1);
    // A single digit always fits.
    let m = i32::try_from(digit).unwrap_or(1);
    ctx.set_indent(ctx.indent_level() + m);
    true
}

/// [164] c-chomping-indicator(t) ::= "-" | "+" | /* Empty */
pub fn c_chomping_indicator(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let chomp = match ctx.stream_mut().peek() {
        Some('-') => Chomp::Strip,
        Some('+') => Chomp::Keep,
        _ => {
            ctx.set_chomp(Chomp::Clip);
            return true;
        }
    };
    ctx.stream_mut().advance(1);
    ctx.set_chomp(chomp);
    true
}

/// [162] c-b-block-header(m,t) ::= ( ( c-indentation-indicator(m) c-chomping-indicator(t) )
///                               | ( c-chomping-indicator(t) c-indentation-indicator(m) ) ) s-b-comment
///
/// On success the indentation level is the content indentation and the
/// chomping mode is set. Without an explicit indicator the indentation is
/// taken from the first non-empty line; if that line is not indented past
/// `n`, the content is empty.
pub fn c_b_block_header(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let n = ctx.indent_level();
    let header = any_of((
        all_of((c_indentation_indicator, c_chomping_indicator, s_b_comment)),
        all_of((c_chomping_indicator, c_indentation_indicator, s_b_comment)),
    ));
    if !header.attempt(ctx, builder) {
        return false;
    }
    if ctx.indent_level() == n {
        let detected = detect_indent(ctx);
        let column = i32::try_from(detected).unwrap_or(i32::MAX);
        if column > n && widest_leading_blank(ctx) > detected {
            log::trace!("leading empty line indented past the content at line {}", ctx.line_number());
            return false;
        }
        ctx.set_indent(if column > n { column } else { n + 1 });
    }
    true
}

/// [165] b-chomped-last(t)
///
/// Content running up to the end of input still ends in a line feed unless
/// stripped.
pub fn b_chomped_last(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    match ctx.chomp() {
        Chomp::Strip => any_of((b_non_content, end_of_input)).attempt(ctx, builder),
        Chomp::Clip | Chomp::Keep => any_of((b_as_line_feed, emit('\n', end_of_input))).attempt(ctx, builder),
    }
}

/// [166] l-chomped-empty(n,t)
pub fn l_chomped_empty(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    match ctx.chomp() {
        Chomp::Keep => l_keep_empty(ctx, builder),
        Chomp::Strip | Chomp::Clip => l_strip_empty(ctx, builder),
    }
}

/// [167] l-strip-empty(n) ::= ( s-indent(≤n) b-non-content )* l-trail-comments(n)?
pub fn l_strip_empty(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        zero_or_more(all_of((s_indent_le, b_non_content))),
        zero_or_one(l_trail_comments),
    ))
    .attempt(ctx, builder)
}

/// [168] l-keep-empty(n) ::= l-empty(n,block-in)* l-trail-comments(n)?
pub fn l_keep_empty(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        zero_or_more(with_blockflow(BlockFlow::BlockIn, l_empty)),
        zero_or_one(l_trail_comments),
    ))
    .attempt(ctx, builder)
}

/// [169] l-trail-comments(n) ::= s-indent(<n) c-nb-comment-text b-comment l-comment*
pub fn l_trail_comments(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        s_indent_lt,
        c_nb_comment_text,
        b_comment,
        zero_or_more(l_comment),
    ))
    .attempt(ctx, builder)
}

/// Run `body` with the block scalar parameters kept local to it.
fn block_scalar_scope(body: impl Clause) -> impl Clause {
    state_scope(|_: &mut State| {}, body)
}

// ============================================================================
// Literal style
// ============================================================================

/// [170] c-l+literal(n) ::= "|" c-b-block-header(m,t) l-literal-content(n+m,t)
pub fn c_l_literal(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    block_scalar_scope(all_of((ch('|'), c_b_block_header, scalar(l_literal_content)))).attempt(ctx, builder)
}

/// [171] l-nb-literal-text(n) ::= l-empty(n,block-in)* s-indent(n) nb-char+
pub fn l_nb_literal_text(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        zero_or_more(with_blockflow(BlockFlow::BlockIn, l_empty)),
        not(c_forbidden),
        s_indent,
        capture(one_or_more(nb_char)),
    ))
    .attempt(ctx, builder)
}

/// [172] b-nb-literal-next(n) ::= b-as-line-feed l-nb-literal-text(n)
pub fn b_nb_literal_next(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((b_as_line_feed, l_nb_literal_text)).attempt(ctx, builder)
}

/// [173] l-literal-content(n,t) ::= ( l-nb-literal-text(n) b-nb-literal-next(n)* b-chomped-last(t) )?
///                                 l-chomped-empty(n,t)
pub fn l_literal_content(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        zero_or_one(all_of((l_nb_literal_text, zero_or_more(b_nb_literal_next), b_chomped_last))),
        l_chomped_empty,
    ))
    .attempt(ctx, builder)
}

// ============================================================================
// Folded style
// ============================================================================

/// [174] c-l+folded(n) ::= ">" c-b-block-header(m,t) l-folded-content(n+m,t)
pub fn c_l_folded(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    block_scalar_scope(all_of((ch('>'), c_b_block_header, scalar(l_folded_content)))).attempt(ctx, builder)
}

/// [175] s-nb-folded-text(n) ::= s-indent(n) ns-char nb-char*
pub fn s_nb_folded_text(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((not(c_forbidden), s_indent, capture(all_of((ns_char, zero_or_more(nb_char)))))).attempt(ctx, builder)
}

/// [176] l-nb-folded-lines(n) ::= s-nb-folded-text(n) ( b-l-folded(n,block-in) s-nb-folded-text(n) )*
pub fn l_nb_folded_lines(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        s_nb_folded_text,
        zero_or_more(all_of((with_blockflow(BlockFlow::BlockIn, b_l_folded), s_nb_folded_text))),
    ))
    .attempt(ctx, builder)
}

/// [177] s-nb-spaced-text(n) ::= s-indent(n) s-white nb-char*
pub fn s_nb_spaced_text(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((not(c_forbidden), s_indent, capture(all_of((s_white, zero_or_more(nb_char)))))).attempt(ctx, builder)
}

/// [178] b-l-spaced(n) ::= b-as-line-feed l-empty(n,block-in)*
pub fn b_l_spaced(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((b_as_line_feed, zero_or_more(with_blockflow(BlockFlow::BlockIn, l_empty)))).attempt(ctx, builder)
}

/// [179] l-nb-spaced-lines(n) ::= s-nb-spaced-text(n) ( b-l-spaced(n) s-nb-spaced-text(n) )*
pub fn l_nb_spaced_lines(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((s_nb_spaced_text, zero_or_more(all_of((b_l_spaced, s_nb_spaced_text))))).attempt(ctx, builder)
}

/// [180] l-nb-same-lines(n) ::= l-empty(n,block-in)* ( l-nb-folded-lines(n) | l-nb-spaced-lines(n) )
pub fn l_nb_same_lines(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        zero_or_more(with_blockflow(BlockFlow::BlockIn, l_empty)),
        any_of((l_nb_folded_lines, l_nb_spaced_lines)),
    ))
    .attempt(ctx, builder)
}

/// [181] l-nb-diff-lines(n) ::= l-nb-same-lines(n) ( b-as-line-feed l-nb-same-lines(n) )*
pub fn l_nb_diff_lines(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((l_nb_same_lines, zero_or_more(all_of((b_as_line_feed, l_nb_same_lines))))).attempt(ctx, builder)
}

/// [182] l-folded-content(n,t) ::= ( l-nb-diff-lines(n) b-chomped-last(t) )? l-chomped-empty(n,t)
pub fn l_folded_content(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((zero_or_one(all_of((l_nb_diff_lines, b_chomped_last))), l_chomped_empty)).attempt(ctx, builder)
}

// ============================================================================
// Block sequences
// ============================================================================

/// The column of the next content line, if it is indented past `n`.
fn collection_indent(ctx: &mut Context) -> Option<i32> {
    let column = i32::try_from(detect_indent(ctx)).ok()?;
    (column > ctx.indent_level()).then_some(column)
}

/// Run `body` at indentation `column`.
fn at_column(column: i32, body: impl Clause) -> impl Clause {
    state_scope(move |state: &mut State| state.indent_level = column, body)
}

/// [183] l+block-sequence(n) ::= ( s-indent(n+m) c-l-block-seq-entry(n+m) )+
///                              /* For some fixed auto-detected m > 0 */
pub fn l_block_sequence(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let Some(column) = collection_indent(ctx) else {
        return false;
    };
    at_column(
        column,
        all_of((
            start_sequence,
            one_or_more(all_of((s_indent_exact, c_l_block_seq_entry))),
            end_sequence,
        )),
    )
    .attempt(ctx, builder)
}

/// [184] c-l-block-seq-entry(n) ::= "-" /* Not followed by an ns-char */ s-l+block-indented(n,block-in)
pub fn c_l_block_seq_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        ch('-'),
        not(ns_char),
        with_blockflow(BlockFlow::BlockIn, s_l_block_indented),
    ))
    .attempt(ctx, builder)
}

/// The compact form of [185]: `s-indent(m) ( ns-l-compact-sequence(n+1+m) | ns-l-compact-mapping(n+1+m) )`.
fn compact_block_indented(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let m = count_spaces(ctx);
    let Ok(delta) = i32::try_from(m + 1) else {
        return false;
    };
    all_of((
        times(m, s_space),
        indented(delta, any_of((ns_l_compact_sequence, ns_l_compact_mapping))),
    ))
    .attempt(ctx, builder)
}

/// [185] s-l+block-indented(n,c) ::= ( s-indent(m)
///     ( ns-l-compact-sequence(n+1+m) | ns-l-compact-mapping(n+1+m) ) )
///     | s-l+block-node(n,c) | ( e-node s-l-comments )
pub fn s_l_block_indented(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((compact_block_indented, s_l_block_node, all_of((e_node, s_l_comments)))).attempt(ctx, builder)
}

/// [186] ns-l-compact-sequence(n) ::= c-l-block-seq-entry(n) ( s-indent(n) c-l-block-seq-entry(n) )*
pub fn ns_l_compact_sequence(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        start_sequence,
        c_l_block_seq_entry,
        zero_or_more(all_of((s_indent_exact, c_l_block_seq_entry))),
        end_sequence,
    ))
    .attempt(ctx, builder)
}

// ============================================================================
// Block mappings
// ============================================================================

/// [187] l+block-mapping(n) ::= ( s-indent(n+m) ns-l-block-map-entry(n+m) )+
///                             /* For some fixed auto-detected m > 0 */
pub fn l_block_mapping(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let Some(column) = collection_indent(ctx) else {
        return false;
    };
    at_column(
        column,
        all_of((
            start_mapping,
            one_or_more(all_of((s_indent_exact, ns_l_block_map_entry))),
            end_mapping,
        )),
    )
    .attempt(ctx, builder)
}

/// [188] ns-l-block-map-entry(n) ::= c-l-block-map-explicit-entry(n) | ns-l-block-map-implicit-entry(n)
pub fn ns_l_block_map_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((c_l_block_map_explicit_entry, ns_l_block_map_implicit_entry)).attempt(ctx, builder)
}

/// [189] c-l-block-map-explicit-entry(n) ::= c-l-block-map-explicit-key(n)
///     ( l-block-map-explicit-value(n) | e-node )
pub fn c_l_block_map_explicit_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        c_l_block_map_explicit_key,
        any_of((l_block_map_explicit_value, e_node)),
    ))
    .attempt(ctx, builder)
}

/// [190] c-l-block-map-explicit-key(n) ::= "?" s-l+block-indented(n,block-out)
pub fn c_l_block_map_explicit_key(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        ch('?'),
        not(ns_char),
        with_blockflow(BlockFlow::BlockOut, s_l_block_indented),
    ))
    .attempt(ctx, builder)
}

/// [191] l-block-map-explicit-value(n) ::= s-indent(n) ":" s-l+block-indented(n,block-out)
pub fn l_block_map_explicit_value(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        s_indent_exact,
        ch(':'),
        not(ns_char),
        with_blockflow(BlockFlow::BlockOut, s_l_block_indented),
    ))
    .attempt(ctx, builder)
}

/// [192] ns-l-block-map-implicit-entry(n) ::= ( ns-s-block-map-implicit-key | e-node )
///     c-l-block-map-implicit-value(n)
pub fn ns_l_block_map_implicit_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        any_of((ns_s_block_map_implicit_key, e_node)),
        c_l_block_map_implicit_value,
    ))
    .attempt(ctx, builder)
}

/// [193] ns-s-block-map-implicit-key ::= c-s-implicit-json-key(block-key) | ns-s-implicit-yaml-key(block-key)
pub fn ns_s_block_map_implicit_key(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    with_blockflow(
        BlockFlow::BlockKey,
        any_of((c_s_implicit_json_key, ns_s_implicit_yaml_key)),
    )
    .attempt(ctx, builder)
}

/// [194] c-l-block-map-implicit-value(n) ::= ":" ( s-l+block-node(n,block-out) | ( e-node s-l-comments ) )
pub fn c_l_block_map_implicit_value(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        ch(':'),
        any_of((
            with_blockflow(BlockFlow::BlockOut, s_l_block_node),
            all_of((e_node, s_l_comments)),
        )),
    ))
    .attempt(ctx, builder)
}

/// [195] ns-l-compact-mapping(n) ::= ns-l-block-map-entry(n) ( s-indent(n) ns-l-block-map-entry(n) )*
pub fn ns_l_compact_mapping(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        start_mapping,
        ns_l_block_map_entry,
        zero_or_more(all_of((s_indent_exact, ns_l_block_map_entry))),
        end_mapping,
    ))
    .attempt(ctx, builder)
}

// ============================================================================
// Block nodes
// ============================================================================

/// [196] s-l+block-node(n,c) ::= s-l+block-in-block(n,c) | s-l+flow-in-block(n)
pub fn s_l_block_node(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((s_l_block_in_block, s_l_flow_in_block)).attempt(ctx, builder)
}

/// [197] s-l+flow-in-block(n) ::= s-separate(n+1,flow-out) ns-flow-node(n+1,flow-out) s-l-comments
pub fn s_l_flow_in_block(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    indented(
        1,
        with_blockflow(BlockFlow::FlowOut, all_of((s_separate, ns_flow_node, s_l_comments))),
    )
    .attempt(ctx, builder)
}

/// [198] s-l+block-in-block(n,c) ::= s-l+block-scalar(n,c) | s-l+block-collection(n,c)
pub fn s_l_block_in_block(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((s_l_block_scalar, s_l_block_collection)).attempt(ctx, builder)
}

/// [199] s-l+block-scalar(n,c) ::= s-separate(n+1,c) ( c-ns-properties(n+1,c) s-separate(n+1,c) )?
///     ( c-l+literal(n) | c-l+folded(n) )
pub fn s_l_block_scalar(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        indented(1, all_of((s_separate, zero_or_one(all_of((c_ns_properties, s_separate)))))),
        any_of((c_l_literal, c_l_folded)),
    ))
    .attempt(ctx, builder)
}

/// [200] s-l+block-collection(n,c) ::= ( s-separate(n+1,c) c-ns-properties(n+1,c) )? s-l-comments
///     ( l+block-sequence(seq-spaces(n,c)) | l+block-mapping(n) )
///
/// Properties not followed by the end of the line belong to the first key,
/// so the collection is retried without them.
pub fn s_l_block_collection(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        any_of((
            all_of((indented(1, all_of((s_separate, c_ns_properties))), s_l_comments)),
            s_l_comments,
        )),
        any_of((seq_spaces_sequence, l_block_mapping)),
    ))
    .attempt(ctx, builder)
}

/// [201] seq-spaces(n,c): a block sequence directly under a mapping key may
/// start at the key's own column.
fn seq_spaces_sequence(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    if ctx.blockflow() == BlockFlow::BlockOut {
        indented(-1, l_block_sequence).attempt(ctx, builder)
    } else {
        l_block_sequence(ctx, builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Event, ReplayBuilder};
    use crate::stream::CharStream;

    fn run(clause: impl Clause, input: &str, indent_level: i32, blockflow: BlockFlow) -> Option<Vec<Event>> {
        let state = State {
            indent_level,
            blockflow,
            ..State::default()
        };
        let mut ctx = Context::with_state(CharStream::from_text(input), state);
        let mut out = ReplayBuilder::new();
        clause.attempt(&mut ctx, &mut out).then(|| out.events().to_vec())
    }

    fn block_text(clause: impl Clause, input: &str) -> Option<String> {
        match run(clause, input, -1, BlockFlow::BlockIn)?.as_slice() {
            [Event::Scalar(text)] => Some(text.clone()),
            _ => None,
        }
    }

    fn s(text: &str) -> Event {
        Event::Scalar(text.to_owned())
    }

    #[test]
    fn test_indentation_indicator() {
        let mut ctx = Context::with_state(
            CharStream::from_text("4"),
            State {
                indent_level: 0,
                ..State::default()
            },
        );
        assert!(c_indentation_indicator(&mut ctx, &mut ReplayBuilder::new()));
        assert_eq!(ctx.indent_level(), 4);
        assert_eq!(ctx.stream().offset(), 1);

        let mut ctx = Context::from_text("0");
        assert!(!c_indentation_indicator(&mut ctx, &mut ReplayBuilder::new()));

        let mut ctx = Context::from_text("-");
        assert!(c_indentation_indicator(&mut ctx, &mut ReplayBuilder::new()));
        assert_eq!(ctx.indent_level(), -1);
        assert_eq!(ctx.stream().offset(), 0);
    }

    #[test]
    fn test_block_header() {
        let header = |input: &str| {
            let mut ctx = Context::with_state(
                CharStream::from_text(input),
                State {
                    indent_level: 0,
                    ..State::default()
                },
            );
            c_b_block_header(&mut ctx, &mut ReplayBuilder::new()).then(|| (ctx.indent_level(), ctx.chomp()))
        };
        assert_eq!(header("\n  text"), Some((2, Chomp::Clip)));
        assert_eq!(header("-\n   text"), Some((3, Chomp::Strip)));
        assert_eq!(header("+2 # comment\n  text"), Some((2, Chomp::Keep)));
        assert_eq!(header("2+\n  text"), Some((2, Chomp::Keep)));
        assert_eq!(header("\ntext"), Some((1, Chomp::Clip)));
        assert_eq!(header("0\n text"), None);
        assert_eq!(header("x\n text"), None);
    }

    #[test]
    fn test_literal() {
        assert_eq!(
            block_text(c_l_literal, "|\nline\n  indented\nless indented\n").as_deref(),
            Some("line\n  indented\nless indented\n")
        );
        assert_eq!(
            block_text(c_l_literal, "|\n  one\n\n  two\n").as_deref(),
            Some("one\n\ntwo\n")
        );
        assert_eq!(block_text(c_l_literal, "|\n").as_deref(), Some(""));
    }

    #[test]
    fn test_chomping() {
        assert_eq!(block_text(c_l_literal, "|-\n  text\n\n\n").as_deref(), Some("text"));
        assert_eq!(block_text(c_l_literal, "|\n  text\n\n\n").as_deref(), Some("text\n"));
        assert_eq!(block_text(c_l_literal, "|+\n  text\n\n\n").as_deref(), Some("text\n\n\n"));
        assert_eq!(block_text(c_l_literal, "|\n  text").as_deref(), Some("text\n"));
        assert_eq!(block_text(c_l_literal, "|-\n  text").as_deref(), Some("text"));
        assert_eq!(
            block_text(c_l_literal, "|\n  text\n # trailing\n").as_deref(),
            Some("text\n")
        );
    }

    #[test]
    fn test_folded() {
        assert_eq!(
            block_text(c_l_folded, ">\nline\n\tindented\nless indented\n").as_deref(),
            Some("line\n\tindented\nless indented\n")
        );
        assert_eq!(
            block_text(c_l_folded, ">\n  one\n  two\n\n  three\n").as_deref(),
            Some("one two\nthree\n")
        );
        assert_eq!(
            block_text(c_l_folded, ">-\n  one\n    more\n  two\n").as_deref(),
            Some("one\n  more\ntwo")
        );
    }

    #[test]
    fn test_block_sequence() {
        assert_eq!(
            run(l_block_sequence, "- one\n- two\n", -1, BlockFlow::BlockIn),
            Some(vec![Event::StartSequence, s("one"), s("two"), Event::EndSequence])
        );
        assert_eq!(
            run(l_block_sequence, "- - a\n  - b\n- c", -1, BlockFlow::BlockIn),
            Some(vec![
                Event::StartSequence,
                Event::StartSequence,
                s("a"),
                s("b"),
                Event::EndSequence,
                s("c"),
                Event::EndSequence
            ])
        );
        assert_eq!(
            run(l_block_sequence, "-\n- x", -1, BlockFlow::BlockIn),
            Some(vec![Event::StartSequence, s(""), s("x"), Event::EndSequence])
        );
        assert_eq!(run(l_block_sequence, "-x", -1, BlockFlow::BlockIn), None);
    }

    #[test]
    fn test_block_mapping() {
        assert_eq!(
            run(l_block_mapping, "one: 1\ntwo: 2\n", -1, BlockFlow::BlockIn),
            Some(vec![Event::StartMapping, s("one"), s("1"), s("two"), s("2"), Event::EndMapping])
        );
        assert_eq!(
            run(l_block_mapping, "outer:\n  inner: x\nnext:\n", -1, BlockFlow::BlockIn),
            Some(vec![
                Event::StartMapping,
                s("outer"),
                Event::StartMapping,
                s("inner"),
                s("x"),
                Event::EndMapping,
                s("next"),
                s(""),
                Event::EndMapping
            ])
        );
        assert_eq!(
            run(l_block_mapping, "list:\n- a\n- b\n", -1, BlockFlow::BlockIn),
            Some(vec![
                Event::StartMapping,
                s("list"),
                Event::StartSequence,
                s("a"),
                s("b"),
                Event::EndSequence,
                Event::EndMapping
            ])
        );
    }

    #[test]
    fn test_explicit_entries() {
        assert_eq!(
            run(l_block_mapping, "? key\n: value\n", -1, BlockFlow::BlockIn),
            Some(vec![Event::StartMapping, s("key"), s("value"), Event::EndMapping])
        );
        assert_eq!(
            run(l_block_mapping, "? lonely\n", -1, BlockFlow::BlockIn),
            Some(vec![Event::StartMapping, s("lonely"), s(""), Event::EndMapping])
        );
    }

    #[test]
    fn test_compact_mapping_in_sequence() {
        assert_eq!(
            run(l_block_sequence, "- name: a\n  size: 1\n- name: b\n", -1, BlockFlow::BlockIn),
            Some(vec![
                Event::StartSequence,
                Event::StartMapping,
                s("name"),
                s("a"),
                s("size"),
                s("1"),
                Event::EndMapping,
                Event::StartMapping,
                s("name"),
                s("b"),
                Event::EndMapping,
                Event::EndSequence
            ])
        );
    }

    #[test]
    fn test_block_node_properties() {
        assert_eq!(
            run(s_l_block_node, " &seq\n- a\n", -1, BlockFlow::BlockIn),
            Some(vec![Event::Anchor("seq".to_owned()), Event::StartSequence, s("a"), Event::EndSequence])
        );
        assert_eq!(
            run(s_l_block_node, " !!str |\n  text\n", -1, BlockFlow::BlockIn),
            Some(vec![Event::Property("!!str".to_owned()), s("text\n")])
        );
    }

    #[test]
    fn test_properties_on_first_key() {
        assert_eq!(
            run(s_l_block_collection, "&a key: v\n!!str b: *a\n", -1, BlockFlow::BlockIn),
            Some(vec![
                Event::StartMapping,
                Event::Anchor("a".to_owned()),
                s("key"),
                s("v"),
                Event::Property("!!str".to_owned()),
                s("b"),
                Event::Alias("a".to_owned()),
                Event::EndMapping
            ])
        );
        assert_eq!(
            run(s_l_block_collection, "&m\nkey: v\n", -1, BlockFlow::BlockIn),
            Some(vec![
                Event::Anchor("m".to_owned()),
                Event::StartMapping,
                s("key"),
                s("v"),
                Event::EndMapping
            ])
        );
    }

    #[test]
    fn test_leading_blank_wider_than_content() {
        assert_eq!(block_text(c_l_literal, "|\n   \n  text\n"), None);
        assert_eq!(block_text(c_l_folded, ">\n    \n  text\n"), None);
        assert_eq!(block_text(c_l_literal, "|\n  \n  text\n").as_deref(), Some("\ntext\n"));
    }
}
