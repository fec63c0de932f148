// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Node properties, aliases and flow style productions [96]–[161].

use crate::builder::{DocumentBuilder, NullBuilder, ReplayBuilder};
use crate::clause::{
    Clause, all_of, any_of, capture, ch, char_if, emit, in_flow, literal, not, one_or_more, peek, scalar,
    with_blockflow, zero_or_more, zero_or_one,
};
use crate::context::{BlockFlow, Context};
use crate::grammar::chars::{
    b_non_content, c_ns_esc_char, is_flow_indicator, is_indicator, is_json, is_ns_char, ns_anchor_char, ns_tag_char, ns_uri_char,
    s_white,
};
use crate::grammar::document::{c_forbidden, c_tag_handle};
use crate::grammar::structure::{l_empty, s_flow_folded, s_flow_line_prefix, s_separate, s_separate_in_line};
use crate::grammar::{e_node, e_scalar, end_mapping, end_sequence, start_mapping, start_sequence};

// ============================================================================
// Node properties and aliases
// ============================================================================

/// [96] c-ns-properties(n,c) ::= ( c-ns-tag-property ( s-separate(n,c) c-ns-anchor-property )? )
///                             | ( c-ns-anchor-property ( s-separate(n,c) c-ns-tag-property )? )
pub fn c_ns_properties(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((
        all_of((c_ns_tag_property, zero_or_one(all_of((s_separate, c_ns_anchor_property))))),
        all_of((c_ns_anchor_property, zero_or_one(all_of((s_separate, c_ns_tag_property))))),
    ))
    .attempt(ctx, builder)
}

/// [97] c-ns-tag-property ::= c-verbatim-tag | c-ns-shorthand-tag | c-non-specific-tag
///
/// Reports the tag as written.
pub fn c_ns_tag_property(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let start = ctx.mark();
    if any_of((c_verbatim_tag, c_ns_shorthand_tag, c_non_specific_tag)).attempt(ctx, builder) {
        builder.add_property(&ctx.stream().text_since(start));
        true
    } else {
        false
    }
}

/// [98] c-verbatim-tag ::= "!" "<" ns-uri-char+ ">"
pub fn c_verbatim_tag(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((literal("!<"), one_or_more(ns_uri_char), ch('>'))).attempt(ctx, builder)
}

/// [99] c-ns-shorthand-tag ::= c-tag-handle ns-tag-char+
pub fn c_ns_shorthand_tag(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((c_tag_handle, one_or_more(ns_tag_char))).attempt(ctx, builder)
}

/// [100] c-non-specific-tag ::= "!"
pub fn c_non_specific_tag(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    ch('!').attempt(ctx, builder)
}

/// Match `indicator` followed by an anchor name, returning the name.
fn anchor_name_after(ctx: &mut Context, indicator: char) -> Option<String> {
    if ctx.stream_mut().peek() != Some(indicator) {
        return None;
    }
    let mut name = None;
    ctx.attempt(|ctx| {
        ctx.stream_mut().advance(1);
        let start = ctx.mark();
        if one_or_more(ns_anchor_char).attempt(ctx, &mut NullBuilder) {
            name = Some(ctx.stream().text_since(start));
            true
        } else {
            false
        }
    });
    name
}

/// [101] c-ns-anchor-property ::= "&" ns-anchor-name
pub fn c_ns_anchor_property(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    match anchor_name_after(ctx, '&') {
        Some(name) => {
            builder.add_anchor(&name);
            true
        }
        None => false,
    }
}

/// [104] c-ns-alias-node ::= "*" ns-anchor-name
pub fn c_ns_alias_node(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    match anchor_name_after(ctx, '*') {
        Some(name) => {
            builder.add_alias(&name);
            true
        }
        None => false,
    }
}

// ============================================================================
// Double-quoted scalars
// ============================================================================

/// [107] nb-double-char ::= c-ns-esc-char | ( nb-json - "\" - """ )
pub fn nb_double_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((
        c_ns_esc_char,
        capture(char_if(|c| is_json(c) && c != '\\' && c != '"')),
    ))
    .attempt(ctx, builder)
}

/// [108] ns-double-char ::= nb-double-char - s-white
pub fn ns_double_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((not(s_white), nb_double_char)).attempt(ctx, builder)
}

/// [109] c-double-quoted(n,c) ::= """ nb-double-text(n,c) """
pub fn c_double_quoted(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    scalar(all_of((ch('"'), nb_double_text, ch('"')))).attempt(ctx, builder)
}

/// [110] nb-double-text(n,c)
pub fn nb_double_text(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    if ctx.blockflow().is_key() {
        nb_double_one_line(ctx, builder)
    } else {
        nb_double_multi_line(ctx, builder)
    }
}

/// [111] nb-double-one-line ::= nb-double-char*
pub fn nb_double_one_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    zero_or_more(nb_double_char).attempt(ctx, builder)
}

/// [112] s-double-escaped(n) ::= s-white* "\" b-non-content l-empty(n,flow-in)* s-flow-line-prefix(n)
pub fn s_double_escaped(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        capture(zero_or_more(s_white)),
        ch('\\'),
        b_non_content,
        zero_or_more(with_blockflow(BlockFlow::FlowIn, l_empty)),
        s_flow_line_prefix,
    ))
    .attempt(ctx, builder)
}

/// [113] s-double-break(n) ::= s-double-escaped(n) | s-flow-folded(n)
pub fn s_double_break(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((s_double_escaped, s_flow_folded)).attempt(ctx, builder)
}

/// [114] nb-ns-double-in-line ::= ( s-white* ns-double-char )*
pub fn nb_ns_double_in_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    zero_or_more(all_of((capture(zero_or_more(s_white)), ns_double_char))).attempt(ctx, builder)
}

/// [115] s-double-next-line(n) ::= s-double-break(n)
///     ( ns-double-char nb-ns-double-in-line ( s-double-next-line(n) | s-white* ) )?
pub fn s_double_next_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        s_double_break,
        zero_or_one(all_of((
            ns_double_char,
            nb_ns_double_in_line,
            any_of((s_double_next_line, capture(zero_or_more(s_white)))),
        ))),
    ))
    .attempt(ctx, builder)
}

/// [116] nb-double-multi-line(n) ::= nb-ns-double-in-line ( s-double-next-line(n) | s-white* )
pub fn nb_double_multi_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        nb_ns_double_in_line,
        any_of((s_double_next_line, capture(zero_or_more(s_white)))),
    ))
    .attempt(ctx, builder)
}

// ============================================================================
// Single-quoted scalars
// ============================================================================

/// [117] c-quoted-quote ::= "'" "'"
pub fn c_quoted_quote(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    emit('\'', literal("''")).attempt(ctx, builder)
}

/// [118] nb-single-char ::= c-quoted-quote | ( nb-json - "'" )
pub fn nb_single_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((c_quoted_quote, capture(char_if(|c| is_json(c) && c != '\'')))).attempt(ctx, builder)
}

/// [119] ns-single-char ::= nb-single-char - s-white
pub fn ns_single_char(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((not(s_white), nb_single_char)).attempt(ctx, builder)
}

/// [120] c-single-quoted(n,c) ::= "'" nb-single-text(n,c) "'"
pub fn c_single_quoted(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    scalar(all_of((ch('\''), nb_single_text, ch('\'')))).attempt(ctx, builder)
}

/// [121] nb-single-text(n,c)
pub fn nb_single_text(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    if ctx.blockflow().is_key() {
        nb_single_one_line(ctx, builder)
    } else {
        nb_single_multi_line(ctx, builder)
    }
}

/// [122] nb-single-one-line ::= nb-single-char*
pub fn nb_single_one_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    zero_or_more(nb_single_char).attempt(ctx, builder)
}

/// [123] nb-ns-single-in-line ::= ( s-white* ns-single-char )*
pub fn nb_ns_single_in_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    zero_or_more(all_of((capture(zero_or_more(s_white)), ns_single_char))).attempt(ctx, builder)
}

/// [124] s-single-next-line(n) ::= s-flow-folded(n)
///     ( ns-single-char nb-ns-single-in-line ( s-single-next-line(n) | s-white* ) )?
pub fn s_single_next_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        s_flow_folded,
        zero_or_one(all_of((
            ns_single_char,
            nb_ns_single_in_line,
            any_of((s_single_next_line, capture(zero_or_more(s_white)))),
        ))),
    ))
    .attempt(ctx, builder)
}

/// [125] nb-single-multi-line(n) ::= nb-ns-single-in-line ( s-single-next-line(n) | s-white* )
pub fn nb_single_multi_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        nb_ns_single_in_line,
        any_of((s_single_next_line, capture(zero_or_more(s_white)))),
    ))
    .attempt(ctx, builder)
}

// ============================================================================
// Plain scalars
// ============================================================================

/// [127] ns-plain-safe(c), as a predicate over the current context.
fn is_plain_safe(blockflow: BlockFlow, c: char) -> bool {
    if blockflow.is_flow_restricted() {
        is_ns_char(c) && !is_flow_indicator(c)
    } else {
        is_ns_char(c)
    }
}

/// [127] ns-plain-safe(c)
pub fn ns_plain_safe(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let blockflow = ctx.blockflow();
    char_if(|c| is_plain_safe(blockflow, c)).attempt(ctx, builder)
}

/// [126] ns-plain-first(c) ::= ( ns-char - c-indicator )
///                          | ( ( "?" | ":" | "-" ) /* Followed by an ns-plain-safe(c)) */ )
pub fn ns_plain_first(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let blockflow = ctx.blockflow();
    let stream = ctx.stream_mut();
    let accepted = match stream.peek() {
        Some('?' | ':' | '-') => stream.peek_at(1).is_some_and(|next| is_plain_safe(blockflow, next)),
        Some(c) => is_ns_char(c) && !is_indicator(c),
        None => false,
    };
    if accepted {
        stream.advance(1);
    }
    accepted
}

/// [130] ns-plain-char(c) ::= ( ns-plain-safe(c) - ":" - "#" )
///                         | ( /* An ns-char preceding */ "#" )
///                         | ( ":" /* Followed by an ns-plain-safe(c) */ )
pub fn ns_plain_char(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    let blockflow = ctx.blockflow();
    let previous = ctx.stream().rpeek();
    let stream = ctx.stream_mut();
    let accepted = match stream.peek() {
        Some(':') => stream.peek_at(1).is_some_and(|next| is_plain_safe(blockflow, next)),
        Some('#') => previous.is_some_and(is_ns_char),
        Some(c) => is_plain_safe(blockflow, c),
        None => false,
    };
    if accepted {
        stream.advance(1);
    }
    accepted
}

/// [131] ns-plain(n,c)
pub fn ns_plain(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    if ctx.blockflow().is_key() {
        scalar(ns_plain_one_line).attempt(ctx, builder)
    } else {
        scalar(ns_plain_multi_line).attempt(ctx, builder)
    }
}

/// [132] nb-ns-plain-in-line(c) ::= ( s-white* ns-plain-char(c) )*
pub fn nb_ns_plain_in_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    zero_or_more(capture(all_of((zero_or_more(s_white), ns_plain_char)))).attempt(ctx, builder)
}

/// [133] ns-plain-one-line(c) ::= ns-plain-first(c) nb-ns-plain-in-line(c)
pub fn ns_plain_one_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((not(c_forbidden), capture(ns_plain_first), nb_ns_plain_in_line)).attempt(ctx, builder)
}

/// [134] s-ns-plain-next-line(n,c) ::= s-flow-folded(n) ns-plain-char(c) nb-ns-plain-in-line(c)
pub fn s_ns_plain_next_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((s_flow_folded, not(c_forbidden), capture(ns_plain_char), nb_ns_plain_in_line)).attempt(ctx, builder)
}

/// [135] ns-plain-multi-line(n,c) ::= ns-plain-one-line(c) s-ns-plain-next-line(n,c)*
pub fn ns_plain_multi_line(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((ns_plain_one_line, zero_or_more(s_ns_plain_next_line))).attempt(ctx, builder)
}

// ============================================================================
// Flow collections
// ============================================================================

/// [137] c-flow-sequence(n,c) ::= "[" s-separate(n,c)? ns-s-flow-seq-entries(n,in-flow(c))? "]"
pub fn c_flow_sequence(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        ch('['),
        start_sequence,
        zero_or_one(s_separate),
        in_flow(zero_or_one(ns_s_flow_seq_entries)),
        ch(']'),
        end_sequence,
    ))
    .attempt(ctx, builder)
}

/// An empty entry directly followed by another `,`.
fn empty_flow_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((peek(ch(',')), e_node)).attempt(ctx, builder)
}

/// [138] ns-s-flow-seq-entries(n,c) ::= ns-flow-seq-entry(n,c) s-separate(n,c)?
///     ( "," s-separate(n,c)? ns-s-flow-seq-entries(n,c)? )?
pub fn ns_s_flow_seq_entries(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        any_of((ns_flow_seq_entry, empty_flow_entry)),
        zero_or_one(s_separate),
        zero_or_one(all_of((ch(','), zero_or_one(s_separate), zero_or_one(ns_s_flow_seq_entries)))),
    ))
    .attempt(ctx, builder)
}

/// [139] ns-flow-seq-entry(n,c) ::= ns-flow-pair(n,c) | ns-flow-node(n,c)
///
/// A JSON-like entry is parsed once by [`c_ns_flow_pair_json_key_entry`],
/// which decides between pair and plain node afterwards.
pub fn ns_flow_seq_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((ns_flow_pair, c_ns_flow_pair_json_key_entry, ns_flow_node)).attempt(ctx, builder)
}

/// [140] c-flow-mapping(n,c) ::= "{" s-separate(n,c)? ns-s-flow-map-entries(n,in-flow(c))? "}"
pub fn c_flow_mapping(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        ch('{'),
        start_mapping,
        zero_or_one(s_separate),
        in_flow(zero_or_one(ns_s_flow_map_entries)),
        ch('}'),
        end_mapping,
    ))
    .attempt(ctx, builder)
}

/// An empty key/value pair directly followed by another `,`.
fn empty_flow_map_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((peek(ch(',')), e_node, e_node)).attempt(ctx, builder)
}

/// [141] ns-s-flow-map-entries(n,c) ::= ns-flow-map-entry(n,c) s-separate(n,c)?
///     ( "," s-separate(n,c)? ns-s-flow-map-entries(n,c)? )?
pub fn ns_s_flow_map_entries(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        any_of((ns_flow_map_entry, empty_flow_map_entry)),
        zero_or_one(s_separate),
        zero_or_one(all_of((ch(','), zero_or_one(s_separate), zero_or_one(ns_s_flow_map_entries)))),
    ))
    .attempt(ctx, builder)
}

/// [142] ns-flow-map-entry(n,c) ::= ( "?" s-separate(n,c) ns-flow-map-explicit-entry(n,c) )
///                               | ns-flow-map-implicit-entry(n,c)
pub fn ns_flow_map_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((
        all_of((ch('?'), s_separate, ns_flow_map_explicit_entry)),
        ns_flow_map_implicit_entry,
    ))
    .attempt(ctx, builder)
}

/// [143] ns-flow-map-explicit-entry(n,c) ::= ns-flow-map-implicit-entry(n,c) | ( e-node e-node )
pub fn ns_flow_map_explicit_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((ns_flow_map_implicit_entry, all_of((e_node, e_node)))).attempt(ctx, builder)
}

/// [144] ns-flow-map-implicit-entry(n,c) ::= ns-flow-map-yaml-key-entry(n,c)
///     | c-ns-flow-map-empty-key-entry(n,c) | c-ns-flow-map-json-key-entry(n,c)
pub fn ns_flow_map_implicit_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((
        ns_flow_map_yaml_key_entry,
        c_ns_flow_map_empty_key_entry,
        c_ns_flow_map_json_key_entry,
    ))
    .attempt(ctx, builder)
}

/// [145] ns-flow-map-yaml-key-entry(n,c) ::= ns-flow-yaml-node(n,c)
///     ( ( s-separate(n,c)? c-ns-flow-map-separate-value(n,c) ) | e-node )
pub fn ns_flow_map_yaml_key_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        ns_flow_yaml_node,
        any_of((all_of((zero_or_one(s_separate), c_ns_flow_map_separate_value)), e_node)),
    ))
    .attempt(ctx, builder)
}

/// [146] c-ns-flow-map-empty-key-entry(n,c) ::= e-node c-ns-flow-map-separate-value(n,c)
pub fn c_ns_flow_map_empty_key_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((e_node, c_ns_flow_map_separate_value)).attempt(ctx, builder)
}

/// [147] c-ns-flow-map-separate-value(n,c) ::= ":" /* Not followed by an ns-plain-safe(c) */
///     ( ( s-separate(n,c) ns-flow-node(n,c) ) | e-node )
pub fn c_ns_flow_map_separate_value(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        ch(':'),
        not(ns_plain_safe),
        any_of((all_of((s_separate, ns_flow_node)), e_node)),
    ))
    .attempt(ctx, builder)
}

/// [148] c-ns-flow-map-json-key-entry(n,c) ::= c-flow-json-node(n,c)
///     ( ( s-separate(n,c)? c-ns-flow-map-adjacent-value(n,c) ) | e-node )
pub fn c_ns_flow_map_json_key_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        c_flow_json_node,
        any_of((all_of((zero_or_one(s_separate), c_ns_flow_map_adjacent_value)), e_node)),
    ))
    .attempt(ctx, builder)
}

/// [149] c-ns-flow-map-adjacent-value(n,c) ::= ":" ( ( s-separate(n,c)? ns-flow-node(n,c) ) | e-node )
pub fn c_ns_flow_map_adjacent_value(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        ch(':'),
        any_of((all_of((zero_or_one(s_separate), ns_flow_node)), e_node)),
    ))
    .attempt(ctx, builder)
}

/// [150] ns-flow-pair(n,c) ::= ( "?" s-separate(n,c) ns-flow-map-explicit-entry(n,c) )
///                           | ns-flow-pair-entry(n,c)
///
/// A pair inside a flow sequence is a single-entry mapping.
pub fn ns_flow_pair(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        start_mapping,
        any_of((
            all_of((ch('?'), s_separate, ns_flow_map_explicit_entry)),
            ns_flow_pair_entry,
        )),
        end_mapping,
    ))
    .attempt(ctx, builder)
}

/// [151] ns-flow-pair-entry(n,c) ::= ns-flow-pair-yaml-key-entry(n,c)
///     | c-ns-flow-map-empty-key-entry(n,c) | c-ns-flow-pair-json-key-entry(n,c)
///
/// The JSON key alternative is tried separately by [`ns_flow_seq_entry`].
pub fn ns_flow_pair_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((ns_flow_pair_yaml_key_entry, c_ns_flow_map_empty_key_entry)).attempt(ctx, builder)
}

/// [152] ns-flow-pair-yaml-key-entry(n,c) ::= ns-s-implicit-yaml-key(flow-key)
///     c-ns-flow-map-separate-value(n,c)
pub fn ns_flow_pair_yaml_key_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        with_blockflow(BlockFlow::FlowKey, ns_s_implicit_yaml_key),
        c_ns_flow_map_separate_value,
    ))
    .attempt(ctx, builder)
}

/// [153] c-ns-flow-pair-json-key-entry(n,c) ::= c-s-implicit-json-key(flow-key)
///     c-ns-flow-map-adjacent-value(n,c)
///
/// Also matches a JSON-like node without a value, reported as the node
/// itself. The node is parsed once, in the current context; it becomes the
/// key of a single-pair mapping only when it fits on one line within the
/// implicit key limit and an adjacent value follows. A one-line JSON node
/// matches the same text in the flow-key context.
pub fn c_ns_flow_pair_json_key_entry(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let start = ctx.mark();
    let mut key = ReplayBuilder::new();
    if !ctx.attempt(|ctx| c_flow_json_node(ctx, &mut key)) {
        return false;
    }
    let text = ctx.stream().text_since(start);
    let implicit = !text.contains(['\n', '\r']) && text.chars().count() <= MAX_IMPLICIT_KEY;
    let mut value = ReplayBuilder::new();
    if implicit
        && all_of((zero_or_one(s_separate_in_line), c_ns_flow_map_adjacent_value)).attempt(ctx, &mut value)
    {
        builder.start_mapping();
        key.replay(builder);
        value.replay(builder);
        builder.end_mapping();
    } else {
        key.replay(builder);
    }
    true
}

/// Longest implicit key, in characters, including trailing separation.
pub const MAX_IMPLICIT_KEY: usize = 1024;

/// Run `key`, failing if it matched more than [`MAX_IMPLICIT_KEY`] characters.
fn implicit_key(key: impl Clause, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let start = ctx.stream().offset();
    let mut events = ReplayBuilder::new();
    let matched = ctx.attempt(|ctx| {
        key.attempt(ctx, &mut events) && ctx.stream().offset().saturating_sub(start) <= MAX_IMPLICIT_KEY
    });
    if matched {
        events.replay(builder);
    } else {
        log::trace!("no implicit key at line {}", ctx.line_number());
    }
    matched
}

/// [154] ns-s-implicit-yaml-key(c) ::= ns-flow-yaml-node(n/a,c) s-separate-in-line?
pub fn ns_s_implicit_yaml_key(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    implicit_key(all_of((ns_flow_yaml_node, zero_or_one(s_separate_in_line))), ctx, builder)
}

/// [155] c-s-implicit-json-key(c) ::= c-flow-json-node(n/a,c) s-separate-in-line?
pub fn c_s_implicit_json_key(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    implicit_key(all_of((c_flow_json_node, zero_or_one(s_separate_in_line))), ctx, builder)
}

// ============================================================================
// Flow nodes
// ============================================================================

/// [156] ns-flow-yaml-content(n,c) ::= ns-plain(n,c)
pub fn ns_flow_yaml_content(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    ns_plain(ctx, builder)
}

/// [157] c-flow-json-content(n,c) ::= c-flow-sequence(n,c) | c-flow-mapping(n,c)
///                                  | c-single-quoted(n,c) | c-double-quoted(n,c)
pub fn c_flow_json_content(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((c_flow_sequence, c_flow_mapping, c_single_quoted, c_double_quoted)).attempt(ctx, builder)
}

/// [158] ns-flow-content(n,c) ::= ns-flow-yaml-content(n,c) | c-flow-json-content(n,c)
pub fn ns_flow_content(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((ns_flow_yaml_content, c_flow_json_content)).attempt(ctx, builder)
}

/// [159] ns-flow-yaml-node(n,c) ::= c-ns-alias-node | ns-flow-yaml-content(n,c)
///     | ( c-ns-properties(n,c) ( ( s-separate(n,c) ns-flow-yaml-content(n,c) ) | e-scalar ) )
pub fn ns_flow_yaml_node(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((
        c_ns_alias_node,
        ns_flow_yaml_content,
        all_of((
            c_ns_properties,
            any_of((all_of((s_separate, ns_flow_yaml_content)), e_scalar)),
        )),
    ))
    .attempt(ctx, builder)
}

/// [160] c-flow-json-node(n,c) ::= ( c-ns-properties(n,c) s-separate(n,c) )? c-flow-json-content(n,c)
pub fn c_flow_json_node(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((zero_or_one(all_of((c_ns_properties, s_separate))), c_flow_json_content)).attempt(ctx, builder)
}

/// [161] ns-flow-node(n,c) ::= c-ns-alias-node | ns-flow-content(n,c)
///     | ( c-ns-properties(n,c) ( ( s-separate(n,c) ns-flow-content(n,c) ) | e-scalar ) )
pub fn ns_flow_node(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((
        c_ns_alias_node,
        ns_flow_content,
        all_of((
            c_ns_properties,
            any_of((all_of((s_separate, ns_flow_content)), e_scalar)),
        )),
    ))
    .attempt(ctx, builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Event, ReplayBuilder};
    use crate::context::State;
    use crate::stream::CharStream;

    fn run(clause: impl Clause, input: &str, blockflow: BlockFlow) -> Option<Vec<Event>> {
        let state = State {
            indent_level: 0,
            blockflow,
            ..State::default()
        };
        let mut ctx = Context::with_state(CharStream::from_text(input), state);
        let mut out = ReplayBuilder::new();
        clause.attempt(&mut ctx, &mut out).then(|| out.events().to_vec())
    }

    fn scalar_event(text: &str) -> Event {
        Event::Scalar(text.to_owned())
    }

    fn single_scalar(clause: impl Clause, input: &str, blockflow: BlockFlow) -> Option<String> {
        match run(clause, input, blockflow)?.as_slice() {
            [Event::Scalar(text)] => Some(text.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_double_quoted() {
        let cases = [
            ("\"klaas\\tjacob\"", "klaas\tjacob"),
            ("\"\\u20ac euro\"", "€ euro"),
            ("\"  padded  \"", "  padded  "),
            ("\"folded\n  line\"", "folded line"),
            ("\"empty\n\n  line\"", "empty\nline"),
            ("\"escaped \\\n  break\"", "escaped break"),
            ("\"\"", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(
                single_scalar(c_double_quoted, input, BlockFlow::FlowOut).as_deref(),
                Some(expected),
                "{input:?}"
            );
        }
        assert_eq!(single_scalar(c_double_quoted, "\"unterminated", BlockFlow::FlowOut), None);
        assert_eq!(single_scalar(c_double_quoted, "\"two\nlines\"", BlockFlow::FlowKey), None);
    }

    #[test]
    fn test_single_quoted() {
        let cases = [
            ("'kla''as'", "kla'as"),
            ("'kla\\as'", "kla\\as"),
            ("'one\n  two'", "one two"),
            ("''", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(
                single_scalar(c_single_quoted, input, BlockFlow::FlowOut).as_deref(),
                Some(expected),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_plain() {
        let cases = [
            ("plain text", BlockFlow::FlowOut, "plain text"),
            ("a:b c", BlockFlow::FlowOut, "a:b c"),
            ("key: value", BlockFlow::BlockKey, "key"),
            ("issue#12 # comment", BlockFlow::FlowOut, "issue#12"),
            ("one,two", BlockFlow::FlowIn, "one"),
            ("one,two", BlockFlow::FlowOut, "one,two"),
            ("-1", BlockFlow::FlowOut, "-1"),
            ("first\n second", BlockFlow::FlowOut, "first second"),
            ("first\n\n second", BlockFlow::FlowOut, "first\nsecond"),
        ];
        for (input, blockflow, expected) in cases {
            assert_eq!(single_scalar(ns_plain, input, blockflow).as_deref(), Some(expected), "{input:?}");
        }
        for input in ["- x", "# comment", ": x", "[a]", "---", "... x"] {
            assert_eq!(single_scalar(ns_plain, input, BlockFlow::FlowOut), None, "{input:?}");
        }
    }

    #[test]
    fn test_properties() {
        assert_eq!(
            run(c_ns_properties, "&anchor ", BlockFlow::FlowOut),
            Some(vec![Event::Anchor("anchor".to_owned())])
        );
        assert_eq!(
            run(c_ns_properties, "!<kl@2549#[]=0>", BlockFlow::FlowOut),
            Some(vec![Event::Property("!<kl@2549#[]=0>".to_owned())])
        );
        assert_eq!(
            run(c_ns_properties, "!!str &a", BlockFlow::FlowOut),
            Some(vec![Event::Property("!!str".to_owned()), Event::Anchor("a".to_owned())])
        );
        assert_eq!(
            run(c_ns_properties, "!local", BlockFlow::FlowOut),
            Some(vec![Event::Property("!local".to_owned())])
        );
        assert_eq!(run(c_ns_properties, "&", BlockFlow::FlowOut), None);
    }

    #[test]
    fn test_flow_sequence() {
        assert_eq!(
            run(c_flow_sequence, "[ one, two ]", BlockFlow::FlowIn),
            Some(vec![Event::StartSequence, scalar_event("one"), scalar_event("two"), Event::EndSequence])
        );
        assert_eq!(
            run(c_flow_sequence, "[ ]", BlockFlow::FlowIn),
            Some(vec![Event::StartSequence, Event::EndSequence])
        );
        assert_eq!(
            run(c_flow_sequence, "[*tag]", BlockFlow::FlowIn),
            Some(vec![Event::StartSequence, Event::Alias("tag".to_owned()), Event::EndSequence])
        );
        assert_eq!(
            run(c_flow_sequence, "[\"one two\", 'three four']", BlockFlow::FlowIn),
            Some(vec![
                Event::StartSequence,
                scalar_event("one two"),
                scalar_event("three four"),
                Event::EndSequence
            ])
        );
        assert_eq!(
            run(c_flow_sequence, "[ [one, two] ]", BlockFlow::FlowIn),
            Some(vec![
                Event::StartSequence,
                Event::StartSequence,
                scalar_event("one"),
                scalar_event("two"),
                Event::EndSequence,
                Event::EndSequence
            ])
        );
    }

    #[test]
    fn test_flow_sequence_commas() {
        assert_eq!(
            run(c_flow_sequence, "[a, b, ]", BlockFlow::FlowIn),
            Some(vec![Event::StartSequence, scalar_event("a"), scalar_event("b"), Event::EndSequence])
        );
        assert_eq!(
            run(c_flow_sequence, "[a,,b]", BlockFlow::FlowIn),
            Some(vec![
                Event::StartSequence,
                scalar_event("a"),
                scalar_event(""),
                scalar_event("b"),
                Event::EndSequence
            ])
        );
        assert_eq!(run(c_flow_sequence, "[a, b", BlockFlow::FlowIn), None);
    }

    #[test]
    fn test_flow_pair_in_sequence() {
        assert_eq!(
            run(c_flow_sequence, "[a: 1]", BlockFlow::FlowIn),
            Some(vec![
                Event::StartSequence,
                Event::StartMapping,
                scalar_event("a"),
                scalar_event("1"),
                Event::EndMapping,
                Event::EndSequence
            ])
        );
    }

    #[test]
    fn test_json_entry_in_sequence() {
        assert_eq!(
            run(c_ns_flow_pair_json_key_entry, "[x]: y", BlockFlow::FlowIn),
            Some(vec![
                Event::StartMapping,
                Event::StartSequence,
                scalar_event("x"),
                Event::EndSequence,
                scalar_event("y"),
                Event::EndMapping
            ])
        );
        assert_eq!(
            run(c_ns_flow_pair_json_key_entry, "[x]", BlockFlow::FlowIn),
            Some(vec![Event::StartSequence, scalar_event("x"), Event::EndSequence])
        );
        assert_eq!(
            run(c_ns_flow_pair_json_key_entry, "'two\n lines': y", BlockFlow::FlowIn),
            Some(vec![scalar_event("two lines")])
        );
        assert_eq!(run(c_ns_flow_pair_json_key_entry, "plain: y", BlockFlow::FlowIn), None);
    }

    #[test]
    fn test_implicit_key_limit() {
        let longest = "k".repeat(MAX_IMPLICIT_KEY);
        assert_eq!(
            run(ns_s_implicit_yaml_key, &longest, BlockFlow::BlockKey),
            Some(vec![scalar_event(&longest)])
        );
        let too_long = "k".repeat(MAX_IMPLICIT_KEY + 1);
        assert_eq!(run(ns_s_implicit_yaml_key, &too_long, BlockFlow::BlockKey), None);
        assert_eq!(
            run(c_s_implicit_json_key, &format!("'{too_long}'"), BlockFlow::BlockKey),
            None
        );
    }

    #[test]
    fn test_flow_mapping() {
        assert_eq!(
            run(c_flow_mapping, "{ key : value }", BlockFlow::FlowIn),
            Some(vec![Event::StartMapping, scalar_event("key"), scalar_event("value"), Event::EndMapping])
        );
        assert_eq!(
            run(c_flow_mapping, "{\"a\":1, b, ? c : d}", BlockFlow::FlowOut),
            Some(vec![
                Event::StartMapping,
                scalar_event("a"),
                scalar_event("1"),
                scalar_event("b"),
                scalar_event(""),
                scalar_event("c"),
                scalar_event("d"),
                Event::EndMapping
            ])
        );
        assert_eq!(
            run(c_flow_mapping, "{a: [1, 2],\n b: {c: d}}", BlockFlow::FlowOut),
            Some(vec![
                Event::StartMapping,
                scalar_event("a"),
                Event::StartSequence,
                scalar_event("1"),
                scalar_event("2"),
                Event::EndSequence,
                scalar_event("b"),
                Event::StartMapping,
                scalar_event("c"),
                scalar_event("d"),
                Event::EndMapping,
                Event::EndMapping
            ])
        );
    }

    #[test]
    fn test_flow_node_with_properties() {
        assert_eq!(
            run(ns_flow_node, "!!int 5", BlockFlow::FlowOut),
            Some(vec![Event::Property("!!int".to_owned()), scalar_event("5")])
        );
        assert_eq!(
            run(ns_flow_node, "&a", BlockFlow::FlowOut),
            Some(vec![Event::Anchor("a".to_owned()), scalar_event("")])
        );
    }
}
