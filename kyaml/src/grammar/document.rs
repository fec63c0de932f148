// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Directives [82]–[95] and document structure [202]–[211].
//!
//! Directives are recognized and checked but do not produce events. Tag
//! handles declared by `%TAG` are not applied; tags are reported as written.

use crate::builder::DocumentBuilder;
use crate::clause::{
    Clause, all_of, any_of, ch, char_if, end_of_input, literal, one_or_more, peek, state_scope, zero_or_more,
    zero_or_one,
};
use crate::context::{BlockFlow, Context, State};
use crate::grammar::block::s_l_block_node;
use crate::grammar::chars::{
    c_byte_order_mark, is_break, ns_char, ns_dec_digit, ns_tag_char, ns_uri_char, ns_word_char, s_white,
};
use crate::grammar::e_node;
use crate::grammar::structure::{l_comment, s_l_comments, s_separate_in_line, start_of_line};

// ============================================================================
// Directives
// ============================================================================

/// [82] l-directive ::= "%" ( ns-yaml-directive | ns-tag-directive | ns-reserved-directive ) s-l-comments
pub fn l_directive(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    let start = ctx.mark();
    let line = ctx.line_number();
    let ok = all_of((
        ch('%'),
        any_of((ns_yaml_directive, ns_tag_directive, ns_reserved_directive)),
        s_l_comments,
    ))
    .attempt(ctx, builder);
    if ok {
        log::trace!("directive at line {line}: {:?}", ctx.stream().text_since(start).trim_end());
    }
    ok
}

/// [83] ns-reserved-directive ::= ns-directive-name ( s-separate-in-line ns-directive-parameter )*
pub fn ns_reserved_directive(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        ns_directive_name,
        zero_or_more(all_of((s_separate_in_line, ns_directive_parameter))),
    ))
    .attempt(ctx, builder)
}

/// [84] ns-directive-name ::= ns-char+
pub fn ns_directive_name(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    one_or_more(ns_char).attempt(ctx, builder)
}

/// [85] ns-directive-parameter ::= ns-char+
pub fn ns_directive_parameter(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    one_or_more(ns_char).attempt(ctx, builder)
}

/// [86] ns-yaml-directive ::= "Y" "A" "M" "L" s-separate-in-line ns-yaml-version
pub fn ns_yaml_directive(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((literal("YAML"), s_separate_in_line, ns_yaml_version)).attempt(ctx, builder)
}

/// [87] ns-yaml-version ::= ns-dec-digit+ "." ns-dec-digit+
pub fn ns_yaml_version(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((one_or_more(ns_dec_digit), ch('.'), one_or_more(ns_dec_digit))).attempt(ctx, builder)
}

/// [88] ns-tag-directive ::= "T" "A" "G" s-separate-in-line c-tag-handle s-separate-in-line ns-tag-prefix
pub fn ns_tag_directive(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((literal("TAG"), s_separate_in_line, c_tag_handle, s_separate_in_line, ns_tag_prefix)).attempt(ctx, builder)
}

/// [89] c-tag-handle ::= c-named-tag-handle | c-secondary-tag-handle | c-primary-tag-handle
pub fn c_tag_handle(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((c_named_tag_handle, c_secondary_tag_handle, c_primary_tag_handle)).attempt(ctx, builder)
}

/// [90] c-primary-tag-handle ::= "!"
pub fn c_primary_tag_handle(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    ch('!').attempt(ctx, builder)
}

/// [91] c-secondary-tag-handle ::= "!" "!"
pub fn c_secondary_tag_handle(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    literal("!!").attempt(ctx, builder)
}

/// [92] c-named-tag-handle ::= "!" ns-word-char+ "!"
pub fn c_named_tag_handle(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((ch('!'), one_or_more(ns_word_char), ch('!'))).attempt(ctx, builder)
}

/// [93] ns-tag-prefix ::= c-ns-local-tag-prefix | ns-global-tag-prefix
pub fn ns_tag_prefix(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((c_ns_local_tag_prefix, ns_global_tag_prefix)).attempt(ctx, builder)
}

/// [94] c-ns-local-tag-prefix ::= "!" ns-uri-char*
pub fn c_ns_local_tag_prefix(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((ch('!'), zero_or_more(ns_uri_char))).attempt(ctx, builder)
}

/// [95] ns-global-tag-prefix ::= ns-tag-char ns-uri-char*
pub fn ns_global_tag_prefix(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((ns_tag_char, zero_or_more(ns_uri_char))).attempt(ctx, builder)
}

// ============================================================================
// Documents
// ============================================================================

/// [202] l-document-prefix ::= c-byte-order-mark? l-comment*
pub fn l_document_prefix(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((zero_or_one(c_byte_order_mark), zero_or_more(l_comment))).attempt(ctx, builder)
}

/// [203] c-directives-end ::= "-" "-" "-"
pub fn c_directives_end(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    literal("---").attempt(ctx, builder)
}

/// [204] c-document-end ::= "." "." "."
pub fn c_document_end(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    literal("...").attempt(ctx, builder)
}

/// [205] l-document-suffix ::= c-document-end s-l-comments
pub fn l_document_suffix(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((c_document_end, s_l_comments)).attempt(ctx, builder)
}

/// A marker is complete when followed by whitespace, a line break or the end of input.
fn marker_terminator(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    peek(any_of((char_if(is_break), s_white, end_of_input))).attempt(ctx, builder)
}

/// [206] c-forbidden ::= /* Start of line */ ( c-directives-end | c-document-end )
///                      ( b-char | s-white | /* End of file */ )
///
/// Only checks; nothing is consumed.
pub fn c_forbidden(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    peek(all_of((
        start_of_line,
        any_of((c_directives_end, c_document_end)),
        marker_terminator,
    )))
    .attempt(ctx, builder)
}

/// The `n` and `c` the document body starts with.
fn document_root(state: &mut State) {
    state.indent_level = -1;
    state.blockflow = BlockFlow::BlockIn;
}

/// [207] l-bare-document ::= s-l+block-node(-1,block-in) /* Excluding c-forbidden content */
pub fn l_bare_document(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    state_scope(document_root, s_l_block_node).attempt(ctx, builder)
}

/// [208] l-explicit-document ::= c-directives-end ( l-bare-document | ( e-node s-l-comments ) )
pub fn l_explicit_document(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        c_directives_end,
        any_of((l_bare_document, all_of((e_node, s_l_comments)))),
    ))
    .attempt(ctx, builder)
}

/// [209] l-directive-document ::= l-directive+ l-explicit-document
pub fn l_directive_document(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((one_or_more(l_directive), l_explicit_document)).attempt(ctx, builder)
}

/// [210] l-any-document ::= l-directive-document | l-explicit-document | l-bare-document
pub fn l_any_document(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((l_directive_document, l_explicit_document, l_bare_document)).attempt(ctx, builder)
}

/// [211] l-yaml-stream ::= l-document-prefix* l-any-document?
///     ( ( l-document-suffix+ l-document-prefix* l-any-document? )
///     | ( l-document-prefix* l-explicit-document? ) )*
///
/// Does not require the whole input to be consumed.
pub fn l_yaml_stream(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((
        zero_or_more(l_document_prefix),
        zero_or_one(l_any_document),
        zero_or_more(any_of((
            all_of((
                one_or_more(l_document_suffix),
                zero_or_more(l_document_prefix),
                zero_or_one(l_any_document),
            )),
            all_of((zero_or_more(l_document_prefix), zero_or_one(l_explicit_document))),
        ))),
    ))
    .attempt(ctx, builder)
}

/// One document at the current position: `l-document-prefix* ( l-any-document | e-node )`.
///
/// This is what [`crate::Parser`] runs for each call to `parse`.
pub fn l_single_document(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((zero_or_more(l_document_prefix), any_of((l_any_document, e_node)))).attempt(ctx, builder)
}

/// The start of a following document: `l-directive* c-directives-end`, with
/// the marker complete.
pub fn start_of_document(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    all_of((zero_or_more(l_directive), c_directives_end, marker_terminator)).attempt(ctx, builder)
}

/// The end of the current document: the end of input, or `l-document-suffix`.
pub fn end_of_document(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    any_of((end_of_input, l_document_suffix)).attempt(ctx, builder)
}
