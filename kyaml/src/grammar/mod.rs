// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The YAML 1.2 productions, one function per production.
//!
//! Each function carries its production number and rule in its doc comment.
//! Where the rule has parameters, `n` is the indentation level and `c` the
//! block/flow context of the [`Context`](crate::Context); `t` is its chomping
//! mode.
//!
//! Productions that are plain character classes live in [`chars`], layout in
//! [`structure`], flow style in [`flow`], block style in [`block`] and
//! directives and documents in [`document`].

pub mod block;
pub mod chars;
pub mod document;
pub mod flow;
pub mod structure;

use crate::builder::DocumentBuilder;
use crate::context::Context;

pub use document::{end_of_document, l_single_document, l_yaml_stream, start_of_document};

/// [105] e-scalar ::= /* Empty */
///
/// Reports an empty scalar.
pub fn e_scalar(_ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    builder.add_scalar("");
    true
}

/// [106] e-node ::= e-scalar
pub fn e_node(ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    e_scalar(ctx, builder)
}

pub(crate) fn start_sequence(_ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    builder.start_sequence();
    true
}

pub(crate) fn end_sequence(_ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    builder.end_sequence();
    true
}

pub(crate) fn start_mapping(_ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    builder.start_mapping();
    true
}

pub(crate) fn end_mapping(_ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
    builder.end_mapping();
    true
}
