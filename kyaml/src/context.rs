// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Parse context: the stream plus the grammar parameters threaded through it.
//!
//! The YAML productions are parametrized by an indentation level `n` and a
//! context `c` (block-in, flow-out, ...). Instead of passing those around, every
//! production reads them from [`State`], and combinators that need to change
//! them do so in a scope that restores the previous state on exit.

use std::ops::{Deref, DerefMut};

use crate::stream::{CharStream, Mark};

/// The `c` parameter of the productions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockFlow {
    /// Not yet decided (top of the stream).
    #[default]
    NA,
    /// Outside of any block collection.
    BlockOut,
    /// Inside a block collection.
    BlockIn,
    /// An implicit block mapping key.
    BlockKey,
    /// A flow node at block level.
    FlowOut,
    /// Inside a flow collection.
    FlowIn,
    /// An implicit flow mapping key.
    FlowKey,
}

impl BlockFlow {
    /// The context used for the entries of a flow collection opened in `self`.
    ///
    /// This is the `in-flow(c)` function of the YAML grammar.
    #[must_use]
    pub const fn in_flow(self) -> Self {
        match self {
            Self::BlockKey | Self::FlowKey => Self::FlowKey,
            _ => Self::FlowIn,
        }
    }

    /// Returns `true` for the two flow contexts in which flow indicators end plain scalars.
    #[must_use]
    pub const fn is_flow_restricted(self) -> bool {
        matches!(self, Self::FlowIn | Self::FlowKey)
    }

    /// Returns `true` for the implicit key contexts, where scalars span one line only.
    #[must_use]
    pub const fn is_key(self) -> bool {
        matches!(self, Self::BlockKey | Self::FlowKey)
    }
}

/// Block scalar chomping behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chomp {
    /// Keep a single trailing line break.
    #[default]
    Clip,
    /// Remove all trailing line breaks.
    Strip,
    /// Keep all trailing line breaks.
    Keep,
}

/// The grammar-significant parse state.
///
/// `indent_level` is signed and starts at -1 so that a node at column 0 counts
/// as more indented than the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    /// The `n` parameter of the productions.
    pub indent_level: i32,
    /// The `c` parameter of the productions.
    pub blockflow: BlockFlow,
    /// The `t` parameter of the block scalar productions.
    pub chomp: Chomp,
    /// 1-based line number of the cursor.
    pub line_number: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            indent_level: -1,
            blockflow: BlockFlow::NA,
            chomp: Chomp::Clip,
            line_number: 1,
        }
    }
}

/// The stream together with the current [`State`].
#[derive(Debug)]
pub struct Context {
    stream: CharStream,
    state: State,
    furthest_line: u32,
}

impl Context {
    /// Wrap `stream` with the default state.
    #[must_use]
    pub fn new(stream: CharStream) -> Self {
        Self::with_state(stream, State::default())
    }

    /// Wrap `stream` starting from `state`.
    #[must_use]
    pub const fn with_state(stream: CharStream, state: State) -> Self {
        Self {
            stream,
            state,
            furthest_line: state.line_number,
        }
    }

    /// Wrap an in-memory string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(CharStream::from_text(text))
    }

    #[must_use]
    pub const fn stream(&self) -> &CharStream {
        &self.stream
    }

    pub const fn stream_mut(&mut self) -> &mut CharStream {
        &mut self.stream
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    pub const fn set_state(&mut self, state: State) {
        self.state = state;
    }

    /// Restore the default state, keeping the line number.
    pub fn reset(&mut self) {
        self.state = State {
            line_number: self.state.line_number,
            ..State::default()
        };
    }

    #[must_use]
    pub const fn indent_level(&self) -> i32 {
        self.state.indent_level
    }

    pub const fn set_indent(&mut self, indent_level: i32) {
        self.state.indent_level = indent_level;
    }

    #[must_use]
    pub const fn blockflow(&self) -> BlockFlow {
        self.state.blockflow
    }

    #[must_use]
    pub const fn chomp(&self) -> Chomp {
        self.state.chomp
    }

    pub const fn set_chomp(&mut self, chomp: Chomp) {
        self.state.chomp = chomp;
    }

    #[must_use]
    pub const fn line_number(&self) -> u32 {
        self.state.line_number
    }

    /// Record that a line break was consumed.
    pub const fn newline(&mut self) {
        self.state.line_number += 1;
        if self.state.line_number > self.furthest_line {
            self.furthest_line = self.state.line_number;
        }
    }

    /// The highest line number reached so far, including by attempts that
    /// were later rolled back.
    #[must_use]
    pub const fn furthest_line(&self) -> u32 {
        self.furthest_line
    }

    /// Shorthand for `self.stream_mut().mark()`.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        self.stream.mark()
    }

    /// Run `f`, restoring stream position and state if it returns `false`.
    pub fn attempt(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let mut guard = ContextGuard::new(self);
        let ok = f(&mut *guard);
        if ok {
            guard.release();
        }
        ok
    }

    /// Run `f` and always restore the stream position and state afterwards.
    pub fn lookahead(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let mut guard = ContextGuard::new(self);
        f(&mut *guard)
    }

    /// Run `f` with a modified state, restoring the previous state afterwards.
    ///
    /// The stream position is kept. The line number is carried out of the scope
    /// so that lines consumed inside still count.
    pub fn scoped<R>(&mut self, modify: impl FnOnce(&mut State), f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.state;
        modify(&mut self.state);
        let result = f(self);
        let line_number = self.state.line_number;
        self.state = State {
            line_number,
            ..saved
        };
        result
    }
}

/// Restores stream position and state when dropped, unless released.
///
/// Derefs to the guarded [`Context`] so the protected code can keep using it.
pub struct ContextGuard<'a> {
    ctx: &'a mut Context,
    mark: Mark,
    state: State,
    restore: bool,
}

impl<'a> ContextGuard<'a> {
    /// Snapshot `ctx`.
    pub const fn new(ctx: &'a mut Context) -> Self {
        let mark = ctx.stream.mark();
        let state = ctx.state;
        Self {
            ctx,
            mark,
            state,
            restore: true,
        }
    }

    /// Keep whatever the guarded code did.
    pub const fn release(&mut self) {
        self.restore = false;
    }
}

impl Deref for ContextGuard<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.ctx
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.ctx
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        if self.restore {
            self.ctx.stream.unwind(self.mark);
            self.ctx.set_state(self.state);
        }
    }
}
