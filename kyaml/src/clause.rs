// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Clause trait and the generic combinators the grammar is assembled from.
//!
//! A [`Clause`] tries to recognize its construct at the current position. On
//! success it reports events to the builder and leaves the stream after the
//! recognized text. On failure it leaves stream and state exactly as it found
//! them and reports nothing.
//!
//! Any `Fn(&mut Context, &mut dyn DocumentBuilder) -> bool` is a clause, so
//! grammar productions are plain functions. Sequences and alternatives take
//! tuples of clauses:
//!
//! ```
//! use kyaml::clause::{Clause, all_of, any_of, literal, zero_or_more};
//! use kyaml::{Context, ReplayBuilder};
//!
//! let greeting = all_of((any_of((literal("hi"), literal("hello"))), zero_or_more(literal("!"))));
//! let mut ctx = Context::from_text("hello!!");
//! assert!(greeting.attempt(&mut ctx, &mut ReplayBuilder::new()));
//! assert!(ctx.stream_mut().eof());
//! ```

use crate::builder::{DocumentBuilder, NullBuilder, ReplayBuilder, TextBuilder};
use crate::context::{BlockFlow, Context, ContextGuard, State};

/// A grammar production.
pub trait Clause {
    /// Try to recognize this production at the current position.
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool;
}

impl<F> Clause for F
where
    F: Fn(&mut Context, &mut dyn DocumentBuilder) -> bool,
{
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        self(ctx, builder)
    }
}

/// A fixed list of clauses, implemented for tuples.
pub trait ClauseList {
    /// Attempt every clause in order, stopping at the first failure.
    fn attempt_each(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool;

    /// Attempt the clauses in order until one succeeds.
    fn attempt_first(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool;
}

macro_rules! impl_clause_list {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Clause),+> ClauseList for ($($name,)+) {
            fn attempt_each(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
                $(self.$idx.attempt(ctx, builder))&&+
            }

            fn attempt_first(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
                $(self.$idx.attempt(ctx, builder))||+
            }
        }
    };
}

impl_clause_list!(A: 0);
impl_clause_list!(A: 0, B: 1);
impl_clause_list!(A: 0, B: 1, C: 2);
impl_clause_list!(A: 0, B: 1, C: 2, D: 3);
impl_clause_list!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_clause_list!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_clause_list!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_clause_list!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
impl_clause_list!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8);
impl_clause_list!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9);

// ============================================================================
// Combinators
// ============================================================================

/// See [`all_of`].
#[derive(Debug, Clone, Copy)]
pub struct AllOf<L>(L);

/// Succeeds if every clause succeeds in order.
///
/// Events are buffered and only forwarded when the whole sequence matched, so a
/// failure part way through leaves no trace in the builder.
pub const fn all_of<L: ClauseList>(clauses: L) -> AllOf<L> {
    AllOf(clauses)
}

impl<L: ClauseList> Clause for AllOf<L> {
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        let mut guard = ContextGuard::new(ctx);
        let mut replay = ReplayBuilder::new();
        if self.0.attempt_each(&mut guard, &mut replay) {
            guard.release();
            replay.replay(builder);
            true
        } else {
            false
        }
    }
}

/// See [`any_of`].
#[derive(Debug, Clone, Copy)]
pub struct AnyOf<L>(L);

/// Ordered choice: the first alternative that succeeds wins.
pub const fn any_of<L: ClauseList>(clauses: L) -> AnyOf<L> {
    AnyOf(clauses)
}

impl<L: ClauseList> Clause for AnyOf<L> {
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        self.0.attempt_first(ctx, builder)
    }
}

/// See [`zero_or_more`].
#[derive(Debug, Clone, Copy)]
pub struct ZeroOrMore<C>(C);

/// Repeat `clause` until it fails or stops consuming input. Always succeeds.
pub const fn zero_or_more<C: Clause>(clause: C) -> ZeroOrMore<C> {
    ZeroOrMore(clause)
}

impl<C: Clause> Clause for ZeroOrMore<C> {
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        repeat(&self.0, ctx, builder);
        true
    }
}

/// See [`one_or_more`].
#[derive(Debug, Clone, Copy)]
pub struct OneOrMore<C>(C);

/// Like [`zero_or_more`] but requires at least one match.
pub const fn one_or_more<C: Clause>(clause: C) -> OneOrMore<C> {
    OneOrMore(clause)
}

impl<C: Clause> Clause for OneOrMore<C> {
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        repeat(&self.0, ctx, builder) > 0
    }
}

/// Run `clause` repeatedly, returning the number of successes.
fn repeat<C: Clause>(clause: &C, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> usize {
    let mut count = 0;
    loop {
        let before = ctx.mark();
        if !clause.attempt(ctx, builder) {
            return count;
        }
        count += 1;
        if ctx.mark() == before {
            return count;
        }
    }
}

/// See [`zero_or_one`].
#[derive(Debug, Clone, Copy)]
pub struct ZeroOrOne<C>(C);

/// Attempt `clause` once. Always succeeds.
pub const fn zero_or_one<C: Clause>(clause: C) -> ZeroOrOne<C> {
    ZeroOrOne(clause)
}

impl<C: Clause> Clause for ZeroOrOne<C> {
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        let _ = self.0.attempt(ctx, builder);
        true
    }
}

/// See [`not`].
#[derive(Debug, Clone, Copy)]
pub struct Not<C>(C);

/// Negative lookahead: succeeds iff `clause` fails. Never consumes input.
pub const fn not<C: Clause>(clause: C) -> Not<C> {
    Not(clause)
}

impl<C: Clause> Clause for Not<C> {
    fn attempt(&self, ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
        !ctx.lookahead(|ctx| self.0.attempt(ctx, &mut NullBuilder))
    }
}

/// See [`peek`].
#[derive(Debug, Clone, Copy)]
pub struct Peek<C>(C);

/// Positive lookahead: succeeds iff `clause` would. Never consumes input.
pub const fn peek<C: Clause>(clause: C) -> Peek<C> {
    Peek(clause)
}

impl<C: Clause> Clause for Peek<C> {
    fn attempt(&self, ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
        ctx.lookahead(|ctx| self.0.attempt(ctx, &mut NullBuilder))
    }
}

/// See [`state_scope`].
#[derive(Debug, Clone, Copy)]
pub struct StateScope<M, C> {
    modifier: M,
    clause: C,
}

/// Run `clause` with the state changed by `modifier`, restoring it afterwards.
pub const fn state_scope<M, C>(modifier: M, clause: C) -> StateScope<M, C>
where
    M: Fn(&mut State),
    C: Clause,
{
    StateScope { modifier, clause }
}

impl<M, C> Clause for StateScope<M, C>
where
    M: Fn(&mut State),
    C: Clause,
{
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        ctx.scoped(&self.modifier, |ctx| self.clause.attempt(ctx, builder))
    }
}

/// Run `clause` with the indentation level raised by `delta`.
pub fn indented<C: Clause>(delta: i32, clause: C) -> impl Clause {
    state_scope(move |state: &mut State| state.indent_level += delta, clause)
}

/// Run `clause` in the given block/flow context.
pub fn with_blockflow<C: Clause>(blockflow: BlockFlow, clause: C) -> impl Clause {
    state_scope(move |state: &mut State| state.blockflow = blockflow, clause)
}

/// Run `clause` in `in-flow(c)` of the current context.
pub fn in_flow<C: Clause>(clause: C) -> impl Clause {
    state_scope(|state: &mut State| state.blockflow = state.blockflow.in_flow(), clause)
}

/// See [`capture`].
#[derive(Debug, Clone, Copy)]
pub struct Capture<C>(C);

/// Run `clause` and, on success, report every character it matched as an atom.
///
/// Events emitted by `clause` itself are discarded.
pub const fn capture<C: Clause>(clause: C) -> Capture<C> {
    Capture(clause)
}

impl<C: Clause> Clause for Capture<C> {
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        let start = ctx.mark();
        if !self.0.attempt(ctx, &mut NullBuilder) {
            return false;
        }
        for atom in ctx.stream().text_since(start).chars() {
            builder.add_atom(atom);
        }
        true
    }
}

/// See [`emit`].
#[derive(Debug, Clone, Copy)]
pub struct Emit<C> {
    atom: char,
    clause: C,
}

/// Run `clause` and, on success, report `atom` in place of what it matched.
pub const fn emit<C: Clause>(atom: char, clause: C) -> Emit<C> {
    Emit { atom, clause }
}

impl<C: Clause> Clause for Emit<C> {
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        if self.clause.attempt(ctx, &mut NullBuilder) {
            builder.add_atom(self.atom);
            true
        } else {
            false
        }
    }
}

/// See [`scalar`].
#[derive(Debug, Clone, Copy)]
pub struct Scalar<C>(C);

/// Run `clause`, collecting its atoms into a single scalar event.
pub const fn scalar<C: Clause>(clause: C) -> Scalar<C> {
    Scalar(clause)
}

impl<C: Clause> Clause for Scalar<C> {
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        let mut text = TextBuilder::new();
        if self.0.attempt(ctx, &mut text) {
            builder.add_scalar(text.as_str());
            true
        } else {
            false
        }
    }
}

/// See [`times`].
#[derive(Debug, Clone, Copy)]
pub struct Times<C> {
    count: usize,
    clause: C,
}

/// Match `clause` exactly `count` times in a row.
pub const fn times<C: Clause>(count: usize, clause: C) -> Times<C> {
    Times { count, clause }
}

impl<C: Clause> Clause for Times<C> {
    fn attempt(&self, ctx: &mut Context, builder: &mut dyn DocumentBuilder) -> bool {
        let mut guard = ContextGuard::new(ctx);
        let mut replay = ReplayBuilder::new();
        for _ in 0..self.count {
            if !self.clause.attempt(&mut guard, &mut replay) {
                return false;
            }
        }
        guard.release();
        replay.replay(builder);
        true
    }
}

// ============================================================================
// Terminals
// ============================================================================

/// See [`char_if`].
#[derive(Debug, Clone, Copy)]
pub struct CharIf<P>(P);

/// Match one character satisfying `predicate`.
pub const fn char_if<P: Fn(char) -> bool>(predicate: P) -> CharIf<P> {
    CharIf(predicate)
}

impl<P: Fn(char) -> bool> Clause for CharIf<P> {
    fn attempt(&self, ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
        match ctx.stream_mut().peek() {
            Some(c) if (self.0)(c) => {
                ctx.stream_mut().advance(1);
                true
            }
            _ => false,
        }
    }
}

/// See [`literal`].
#[derive(Debug, Clone, Copy)]
pub struct Literal(&'static str);

/// Match `text` exactly.
pub const fn literal(text: &'static str) -> Literal {
    Literal(text)
}

impl Clause for Literal {
    fn attempt(&self, ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
        let stream = ctx.stream_mut();
        let matches = self
            .0
            .chars()
            .enumerate()
            .all(|(ahead, expected)| stream.peek_at(ahead) == Some(expected));
        if matches {
            stream.advance(self.0.chars().count());
        }
        matches
    }
}

/// Match a single specific character.
pub fn ch(expected: char) -> impl Clause {
    char_if(move |c| c == expected)
}

/// Succeeds at end of input without consuming anything.
pub fn end_of_input(ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    ctx.stream_mut().eof()
}

/// Always succeeds without consuming anything.
pub const fn empty(_ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Event;

    fn emit_scalar(value: &'static str) -> impl Clause {
        move |_ctx: &mut Context, builder: &mut dyn DocumentBuilder| {
            builder.add_scalar(value);
            true
        }
    }

    fn fail(_ctx: &mut Context, _builder: &mut dyn DocumentBuilder) -> bool {
        false
    }

    #[test]
    fn test_all_of_success_forwards_events() {
        let mut ctx = Context::from_text("ab");
        let mut out = ReplayBuilder::new();
        let clause = all_of((ch('a'), emit_scalar("x"), ch('b')));
        assert!(clause.attempt(&mut ctx, &mut out));
        assert_eq!(out.events(), &[Event::Scalar("x".to_owned())]);
        assert!(ctx.stream_mut().eof());
    }

    #[test]
    fn test_all_of_failure_is_atomic() {
        let mut ctx = Context::from_text("ac");
        let mut out = ReplayBuilder::new();
        let clause = all_of((ch('a'), emit_scalar("x"), ch('b')));
        assert!(!clause.attempt(&mut ctx, &mut out));
        assert!(out.is_empty());
        assert_eq!(ctx.stream_mut().peek(), Some('a'));
        assert_eq!(ctx.state(), State::default());
    }

    #[test]
    fn test_any_of_is_ordered() {
        let mut ctx = Context::from_text("abc");
        let mut out = ReplayBuilder::new();
        let clause = any_of((literal("ab"), literal("abc")));
        assert!(clause.attempt(&mut ctx, &mut out));
        assert_eq!(ctx.stream_mut().peek(), Some('c'));

        let mut ctx = Context::from_text("xyz");
        assert!(!clause.attempt(&mut ctx, &mut out));
        assert_eq!(ctx.stream_mut().peek(), Some('x'));
    }

    #[test]
    fn test_repetition() {
        let mut ctx = Context::from_text("aaab");
        let mut out = NullBuilder;
        assert!(zero_or_more(ch('a')).attempt(&mut ctx, &mut out));
        assert_eq!(ctx.stream_mut().peek(), Some('b'));
        assert!(zero_or_more(ch('a')).attempt(&mut ctx, &mut out));
        assert!(!one_or_more(ch('a')).attempt(&mut ctx, &mut out));
        assert!(one_or_more(ch('b')).attempt(&mut ctx, &mut out));
    }

    #[test]
    fn test_repetition_stops_without_progress() {
        let mut ctx = Context::from_text("x");
        let mut out = ReplayBuilder::new();
        assert!(zero_or_more(emit_scalar("e")).attempt(&mut ctx, &mut out));
        assert_eq!(out.events().len(), 1);
    }

    #[test]
    fn test_zero_or_one_and_not() {
        let mut ctx = Context::from_text("b");
        let mut out = NullBuilder;
        assert!(zero_or_one(ch('a')).attempt(&mut ctx, &mut out));
        assert_eq!(ctx.stream_mut().peek(), Some('b'));
        assert!(not(ch('a')).attempt(&mut ctx, &mut out));
        assert!(!not(ch('b')).attempt(&mut ctx, &mut out));
        assert!(peek(ch('b')).attempt(&mut ctx, &mut out));
        assert_eq!(ctx.stream_mut().peek(), Some('b'));
    }

    #[test]
    fn test_state_scope_restores() {
        let mut ctx = Context::from_text("");
        let check = |ctx: &mut Context, _builder: &mut dyn DocumentBuilder| {
            ctx.indent_level() == 1 && ctx.blockflow() == BlockFlow::FlowIn
        };
        let clause = indented(2, with_blockflow(BlockFlow::BlockIn, in_flow(check)));
        assert!(clause.attempt(&mut ctx, &mut NullBuilder));
        assert_eq!(ctx.state(), State::default());
    }

    #[test]
    fn test_scalar_collects_atoms() {
        let mut ctx = Context::from_text("ab c");
        let mut out = ReplayBuilder::new();
        let clause = scalar(all_of((capture(literal("ab")), emit('-', ch(' ')), capture(ch('c')))));
        assert!(clause.attempt(&mut ctx, &mut out));
        assert_eq!(out.events(), &[Event::Scalar("ab-c".to_owned())]);
    }

    #[test]
    fn test_times() {
        let hex = char_if(|c: char| c.is_ascii_hexdigit());
        let mut ctx = Context::from_text("0fz");
        assert!(!times(3, hex).attempt(&mut ctx, &mut NullBuilder));
        assert_eq!(ctx.stream_mut().peek(), Some('0'));
        assert!(times(2, hex).attempt(&mut ctx, &mut NullBuilder));
        assert_eq!(ctx.stream_mut().peek(), Some('z'));
    }

    #[test]
    fn test_failures_leave_context_untouched() {
        let clauses: Vec<Box<dyn Clause>> = vec![
            Box::new(all_of((ch('a'), ch('a'), fail))),
            Box::new(one_or_more(ch('z'))),
            Box::new(literal("abz")),
            Box::new(times(4, ch('a'))),
            Box::new(indented(3, all_of((ch('a'), fail)))),
            Box::new(scalar(all_of((capture(ch('a')), fail)))),
        ];
        for clause in clauses {
            let mut ctx = Context::from_text("aab");
            let before = ctx.state();
            let mut out = ReplayBuilder::new();
            assert!(!clause.attempt(&mut ctx, &mut out));
            assert!(out.is_empty());
            assert_eq!(ctx.state(), before);
            assert_eq!(ctx.stream().offset(), 0);
        }
    }
}
