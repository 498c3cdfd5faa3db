// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Ambiguity resolution: context restrictions and speculative parsing.
//!
//! A handful of constructs cannot be told apart with a fixed lookahead:
//! `f[T](x)` against `a[i]`, `(x) => x` against `(x)`, a method receiver
//! against a statement starting with `func (`. For these the parser takes a
//! [`Checkpoint`], tries the longer reading, and rewinds if it does not fit.

use bitflags::bitflags;

use crate::parser::Parser;

bitflags! {
    /// Restrictions on what the expression parser may accept at this point.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ParseContext: u8 {
        /// `T{` does not start a composite literal; the `{` belongs to the
        /// enclosing statement, as in `if x == T {`.
        const NO_COMPOSITE_LIT = 1 << 0;
        /// `x =>` does not start a lambda, as in a match guard
        /// `p if ok => body`.
        const NO_ARROW_LAMBDA = 1 << 1;
    }
}

/// Saved parser state. Rewinding restores everything speculation could
/// have touched, so a failed attempt leaves no trace.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    pos: usize,
    errors_len: usize,
    next_node_id: u32,
    context: ParseContext,
    depth: usize,
    halted: bool,
}

impl Parser {
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            errors_len: self.errors.len(),
            next_node_id: self.next_node_id,
            context: self.context,
            depth: self.depth,
            halted: self.halted,
        }
    }

    pub(crate) fn rewind(&mut self, cp: Checkpoint) {
        self.pos = cp.pos;
        self.errors.truncate(cp.errors_len);
        self.next_node_id = cp.next_node_id;
        self.context = cp.context;
        self.depth = cp.depth;
        self.halted = cp.halted;
    }

    /// Try `f`; on `None`, or if the attempt recorded any error, rewind to
    /// where it started.
    pub(crate) fn speculate<T>(
        &mut self,
        construct: &'static str,
        f: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        let cp = self.checkpoint();
        tracing::trace!(construct, pos = cp.pos, "speculating");
        match f(self) {
            Some(value) if self.errors.len() == cp.errors_len && !self.halted => {
                tracing::trace!(construct, pos = self.pos, "committed");
                Some(value)
            }
            _ => {
                tracing::trace!(construct, pos = cp.pos, "rolled back");
                self.rewind(cp);
                None
            }
        }
    }

    /// Run `f` with `context` in force, restoring the previous context after.
    pub(crate) fn with_context<T>(
        &mut self,
        context: ParseContext,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let old = self.context;
        self.context = context;
        let result = f(self);
        self.context = old;
        result
    }

    /// Inside `(...)`, `[...]` and `{...}` every restriction is lifted.
    pub(crate) fn in_delimiters<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.with_context(ParseContext::empty(), f)
    }

    pub(crate) fn allows(&self, flag: ParseContext) -> bool {
        !self.context.contains(flag)
    }
}
