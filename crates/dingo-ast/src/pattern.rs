// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Match-arm patterns.

use crate::expr::Literal;
use crate::{Ident, NodeId, Span};

/// A pattern in a match arm. Guards are not part of the pattern.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    pub id: NodeId,
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternKind {
    /// `_`
    Wildcard,
    /// `42`, `-1`, `"ok"`, `'x'`, `true`, `nil`
    Literal { value: Literal, negative: bool },
    /// A bare name not followed by `(`.
    Binding(Ident),
    /// `Name(p1, p2)`, `Enum.Name`, `Enum.Name(p)`
    Variant {
        qualifier: Option<Ident>,
        name: Ident,
        args: Vec<Pattern>,
    },
    /// Placeholder for a pattern that failed to parse.
    Error,
}

impl Pattern {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, PatternKind::Error)
    }

    /// Names bound by this pattern, in source order.
    pub fn bindings(&self) -> Vec<&Ident> {
        let mut out = Vec::new();
        self.collect_bindings(&mut out);
        out
    }

    fn collect_bindings<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        match &self.kind {
            PatternKind::Binding(name) => out.push(name),
            PatternKind::Variant { args, .. } => {
                for arg in args {
                    arg.collect_bindings(out);
                }
            }
            PatternKind::Wildcard | PatternKind::Literal { .. } | PatternKind::Error => {}
        }
    }
}
