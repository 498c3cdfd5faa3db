// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree types for the Dingo language.
//!
//! This crate defines the tokens and tree nodes shared between the lexer,
//! the parser, and downstream consumers such as a type checker or a
//! transpiler to Go. Every node family is a closed enum; consumers match
//! exhaustively.

pub mod span;
pub mod token;
pub mod expr;
pub mod ty;
pub mod pattern;
pub mod stmt;
pub mod decl;
pub mod visit;

pub use span::{FileId, LineMap, Position, Span};

use decl::Decl;
use token::Comment;

/// Unique identifier for tree nodes.
///
/// Identifiers are dense and assigned in construction order, so side tables
/// keyed by `NodeId` can be plain vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

/// A name together with the span it was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }

    /// Stands in for a name the parser expected but did not find.
    pub fn missing(span: Span) -> Self {
        Self { name: String::new(), span }
    }

    /// True for the blank identifier `_`.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }

    pub fn is_missing(&self) -> bool {
        self.name.is_empty()
    }
}

/// Root of a parsed file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceFile {
    pub file: FileId,
    pub decls: Vec<Decl>,
    /// Comment trivia, in source order.
    pub comments: Vec<Comment>,
    pub span: Span,
}

impl SourceFile {
    /// The `package` clause name, if the file has one.
    pub fn package_name(&self) -> Option<&str> {
        self.decls.iter().find_map(|d| match &d.kind {
            decl::DeclKind::Package(name) => Some(name.name.as_str()),
            _ => None,
        })
    }
}
