// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type nodes.

use crate::expr::Expr;
use crate::{Ident, NodeId, Span};

/// A type in the tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Type {
    pub id: NodeId,
    pub kind: TypeKind,
    pub span: Span,
}

impl Type {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, TypeKind::Error)
    }
}

/// The kind of type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    /// `int`, `T`
    Name(Ident),
    /// `pkg.Name`
    Qualified { package: Ident, name: Ident },
    /// `*T`
    Pointer(Box<Type>),
    /// `[N]T` or `[...]T`
    Array { len: ArrayLen, elem: Box<Type> },
    /// `[]T`
    Slice(Box<Type>),
    /// `map[K]V`
    Map { key: Box<Type>, value: Box<Type> },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: Box<Type> },
    /// `func(params) results`
    Func(FuncSig),
    Struct(Vec<FieldDecl>),
    Interface(Vec<InterfaceElem>),
    /// `Name[T1, T2]` or `pkg.Name[T]`
    Generic { base: Box<Type>, args: Vec<Type> },
    /// `(T)`
    Paren(Box<Type>),
    /// `~T`, valid inside constraints
    Approx(Box<Type>),
    /// `A | B | ~C`, valid inside constraints
    Union(Vec<Type>),
    /// Placeholder for a type that failed to parse.
    Error,
}

/// Length of an array type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrayLen {
    Expr(Box<Expr>),
    /// `[...]T`, only meaningful in composite literals.
    Inferred,
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Parameters and results of a function type, literal or declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncSig {
    pub params: Vec<Param>,
    /// A single unnamed result is stored as a one-element list.
    pub results: Vec<Param>,
    pub span: Span,
}

/// A parameter group: `a, b int`, `x T`, or an unnamed `T`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    /// Empty for unnamed parameters and results.
    pub names: Vec<Ident>,
    pub ty: Type,
    /// `...T`
    pub variadic: bool,
    pub span: Span,
}

/// A struct field line: `a, b int`, or an embedded `T` / `*pkg.T`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDecl {
    /// Empty for embedded fields.
    pub names: Vec<Ident>,
    pub ty: Type,
    pub tag: Option<String>,
    pub span: Span,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }

    /// A field line that failed to parse: no names and an error type.
    pub fn is_error(&self) -> bool {
        self.names.is_empty() && self.ty.is_error()
    }
}

/// An element of an interface body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterfaceElem {
    Method { name: Ident, sig: FuncSig },
    /// Embedded interface, type, or union of types.
    Embed(Type),
}

/// A type parameter group: `K comparable`, `T, U any`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeParam {
    pub names: Vec<Ident>,
    pub constraint: Option<Type>,
    pub span: Span,
}
