// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declaration nodes.

use crate::expr::Expr;
use crate::stmt::{Block, Stmt};
use crate::ty::{FuncSig, Param, Type, TypeParam};
use crate::{Ident, NodeId, Span};

/// A declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decl {
    pub id: NodeId,
    pub kind: DeclKind,
    pub span: Span,
}

/// The kind of declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    /// `package main`
    Package(Ident),
    Import(ImportDecl),
    Func(FuncDecl),
    Method(MethodDecl),
    /// `type` with one spec or a parenthesized group
    Type(Vec<TypeSpec>),
    Const(Vec<ValueSpec>),
    Var(Vec<ValueSpec>),
    Let(LetDecl),
    Enum(EnumDecl),
    /// A statement written at file level.
    Stmt(Stmt),
    /// Placeholder for a declaration skipped by error recovery.
    Bad,
}

/// `import "fmt"` or `import ( ... )`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportDecl {
    pub specs: Vec<ImportSpec>,
    /// Written with parentheses.
    pub grouped: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportSpec {
    pub alias: Option<ImportAlias>,
    /// Decoded path string.
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    /// Placeholder for a spec without a valid path; the alias is a missing name.
    pub fn is_error(&self) -> bool {
        matches!(&self.alias, Some(ImportAlias::Name(name)) if name.is_missing())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImportAlias {
    /// `import name "path"`; `_` lands here too.
    Name(Ident),
    /// `import . "path"`
    Dot(Span),
}

/// `func Name[T any](params) results { body }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncDecl {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub sig: FuncSig,
    /// Absent for functions implemented outside Dingo.
    pub body: Option<Block>,
}

/// `func (r *T) Name(params) results { body }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodDecl {
    pub receiver: Param,
    pub name: Ident,
    pub sig: FuncSig,
    pub body: Option<Block>,
}

/// `Name[T any] = Type`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    /// Written with `=`.
    pub alias: bool,
    pub ty: Type,
    pub span: Span,
}

impl TypeSpec {
    pub fn is_error(&self) -> bool {
        self.name.is_missing()
    }
}

/// One `const` or `var` spec: `a, b int = 1, 2`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Type>,
    pub values: Vec<Expr>,
    pub span: Span,
}

impl ValueSpec {
    /// A spec that failed to parse carries a single missing name.
    pub fn is_error(&self) -> bool {
        matches!(self.names.as_slice(), [name] if name.is_missing())
    }
}

/// `let name: Type = value`. The initializer is mandatory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LetDecl {
    pub name: Ident,
    pub ty: Option<Type>,
    pub value: Expr,
}

/// `enum Name[T any] { variants }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDecl {
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumVariant {
    pub name: Ident,
    pub payload: Option<VariantPayload>,
    pub span: Span,
}

impl EnumVariant {
    pub fn is_error(&self) -> bool {
        self.name.is_missing()
    }
}

/// A variant carries a tuple payload or a struct payload, never both.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariantPayload {
    /// `Circle(float64)`
    Tuple(Vec<Type>),
    /// `Rect { w: float64, h: float64 }`
    Struct(Vec<EnumField>),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumField {
    pub name: Ident,
    pub ty: Type,
    pub span: Span,
}
