// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement nodes.

use crate::decl::Decl;
use crate::expr::Expr;
use crate::{Ident, NodeId, Span};

/// A brace-delimited statement list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A statement in the tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    /// Expression statement
    Expr(Expr),
    /// `ch <- v`
    Send { channel: Expr, value: Expr },
    /// `x++` / `x--`
    IncDec { target: Expr, increment: bool },
    /// `a, b = x, y` and compound forms such as `x += 1`
    Assign {
        targets: Vec<Expr>,
        op: AssignOp,
        values: Vec<Expr>,
    },
    /// `a, b := x, y`
    ShortVarDecl { names: Vec<Ident>, values: Vec<Expr> },
    Return(Vec<Expr>),
    If(IfStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Select(Vec<CommClause>),
    Go(Expr),
    Defer(Expr),
    Block(Block),
    /// A lone `;`
    Empty,
    Break(Option<Ident>),
    Continue(Option<Ident>),
    Goto(Ident),
    Fallthrough,
    /// `label: stmt`
    Labeled { label: Ident, stmt: Box<Stmt> },
    /// `var`, `const`, `type`, `let` or `enum` inside a block.
    Decl(Box<Decl>),
    /// Placeholder for a statement skipped by error recovery.
    Bad,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    AndNot,
}

/// `if init; cond { then } else ...`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub then_block: Block,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElseBranch {
    /// `else if ...`; the boxed statement is always `StmtKind::If`.
    If(Box<Stmt>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForStmt {
    pub header: ForHeader,
    pub body: Block,
}

/// The three header forms of `for`, plus the bare loop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForHeader {
    /// `for { }`
    Infinite,
    /// `for cond { }`
    Cond(Expr),
    /// `for init; cond; post { }`
    Clause {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
    },
    /// `for k, v := range x { }`, `for k = range x { }`, `for range x { }`
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        /// `:=` rather than `=`
        define: bool,
        iter: Expr,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    /// `v` in the type switch `switch v := x.(type)`.
    pub binding: Option<Ident>,
    pub tag: Option<Expr>,
    pub cases: Vec<CaseClause>,
}

/// `case a, b:` or `default:` with its statements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseClause {
    /// Empty for `default`.
    pub exprs: Vec<Expr>,
    pub is_default: bool,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A `select` clause.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommClause {
    /// Send or receive statement; `None` for `default`.
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
    pub span: Span,
}
