// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression nodes.

use crate::pattern::Pattern;
use crate::stmt::Block;
use crate::token::Radix;
use crate::ty::{FuncSig, Type};
use crate::{Ident, NodeId, Span};

/// An expression in the tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    /// True for the placeholder left where an operand failed to parse, or
    /// where the lexer rejected a token.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::Error)
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Ident(String),
    Literal(Literal),
    /// `T{...}` where `T` is a named, generic, array, slice, map or struct type.
    CompositeLit {
        ty: Box<Type>,
        body: LiteralValue,
    },
    /// `func(params) results { body }`
    FuncLit {
        sig: FuncSig,
        body: Block,
    },
    /// `|x, y| body` or `(x, y) => body` / `x => body`.
    Lambda {
        params: Vec<LambdaParam>,
        body: ExprBody,
        style: LambdaStyle,
    },
    /// `match subject { arms }`
    Match {
        subject: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Postfix `expr?`
    ErrorProp(Box<Expr>),
    /// `operand?.field`
    SafeNav {
        operand: Box<Expr>,
        field: Ident,
    },
    /// `left ?? right`
    NullCoalesce {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `operand.field`
    Selector {
        operand: Box<Expr>,
        field: Ident,
    },
    Index {
        operand: Box<Expr>,
        index: Box<Expr>,
    },
    /// `operand[low:high]` or `operand[low:high:max]`
    Slice {
        operand: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    Call {
        func: Box<Expr>,
        /// Explicit instantiation, as in `Map[int, string](xs, f)`.
        type_args: Vec<Type>,
        args: Vec<Expr>,
        /// Final argument is spread with `...`.
        spread: bool,
    },
    /// `operand.(T)`; `ty` is `None` for the type-switch guard `operand.(type)`.
    TypeAssert {
        operand: Box<Expr>,
        ty: Option<Box<Type>>,
    },
    Paren(Box<Expr>),
    /// A type written in expression position, such as the callee of the
    /// conversion `[]byte(s)`.
    TypeExpr(Box<Type>),
    /// Placeholder for an expression that failed to parse.
    Error,
}

/// Literal values, shared between expressions and patterns.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Int { radix: Radix, digits: String },
    Float(String),
    Imaginary(String),
    Rune(char),
    String(String),
    RawString(String),
    Bool(bool),
    Nil,
}

/// The braced body of a composite literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiteralValue {
    pub elements: Vec<Element>,
    pub span: Span,
}

/// One element of a literal value, optionally keyed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub key: Option<ElementValue>,
    pub value: ElementValue,
    pub span: Span,
}

/// Elements may elide their type and nest a bare `{...}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementValue {
    Expr(Expr),
    Nested(LiteralValue),
}

/// A lambda parameter with an optional annotation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LambdaParam {
    pub name: Ident,
    pub ty: Option<Type>,
    pub span: Span,
}

/// Which surface syntax a lambda was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LambdaStyle {
    /// `|x| body`
    Pipe,
    /// `(x) => body` or `x => body`
    Arrow,
}

/// Body of a lambda or match arm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprBody {
    Expr(Box<Expr>),
    Block(Block),
}

impl ExprBody {
    pub fn span(&self) -> Span {
        match self {
            ExprBody::Expr(e) => e.span,
            ExprBody::Block(b) => b.span,
        }
    }
}

/// A match arm. Arms are tried top to bottom; the first whose pattern and
/// guard both succeed is taken.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: ExprBody,
    pub span: Span,
}

impl MatchArm {
    /// True for an arm that failed to parse and was kept as a placeholder.
    pub fn is_error(&self) -> bool {
        self.pattern.is_error()
    }
}

/// Binary operators, grouped by precedence tier (lowest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOp {
    // ||
    Or,
    // &&
    And,
    // comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // additive
    Add,
    Sub,
    BitOr,
    BitXor,
    // multiplicative
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    BitAnd,
    AndNot,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::BitAnd => "&",
            BinOp::AndNot => "&^",
        }
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
    /// `+`
    Pos,
    /// `^`
    BitNot,
    /// `*`
    Deref,
    /// `&`
    AddrOf,
    /// `<-`
    Recv,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::BitNot => "^",
            UnaryOp::Deref => "*",
            UnaryOp::AddrOf => "&",
            UnaryOp::Recv => "<-",
        }
    }
}
