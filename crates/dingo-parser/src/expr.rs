// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression parsing with Pratt-style precedence climbing.

use dingo_ast::expr::{
    BinOp, Element, ElementValue, Expr, ExprBody, ExprKind, LambdaParam, LambdaStyle, Literal,
    LiteralValue, MatchArm, UnaryOp,
};
use dingo_ast::pattern::{Pattern, PatternKind};
use dingo_ast::token::TokenKind;
use dingo_ast::ty::{Type, TypeKind};
use dingo_ast::Span;

use crate::error::ParseError;
use crate::parser::Parser;
use crate::resolver::ParseContext;

/// Binding power of a binary operator, lowest tier first. `None` for
/// tokens that do not continue an expression.
fn infix_bp(kind: &TokenKind) -> Option<(u8, u8)> {
    Some(match kind {
        TokenKind::PipePipe => (1, 2),
        TokenKind::AmpAmp => (3, 4),
        TokenKind::QuestionQuestion => (5, 6),
        TokenKind::EqEq
        | TokenKind::BangEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => (7, 8),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Pipe | TokenKind::Caret => (9, 10),
        TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::LtLt
        | TokenKind::GtGt
        | TokenKind::Amp
        | TokenKind::AmpCaret => (11, 12),
        _ => return None,
    })
}

fn binary_op(kind: &TokenKind) -> Option<BinOp> {
    Some(match kind {
        TokenKind::PipePipe => BinOp::Or,
        TokenKind::AmpAmp => BinOp::And,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::BangEq => BinOp::Ne,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::LtEq => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::GtEq => BinOp::Ge,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Pipe => BinOp::BitOr,
        TokenKind::Caret => BinOp::BitXor,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Rem,
        TokenKind::LtLt => BinOp::Shl,
        TokenKind::GtGt => BinOp::Shr,
        TokenKind::Amp => BinOp::BitAnd,
        TokenKind::AmpCaret => BinOp::AndNot,
        _ => return None,
    })
}

fn unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Minus => UnaryOp::Neg,
        TokenKind::Plus => UnaryOp::Pos,
        TokenKind::Caret => UnaryOp::BitNot,
        TokenKind::Star => UnaryOp::Deref,
        TokenKind::Amp => UnaryOp::AddrOf,
        TokenKind::Arrow => UnaryOp::Recv,
        _ => return None,
    })
}

/// The literal a token spells, if any.
pub(crate) fn literal_of(kind: &TokenKind) -> Option<Literal> {
    Some(match kind {
        TokenKind::Int { radix, digits } => Literal::Int { radix: *radix, digits: digits.clone() },
        TokenKind::Float(text) => Literal::Float(text.clone()),
        TokenKind::Imaginary(text) => Literal::Imaginary(text.clone()),
        TokenKind::Rune(c) => Literal::Rune(*c),
        TokenKind::String(s) => Literal::String(s.clone()),
        TokenKind::RawString(s) => Literal::RawString(s.clone()),
        TokenKind::True => Literal::Bool(true),
        TokenKind::False => Literal::Bool(false),
        TokenKind::Nil => Literal::Nil,
        _ => return None,
    })
}

/// Tokens an enclosing construct may be waiting for. A missing operand
/// never consumes them.
fn closes_operand(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::RBrace
            | TokenKind::LBrace
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Semi
            | TokenKind::Newline
            | TokenKind::FatArrow
            | TokenKind::Eq
            | TokenKind::ColonEq
            | TokenKind::Eof
    )
}

/// `a` or `pkg.a`: the operands that may name a generic function or type.
fn is_type_name(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Ident(_) => true,
        ExprKind::Selector { operand, .. } => matches!(operand.kind, ExprKind::Ident(_)),
        _ => false,
    }
}

impl Parser {
    pub(crate) fn mk_expr(&mut self, kind: ExprKind, start: usize) -> Expr {
        let span = self.span_from(start);
        Expr { id: self.next_id(), kind, span }
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    /// `a, b, c`
    pub(crate) fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expr()?];
        while self.match_token(&TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.nested(|p| {
            let mut lhs = p.parse_unary()?;
            loop {
                let Some((l_bp, r_bp)) = infix_bp(p.current_kind()) else { break };
                if l_bp < min_bp {
                    break;
                }
                let op_kind = p.advance().kind.clone();
                let rhs = p.parse_expr_bp(r_bp)?;
                let span = lhs.span.to(rhs.span);
                let kind = match binary_op(&op_kind) {
                    Some(op) => ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) },
                    None => ExprKind::NullCoalesce { left: Box::new(lhs), right: Box::new(rhs) },
                };
                lhs = Expr { id: p.next_id(), kind, span };
            }
            Ok(lhs)
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.start();
        let is_chan_type = matches!(self.current_kind(), TokenKind::Arrow)
            && matches!(self.peek(1), TokenKind::Chan);
        match unary_op(self.current_kind()) {
            Some(op) if !is_chan_type => {
                self.advance();
                let operand = self.nested(|p| p.parse_unary())?;
                Ok(self.mk_expr(ExprKind::Unary { op, operand: Box::new(operand) }, start))
            }
            _ => {
                let primary = self.parse_primary()?;
                self.parse_postfix(primary)
            }
        }
    }

    // =========================================================================
    // Postfix
    // =========================================================================

    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            let start = expr.span.start;
            expr = match self.current_kind() {
                TokenKind::LParen => {
                    let (args, spread) = self.parse_call_args()?;
                    let kind = ExprKind::Call { func: Box::new(expr), type_args: Vec::new(), args, spread };
                    self.mk_expr(kind, start)
                }
                TokenKind::Dot => {
                    self.advance();
                    if self.match_token(&TokenKind::LParen) {
                        let ty = if self.match_token(&TokenKind::Type) {
                            None
                        } else {
                            Some(Box::new(self.in_delimiters(|p| p.parse_type())?))
                        };
                        self.expect(&TokenKind::RParen)?;
                        self.mk_expr(ExprKind::TypeAssert { operand: Box::new(expr), ty }, start)
                    } else {
                        let field = self.expect_ident()?;
                        self.mk_expr(ExprKind::Selector { operand: Box::new(expr), field }, start)
                    }
                }
                TokenKind::QuestionDot => {
                    self.advance();
                    let field = self.expect_ident()?;
                    self.mk_expr(ExprKind::SafeNav { operand: Box::new(expr), field }, start)
                }
                TokenKind::Question => {
                    self.advance();
                    self.mk_expr(ExprKind::ErrorProp(Box::new(expr)), start)
                }
                TokenKind::LBracket => self.parse_index_or_instantiation(expr)?,
                TokenKind::LBrace if self.starts_composite(&expr) => {
                    let ty = self.expr_to_type(expr);
                    let body = self.parse_literal_value()?;
                    self.mk_expr(ExprKind::CompositeLit { ty: Box::new(ty), body }, start)
                }
                _ => break,
            };
        }
        Ok(expr)
    }

    fn starts_composite(&self, expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::TypeExpr(ty) => matches!(
                ty.kind,
                TypeKind::Array { .. } | TypeKind::Slice(_) | TypeKind::Map { .. } | TypeKind::Struct(_)
            ),
            _ => is_type_name(expr) && self.allows(ParseContext::NO_COMPOSITE_LIT),
        }
    }

    /// Reinterpret an operand as the type of a composite literal.
    fn expr_to_type(&mut self, expr: Expr) -> Type {
        let Expr { id, kind, span } = expr;
        let kind = match kind {
            ExprKind::TypeExpr(ty) => return *ty,
            ExprKind::Ident(name) => TypeKind::Name(dingo_ast::Ident::new(name, span)),
            ExprKind::Selector { operand, field } => match operand.kind {
                ExprKind::Ident(package) => TypeKind::Qualified {
                    package: dingo_ast::Ident::new(package, operand.span),
                    name: field,
                },
                _ => TypeKind::Error,
            },
            _ => TypeKind::Error,
        };
        Type { id, kind, span }
    }

    /// `(args)` with an optional `...` spread on the last argument.
    fn parse_call_args(&mut self) -> Result<(Vec<Expr>, bool), ParseError> {
        self.expect(&TokenKind::LParen)?;
        let (args, spread) = self.in_delimiters(|p| {
            let mut args = Vec::new();
            let mut spread = false;
            p.skip_newlines();
            while !p.check(&TokenKind::RParen) && !p.at_end() {
                args.push(p.parse_expr()?);
                if p.match_token(&TokenKind::Ellipsis) {
                    spread = true;
                    p.match_token(&TokenKind::Comma);
                    p.skip_newlines();
                    break;
                }
                p.skip_newlines();
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
                p.skip_newlines();
            }
            Ok::<_, ParseError>((args, spread))
        })?;
        self.expect(&TokenKind::RParen)?;
        Ok((args, spread))
    }

    /// After `operand[`: an explicit instantiation such as `Map[int, string](xs)`
    /// or `Pair[int]{1, 2}`, otherwise an index or slice.
    fn parse_index_or_instantiation(&mut self, operand: Expr) -> Result<Expr, ParseError> {
        let start = operand.span.start;
        if is_type_name(&operand) {
            let composite_ok = self.allows(ParseContext::NO_COMPOSITE_LIT);
            let type_args = self.speculate("generic instantiation", |p| {
                p.advance();
                let args = p.parse_type_list(&TokenKind::RBracket).ok()?;
                p.expect(&TokenKind::RBracket).ok()?;
                match p.current_kind() {
                    TokenKind::LParen => Some(args),
                    TokenKind::LBrace if composite_ok => Some(args),
                    _ => None,
                }
            });
            if let Some(type_args) = type_args {
                if self.check(&TokenKind::LParen) {
                    let (args, spread) = self.parse_call_args()?;
                    let kind = ExprKind::Call { func: Box::new(operand), type_args, args, spread };
                    return Ok(self.mk_expr(kind, start));
                }
                let base = self.expr_to_type(operand);
                let ty = self.mk_type(TypeKind::Generic { base: Box::new(base), args: type_args }, start);
                let body = self.parse_literal_value()?;
                return Ok(self.mk_expr(ExprKind::CompositeLit { ty: Box::new(ty), body }, start));
            }
        }

        self.expect(&TokenKind::LBracket)?;
        let kind = self.in_delimiters(|p| {
            let low = if p.check(&TokenKind::Colon) { None } else { Some(Box::new(p.parse_expr()?)) };
            if !p.match_token(&TokenKind::Colon) {
                return match low {
                    Some(index) => Ok(ExprKind::Index { operand: Box::new(operand), index }),
                    None => Err(p.expected("expression")),
                };
            }
            let high = if matches!(p.current_kind(), TokenKind::Colon | TokenKind::RBracket) {
                None
            } else {
                Some(Box::new(p.parse_expr()?))
            };
            let max = if p.match_token(&TokenKind::Colon) {
                if high.is_none() {
                    return Err(ParseError::new("Middle index required in 3-index slice", p.current().span));
                }
                Some(Box::new(p.parse_expr()?))
            } else {
                None
            };
            Ok(ExprKind::Slice { operand: Box::new(operand), low, high, max })
        })?;
        self.expect(&TokenKind::RBracket)?;
        Ok(self.mk_expr(kind, start))
    }

    /// `{ elem, key: elem, {nested}, ... }`
    pub(crate) fn parse_literal_value(&mut self) -> Result<LiteralValue, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::LBrace)?;
        let elements = self.in_delimiters(|p| {
            let mut elements = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RBrace) && !p.at_end() {
                let elem_start = p.start();
                let first = p.parse_element_value()?;
                let (key, value) = if p.match_token(&TokenKind::Colon) {
                    (Some(first), p.parse_element_value()?)
                } else {
                    (None, first)
                };
                elements.push(Element { key, value, span: p.span_from(elem_start) });
                p.skip_newlines();
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
                p.skip_newlines();
            }
            Ok::<_, ParseError>(elements)
        })?;
        self.skip_newlines();
        self.expect(&TokenKind::RBrace)?;
        Ok(LiteralValue { elements, span: self.span_from(start) })
    }

    fn parse_element_value(&mut self) -> Result<ElementValue, ParseError> {
        if self.check(&TokenKind::LBrace) {
            Ok(ElementValue::Nested(self.parse_literal_value()?))
        } else {
            Ok(ElementValue::Expr(self.parse_expr()?))
        }
    }

    // =========================================================================
    // Primary
    // =========================================================================

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.start();
        if let Some(lit) = literal_of(self.current_kind()) {
            self.advance();
            return Ok(self.mk_expr(ExprKind::Literal(lit), start));
        }

        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                if matches!(self.peek(1), TokenKind::FatArrow) && self.allows(ParseContext::NO_ARROW_LAMBDA) {
                    return self.parse_arrow_lambda_single();
                }
                self.advance();
                Ok(self.mk_expr(ExprKind::Ident(name), start))
            }
            TokenKind::LParen => {
                if self.allows(ParseContext::NO_ARROW_LAMBDA) {
                    let params = self.speculate("arrow lambda", |p| {
                        p.advance();
                        let params = p.parse_lambda_params(&TokenKind::RParen).ok()?;
                        p.expect(&TokenKind::RParen).ok()?;
                        p.check(&TokenKind::FatArrow).then_some(params)
                    });
                    if let Some(params) = params {
                        self.expect(&TokenKind::FatArrow)?;
                        let body = self.parse_lambda_body()?;
                        let kind = ExprKind::Lambda { params, body, style: LambdaStyle::Arrow };
                        return Ok(self.mk_expr(kind, start));
                    }
                }
                self.advance();
                let inner = self.in_delimiters(|p| {
                    p.skip_newlines();
                    let inner = p.parse_expr()?;
                    p.skip_newlines();
                    Ok::<_, ParseError>(inner)
                })?;
                self.expect(&TokenKind::RParen)?;
                Ok(self.mk_expr(ExprKind::Paren(Box::new(inner)), start))
            }
            TokenKind::Func => {
                self.advance();
                let sig = self.parse_func_sig()?;
                if self.check(&TokenKind::LBrace) {
                    let body = self.parse_block()?;
                    Ok(self.mk_expr(ExprKind::FuncLit { sig, body }, start))
                } else {
                    let ty = self.mk_type(TypeKind::Func(sig), start);
                    Ok(self.mk_expr(ExprKind::TypeExpr(Box::new(ty)), start))
                }
            }
            TokenKind::Pipe | TokenKind::PipePipe => self.parse_pipe_lambda(),
            TokenKind::Match => self.parse_match(),
            TokenKind::LBracket
            | TokenKind::Map
            | TokenKind::Struct
            | TokenKind::Chan
            | TokenKind::Interface
            | TokenKind::Arrow => {
                let ty = self.parse_type()?;
                Ok(self.mk_expr(ExprKind::TypeExpr(Box::new(ty)), start))
            }
            TokenKind::Error(_) => {
                self.advance();
                Ok(self.mk_expr(ExprKind::Error, start))
            }
            _ => Ok(self.missing_operand()),
        }
    }

    /// Report the current token and stand an [`ExprKind::Error`] in for the
    /// operand that should have started here, so the enclosing call, list
    /// or statement keeps its shape.
    fn missing_operand(&mut self) -> Expr {
        let start = self.start();
        let error = self.expected("expression");
        self.record_error(error);
        if !closes_operand(self.current_kind()) {
            self.advance();
        }
        self.mk_expr(ExprKind::Error, start)
    }

    // =========================================================================
    // Lambdas
    // =========================================================================

    /// `x => body`
    fn parse_arrow_lambda_single(&mut self) -> Result<Expr, ParseError> {
        let start = self.start();
        let name = self.expect_ident()?;
        let span = name.span;
        let params = vec![LambdaParam { name, ty: None, span }];
        self.expect(&TokenKind::FatArrow)?;
        let body = self.parse_lambda_body()?;
        Ok(self.mk_expr(ExprKind::Lambda { params, body, style: LambdaStyle::Arrow }, start))
    }

    /// `|a, b: int| body` or `|| body`
    fn parse_pipe_lambda(&mut self) -> Result<Expr, ParseError> {
        let start = self.start();
        let params = if self.match_token(&TokenKind::PipePipe) {
            Vec::new()
        } else {
            self.expect(&TokenKind::Pipe)?;
            let params = self.parse_lambda_params(&TokenKind::Pipe)?;
            self.expect(&TokenKind::Pipe)?;
            params
        };
        let body = self.parse_lambda_body()?;
        Ok(self.mk_expr(ExprKind::Lambda { params, body, style: LambdaStyle::Pipe }, start))
    }

    /// `name [: Type]` entries up to (not including) `closing`.
    fn parse_lambda_params(&mut self, closing: &TokenKind) -> Result<Vec<LambdaParam>, ParseError> {
        self.in_delimiters(|p| {
            let mut params = Vec::new();
            while !p.check(closing) && !p.at_end() {
                let start = p.start();
                let name = p.expect_ident()?;
                let ty = if p.match_token(&TokenKind::Colon) { Some(p.parse_type()?) } else { None };
                params.push(LambdaParam { name, ty, span: p.span_from(start) });
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            Ok::<_, ParseError>(params)
        })
    }

    fn parse_lambda_body(&mut self) -> Result<ExprBody, ParseError> {
        if self.check(&TokenKind::LBrace) {
            Ok(ExprBody::Block(self.parse_block()?))
        } else {
            Ok(ExprBody::Expr(Box::new(self.parse_expr()?)))
        }
    }

    // =========================================================================
    // Match
    // =========================================================================

    /// `match subject { pattern [if guard] => body, ... }`
    fn parse_match(&mut self) -> Result<Expr, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::Match)?;
        let subject = self.with_context(ParseContext::NO_COMPOSITE_LIT, |p| p.parse_expr())?;
        self.expect(&TokenKind::LBrace)?;
        let arms = self.in_delimiters(|p| {
            let mut arms = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RBrace) && !p.at_end() && !p.halted {
                let before = p.pos;
                let arm_start = p.start();
                match p.parse_match_arm() {
                    Ok(arm) => arms.push(arm),
                    Err(e) => {
                        let keep_going = p.record_error(e);
                        p.skip_list_item(&TokenKind::RBrace);
                        if p.pos == before {
                            p.advance();
                        }
                        arms.push(p.error_arm(arm_start));
                        if !keep_going {
                            break;
                        }
                    }
                }
                p.skip_newlines();
            }
            arms
        });
        self.expect(&TokenKind::RBrace)?;
        Ok(self.mk_expr(ExprKind::Match { subject: Box::new(subject), arms }, start))
    }

    /// Placeholder for an arm skipped by recovery: an error pattern with an
    /// error body, both covering the skipped tokens.
    fn error_arm(&mut self, start: usize) -> MatchArm {
        let span = self.recovered_span(start);
        let pattern = Pattern { id: self.next_id(), kind: PatternKind::Error, span };
        let body = Expr { id: self.next_id(), kind: ExprKind::Error, span };
        MatchArm { pattern, guard: None, body: ExprBody::Expr(Box::new(body)), span }
    }

    fn parse_match_arm(&mut self) -> Result<MatchArm, ParseError> {
        let start = self.start();
        let pattern = self.parse_pattern()?;
        let guard = if self.match_token(&TokenKind::If) {
            Some(self.with_context(ParseContext::NO_ARROW_LAMBDA, |p| p.parse_expr())?)
        } else {
            None
        };
        self.expect(&TokenKind::FatArrow)?;
        let body = self.parse_lambda_body()?;
        let span = Span::new(start, body.span().end);
        if !self.match_token(&TokenKind::Comma)
            && !matches!(self.current_kind(), TokenKind::Newline | TokenKind::RBrace)
        {
            return Err(self.expected("',' or newline"));
        }
        Ok(MatchArm { pattern, guard, body, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dingo_ast::FileId;
    use dingo_lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Expr {
        let mut p = Parser::new(FileId(0), Lexer::new(src).tokenize().tokens);
        let expr = p.parse_expr().unwrap();
        assert!(p.errors.is_empty(), "{:?}", p.errors);
        expr
    }

    fn parse_in_header(src: &str) -> Expr {
        let mut p = Parser::new(FileId(0), Lexer::new(src).tokenize().tokens);
        p.with_context(ParseContext::NO_COMPOSITE_LIT, |p| p.parse_expr()).unwrap()
    }

    /// Fully parenthesized rendering, for precedence checks.
    fn sexp(e: &Expr) -> String {
        match &e.kind {
            ExprKind::Ident(n) => n.clone(),
            ExprKind::Literal(Literal::Int { digits, .. }) => digits.clone(),
            ExprKind::Binary { op, left, right } => format!("({} {} {})", sexp(left), op.symbol(), sexp(right)),
            ExprKind::NullCoalesce { left, right } => format!("({} ?? {})", sexp(left), sexp(right)),
            ExprKind::Unary { op, operand } => format!("({}{})", op.symbol(), sexp(operand)),
            ExprKind::ErrorProp(inner) => format!("{}?", sexp(inner)),
            ExprKind::Selector { operand, field } => format!("{}.{}", sexp(operand), field.name),
            ExprKind::SafeNav { operand, field } => format!("{}?.{}", sexp(operand), field.name),
            ExprKind::Call { func, args, .. } => {
                let args: Vec<_> = args.iter().map(sexp).collect();
                format!("{}({})", sexp(func), args.join(", "))
            }
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn precedence_tiers() {
        assert_eq!(sexp(&parse("a || b && c")), "(a || (b && c))");
        assert_eq!(sexp(&parse("a ?? b || c")), "((a ?? b) || c)");
        assert_eq!(sexp(&parse("a && b ?? c")), "(a && (b ?? c))");
        assert_eq!(sexp(&parse("a ?? b == c")), "(a ?? (b == c))");
        assert_eq!(sexp(&parse("a == b + c")), "(a == (b + c))");
        assert_eq!(sexp(&parse("a | b * c")), "(a | (b * c))");
        assert_eq!(sexp(&parse("a &^ b << c")), "((a &^ b) << c)");
    }

    #[test]
    fn binary_operators_associate_left() {
        assert_eq!(sexp(&parse("a - b - c")), "((a - b) - c)");
        assert_eq!(sexp(&parse("a ?? b ?? c")), "((a ?? b) ?? c)");
    }

    #[test]
    fn unary_and_postfix_binding() {
        assert_eq!(sexp(&parse("-a * b")), "((-a) * b)");
        assert_eq!(sexp(&parse("!f(x)?")), "(!f(x)?)");
        assert_eq!(sexp(&parse("<-ch + 1")), "((<-ch) + 1)");
        assert_eq!(sexp(&parse("a?.b.c?")), "a?.b.c?");
    }

    #[test]
    fn binary_span_covers_operands() {
        let e = parse("a  +  bc");
        assert_eq!(e.span, Span::new(0, 8));
    }

    #[test]
    fn generic_call_and_index() {
        let e = parse("Map[int, string](xs, f)");
        let ExprKind::Call { type_args, args, .. } = &e.kind else { panic!("{e:?}") };
        assert_eq!(type_args.len(), 2);
        assert_eq!(args.len(), 2);

        let e = parse("a[i]");
        assert!(matches!(e.kind, ExprKind::Index { .. }));
        let e = parse("a[i+1]");
        assert!(matches!(e.kind, ExprKind::Index { .. }));
    }

    #[test]
    fn slices() {
        let ExprKind::Slice { low, high, max, .. } = parse("s[:]").kind else { panic!() };
        assert!(low.is_none() && high.is_none() && max.is_none());
        let ExprKind::Slice { low, high, max, .. } = parse("s[1:n:cap]").kind else { panic!() };
        assert!(low.is_some() && high.is_some() && max.is_some());
    }

    #[test]
    fn composite_literals() {
        let e = parse("Point{X: 1, Y: 2}");
        let ExprKind::CompositeLit { ty, body } = &e.kind else { panic!("{e:?}") };
        assert!(matches!(ty.kind, TypeKind::Name(_)));
        assert_eq!(body.elements.len(), 2);
        assert!(body.elements[0].key.is_some());

        let e = parse("[][]int{{1, 2}, {3}}");
        let ExprKind::CompositeLit { body, .. } = &e.kind else { panic!("{e:?}") };
        assert!(matches!(body.elements[0].value, ElementValue::Nested(_)));

        let e = parse("Pair[int, string]{1, \"a\"}");
        let ExprKind::CompositeLit { ty, .. } = &e.kind else { panic!("{e:?}") };
        assert!(matches!(ty.kind, TypeKind::Generic { .. }));
    }

    #[test]
    fn header_context_blocks_named_composites() {
        let e = parse_in_header("x == T {");
        assert!(matches!(e.kind, ExprKind::Binary { .. }));
        let e = parse_in_header("[]int{1}");
        assert!(matches!(e.kind, ExprKind::CompositeLit { .. }));
        let e = parse_in_header("f(T{})");
        assert!(matches!(e.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn type_assertions() {
        let e = parse("x.(io.Reader)");
        assert!(matches!(&e.kind, ExprKind::TypeAssert { ty: Some(_), .. }));
        let e = parse("x.(type)");
        assert!(matches!(&e.kind, ExprKind::TypeAssert { ty: None, .. }));
    }

    #[test]
    fn lambdas() {
        let e = parse("|x, y: int| x + y");
        let ExprKind::Lambda { params, style, .. } = &e.kind else { panic!("{e:?}") };
        assert_eq!(*style, LambdaStyle::Pipe);
        assert_eq!(params.len(), 2);
        assert!(params[1].ty.is_some());

        let e = parse("(a, b) => a * b");
        assert!(matches!(&e.kind, ExprKind::Lambda { style: LambdaStyle::Arrow, params, .. } if params.len() == 2));

        let e = parse("x => { return x }");
        assert!(matches!(&e.kind, ExprKind::Lambda { body: ExprBody::Block(_), .. }));

        let e = parse("|| 1");
        assert!(matches!(&e.kind, ExprKind::Lambda { params, .. } if params.is_empty()));

        let e = parse("(a) + 1");
        assert!(matches!(e.kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn func_literal_and_type() {
        assert!(matches!(parse("func(x int) int { return x }").kind, ExprKind::FuncLit { .. }));
        assert!(matches!(parse("func(int) int").kind, ExprKind::TypeExpr(_)));
    }

    #[test]
    fn conversions_use_type_expressions() {
        let e = parse("[]byte(s)");
        let ExprKind::Call { func, .. } = &e.kind else { panic!("{e:?}") };
        assert!(matches!(func.kind, ExprKind::TypeExpr(_)));
        let e = parse("make(chan int, 1)");
        let ExprKind::Call { args, .. } = &e.kind else { panic!() };
        assert!(matches!(args[0].kind, ExprKind::TypeExpr(_)));
    }

    #[test]
    fn spread_call() {
        let ExprKind::Call { spread, args, .. } = parse("append(a, b...)").kind else { panic!() };
        assert!(spread);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn match_arms_with_guards() {
        let src = "match r {\n\tOk(v) if v > 0 => v,\n\tOk(_) => 0\n\tErr(e) => { return e }\n}";
        let e = parse(src);
        let ExprKind::Match { arms, .. } = &e.kind else { panic!("{e:?}") };
        assert_eq!(arms.len(), 3);
        assert!(arms[0].guard.is_some());
        assert!(matches!(arms[1].pattern.kind, PatternKind::Variant { .. }));
        assert!(matches!(arms[2].body, ExprBody::Block(_)));
    }

    #[test]
    fn empty_match_is_legal() {
        let ExprKind::Match { arms, .. } = parse("match x {}").kind else { panic!() };
        assert!(arms.is_empty());
    }

    #[test]
    fn guard_does_not_start_lambda() {
        let e = parse("match x { n if ok => n }");
        let ExprKind::Match { arms, .. } = &e.kind else { panic!() };
        assert!(matches!(arms[0].guard.as_ref().map(|g| &g.kind), Some(ExprKind::Ident(_))));
    }

    fn parse_with_errors(src: &str) -> (Expr, Vec<ParseError>) {
        let mut p = Parser::new(FileId(0), Lexer::new(src).tokenize().tokens);
        let expr = p.parse_expr().unwrap();
        (expr, p.errors)
    }

    #[test]
    fn bad_arm_leaves_a_placeholder() {
        let (e, errors) = parse_with_errors("match x { 1 => a, + => b, 3 => c }");
        let ExprKind::Match { arms, .. } = &e.kind else { panic!() };
        assert_eq!(arms.len(), 3);
        assert_eq!(errors.len(), 1);
        assert!(arms[1].is_error());
        assert!(matches!(&arms[1].body, ExprBody::Expr(body) if body.is_error()));
        assert_eq!(arms[1].span, Span::new(18, 24));
        assert!(!arms[2].is_error());
    }

    #[test]
    fn missing_operand_becomes_error_node() {
        let (e, errors) = parse_with_errors("a + ) ");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Expected expression, found ')'");
        let ExprKind::Binary { right, .. } = &e.kind else { panic!("{e:?}") };
        assert!(right.is_error());
        assert_eq!(right.span, Span::empty_at(4));
    }

    #[test]
    fn missing_argument_keeps_the_call() {
        let (e, errors) = parse_with_errors("f(a, , c)");
        assert_eq!(errors.len(), 1);
        let ExprKind::Call { args, .. } = &e.kind else { panic!("{e:?}") };
        assert_eq!(args.len(), 3);
        assert!(args[1].is_error());
        assert!(matches!(&args[2].kind, ExprKind::Ident(n) if n == "c"));
    }

    #[test]
    fn unexpected_keyword_is_skipped() {
        let (e, errors) = parse_with_errors("a * var");
        assert_eq!(errors.len(), 1);
        let ExprKind::Binary { right, .. } = &e.kind else { panic!("{e:?}") };
        assert!(right.is_error());
        assert_eq!(right.span, Span::new(4, 7));
    }

    #[test]
    fn empty_index_is_reported_once() {
        // `m[]` is not an instantiation; only the index path reports it.
        let (e, errors) = parse_with_errors("m[](x)");
        assert_eq!(errors.len(), 1);
        let ExprKind::Call { func, .. } = &e.kind else { panic!("{e:?}") };
        let ExprKind::Index { index, .. } = &func.kind else { panic!("{func:?}") };
        assert!(index.is_error());
    }

    #[test]
    fn node_ids_are_unique_and_children_first() {
        let e = parse("f(a, b) + c");
        let ExprKind::Binary { left, right, .. } = &e.kind else { panic!() };
        assert!(left.id < e.id);
        assert!(right.id < e.id);
        assert_ne!(left.id, right.id);
    }
}
