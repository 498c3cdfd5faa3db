// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statements and blocks.

use dingo_ast::expr::{Expr, ExprKind};
use dingo_ast::stmt::{
    AssignOp, Block, CaseClause, CommClause, ElseBranch, ForHeader, ForStmt, IfStmt, Stmt,
    StmtKind, SwitchStmt,
};
use dingo_ast::token::TokenKind;
use dingo_ast::{Ident, Span};

use crate::error::ParseError;
use crate::parser::Parser;
use crate::resolver::ParseContext;

/// A simple statement, or the range clause only a `for` header may hold.
pub(crate) enum Simple {
    Stmt(Stmt),
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        iter: Expr,
    },
}

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Rem,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::LtLtEq => AssignOp::Shl,
        TokenKind::GtGtEq => AssignOp::Shr,
        TokenKind::AmpCaretEq => AssignOp::AndNot,
        _ => return None,
    })
}

impl Parser {
    pub(crate) fn mk_stmt(&mut self, kind: StmtKind, start: usize) -> Stmt {
        let span = self.span_from(start);
        Stmt { id: self.next_id(), kind, span }
    }

    /// `{ stmts }`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.nested(|p| {
            let start = p.start();
            p.expect(&TokenKind::LBrace)?;
            let stmts = p.in_delimiters(|p| p.parse_stmt_list(false));
            p.expect(&TokenKind::RBrace)?;
            Ok(Block { stmts, span: p.span_from(start) })
        })
    }

    /// Statements up to a closing `}`, or, in a case body, up to the next
    /// `case` or `default`. A statement that fails to parse becomes
    /// [`StmtKind::Bad`] and parsing resumes at the next statement.
    fn parse_stmt_list(&mut self, case_body: bool) -> Vec<Stmt> {
        let ends_list = |kind: &TokenKind| match kind {
            TokenKind::RBrace | TokenKind::Eof => true,
            TokenKind::Case | TokenKind::Default => case_body,
            _ => false,
        };
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if ends_list(self.current_kind()) || self.halted {
                break;
            }

            let start = self.start();
            let before = self.pos;
            match self.parse_stmt() {
                Ok(stmt) => {
                    stmts.push(stmt);
                    if let Err(e) = self.expect_stmt_end(ends_list) {
                        if !self.record_error(e) {
                            break;
                        }
                        self.synchronize_in_block();
                    }
                }
                Err(e) => {
                    let keep_going = self.record_error(e);
                    self.synchronize_in_block();
                    if self.pos == before {
                        self.advance();
                    }
                    let bad = self.mk_stmt(StmtKind::Bad, start);
                    stmts.push(bad);
                    if !keep_going {
                        break;
                    }
                }
            }
        }
        stmts
    }

    /// One statement, without its terminator.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        match self.current_kind() {
            TokenKind::Semi => Ok(Stmt { id: self.next_id(), kind: StmtKind::Empty, span: Span::empty_at(start) }),
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                Ok(self.mk_stmt(StmtKind::Block(block), start))
            }
            TokenKind::Return => {
                self.advance();
                let values = if self.at_stmt_end() { Vec::new() } else { self.parse_expr_list()? };
                Ok(self.mk_stmt(StmtKind::Return(values), start))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Select => self.parse_select(),
            TokenKind::Go => {
                self.advance();
                let call = self.parse_expr()?;
                Ok(self.mk_stmt(StmtKind::Go(call), start))
            }
            TokenKind::Defer => {
                self.advance();
                let call = self.parse_expr()?;
                Ok(self.mk_stmt(StmtKind::Defer(call), start))
            }
            TokenKind::Break => {
                self.advance();
                let label = self.optional_label();
                Ok(self.mk_stmt(StmtKind::Break(label), start))
            }
            TokenKind::Continue => {
                self.advance();
                let label = self.optional_label();
                Ok(self.mk_stmt(StmtKind::Continue(label), start))
            }
            TokenKind::Goto => {
                self.advance();
                let label = self.expect_ident()?;
                Ok(self.mk_stmt(StmtKind::Goto(label), start))
            }
            TokenKind::Fallthrough => {
                self.advance();
                Ok(self.mk_stmt(StmtKind::Fallthrough, start))
            }
            TokenKind::Var | TokenKind::Const | TokenKind::Type | TokenKind::Let | TokenKind::Enum => {
                let decl = self.parse_local_decl()?;
                Ok(self.mk_stmt(StmtKind::Decl(Box::new(decl)), start))
            }
            TokenKind::Ident(_) if matches!(self.peek(1), TokenKind::Colon) => self.parse_labeled(),
            _ => match self.parse_simple_stmt(false)? {
                Simple::Stmt(stmt) => Ok(stmt),
                Simple::Range { .. } => Err(ParseError::new("'range' is only allowed in a for loop header", self.span_from(start))),
            },
        }
    }

    fn at_stmt_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Semi | TokenKind::RBrace | TokenKind::RParen | TokenKind::Eof
        )
    }

    fn optional_label(&mut self) -> Option<Ident> {
        if self.check_ident() {
            self.expect_ident().ok()
        } else {
            None
        }
    }

    /// `label: stmt`
    fn parse_labeled(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        let label = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        self.skip_newlines();
        let stmt = if self.check(&TokenKind::RBrace) {
            let at = self.prev_end();
            Stmt { id: self.next_id(), kind: StmtKind::Empty, span: Span::empty_at(at) }
        } else {
            self.parse_stmt()?
        };
        Ok(self.mk_stmt(StmtKind::Labeled { label, stmt: Box::new(stmt) }, start))
    }

    /// Expression, send, inc/dec, assignment or short variable declaration.
    /// With `allow_range`, also the range clause of a `for` header.
    pub(crate) fn parse_simple_stmt(&mut self, allow_range: bool) -> Result<Simple, ParseError> {
        let start = self.start();
        if allow_range && self.match_token(&TokenKind::Range) {
            let iter = self.parse_expr()?;
            return Ok(Simple::Range { key: None, value: None, define: false, iter });
        }

        let mut lhs = self.parse_expr_list()?;
        let kind = match self.current_kind().clone() {
            TokenKind::ColonEq => {
                self.advance();
                if allow_range && self.match_token(&TokenKind::Range) {
                    return self.finish_range(lhs, true);
                }
                let names = lhs
                    .into_iter()
                    .map(|e| match e.kind {
                        ExprKind::Ident(name) => Ok(Ident::new(name, e.span)),
                        // Already reported where the operand went missing.
                        ExprKind::Error => Ok(Ident::missing(e.span)),
                        _ => Err(ParseError::new("Expected name on the left of ':='", e.span)
                            .with_hint("use '=' to assign to an existing location")),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let values = self.parse_expr_list()?;
                StmtKind::ShortVarDecl { names, values }
            }
            kind if assign_op(&kind).is_some() => {
                let op = assign_op(&kind).unwrap_or(AssignOp::Assign);
                self.advance();
                if allow_range && op == AssignOp::Assign && self.match_token(&TokenKind::Range) {
                    return self.finish_range(lhs, false);
                }
                let values = self.parse_expr_list()?;
                StmtKind::Assign { targets: lhs, op, values }
            }
            TokenKind::Arrow => {
                let channel = self.single(&mut lhs, "'<-'")?;
                self.advance();
                let value = self.parse_expr()?;
                StmtKind::Send { channel, value }
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let increment = matches!(self.current_kind(), TokenKind::PlusPlus);
                let target = self.single(&mut lhs, "'++' or '--'")?;
                self.advance();
                StmtKind::IncDec { target, increment }
            }
            _ => {
                if lhs.len() > 1 {
                    return Err(self.expected("':=' or '='"));
                }
                let expr = self.single(&mut lhs, "expression")?;
                StmtKind::Expr(expr)
            }
        };
        Ok(Simple::Stmt(self.mk_stmt(kind, start)))
    }

    /// The one expression of a list that must not have more.
    fn single(&self, lhs: &mut Vec<Expr>, context: &str) -> Result<Expr, ParseError> {
        if lhs.len() != 1 {
            let span = lhs.first().map(|e| e.span).unwrap_or_else(|| self.current().span);
            return Err(ParseError::new(format!("Expected a single expression before {context}"), span));
        }
        lhs.pop().ok_or_else(|| self.expected("expression"))
    }

    fn finish_range(&mut self, lhs: Vec<Expr>, define: bool) -> Result<Simple, ParseError> {
        if lhs.len() > 2 {
            return Err(ParseError::new("A range clause binds at most two values", lhs[2].span));
        }
        let mut targets = lhs.into_iter();
        let key = targets.next();
        let value = targets.next();
        let iter = self.parse_expr()?;
        Ok(Simple::Range { key, value, define, iter })
    }

    fn header_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        match self.parse_simple_stmt(false)? {
            Simple::Stmt(stmt) => Ok(stmt),
            Simple::Range { .. } => Err(ParseError::new("Unexpected range clause", self.span_from(start))),
        }
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    /// `if [init;] cond { } [else if ... | else { }]`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::If)?;
        let (init, cond) = self.with_context(ParseContext::NO_COMPOSITE_LIT, |p| {
            let first = p.header_stmt()?;
            if p.match_token(&TokenKind::Semi) {
                let cond = p.parse_expr()?;
                return Ok((Some(Box::new(first)), cond));
            }
            match first.kind {
                StmtKind::Expr(cond) => Ok((None, cond)),
                _ => Err(ParseError::new("Missing condition in if statement", first.span)
                    .with_hint("write the condition after ';': if x := f(); x > 0 { ... }")),
            }
        })?;
        let then_block = self.parse_block()?;

        let else_branch = if self.match_token(&TokenKind::Else) {
            match self.current_kind() {
                TokenKind::If => Some(ElseBranch::If(Box::new(self.parse_if()?))),
                TokenKind::LBrace => Some(ElseBranch::Block(self.parse_block()?)),
                _ => return Err(self.expected("'if' or '{'")),
            }
        } else {
            None
        };
        Ok(self.mk_stmt(StmtKind::If(IfStmt { init, cond, then_block, else_branch }), start))
    }

    /// `for { }`, `for cond { }`, `for init; cond; post { }`, `for k, v := range x { }`
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::For)?;
        let header = if self.check(&TokenKind::LBrace) {
            ForHeader::Infinite
        } else {
            self.with_context(ParseContext::NO_COMPOSITE_LIT, |p| {
                let init = if p.check(&TokenKind::Semi) {
                    None
                } else {
                    match p.parse_simple_stmt(true)? {
                        Simple::Range { key, value, define, iter } => {
                            return Ok(ForHeader::Range { key, value, define, iter });
                        }
                        Simple::Stmt(stmt) if !p.check(&TokenKind::Semi) => {
                            return match stmt.kind {
                                StmtKind::Expr(cond) => Ok(ForHeader::Cond(cond)),
                                _ => Err(p.expected("';'")),
                            };
                        }
                        Simple::Stmt(stmt) => Some(Box::new(stmt)),
                    }
                };
                p.expect(&TokenKind::Semi)?;
                let cond = if p.check(&TokenKind::Semi) { None } else { Some(p.parse_expr()?) };
                p.expect(&TokenKind::Semi)?;
                let post = if p.check(&TokenKind::LBrace) { None } else { Some(Box::new(p.header_stmt()?)) };
                Ok(ForHeader::Clause { init, cond, post })
            })?
        };
        let body = self.parse_block()?;
        Ok(self.mk_stmt(StmtKind::For(ForStmt { header, body }), start))
    }

    /// `switch [init;] [tag] { cases }`, including the type switch
    /// `switch v := x.(type) { ... }`.
    fn parse_switch(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::Switch)?;
        let (init, binding, tag) = self.with_context(ParseContext::NO_COMPOSITE_LIT, |p| {
            if p.check(&TokenKind::LBrace) {
                return Ok((None, None, None));
            }
            let mut init = None;
            let first = if p.match_token(&TokenKind::Semi) {
                None
            } else {
                let stmt = p.header_stmt()?;
                if p.match_token(&TokenKind::Semi) {
                    init = Some(Box::new(stmt));
                    None
                } else {
                    Some(stmt)
                }
            };
            let guard = match first {
                Some(stmt) => Some(stmt),
                None if p.check(&TokenKind::LBrace) => None,
                None => Some(p.header_stmt()?),
            };
            let (binding, tag) = match guard.map(|s| (s.kind, s.span)) {
                None => (None, None),
                Some((StmtKind::Expr(tag), _)) => (None, Some(tag)),
                Some((StmtKind::ShortVarDecl { mut names, mut values }, _))
                    if names.len() == 1
                        && values.len() == 1
                        && matches!(values[0].kind, ExprKind::TypeAssert { ty: None, .. }) =>
                {
                    (names.pop(), values.pop())
                }
                Some((_, span)) => {
                    return Err(ParseError::new("Expected switch expression", span)
                        .with_hint("a switch header is an expression or 'v := x.(type)'"));
                }
            };
            Ok((init, binding, tag))
        })?;

        self.expect(&TokenKind::LBrace)?;
        let cases = self.in_delimiters(|p| p.parse_case_clauses());
        self.expect(&TokenKind::RBrace)?;
        Ok(self.mk_stmt(StmtKind::Switch(SwitchStmt { init, binding, tag, cases }), start))
    }

    fn parse_case_clauses(&mut self) -> Vec<CaseClause> {
        let mut cases = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::RBrace) && !self.at_end() && !self.halted {
            let before = self.pos;
            match self.parse_case_clause() {
                Ok(case) => cases.push(case),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize_in_block();
                    if self.pos == before {
                        self.advance();
                    }
                }
            }
            self.skip_newlines();
        }
        cases
    }

    fn parse_case_clause(&mut self) -> Result<CaseClause, ParseError> {
        let start = self.start();
        let (exprs, is_default) = match self.current_kind() {
            TokenKind::Case => {
                self.advance();
                (self.parse_expr_list()?, false)
            }
            TokenKind::Default => {
                self.advance();
                (Vec::new(), true)
            }
            _ => return Err(self.expected("'case' or 'default'")),
        };
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_stmt_list(true);
        Ok(CaseClause { exprs, is_default, body, span: self.span_from(start) })
    }

    /// `select { case comm: ... default: ... }`
    fn parse_select(&mut self) -> Result<Stmt, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::Select)?;
        self.expect(&TokenKind::LBrace)?;
        let clauses = self.in_delimiters(|p| {
            let mut clauses = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RBrace) && !p.at_end() && !p.halted {
                let before = p.pos;
                match p.parse_comm_clause() {
                    Ok(clause) => clauses.push(clause),
                    Err(e) => {
                        if !p.record_error(e) {
                            break;
                        }
                        p.synchronize_in_block();
                        if p.pos == before {
                            p.advance();
                        }
                    }
                }
                p.skip_newlines();
            }
            clauses
        });
        self.expect(&TokenKind::RBrace)?;
        Ok(self.mk_stmt(StmtKind::Select(clauses), start))
    }

    fn parse_comm_clause(&mut self) -> Result<CommClause, ParseError> {
        let start = self.start();
        let comm = match self.current_kind() {
            TokenKind::Case => {
                self.advance();
                Some(Box::new(self.header_stmt()?))
            }
            TokenKind::Default => {
                self.advance();
                None
            }
            _ => return Err(self.expected("'case' or 'default'")),
        };
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_stmt_list(true);
        Ok(CommClause { comm, body, span: self.span_from(start) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dingo_ast::decl::DeclKind;
    use dingo_ast::FileId;
    use dingo_lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn block(src: &str) -> (Block, Vec<ParseError>) {
        let mut p = Parser::new(FileId(0), Lexer::new(src).tokenize().tokens);
        let block = p.parse_block().unwrap();
        (block, p.errors)
    }

    fn stmts(src: &str) -> Vec<Stmt> {
        let (block, errors) = block(src);
        assert!(errors.is_empty(), "{errors:?}");
        block.stmts
    }

    fn one(src: &str) -> StmtKind {
        let mut stmts = stmts(&format!("{{\n{src}\n}}"));
        assert_eq!(stmts.len(), 1, "{stmts:?}");
        stmts.remove(0).kind
    }

    #[test]
    fn simple_statements() {
        assert!(matches!(one("x := 1"), StmtKind::ShortVarDecl { names, .. } if names.len() == 1));
        assert!(matches!(one("a, b = b, a"), StmtKind::Assign { op: AssignOp::Assign, targets, .. } if targets.len() == 2));
        assert!(matches!(one("x <<= 2"), StmtKind::Assign { op: AssignOp::Shl, .. }));
        assert!(matches!(one("ch <- v"), StmtKind::Send { .. }));
        assert!(matches!(one("i++"), StmtKind::IncDec { increment: true, .. }));
        assert!(matches!(one("f(x)"), StmtKind::Expr(_)));
    }

    #[test]
    fn short_var_decl_requires_names() {
        let (block, errors) = block("{\na.b := 1\n}");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Expected name on the left of ':='");
        assert_eq!(block.stmts[0].kind, StmtKind::Bad);
    }

    #[test]
    fn if_with_init_and_else_chain() {
        let StmtKind::If(stmt) = one("if x := f(); x > 0 {\n} else if y {\n} else {\n}") else { panic!() };
        assert!(stmt.init.is_some());
        let Some(ElseBranch::If(inner)) = &stmt.else_branch else { panic!() };
        let StmtKind::If(inner) = &inner.kind else { panic!() };
        assert!(matches!(inner.else_branch, Some(ElseBranch::Block(_))));
    }

    #[test]
    fn if_header_stops_at_brace() {
        let StmtKind::If(stmt) = one("if v == T {\n}") else { panic!() };
        assert!(matches!(stmt.cond.kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn for_headers() {
        assert!(matches!(one("for {\n}"), StmtKind::For(ForStmt { header: ForHeader::Infinite, .. })));
        assert!(matches!(one("for x < 10 {\n}"), StmtKind::For(ForStmt { header: ForHeader::Cond(_), .. })));
        let StmtKind::For(f) = one("for i := 0; i < n; i++ {\n}") else { panic!() };
        assert!(matches!(f.header, ForHeader::Clause { init: Some(_), cond: Some(_), post: Some(_) }));
        let StmtKind::For(f) = one("for ;; {\n}") else { panic!() };
        assert!(matches!(f.header, ForHeader::Clause { init: None, cond: None, post: None }));
    }

    #[test]
    fn range_forms() {
        let StmtKind::For(f) = one("for k, v := range m {\n}") else { panic!() };
        assert!(matches!(f.header, ForHeader::Range { key: Some(_), value: Some(_), define: true, .. }));
        let StmtKind::For(f) = one("for i = range xs {\n}") else { panic!() };
        assert!(matches!(f.header, ForHeader::Range { key: Some(_), value: None, define: false, .. }));
        let StmtKind::For(f) = one("for range ch {\n}") else { panic!() };
        assert!(matches!(f.header, ForHeader::Range { key: None, value: None, .. }));
    }

    #[test]
    fn switch_forms() {
        let StmtKind::Switch(s) = one("switch x := f(); x {\ncase 1, 2:\n\ty()\ncase 3:\ndefault:\n}") else { panic!() };
        assert!(s.init.is_some());
        assert!(s.tag.is_some());
        assert_eq!(s.cases.len(), 3);
        assert_eq!(s.cases[0].exprs.len(), 2);
        assert_eq!(s.cases[0].body.len(), 1);
        assert!(s.cases[2].is_default);

        let StmtKind::Switch(s) = one("switch {\ncase x > 1:\n}") else { panic!() };
        assert!(s.tag.is_none());
    }

    #[test]
    fn type_switch_binding() {
        let StmtKind::Switch(s) = one("switch v := x.(type) {\ncase int, string:\ncase []byte:\n}") else { panic!() };
        assert_eq!(s.binding.map(|b| b.name), Some("v".to_string()));
        assert!(matches!(s.tag.map(|t| t.kind), Some(ExprKind::TypeAssert { ty: None, .. })));
    }

    #[test]
    fn select_clauses() {
        let StmtKind::Select(clauses) = one("select {\ncase v := <-ch:\n\tuse(v)\ncase out <- 1:\ndefault:\n}") else { panic!() };
        assert_eq!(clauses.len(), 3);
        assert!(matches!(clauses[0].comm.as_deref().map(|s| &s.kind), Some(StmtKind::ShortVarDecl { .. })));
        assert!(matches!(clauses[1].comm.as_deref().map(|s| &s.kind), Some(StmtKind::Send { .. })));
        assert!(clauses[2].comm.is_none());
    }

    #[test]
    fn jumps_and_labels() {
        let stmts = stmts("{\nouter:\n\tfor {\n\t\tbreak outer\n\t}\n\tcontinue\n\tgoto outer\n}");
        assert!(matches!(&stmts[0].kind, StmtKind::Labeled { label, stmt } if label.name == "outer" && matches!(stmt.kind, StmtKind::For(_))));
        assert!(matches!(stmts[1].kind, StmtKind::Continue(None)));
        assert!(matches!(stmts[2].kind, StmtKind::Goto(_)));
    }

    #[test]
    fn local_declarations() {
        let StmtKind::Decl(decl) = one("let x: int = 5") else { panic!() };
        assert!(matches!(decl.kind, DeclKind::Let(_)));
        let StmtKind::Decl(decl) = one("var a, b int") else { panic!() };
        assert!(matches!(decl.kind, DeclKind::Var(_)));
    }

    #[test]
    fn empty_statements_and_semicolons() {
        let stmts = stmts("{ a(); ; b() }");
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[1].kind, StmtKind::Empty);
    }

    #[test]
    fn statement_span_excludes_terminator() {
        let stmts = stmts("{\nreturn a, b\n}");
        assert_eq!(stmts[0].span, Span::new(2, 13));
    }

    #[test]
    fn recovery_keeps_later_statements() {
        let (block, errors) = block("{\nx := )\ny := 2\nz := ]\nw := 4\n}");
        assert_eq!(errors.len(), 2);
        let placeholders: Vec<_> = block
            .stmts
            .iter()
            .map(|s| matches!(&s.kind, StmtKind::ShortVarDecl { values, .. } if values[0].is_error()))
            .collect();
        assert_eq!(placeholders, vec![true, false, true, false]);
    }

    #[test]
    fn unparsable_statement_becomes_bad() {
        let (block, errors) = block("{\nx := 1\nfor ; {\n}\ny := 2\n}");
        assert_eq!(errors.len(), 1);
        let bad: Vec<_> = block.stmts.iter().map(|s| matches!(s.kind, StmtKind::Bad)).collect();
        assert_eq!(bad, vec![false, true, false]);
    }

    #[test]
    fn stray_closer_is_one_error() {
        let (block, errors) = block("{\n)\nx := 1\n}");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Expected expression, found ')'");
        assert!(matches!(&block.stmts[0].kind, StmtKind::Expr(e) if e.is_error()));
        assert!(matches!(block.stmts[1].kind, StmtKind::ShortVarDecl { .. }));
    }

    #[test]
    fn missing_terminator_keeps_statement() {
        let (block, errors) = block("{\nx := 1 y := 2\n}");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Expected ';' or newline"));
        assert!(matches!(block.stmts[0].kind, StmtKind::ShortVarDecl { .. }));
    }
}
