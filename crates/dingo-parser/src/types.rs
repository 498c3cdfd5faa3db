// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type grammar: named, composite, function and channel types, parameter
//! lists, type parameters and constraints.

use dingo_ast::token::TokenKind;
use dingo_ast::ty::{
    ArrayLen, ChanDir, FieldDecl, FuncSig, InterfaceElem, Param, Type, TypeKind, TypeParam,
};
use dingo_ast::{Ident, Span};

use crate::error::ParseError;
use crate::parser::Parser;

/// One comma-separated entry of a parameter list before grouping.
enum ParamEntry {
    /// A lone name: either a parameter awaiting its type, or a type name.
    Bare(Ident),
    Named { name: Ident, ty: Type, variadic: bool, span: Span },
    Typed { ty: Type, variadic: bool, span: Span },
}

impl Parser {
    pub(crate) fn mk_type(&mut self, kind: TypeKind, start: usize) -> Type {
        let span = self.span_from(start);
        Type { id: self.next_id(), kind, span }
    }

    pub(crate) fn error_type(&mut self, span: Span) -> Type {
        Type { id: self.next_id(), kind: TypeKind::Error, span }
    }

    /// True if the current token can begin a type.
    pub(crate) fn at_type_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Ident(_)
            | TokenKind::Star
            | TokenKind::LBracket
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Func
            | TokenKind::Struct
            | TokenKind::Interface
            | TokenKind::LParen => true,
            TokenKind::Arrow => matches!(self.peek(1), TokenKind::Chan),
            _ => false,
        }
    }

    pub fn parse_type(&mut self) -> Result<Type, ParseError> {
        self.nested(|p| p.parse_type_inner())
    }

    fn parse_type_inner(&mut self) -> Result<Type, ParseError> {
        let start = self.start();
        match self.current_kind().clone() {
            TokenKind::Ident(_) => self.parse_named_type(),
            TokenKind::Star => {
                self.advance();
                let inner = self.parse_type()?;
                Ok(self.mk_type(TypeKind::Pointer(Box::new(inner)), start))
            }
            TokenKind::LBracket => self.parse_array_or_slice_type(),
            TokenKind::Map => {
                self.advance();
                self.expect(&TokenKind::LBracket)?;
                let key = self.in_delimiters(|p| p.parse_type())?;
                self.expect(&TokenKind::RBracket)?;
                let value = self.parse_type()?;
                Ok(self.mk_type(TypeKind::Map { key: Box::new(key), value: Box::new(value) }, start))
            }
            TokenKind::Chan => {
                self.advance();
                let dir = if self.match_token(&TokenKind::Arrow) { ChanDir::Send } else { ChanDir::Both };
                let elem = self.parse_type()?;
                Ok(self.mk_type(TypeKind::Chan { dir, elem: Box::new(elem) }, start))
            }
            TokenKind::Arrow if matches!(self.peek(1), TokenKind::Chan) => {
                self.advance();
                self.advance();
                let elem = self.parse_type()?;
                Ok(self.mk_type(TypeKind::Chan { dir: ChanDir::Recv, elem: Box::new(elem) }, start))
            }
            TokenKind::Func => {
                self.advance();
                let sig = self.parse_func_sig()?;
                Ok(self.mk_type(TypeKind::Func(sig), start))
            }
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Interface => self.parse_interface_type(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.in_delimiters(|p| p.parse_type())?;
                self.expect(&TokenKind::RParen)?;
                Ok(self.mk_type(TypeKind::Paren(Box::new(inner)), start))
            }
            TokenKind::Error(_) => {
                self.advance();
                Ok(self.mk_type(TypeKind::Error, start))
            }
            _ => Err(self.expected("type")),
        }
    }

    /// `Name`, `pkg.Name`, optionally instantiated: `Name[A, B]`.
    fn parse_named_type(&mut self) -> Result<Type, ParseError> {
        let start = self.start();
        let first = self.expect_ident()?;
        let base = if self.check(&TokenKind::Dot) && matches!(self.peek(1), TokenKind::Ident(_)) {
            self.advance();
            let name = self.expect_ident()?;
            self.mk_type(TypeKind::Qualified { package: first, name }, start)
        } else {
            self.mk_type(TypeKind::Name(first), start)
        };
        if !self.check(&TokenKind::LBracket) {
            return Ok(base);
        }
        self.advance();
        let args = self.parse_type_list(&TokenKind::RBracket)?;
        self.expect(&TokenKind::RBracket)?;
        Ok(self.mk_type(TypeKind::Generic { base: Box::new(base), args }, start))
    }

    /// `[]T`, `[...]T` or `[N]T`.
    fn parse_array_or_slice_type(&mut self) -> Result<Type, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::LBracket)?;
        if self.match_token(&TokenKind::RBracket) {
            let elem = self.parse_type()?;
            return Ok(self.mk_type(TypeKind::Slice(Box::new(elem)), start));
        }
        let len = if self.check(&TokenKind::Ellipsis) && matches!(self.peek(1), TokenKind::RBracket) {
            self.advance();
            ArrayLen::Inferred
        } else {
            ArrayLen::Expr(Box::new(self.in_delimiters(|p| p.parse_expr())?))
        };
        self.expect(&TokenKind::RBracket)?;
        let elem = self.parse_type()?;
        Ok(self.mk_type(TypeKind::Array { len, elem: Box::new(elem) }, start))
    }

    /// Comma-separated types up to (not including) `closing`. A trailing
    /// comma is accepted.
    pub(crate) fn parse_type_list(&mut self, closing: &TokenKind) -> Result<Vec<Type>, ParseError> {
        self.in_delimiters(|p| {
            let mut types = Vec::new();
            p.skip_newlines();
            while !p.check(closing) && !p.at_end() {
                types.push(p.parse_type()?);
                p.skip_newlines();
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
                p.skip_newlines();
            }
            if types.is_empty() {
                return Err(p.expected("type"));
            }
            Ok(types)
        })
    }

    /// `struct { fields }`
    fn parse_struct_type(&mut self) -> Result<Type, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::Struct)?;
        self.expect(&TokenKind::LBrace)?;
        let fields = self.in_delimiters(|p| {
            let mut fields = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RBrace) && !p.at_end() && !p.halted {
                let before = p.pos;
                let field_start = p.start();
                match p.parse_field_decl() {
                    Ok(field) => fields.push(field),
                    Err(e) => {
                        let keep_going = p.record_error(e);
                        p.skip_list_item(&TokenKind::RBrace);
                        if p.pos == before {
                            p.advance();
                        }
                        let span = p.recovered_span(field_start);
                        let ty = p.error_type(span);
                        fields.push(FieldDecl { names: Vec::new(), ty, tag: None, span });
                        if !keep_going {
                            break;
                        }
                    }
                }
                p.skip_newlines();
            }
            fields
        });
        self.expect(&TokenKind::RBrace)?;
        Ok(self.mk_type(TypeKind::Struct(fields), start))
    }

    fn at_field_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Newline
                | TokenKind::Semi
                | TokenKind::RBrace
                | TokenKind::String(_)
                | TokenKind::RawString(_)
        )
    }

    fn parse_field_decl(&mut self) -> Result<FieldDecl, ParseError> {
        let start = self.start();
        let embedded = match (self.current_kind(), self.peek(1)) {
            (TokenKind::Star, _) => true,
            (TokenKind::Ident(_), TokenKind::Dot) => true,
            (
                TokenKind::Ident(_),
                TokenKind::Newline
                | TokenKind::Semi
                | TokenKind::RBrace
                | TokenKind::String(_)
                | TokenKind::RawString(_),
            ) => true,
            _ => false,
        };

        let (names, ty) = if embedded {
            (Vec::new(), self.parse_type()?)
        } else if matches!(self.peek(1), TokenKind::LBracket) && self.check_ident() {
            // `data [4]byte` is a field; `List[T]` is an embedded generic.
            let named = self.speculate("struct field", |p| {
                let name = p.expect_ident().ok()?;
                let ty = p.parse_type().ok()?;
                p.at_field_end().then_some((vec![name], ty))
            });
            match named {
                Some(field) => field,
                None => (Vec::new(), self.parse_type()?),
            }
        } else {
            let mut names = vec![self.expect_ident()?];
            while self.match_token(&TokenKind::Comma) {
                self.skip_newlines();
                names.push(self.expect_ident()?);
            }
            (names, self.parse_type()?)
        };

        let tag = match self.current_kind() {
            TokenKind::String(s) | TokenKind::RawString(s) => {
                let tag = s.clone();
                self.advance();
                Some(tag)
            }
            _ => None,
        };
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(FieldDecl { names, ty, tag, span })
    }

    /// `interface { methods and embedded constraints }`
    fn parse_interface_type(&mut self) -> Result<Type, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::Interface)?;
        self.expect(&TokenKind::LBrace)?;
        let elems = self.in_delimiters(|p| {
            let mut elems = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RBrace) && !p.at_end() && !p.halted {
                let before = p.pos;
                let elem_start = p.start();
                match p.parse_interface_elem() {
                    Ok(elem) => elems.push(elem),
                    Err(e) => {
                        let keep_going = p.record_error(e);
                        p.skip_list_item(&TokenKind::RBrace);
                        if p.pos == before {
                            p.advance();
                        }
                        let span = p.recovered_span(elem_start);
                        elems.push(InterfaceElem::Embed(p.error_type(span)));
                        if !keep_going {
                            break;
                        }
                    }
                }
                p.skip_newlines();
            }
            elems
        });
        self.expect(&TokenKind::RBrace)?;
        Ok(self.mk_type(TypeKind::Interface(elems), start))
    }

    fn parse_interface_elem(&mut self) -> Result<InterfaceElem, ParseError> {
        let elem = if self.check_ident() && matches!(self.peek(1), TokenKind::LParen) {
            let name = self.expect_ident()?;
            let sig = self.parse_func_sig()?;
            InterfaceElem::Method { name, sig }
        } else {
            InterfaceElem::Embed(self.parse_constraint()?)
        };
        self.expect_terminator()?;
        Ok(elem)
    }

    /// A constraint: `T`, `~T`, or a union `A | ~B | C`.
    pub(crate) fn parse_constraint(&mut self) -> Result<Type, ParseError> {
        let start = self.start();
        let mut terms = vec![self.parse_constraint_term()?];
        while self.match_token(&TokenKind::Pipe) {
            self.skip_newlines();
            terms.push(self.parse_constraint_term()?);
        }
        if terms.len() == 1 {
            if let Some(term) = terms.pop() {
                return Ok(term);
            }
        }
        Ok(self.mk_type(TypeKind::Union(terms), start))
    }

    fn parse_constraint_term(&mut self) -> Result<Type, ParseError> {
        let start = self.start();
        if self.match_token(&TokenKind::Tilde) {
            let inner = self.parse_type()?;
            return Ok(self.mk_type(TypeKind::Approx(Box::new(inner)), start));
        }
        self.parse_type()
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    /// `(params) results`, starting at the `(`.
    pub(crate) fn parse_func_sig(&mut self) -> Result<FuncSig, ParseError> {
        let start = self.start();
        let params = self.parse_params()?;
        let results = self.parse_results()?;
        Ok(FuncSig { params, results, span: self.span_from(start) })
    }

    /// A parenthesized parameter list. Go-style grouping applies: in
    /// `(a, b int, s string)` the bare `a` takes the type of the next named
    /// entry. If no entry is named, every entry is a type.
    pub(crate) fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let entries = self.in_delimiters(|p| {
            let mut entries = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RParen) && !p.at_end() {
                entries.push(p.parse_param_entry()?);
                p.skip_newlines();
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
                p.skip_newlines();
            }
            Ok::<_, ParseError>(entries)
        })?;
        self.expect(&TokenKind::RParen)?;
        self.group_params(entries)
    }

    fn parse_param_entry(&mut self) -> Result<ParamEntry, ParseError> {
        let start = self.start();
        if self.match_token(&TokenKind::Ellipsis) {
            let ty = self.parse_type()?;
            return Ok(ParamEntry::Typed { ty, variadic: true, span: self.span_from(start) });
        }
        if !self.check_ident() {
            let ty = self.parse_type()?;
            return Ok(ParamEntry::Typed { ty, variadic: false, span: self.span_from(start) });
        }

        match self.peek(1) {
            TokenKind::Comma | TokenKind::RParen | TokenKind::Newline => {
                let name = self.expect_ident()?;
                Ok(ParamEntry::Bare(name))
            }
            TokenKind::Dot => {
                let ty = self.parse_type()?;
                Ok(ParamEntry::Typed { ty, variadic: false, span: self.span_from(start) })
            }
            TokenKind::Ellipsis => {
                let name = self.expect_ident()?;
                self.advance();
                let ty = self.parse_type()?;
                Ok(ParamEntry::Named { name, ty, variadic: true, span: self.span_from(start) })
            }
            TokenKind::LBracket if !matches!(self.peek(2), TokenKind::RBracket) => {
                // `buf [4]byte` against the generic type `List[T]`.
                let named = self.speculate("array parameter", |p| {
                    let name = p.expect_ident().ok()?;
                    let ty = p.parse_type().ok()?;
                    matches!(p.current_kind(), TokenKind::Comma | TokenKind::RParen | TokenKind::Newline)
                        .then_some((name, ty))
                });
                match named {
                    Some((name, ty)) => {
                        Ok(ParamEntry::Named { name, ty, variadic: false, span: self.span_from(start) })
                    }
                    None => {
                        let ty = self.parse_type()?;
                        Ok(ParamEntry::Typed { ty, variadic: false, span: self.span_from(start) })
                    }
                }
            }
            _ => {
                let name = self.expect_ident()?;
                if !self.at_type_start() {
                    return Err(self.expected("type"));
                }
                let ty = self.parse_type()?;
                Ok(ParamEntry::Named { name, ty, variadic: false, span: self.span_from(start) })
            }
        }
    }

    fn group_params(&mut self, entries: Vec<ParamEntry>) -> Result<Vec<Param>, ParseError> {
        let any_named = entries.iter().any(|e| matches!(e, ParamEntry::Named { .. }));
        let mut params = Vec::new();

        if !any_named {
            for entry in entries {
                match entry {
                    ParamEntry::Bare(name) => {
                        let span = name.span;
                        let ty = Type { id: self.next_id(), kind: TypeKind::Name(name), span };
                        params.push(Param { names: Vec::new(), ty, variadic: false, span });
                    }
                    ParamEntry::Typed { ty, variadic, span } => {
                        params.push(Param { names: Vec::new(), ty, variadic, span });
                    }
                    ParamEntry::Named { .. } => {}
                }
            }
            return Ok(params);
        }

        let mut pending: Vec<Ident> = Vec::new();
        for entry in entries {
            match entry {
                ParamEntry::Bare(name) => pending.push(name),
                ParamEntry::Named { name, ty, variadic, span } => {
                    let span = pending.first().map(|n| n.span.to(span)).unwrap_or(span);
                    let mut names = std::mem::take(&mut pending);
                    names.push(name);
                    params.push(Param { names, ty, variadic, span });
                }
                ParamEntry::Typed { span, .. } => {
                    return Err(ParseError::new("Cannot mix named and unnamed parameters", span)
                        .with_hint("give every parameter a name, or none of them"));
                }
            }
        }
        if let Some(last) = pending.last() {
            return Err(ParseError::new(format!("Missing type for parameter '{}'", last.name), last.span)
                .with_hint("syntax: name Type"));
        }
        Ok(params)
    }

    /// Results after a parameter list: nothing, a single type, or a
    /// parenthesized list.
    pub(crate) fn parse_results(&mut self) -> Result<Vec<Param>, ParseError> {
        if self.check(&TokenKind::LParen) {
            return self.parse_params();
        }
        if !self.at_type_start() {
            return Ok(Vec::new());
        }
        let ty = self.parse_type()?;
        let span = ty.span;
        Ok(vec![Param { names: Vec::new(), ty, variadic: false, span }])
    }

    // =========================================================================
    // Type parameters
    // =========================================================================

    /// `[K comparable, V any]`, starting at the `[`. With
    /// `require_constraint`, a name group without a constraint is an error.
    pub(crate) fn parse_type_params(
        &mut self,
        require_constraint: bool,
    ) -> Result<Vec<TypeParam>, ParseError> {
        self.expect(&TokenKind::LBracket)?;
        let params = self.in_delimiters(|p| {
            let mut params = Vec::new();
            let mut pending: Vec<Ident> = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RBracket) && !p.at_end() {
                let name = p.expect_ident()?;
                if matches!(p.current_kind(), TokenKind::Comma | TokenKind::RBracket | TokenKind::Newline) {
                    pending.push(name);
                } else {
                    let constraint = p.parse_constraint()?;
                    let start = pending.first().map(|n| n.span.start).unwrap_or(name.span.start);
                    let mut names = std::mem::take(&mut pending);
                    names.push(name);
                    params.push(TypeParam { names, constraint: Some(constraint), span: p.span_from(start) });
                }
                p.skip_newlines();
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
                p.skip_newlines();
            }
            if let Some(first) = pending.first() {
                if require_constraint {
                    return Err(p.expected("type"));
                }
                let span = first.span.to(pending.last().map(|n| n.span).unwrap_or(first.span));
                params.push(TypeParam { names: pending, constraint: None, span });
            }
            if params.is_empty() {
                return Err(p.expected("a name"));
            }
            Ok(params)
        })?;
        self.expect(&TokenKind::RBracket)?;
        Ok(params)
    }
}
