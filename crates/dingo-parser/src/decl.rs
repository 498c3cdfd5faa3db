// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declarations: package, imports, functions, methods, types, values,
//! `let` bindings and enums.

use dingo_ast::decl::{
    Decl, DeclKind, EnumDecl, EnumField, EnumVariant, FuncDecl, ImportAlias, ImportDecl,
    ImportSpec, LetDecl, MethodDecl, TypeSpec, ValueSpec, VariantPayload,
};
use dingo_ast::token::TokenKind;
use dingo_ast::ty::{Param, Type};
use dingo_ast::{Ident, Span};

use crate::error::ParseError;
use crate::parser::Parser;

impl Parser {
    fn mk_decl(&mut self, kind: DeclKind, start: usize) -> Decl {
        let span = self.span_from(start);
        Decl { id: self.next_id(), kind, span }
    }

    /// One file-level item, without its terminator. Anything that is not a
    /// declaration is parsed as a statement.
    pub(crate) fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.start();
        match self.current_kind() {
            TokenKind::Package => {
                self.advance();
                let name = self.expect_ident()?;
                Ok(self.mk_decl(DeclKind::Package(name), start))
            }
            TokenKind::Import => self.parse_import(),
            TokenKind::Func if matches!(self.peek(1), TokenKind::Ident(_)) => self.parse_func_decl(),
            TokenKind::Func if matches!(self.peek(1), TokenKind::LParen) => match self.try_method_receiver() {
                Some(receivers) => self.parse_method_decl(start, receivers),
                None => self.parse_stmt_decl(),
            },
            TokenKind::Var | TokenKind::Const | TokenKind::Type | TokenKind::Let | TokenKind::Enum => {
                self.parse_local_decl()
            }
            _ => self.parse_stmt_decl(),
        }
    }

    fn parse_stmt_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.start();
        let stmt = self.parse_stmt()?;
        Ok(self.mk_decl(DeclKind::Stmt(stmt), start))
    }

    /// Declarations that may also appear inside a block.
    pub(crate) fn parse_local_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.start();
        let kind = match self.current_kind() {
            TokenKind::Var => {
                self.advance();
                DeclKind::Var(self.parse_spec_group(|p| p.parse_value_spec(true), Self::error_value_spec)?)
            }
            TokenKind::Const => {
                self.advance();
                DeclKind::Const(self.parse_spec_group(|p| p.parse_value_spec(false), Self::error_value_spec)?)
            }
            TokenKind::Type => {
                self.advance();
                DeclKind::Type(self.parse_spec_group(|p| p.parse_type_spec(), Self::error_type_spec)?)
            }
            TokenKind::Let => DeclKind::Let(self.parse_let()?),
            TokenKind::Enum => DeclKind::Enum(self.parse_enum()?),
            _ => return Err(self.expected("declaration")),
        };
        Ok(self.mk_decl(kind, start))
    }

    /// A single spec, or a parenthesized group of specs one per line. A spec
    /// in a group that fails to parse is replaced by `placeholder`.
    fn parse_spec_group<T>(
        &mut self,
        mut spec: impl FnMut(&mut Self) -> Result<T, ParseError>,
        placeholder: fn(&mut Self, Span) -> T,
    ) -> Result<Vec<T>, ParseError> {
        if !self.match_token(&TokenKind::LParen) {
            return Ok(vec![spec(self)?]);
        }
        let specs = self.in_delimiters(|p| {
            let mut specs = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RParen) && !p.at_end() && !p.halted {
                let before = p.pos;
                let spec_start = p.start();
                match spec(p) {
                    Ok(s) => {
                        specs.push(s);
                        if let Err(e) = p.expect_terminator() {
                            if !p.record_error(e) {
                                break;
                            }
                            p.skip_list_item(&TokenKind::RParen);
                        }
                    }
                    Err(e) => {
                        let keep_going = p.record_error(e);
                        p.skip_list_item(&TokenKind::RParen);
                        if p.pos == before {
                            p.advance();
                        }
                        let span = p.recovered_span(spec_start);
                        specs.push(placeholder(p, span));
                        if !keep_going {
                            break;
                        }
                    }
                }
                p.skip_newlines();
            }
            specs
        });
        self.expect(&TokenKind::RParen)?;
        Ok(specs)
    }

    fn error_value_spec(&mut self, span: Span) -> ValueSpec {
        ValueSpec { names: vec![Ident::missing(span)], ty: None, values: Vec::new(), span }
    }

    fn error_type_spec(&mut self, span: Span) -> TypeSpec {
        let ty = self.error_type(span);
        TypeSpec { name: Ident::missing(span), type_params: Vec::new(), alias: false, ty, span }
    }

    fn error_import_spec(&mut self, span: Span) -> ImportSpec {
        ImportSpec { alias: Some(ImportAlias::Name(Ident::missing(span))), path: String::new(), span }
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn parse_import(&mut self) -> Result<Decl, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::Import)?;
        let grouped = self.check(&TokenKind::LParen);
        let specs = self.parse_spec_group(|p| p.parse_import_spec(), Self::error_import_spec)?;
        Ok(self.mk_decl(DeclKind::Import(ImportDecl { specs, grouped }), start))
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let start = self.start();
        let alias = match self.current_kind() {
            TokenKind::Ident(_) => Some(ImportAlias::Name(self.expect_ident()?)),
            TokenKind::Dot => Some(ImportAlias::Dot(self.advance().span)),
            _ => None,
        };
        let path = match self.current_kind() {
            TokenKind::String(path) | TokenKind::RawString(path) => path.clone(),
            _ => return Err(self.expected("an import path")),
        };
        self.advance();
        Ok(ImportSpec { alias, path, span: self.span_from(start) })
    }

    // =========================================================================
    // Functions and methods
    // =========================================================================

    /// `func Name[T any](params) results { body }`
    fn parse_func_decl(&mut self) -> Result<Decl, ParseError> {
        let start = self.start();
        self.expect(&TokenKind::Func)?;
        let name = self.expect_ident()?;
        let type_params =
            if self.check(&TokenKind::LBracket) { self.parse_type_params(false)? } else { Vec::new() };
        let sig = self.parse_func_sig()?;
        let body = if self.check(&TokenKind::LBrace) { Some(self.parse_block()?) } else { None };
        Ok(self.mk_decl(DeclKind::Func(FuncDecl { name, type_params, sig, body }), start))
    }

    /// After `func`, a parenthesized list followed by `Name(` is a method
    /// receiver. Anything else is a function literal.
    fn try_method_receiver(&mut self) -> Option<Vec<Param>> {
        self.speculate("method receiver", |p| {
            p.advance();
            let receivers = p.parse_params().ok()?;
            let is_method = p.check_ident() && matches!(p.peek(1), TokenKind::LParen);
            is_method.then_some(receivers)
        })
    }

    fn parse_method_decl(
        &mut self,
        start: usize,
        receivers: Vec<Param>,
    ) -> Result<Decl, ParseError> {
        if receivers.len() != 1 {
            return Err(ParseError::new("Method must have exactly one receiver", self.span_from(start))
                .with_hint("syntax: func (r *T) Name() { ... }"));
        }
        let mut receivers = receivers.into_iter();
        let receiver = receivers.next().ok_or_else(|| self.expected("a receiver"))?;
        let name = self.expect_ident()?;
        let sig = self.parse_func_sig()?;
        let body = if self.check(&TokenKind::LBrace) { Some(self.parse_block()?) } else { None };
        Ok(self.mk_decl(DeclKind::Method(MethodDecl { receiver, name, sig, body }), start))
    }

    // =========================================================================
    // Types and values
    // =========================================================================

    /// `Name [TypeParams] [=] Type`
    fn parse_type_spec(&mut self) -> Result<TypeSpec, ParseError> {
        let start = self.start();
        let name = self.expect_ident()?;
        // `type A[T any] ...` declares parameters; `type A [N]T` is an array.
        let type_params = if self.check(&TokenKind::LBracket) {
            self.speculate("type parameters", |p| {
                let params = p.parse_type_params(true).ok()?;
                (p.at_type_start() || p.check(&TokenKind::Eq)).then_some(params)
            })
            .unwrap_or_default()
        } else {
            Vec::new()
        };
        let alias = self.match_token(&TokenKind::Eq);
        let ty = self.parse_type()?;
        Ok(TypeSpec { name, type_params, alias, ty, span: self.span_from(start) })
    }

    /// `a, b [Type] [= x, y]`. A `var` spec needs a type or a value.
    fn parse_value_spec(&mut self, is_var: bool) -> Result<ValueSpec, ParseError> {
        let start = self.start();
        let mut names = vec![self.expect_ident()?];
        while self.match_token(&TokenKind::Comma) {
            names.push(self.expect_ident()?);
        }
        let ty = if self.at_type_start() { Some(self.parse_type()?) } else { None };
        let values = if self.match_token(&TokenKind::Eq) { self.parse_expr_list()? } else { Vec::new() };
        if is_var && ty.is_none() && values.is_empty() {
            return Err(self.expected("type"));
        }
        Ok(ValueSpec { names, ty, values, span: self.span_from(start) })
    }

    /// `let name [: Type] = value`
    fn parse_let(&mut self) -> Result<LetDecl, ParseError> {
        self.expect(&TokenKind::Let)?;
        let name = self.expect_ident()?;
        let ty = if self.match_token(&TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        Ok(LetDecl { name, ty, value })
    }

    // =========================================================================
    // Enums
    // =========================================================================

    /// `enum Name[T any] { A, B(T), C { x: int } }`
    fn parse_enum(&mut self) -> Result<EnumDecl, ParseError> {
        self.expect(&TokenKind::Enum)?;
        let name = self.expect_ident()?;
        let type_params =
            if self.check(&TokenKind::LBracket) { self.parse_type_params(false)? } else { Vec::new() };
        self.expect(&TokenKind::LBrace)?;
        let variants = self.in_delimiters(|p| {
            let mut variants = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RBrace) && !p.at_end() && !p.halted {
                let before = p.pos;
                let variant_start = p.start();
                match p.parse_enum_variant() {
                    Ok(variant) => variants.push(variant),
                    Err(e) => {
                        let keep_going = p.record_error(e);
                        p.skip_list_item(&TokenKind::RBrace);
                        if p.pos == before {
                            p.advance();
                        }
                        let span = p.recovered_span(variant_start);
                        variants.push(EnumVariant { name: Ident::missing(span), payload: None, span });
                        if !keep_going {
                            break;
                        }
                    }
                }
                p.skip_newlines();
            }
            variants
        });
        self.expect(&TokenKind::RBrace)?;
        Ok(EnumDecl { name, type_params, variants })
    }

    fn parse_enum_variant(&mut self) -> Result<EnumVariant, ParseError> {
        let start = self.start();
        let name = self.expect_ident()?;

        let tuple = if self.check(&TokenKind::LParen) { Some(self.parse_tuple_payload()?) } else { None };
        let fields_start = self.start();
        let fields = if self.check(&TokenKind::LBrace) { Some(self.parse_struct_payload()?) } else { None };

        let payload = match (tuple, fields) {
            (Some(types), Some(_)) => {
                self.record_error(
                    ParseError::new(
                        format!("Variant '{}' cannot have both tuple and struct fields", name.name),
                        self.span_from(fields_start),
                    )
                    .with_hint("choose either Name(T1, T2) or Name { a: T1 }"),
                );
                Some(VariantPayload::Tuple(types))
            }
            (Some(types), None) => Some(VariantPayload::Tuple(types)),
            (None, Some(fields)) => Some(VariantPayload::Struct(fields)),
            (None, None) => None,
        };
        let span = self.span_from(start);

        if !self.match_token(&TokenKind::Comma)
            && !matches!(self.current_kind(), TokenKind::Newline | TokenKind::RBrace)
        {
            return Err(self.expected("',' or newline"));
        }
        Ok(EnumVariant { name, payload, span })
    }

    /// `(T1, T2)`; may be empty.
    fn parse_tuple_payload(&mut self) -> Result<Vec<Type>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let types = if self.check(&TokenKind::RParen) {
            Vec::new()
        } else {
            self.parse_type_list(&TokenKind::RParen)?
        };
        self.expect(&TokenKind::RParen)?;
        Ok(types)
    }

    /// `{ name: Type, ... }` with `,` or newline between fields.
    fn parse_struct_payload(&mut self) -> Result<Vec<EnumField>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let fields = self.in_delimiters(|p| {
            let mut fields = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RBrace) && !p.at_end() {
                let start = p.start();
                let name = p.expect_ident()?;
                p.expect(&TokenKind::Colon)?;
                let ty = p.parse_type()?;
                fields.push(EnumField { name, ty, span: p.span_from(start) });
                let separated = p.match_token(&TokenKind::Comma);
                p.skip_newlines();
                if !separated && !p.check(&TokenKind::RBrace) && !p.check_ident() {
                    break;
                }
            }
            Ok::<_, ParseError>(fields)
        })?;
        self.expect(&TokenKind::RBrace)?;
        Ok(fields)
    }
}
