// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Match-arm patterns.

use dingo_ast::pattern::{Pattern, PatternKind};
use dingo_ast::token::TokenKind;

use crate::error::ParseError;
use crate::expr::literal_of;
use crate::parser::Parser;

impl Parser {
    pub fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.nested(|p| p.parse_pattern_inner())
    }

    fn parse_pattern_inner(&mut self) -> Result<Pattern, ParseError> {
        let start = self.start();

        let negative = matches!(self.current_kind(), TokenKind::Minus)
            && matches!(self.peek(1), TokenKind::Int { .. } | TokenKind::Float(_) | TokenKind::Imaginary(_));
        if negative {
            self.advance();
        }
        if let Some(value) = literal_of(self.current_kind()) {
            self.advance();
            return Ok(self.mk_pattern(PatternKind::Literal { value, negative }, start));
        }

        let first = self.expect_ident().map_err(|_| self.expected("pattern"))?;
        if first.is_blank() {
            return Ok(self.mk_pattern(PatternKind::Wildcard, start));
        }

        let (qualifier, name) = if self.check(&TokenKind::Dot) {
            self.advance();
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        if self.check(&TokenKind::LParen) {
            let args = self.parse_pattern_args()?;
            return Ok(self.mk_pattern(PatternKind::Variant { qualifier, name, args }, start));
        }
        let kind = match qualifier {
            Some(qualifier) => PatternKind::Variant { qualifier: Some(qualifier), name, args: Vec::new() },
            None => PatternKind::Binding(name),
        };
        Ok(self.mk_pattern(kind, start))
    }

    /// `(p1, p2, ...)`
    fn parse_pattern_args(&mut self) -> Result<Vec<Pattern>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let args = self.in_delimiters(|p| {
            let mut args = Vec::new();
            p.skip_newlines();
            while !p.check(&TokenKind::RParen) && !p.at_end() {
                args.push(p.parse_pattern()?);
                p.skip_newlines();
                if !p.match_token(&TokenKind::Comma) {
                    break;
                }
                p.skip_newlines();
            }
            Ok::<_, ParseError>(args)
        })?;
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn mk_pattern(&mut self, kind: PatternKind, start: usize) -> Pattern {
        let span = self.span_from(start);
        Pattern { id: self.next_id(), kind, span }
    }
}
