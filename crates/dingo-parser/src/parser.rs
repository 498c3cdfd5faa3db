// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser state, token navigation, recovery, and the top-level loop.
//!
//! The grammar itself is split across sibling modules, each adding an
//! `impl Parser` block: `types`, `expr`, `pattern`, `stmt` and `decl`.
//! Speculative parsing lives in `resolver`.

use dingo_ast::decl::{Decl, DeclKind};
use dingo_ast::token::{Comment, Token, TokenKind};
use dingo_ast::{FileId, Ident, NodeId, SourceFile, Span};

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::resolver::ParseContext;

/// The parser for Dingo source code.
pub struct Parser {
    pub(crate) file: FileId,
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    /// Active context flags; see [`ParseContext`].
    pub(crate) context: ParseContext,
    /// Collected errors during parsing
    pub(crate) errors: Vec<ParseError>,
    /// Counter for generating unique NodeIds
    pub(crate) next_node_id: u32,
    pub(crate) depth: usize,
    /// Set once `max_errors` is reached; every loop checks it.
    pub(crate) halted: bool,
    pub(crate) config: ParserConfig,
    comments: Vec<Comment>,
}

impl Parser {
    /// Create a parser over a lexed token stream. A trailing `Eof` is
    /// added if the stream lacks one.
    pub fn new(file: FileId, mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let (end, line, col) = tokens
                .last()
                .map(|t| (t.span.end, t.line, t.col))
                .unwrap_or((0, 1, 1));
            tokens.push(Token { kind: TokenKind::Eof, span: Span::empty_at(end), line, col });
        }
        Self {
            file,
            tokens,
            pos: 0,
            context: ParseContext::empty(),
            errors: Vec::new(),
            next_node_id: 0,
            depth: 0,
            halted: false,
            config: ParserConfig::default(),
            comments: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Comment trivia to attach to the resulting [`SourceFile`].
    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    /// Errors recorded so far by recovery points. Errors returned directly
    /// from `parse_expr`, `parse_type` or `parse_pattern` are not included.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Record error, return if should continue.
    pub(crate) fn record_error(&mut self, mut error: ParseError) -> bool {
        if self.halted {
            return false;
        }
        // The lexer already reported the malformed token itself.
        if self.is_lexical_echo(&error) {
            return true;
        }
        // One diagnostic per position: a placeholder's error and the
        // terminator check that trips over the same token.
        if self.errors.last().is_some_and(|last| last.span == error.span) {
            return true;
        }
        error.file = self.file;
        self.errors.push(error);
        if self.errors.len() >= self.config.max_errors {
            tracing::debug!(max_errors = self.config.max_errors, "error limit reached, stopping");
            self.halted = true;
        }
        !self.halted
    }

    fn is_lexical_echo(&self, error: &ParseError) -> bool {
        let first = self.tokens.partition_point(|t| t.span.start < error.span.start);
        self.tokens[first..]
            .iter()
            .take_while(|t| t.span.start == error.span.start)
            .any(|t| matches!(t.kind, TokenKind::Error(_)) && t.span == error.span)
    }

    /// Run `f` one nesting level deeper, failing once `max_nesting` is exceeded.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.config.max_nesting {
            return Err(ParseError::new("Source is nested too deeply", self.current().span)
                .with_hint("split the expression into smaller pieces"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    pub(crate) fn current(&self) -> &Token {
        // `new` guarantees a trailing Eof, so the stream is never empty.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    pub(crate) fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        if !self.at_end() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.expected(kind.display_name()))
        }
    }

    /// An "expected X, found <current token>" error.
    pub(crate) fn expected(&self, what: &str) -> ParseError {
        ParseError::expected(what, self.current_kind(), self.current().span)
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// Consume a statement terminator. A closing delimiter or end of input
    /// also ends a statement but is left in place.
    pub(crate) fn expect_terminator(&mut self) -> Result<(), ParseError> {
        match self.current_kind() {
            TokenKind::Newline | TokenKind::Semi => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::RBrace | TokenKind::RParen => Ok(()),
            _ => Err(self.expected("newline or ';'")),
        }
    }

    /// Consume the terminator after a statement in a list. Tokens for which
    /// `closes` holds end the list and are left in place; anything else,
    /// including a stray `)` or `]`, is an error.
    pub(crate) fn expect_stmt_end(&mut self, closes: impl Fn(&TokenKind) -> bool) -> Result<(), ParseError> {
        match self.current_kind() {
            TokenKind::Newline | TokenKind::Semi => {
                self.advance();
                Ok(())
            }
            kind if closes(kind) => Ok(()),
            _ => Err(self.expected("newline or ';'")),
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let ident = Ident::new(name.clone(), self.current().span);
                self.advance();
                Ok(ident)
            }
            _ => Err(self.expected("a name")),
        }
    }

    /// Start offset of the current token.
    pub(crate) fn start(&self) -> usize {
        self.current().span.start
    }

    /// End offset of the last consumed token.
    pub(crate) fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(tok) => tok.span.end,
            None => self.start(),
        }
    }

    pub(crate) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    /// Span of a list element skipped by recovery, without the `,` or line
    /// break that [`Parser::skip_list_item`] consumed after it.
    pub(crate) fn recovered_span(&self, start: usize) -> Span {
        let prev = |back: usize| self.pos.checked_sub(back).and_then(|i| self.tokens.get(i));
        let last = match prev(1) {
            Some(t) if matches!(t.kind, TokenKind::Comma | TokenKind::Newline) => prev(2),
            other => other,
        };
        let end = last.map_or(start, |t| t.span.end);
        Span::new(start, end.max(start))
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Skip to the next top-level boundary after an error: a line end or
    /// `;` outside any delimiters. The boundary itself is left in place.
    fn synchronize(&mut self) {
        let skipped = self.skip_until_boundary(false);
        tracing::trace!(skipped, pos = self.pos, "recovered at top level");
    }

    /// Synchronize within a block - skip to the next statement boundary, or
    /// stop before the `}`, `case` or `default` that ends the statement list.
    pub(crate) fn synchronize_in_block(&mut self) {
        let skipped = self.skip_until_boundary(true);
        tracing::trace!(skipped, pos = self.pos, "recovered in block");
    }

    fn skip_until_boundary(&mut self, in_block: bool) -> usize {
        let mut depth = 0usize;
        let mut skipped = 0;
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Newline | TokenKind::Semi if depth == 0 => break,
                TokenKind::RBrace | TokenKind::Case | TokenKind::Default
                    if depth == 0 && in_block =>
                {
                    break
                }
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    // A block closed at depth 0 ends the construct: `func f() { ... }`.
                    if depth == 0 && matches!(self.current_kind(), TokenKind::RBrace) {
                        self.advance();
                        skipped += 1;
                        break;
                    }
                }
                _ => {}
            }
            self.advance();
            skipped += 1;
        }
        skipped
    }

    /// Skip the rest of a malformed list element: up to a `,` or line end
    /// outside nested delimiters (consumed), or the list's `closing`
    /// delimiter (left in place).
    pub(crate) fn skip_list_item(&mut self, closing: &TokenKind) {
        let mut depth = 0usize;
        let mut skipped = 0;
        while !self.at_end() {
            if depth == 0 {
                if self.check(closing) {
                    break;
                }
                if matches!(self.current_kind(), TokenKind::Comma | TokenKind::Newline) {
                    self.advance();
                    break;
                }
            }
            match self.current_kind() {
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
            skipped += 1;
        }
        tracing::trace!(skipped, pos = self.pos, "recovered in list");
    }

    // =========================================================================
    // Top-Level Parsing
    // =========================================================================

    /// Parse the whole token stream into a [`SourceFile`].
    pub fn parse(&mut self) -> ParseResult {
        let mut decls = Vec::new();
        self.skip_newlines();

        while !self.at_end() && !self.halted {
            let start = self.start();
            let before = self.pos;
            match self.parse_decl() {
                Ok(decl) => {
                    decls.push(decl);
                    if let Err(e) = self.expect_stmt_end(|k| matches!(k, TokenKind::Eof)) {
                        if !self.record_error(e) {
                            break;
                        }
                        self.synchronize();
                    }
                }
                Err(e) => {
                    self.record_error(e);
                    self.synchronize();
                    if self.pos == before {
                        self.advance();
                    }
                    let span = self.span_from(start);
                    decls.push(Decl { id: self.next_id(), kind: DeclKind::Bad, span });
                }
            }
            self.skip_newlines();
        }

        let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
        let file = SourceFile {
            file: self.file,
            decls,
            comments: std::mem::take(&mut self.comments),
            span: Span::new(0, end),
        };
        ParseResult { file, errors: std::mem::take(&mut self.errors) }
    }
}

/// Result of parsing: the tree plus any errors found.
#[derive(Debug)]
pub struct ParseResult {
    pub file: SourceFile,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dingo_lexer::Lexer;

    fn parser(src: &str) -> Parser {
        Parser::new(FileId(0), Lexer::new(src).tokenize().tokens)
    }

    #[test]
    fn new_appends_missing_eof() {
        let p = Parser::new(FileId(0), Vec::new());
        assert!(p.at_end());
        assert_eq!(p.current().span, Span::empty_at(0));
    }

    #[test]
    fn advance_stops_at_eof() {
        let mut p = parser("x");
        p.advance();
        p.advance();
        p.advance();
        p.advance();
        assert!(p.at_end());
        assert_eq!(p.peek(5), &TokenKind::Eof);
    }

    #[test]
    fn synchronize_skips_nested_delimiters() {
        let mut p = parser("a (b\nc) d\ne");
        p.synchronize_in_block();
        assert_eq!(p.current_kind(), &TokenKind::Newline);
        p.advance();
        assert_eq!(p.current_kind(), &TokenKind::Ident("e".into()));
    }

    #[test]
    fn synchronize_in_block_stops_before_case() {
        let mut p = parser("x y case 1:");
        p.synchronize_in_block();
        assert_eq!(p.current_kind(), &TokenKind::Case);
    }

    #[test]
    fn skip_list_item_stops_at_closing() {
        let mut p = parser("a (b, c) }");
        p.skip_list_item(&TokenKind::RBrace);
        assert_eq!(p.current_kind(), &TokenKind::RBrace);
    }

    #[test]
    fn record_error_halts_at_limit() {
        let mut p = parser("x").with_config(ParserConfig::default().with_max_errors(2));
        assert!(p.record_error(ParseError::new("one", Span::new(0, 1))));
        assert!(!p.record_error(ParseError::new("two", Span::new(1, 2))));
        assert!(!p.record_error(ParseError::new("three", Span::new(2, 3))));
        assert_eq!(p.errors.len(), 2);
        assert!(p.halted);
    }

    #[test]
    fn errors_at_lexical_error_tokens_are_not_repeated() {
        let mut p = parser("@");
        let span = p.current().span;
        assert!(p.record_error(ParseError::expected("expression", p.current_kind(), span)));
        assert!(p.errors.is_empty());
    }

    #[test]
    fn second_error_at_the_same_token_is_dropped() {
        let mut p = parser("x )");
        assert!(p.record_error(ParseError::new("Expected expression, found ')'", Span::new(2, 3))));
        assert!(p.record_error(ParseError::new("Expected ';' or newline", Span::new(2, 3))));
        assert_eq!(p.errors.len(), 1);
        assert_eq!(p.errors[0].message, "Expected expression, found ')'");
    }

    #[test]
    fn recovered_span_excludes_the_separator() {
        let mut p = parser("a b, c");
        p.skip_list_item(&TokenKind::RParen);
        assert_eq!(p.recovered_span(0), Span::new(0, 3));
        assert_eq!(p.current_kind(), &TokenKind::Ident("c".into()));
    }

    #[test]
    fn stray_closer_does_not_end_a_statement() {
        let mut p = parser(") x");
        assert!(p.expect_stmt_end(|k| matches!(k, TokenKind::RBrace | TokenKind::Eof)).is_err());
        let mut p = parser("} x");
        assert!(p.expect_stmt_end(|k| matches!(k, TokenKind::RBrace | TokenKind::Eof)).is_ok());
        assert_eq!(p.current_kind(), &TokenKind::RBrace);
    }

    #[test]
    fn nesting_limit_reports_error() {
        let mut p = parser("x").with_config(ParserConfig::default().with_max_nesting(2));
        let result = p.nested(|p| p.nested(|p| p.nested(|_| Ok(()))));
        assert!(result.is_err());
        assert_eq!(p.depth, 0);
    }
}
