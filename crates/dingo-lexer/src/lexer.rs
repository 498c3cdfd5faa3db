// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use logos::Logos;
use dingo_ast::token::{Comment, CommentKind, Token, TokenKind};
use dingo_ast::{LineMap, Span};

use crate::error::{LexError, LexErrorKind};
use crate::literal::{decode_rune, decode_string, number_token, scan_number_end};

/// Raw token type for logos - literal values are decoded in a second pass.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\f]+")] // Horizontal whitespace; `\n` is significant
enum RawToken {
    // === Go keywords ===
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // === Dingo keywords ===
    #[token("let")]
    Let,
    #[token("enum")]
    Enum,
    #[token("match")]
    Match,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,

    // === Operators (logos takes the longest match) ===
    #[token("&^=")]
    AmpCaretEq,
    #[token("<<=")]
    LtLtEq,
    #[token(">>=")]
    GtGtEq,
    #[token("...")]
    Ellipsis,

    #[token("&^")]
    AmpCaret,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<-")]
    Arrow,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(":=")]
    ColonEq,
    #[token("?.")]
    QuestionDot,
    #[token("??")]
    QuestionQuestion,
    #[token("=>")]
    FatArrow,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,

    #[token("\n")]
    Newline,

    // === Comments (kept as trivia) ===
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // === Literals ===
    // Only the first character is matched here; the callback scans the rest.
    #[regex(r"[0-9]", number)]
    #[regex(r"\.[0-9]", number)]
    Number,
    #[token("\"", interpreted_string)]
    String,
    #[token("'", rune)]
    Rune,
    #[token("`", raw_string)]
    RawString,

    // === Identifier (keywords win on equal length) ===
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    // Any other character, so errors always cover whole code points.
    #[regex(r".", priority = 0)]
    Unknown,
}

/// Block comments run to the first `*/` and do not nest.
fn block_comment(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexErrorKind> {
    match lex.remainder().find("*/") {
        Some(pos) => {
            lex.bump(pos + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn number(lex: &mut logos::Lexer<RawToken>) {
    let end = scan_number_end(lex.source().as_bytes(), lex.span().start);
    lex.bump(end.saturating_sub(lex.span().end));
}

fn interpreted_string(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexErrorKind> {
    scan_quoted(lex, b'"', LexErrorKind::UnterminatedString)
}

fn rune(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexErrorKind> {
    scan_quoted(lex, b'\'', LexErrorKind::UnterminatedRune)
}

/// Scan to the closing quote. An unterminated literal stops before the
/// line break so the newline still terminates the statement.
fn scan_quoted(
    lex: &mut logos::Lexer<RawToken>,
    quote: u8,
    unterminated: LexErrorKind,
) -> Result<(), LexErrorKind> {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b if b == quote => {
                lex.bump(i + 1);
                return Ok(());
            }
            b'\n' => break,
            b'\\' => {
                i += 1;
                if let Some(&next) = rest.get(i) {
                    if next != b'\n' {
                        i += utf8_width(next).min(rest.len() - i);
                    }
                }
            }
            _ => i += 1,
        }
    }
    lex.bump(i);
    Err(unterminated)
}

fn raw_string(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexErrorKind> {
    match lex.remainder().find('`') {
        Some(pos) => {
            lex.bump(pos + 1);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexErrorKind::UnterminatedRawString)
        }
    }
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

/// The lexer for Dingo source code.
///
/// Iterating yields tokens with statement terminators already inserted and
/// ends with exactly one [`TokenKind::Eof`]. Lexing never stops early:
/// malformed input becomes a [`TokenKind::Error`] token plus a recorded
/// [`LexError`].
pub struct Lexer<'a> {
    source: &'a str,
    /// Offset of the lexed region within `source`.
    base: usize,
    raw: logos::Lexer<'a, RawToken>,
    lines: LineMap,
    pending: Option<Token>,
    last_ends_statement: bool,
    finished: bool,
    comments: Vec<Comment>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self::resume(source, 0)
    }

    /// Start lexing at byte `offset` of `source`. Spans and positions stay
    /// relative to the whole source. An offset past the end, or inside a
    /// UTF-8 sequence, lexes nothing.
    pub fn resume(source: &'a str, offset: usize) -> Self {
        let (base, rest) = match source.get(offset..) {
            Some(rest) => (offset, rest),
            None => (source.len(), ""),
        };
        Self {
            source,
            base,
            raw: RawToken::lexer(rest),
            lines: LineMap::new(source),
            pending: None,
            last_ends_statement: false,
            finished: false,
            comments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the remaining input, collecting every error.
    pub fn tokenize(&mut self) -> LexResult {
        let tokens: Vec<Token> = self.by_ref().collect();
        tracing::debug!(
            tokens = tokens.len(),
            comments = self.comments.len(),
            errors = self.errors.len(),
            "lexed source"
        );
        LexResult {
            tokens,
            comments: std::mem::take(&mut self.comments),
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    /// Comments seen so far.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    fn make_token(&self, kind: TokenKind, span: Span) -> Token {
        let pos = self.lines.position(span.start);
        Token { kind, span, line: pos.line, col: pos.col }
    }

    /// Zero-width terminator, emitted only if the previous token allows it.
    fn take_terminator(&mut self, at: usize) -> Option<Token> {
        if std::mem::take(&mut self.last_ends_statement) {
            Some(self.make_token(TokenKind::Newline, Span::empty_at(at)))
        } else {
            None
        }
    }

    fn finish(&mut self) -> Token {
        self.finished = true;
        let end = self.source.len();
        let eof = self.make_token(TokenKind::Eof, Span::empty_at(end));
        match self.take_terminator(end) {
            Some(newline) => {
                self.pending = Some(eof);
                newline
            }
            None => eof,
        }
    }

    fn lex_error(&self, kind: LexErrorKind, span: Span, slice: &str) -> LexError {
        match kind {
            LexErrorKind::UnexpectedChar => {
                let ch = slice.chars().next().unwrap_or('\u{FFFD}');
                LexError::unexpected_char(ch, span.start)
            }
            _ => LexError::new(kind, span),
        }
    }

    /// Convert a raw logos token to our TokenKind, decoding literals.
    /// Comments are trivia and yield `None`.
    fn convert_token(&self, raw: RawToken, slice: &str, span: Span) -> Result<Option<TokenKind>, LexError> {
        Ok(Some(match raw {
            RawToken::Break => TokenKind::Break,
            RawToken::Case => TokenKind::Case,
            RawToken::Chan => TokenKind::Chan,
            RawToken::Const => TokenKind::Const,
            RawToken::Continue => TokenKind::Continue,
            RawToken::Default => TokenKind::Default,
            RawToken::Defer => TokenKind::Defer,
            RawToken::Else => TokenKind::Else,
            RawToken::Fallthrough => TokenKind::Fallthrough,
            RawToken::For => TokenKind::For,
            RawToken::Func => TokenKind::Func,
            RawToken::Go => TokenKind::Go,
            RawToken::Goto => TokenKind::Goto,
            RawToken::If => TokenKind::If,
            RawToken::Import => TokenKind::Import,
            RawToken::Interface => TokenKind::Interface,
            RawToken::Map => TokenKind::Map,
            RawToken::Package => TokenKind::Package,
            RawToken::Range => TokenKind::Range,
            RawToken::Return => TokenKind::Return,
            RawToken::Select => TokenKind::Select,
            RawToken::Struct => TokenKind::Struct,
            RawToken::Switch => TokenKind::Switch,
            RawToken::Type => TokenKind::Type,
            RawToken::Var => TokenKind::Var,
            RawToken::Let => TokenKind::Let,
            RawToken::Enum => TokenKind::Enum,
            RawToken::Match => TokenKind::Match,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::Nil => TokenKind::Nil,

            RawToken::AmpCaretEq => TokenKind::AmpCaretEq,
            RawToken::LtLtEq => TokenKind::LtLtEq,
            RawToken::GtGtEq => TokenKind::GtGtEq,
            RawToken::Ellipsis => TokenKind::Ellipsis,
            RawToken::AmpCaret => TokenKind::AmpCaret,
            RawToken::LtLt => TokenKind::LtLt,
            RawToken::GtGt => TokenKind::GtGt,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::PercentEq => TokenKind::PercentEq,
            RawToken::AmpEq => TokenKind::AmpEq,
            RawToken::PipeEq => TokenKind::PipeEq,
            RawToken::CaretEq => TokenKind::CaretEq,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::ColonEq => TokenKind::ColonEq,
            RawToken::QuestionDot => TokenKind::QuestionDot,
            RawToken::QuestionQuestion => TokenKind::QuestionQuestion,
            RawToken::FatArrow => TokenKind::FatArrow,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::Question => TokenKind::Question,

            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Newline => TokenKind::Newline,

            RawToken::Number => number_token(slice).map_err(|kind| {
                LexError::new(kind, span).with_message(format!("Invalid number '{slice}'"))
            })?,
            RawToken::String => {
                let body = &slice[1..slice.len() - 1];
                let decoded = decode_string(body).map_err(|offset| {
                    let at = span.start + 1 + offset;
                    let width = body[offset..].chars().take(2).map(char::len_utf8).sum::<usize>();
                    LexError::new(LexErrorKind::InvalidEscape, Span::new(at, at + width))
                })?;
                TokenKind::String(decoded)
            }
            RawToken::Rune => {
                let body = &slice[1..slice.len() - 1];
                TokenKind::Rune(decode_rune(body).map_err(|kind| LexError::new(kind, span))?)
            }
            // Carriage returns inside raw strings are discarded.
            RawToken::RawString => TokenKind::RawString(slice[1..slice.len() - 1].replace('\r', "")),
            RawToken::Ident => TokenKind::Ident(slice.to_string()),
            RawToken::Unknown => {
                return Err(self.lex_error(LexErrorKind::UnexpectedChar, span, slice));
            }

            RawToken::LineComment | RawToken::BlockComment => return Ok(None),
        }))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(tok) = self.pending.take() {
            return Some(tok);
        }
        if self.finished {
            return None;
        }

        loop {
            let Some(result) = self.raw.next() else {
                return Some(self.finish());
            };
            let range = self.raw.span();
            let span = Span::new(range.start + self.base, range.end + self.base);
            let slice = self.raw.slice();

            let kind = match result {
                Ok(RawToken::Newline) => match self.take_terminator(span.start) {
                    // A real line break keeps its own span.
                    Some(tok) => return Some(Token { span, ..tok }),
                    None => continue,
                },
                Ok(RawToken::LineComment) => {
                    self.comments.push(Comment { kind: CommentKind::Line, span });
                    continue;
                }
                Ok(RawToken::BlockComment) => {
                    self.comments.push(Comment { kind: CommentKind::Block, span });
                    // A block comment spanning lines acts like a newline.
                    if slice.contains('\n') {
                        if let Some(tok) = self.take_terminator(span.start) {
                            return Some(tok);
                        }
                    }
                    continue;
                }
                Ok(raw) => match self.convert_token(raw, slice, span) {
                    Ok(Some(kind)) => kind,
                    Ok(None) => continue,
                    Err(err) => {
                        self.errors.push(err);
                        TokenKind::Error(slice.to_string())
                    }
                },
                Err(kind) => {
                    let err = self.lex_error(kind, span, slice);
                    self.errors.push(err);
                    TokenKind::Error(slice.to_string())
                }
            };

            self.last_ends_statement = matches!(kind, TokenKind::Error(_)) || kind.ends_statement();
            return Some(self.make_token(kind, span));
        }
    }
}

/// Result of lexing: tokens, comment trivia and any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
