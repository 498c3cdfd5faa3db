// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexical error types.

use dingo_ast::Span;
use thiserror::Error;

/// Why a piece of input could not be tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated raw string literal")]
    UnterminatedRawString,
    #[error("unterminated rune literal")]
    UnterminatedRune,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid number literal")]
    InvalidNumber,
    #[error("empty rune literal")]
    EmptyRune,
    #[error("more than one character in rune literal")]
    MultiCharRune,
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, span: Span) -> Self {
        let (message, hint) = match kind {
            LexErrorKind::UnexpectedChar => ("Unexpected character".to_string(), None),
            LexErrorKind::UnterminatedString => (
                "Unterminated string".to_string(),
                Some("add a closing '\"' before the end of the line"),
            ),
            LexErrorKind::UnterminatedRawString => (
                "Unterminated raw string".to_string(),
                Some("add a closing '`'"),
            ),
            LexErrorKind::UnterminatedRune => (
                "Unterminated rune literal".to_string(),
                Some("add a closing '''"),
            ),
            LexErrorKind::UnterminatedComment => (
                "Unterminated block comment".to_string(),
                Some("close the comment with '*/'"),
            ),
            LexErrorKind::InvalidEscape => (
                "Invalid escape sequence".to_string(),
                Some("valid: \\a \\b \\f \\n \\r \\t \\v \\\\ \\' \\\" \\xHH \\uHHHH \\UHHHHHHHH \\OOO"),
            ),
            LexErrorKind::InvalidNumber => ("Invalid number".to_string(), None),
            LexErrorKind::EmptyRune => (
                "Empty rune literal".to_string(),
                Some("a rune holds exactly one character, like 'a'"),
            ),
            LexErrorKind::MultiCharRune => (
                "Rune literal holds more than one character".to_string(),
                Some("use a string (\"...\") for text"),
            ),
        };
        Self { kind, span, message, hint: hint.map(String::from) }
    }

    pub(crate) fn unexpected_char(ch: char, pos: usize) -> Self {
        let mut err = Self::new(
            LexErrorKind::UnexpectedChar,
            Span::new(pos, pos + ch.len_utf8()),
        );
        err.message = format!("Unexpected character '{}'", ch.escape_debug());
        err
    }

    /// Attach a more specific message, keeping the kind's hint.
    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}
