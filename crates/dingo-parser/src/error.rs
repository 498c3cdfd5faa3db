// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser diagnostics.

use dingo_ast::token::TokenKind;
use dingo_ast::{FileId, Span};
use dingo_lexer::{LexError, LexErrorKind};
use thiserror::Error;

/// Which stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lexical(LexErrorKind),
    Syntax,
}

/// Diagnostic severity. The front end only ever reports errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub file: FileId,
    pub span: Span,
    pub kind: ErrorKind,
    pub message: String,
    pub hint: Option<String>,
}

impl ParseError {
    pub fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Convert a lexer error so both stages share one diagnostics list.
    pub fn from_lex(file: FileId, err: &LexError) -> Self {
        Self {
            file,
            span: err.span,
            kind: ErrorKind::Lexical(err.kind),
            message: err.message.clone(),
            hint: err.hint.clone(),
        }
    }

    pub(crate) fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            file: FileId::default(),
            span,
            kind: ErrorKind::Syntax,
            message: message.into(),
            hint: None,
        }
    }

    pub(crate) fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let mut err = Self::new(format_expected_message(expected, found), span);
        err.hint = crate::hints::for_expected(expected, found).map(String::from);
        err
    }

    pub(crate) fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "newline or ';'" => format!("Expected ';' or newline after statement, found {}", found.display_name()),
        "'{'" => format!("Expected '{{' to start block, found {}", found.display_name()),
        "'}'" => format!("Expected '}}' to close block, found {}", found.display_name()),
        "')'" if matches!(found, TokenKind::Eof) => "Unclosed '(' - missing ')'".to_string(),
        "']'" if matches!(found, TokenKind::Eof) => "Unclosed '[' - missing ']'".to_string(),
        "a name" => format!("Expected name, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expected_message_names_both_sides() {
        let err = ParseError::expected("type", &TokenKind::Comma, Span::new(3, 4));
        assert_eq!(err.message, "Expected type, found ','");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.severity(), Severity::Error);
    }

    #[test]
    fn unclosed_delimiters_at_eof() {
        let err = ParseError::expected("')'", &TokenKind::Eof, Span::empty_at(9));
        assert_eq!(err.message, "Unclosed '(' - missing ')'");
        assert_eq!(err.hint.as_deref(), Some("add ')' to close the parenthesis"));
    }

    #[test]
    fn display_uses_message() {
        let err = ParseError::new("Something broke", Span::new(0, 1)).with_hint("fix it");
        assert_eq!(err.to_string(), "Something broke");
        assert_eq!(err.hint.as_deref(), Some("fix it"));
    }
}
