// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from lexer and parser errors to `Diagnostic`.

use dingo_parser::{ErrorKind, ParseResult};

use crate::codes::{lex_code, syntax_code, ErrorCodeRegistry};
use crate::{Diagnostic, ToDiagnostic};

// ============================================================================
// Lex Errors
// ============================================================================

impl ToDiagnostic for dingo_lexer::LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(&self.message)
            .with_code(lex_code(self.kind))
            .with_primary(self.span, self.kind.to_string());

        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }

        diag
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

impl ToDiagnostic for dingo_parser::ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match self.kind {
            ErrorKind::Lexical(kind) => (lex_code(kind), kind.to_string()),
            ErrorKind::Syntax => {
                let code = syntax_code(&self.message);
                let title = ErrorCodeRegistry::default()
                    .get(code)
                    .map(|info| info.title)
                    .unwrap_or("here");
                (code, title.to_string())
            }
        };

        let mut diag = Diagnostic::error(&self.message)
            .with_code(code)
            .with_primary(self.span, label);

        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }

        diag
    }
}

/// Diagnostics for every error of a parse, in reported order.
pub fn diagnostics_for(result: &ParseResult) -> Vec<Diagnostic> {
    result.errors.iter().map(ToDiagnostic::to_diagnostic).collect()
}
