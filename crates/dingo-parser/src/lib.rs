// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the Dingo language.
//!
//! Transforms a token stream into a syntax tree, recovering from errors so
//! that one pass reports as many independent problems as it can.

mod config;
mod decl;
mod error;
mod expr;
mod hints;
mod parser;
mod pattern;
mod resolver;
mod stmt;
mod types;

pub use config::{ParserConfig, DEFAULT_MAX_ERRORS, DEFAULT_MAX_NESTING};
pub use error::{ErrorKind, ParseError, Severity};
pub use parser::{ParseResult, Parser};
pub use resolver::ParseContext;

use dingo_ast::FileId;
use dingo_lexer::Lexer;

/// Lex and parse `source` with the default configuration.
pub fn parse_source(file: FileId, source: &str) -> ParseResult {
    parse_source_with(file, source, &ParserConfig::default())
}

/// Lex and parse `source`. Lexical and syntax errors are merged into one
/// list, ordered by position and capped at `config.max_errors`.
pub fn parse_source_with(file: FileId, source: &str, config: &ParserConfig) -> ParseResult {
    let lexed = Lexer::new(source).tokenize();
    tracing::debug!(file = file.0, bytes = source.len(), tokens = lexed.tokens.len(), "parsing");
    let lex_errors: Vec<ParseError> =
        lexed.errors.iter().map(|e| ParseError::from_lex(file, e)).collect();

    let mut result = Parser::new(file, lexed.tokens)
        .with_config(*config)
        .with_comments(lexed.comments)
        .parse();

    if !lex_errors.is_empty() {
        result.errors.extend(lex_errors);
        result.errors.sort_by_key(|e| e.span.start);
    }
    result.errors.truncate(config.max_errors);
    tracing::debug!(
        file = file.0,
        decls = result.file.decls.len(),
        errors = result.errors.len(),
        "parsed"
    );
    result
}
