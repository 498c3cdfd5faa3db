// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use dingo_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        // Colon hints
        ("':'", TokenKind::Eq) => Some("use ':' for types, '=' for values"),
        ("':'", _) => Some("syntax: name: Type"),

        // Block hints
        ("'{'", _) => Some("blocks start with '{'"),
        ("'}'", _) => Some("every '{' needs a matching '}'"),

        // Parentheses hints
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", TokenKind::Newline) => Some("a list that spans lines needs a trailing ','"),

        // Bracket hints
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),

        // Match and lambda hints
        ("'=>'", TokenKind::Colon) => Some("match arms use '=>', not ':'"),
        ("'=>'", TokenKind::Arrow) => Some("use '=>' rather than '<-' after a pattern"),
        ("'=>'", _) => Some("write each arm as: pattern [if guard] => body"),
        ("'|'", _) => Some("close the lambda parameter list with '|'"),

        // Let hints
        ("'='", TokenKind::Newline | TokenKind::Semi) => Some("'let' always needs an initializer: let x = value"),
        ("'='", TokenKind::ColonEq) => Some("'let' uses '=', not ':='"),

        // Expression hints
        ("expression", TokenKind::Eq) => Some("put the value after '='"),
        ("expression", TokenKind::Semi | TokenKind::Newline) => Some("statement is incomplete"),
        ("expression", TokenKind::RBrace) => Some("statement is incomplete"),
        ("expression", _) => Some("try a value, variable, or function call"),

        // Name/identifier hints
        ("a name", TokenKind::Int { .. }) => Some("names can't start with a number"),
        ("a name", _) => Some("names start with a letter or '_'"),

        // String hints
        ("an import path", _) => Some("import paths are quoted, like \"fmt\""),

        // Type hints
        ("type", TokenKind::Colon) => Some("the type follows the name directly, without ':'"),
        ("type", _) => Some("try a type like 'int', '[]string', or 'map[string]int'"),

        // Pattern hints
        ("pattern", _) => Some("try '_', a literal, a name, or a variant like Some(x)"),

        // Statement terminator
        ("newline or ';'", _) => Some("end statements with a newline or ';'"),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_cover_common_mistakes() {
        assert_eq!(for_expected("'=>'", &TokenKind::Colon), Some("match arms use '=>', not ':'"));
        assert_eq!(
            for_expected("a name", &TokenKind::Int { radix: dingo_ast::token::Radix::Decimal, digits: "1".into() }),
            Some("names can't start with a number")
        );
        assert_eq!(
            for_expected("'='", &TokenKind::Newline),
            Some("'let' always needs an initializer: let x = value")
        );
    }

    #[test]
    fn unknown_expectations_have_no_hint() {
        assert_eq!(for_expected("'...'", &TokenKind::Comma), None);
        assert_eq!(for_expected("')'", &TokenKind::Comma), None);
    }
}
