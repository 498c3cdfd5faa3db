// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.
//!
//! Maps error codes (E0001, E0100, etc.) to titles and categories.

use std::collections::HashMap;

use dingo_lexer::LexErrorKind;

/// Registry of all known error codes.
pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

/// Information about a single error code.
#[derive(Debug)]
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

/// Error category for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Lexical => write!(f, "Lexical"),
            ErrorCategory::Syntax => write!(f, "Syntax"),
        }
    }
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
            });
        )*
        map
    }};
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                // Lexer errors (E00xx)
                "E0001" => ("unexpected character", Lexical),
                "E0002" => ("unterminated string literal", Lexical),
                "E0003" => ("unterminated raw string literal", Lexical),
                "E0004" => ("unterminated rune literal", Lexical),
                "E0005" => ("unterminated block comment", Lexical),
                "E0006" => ("invalid escape sequence", Lexical),
                "E0007" => ("invalid number literal", Lexical),
                "E0008" => ("empty rune literal", Lexical),
                "E0009" => ("rune literal with several characters", Lexical),

                // Parser errors (E01xx)
                "E0100" => ("unexpected token", Syntax),
                "E0101" => ("unclosed delimiter", Syntax),
                "E0102" => ("missing statement terminator", Syntax),
                "E0103" => ("nesting too deep", Syntax),
                "E0104" => ("conflicting variant payloads", Syntax),
                "E0105" => ("malformed parameter list", Syntax),
                "E0106" => ("invalid syntax", Syntax),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    /// All codes in ascending order.
    pub fn all(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        let mut infos: Vec<_> = self.codes.values().collect();
        infos.sort_by_key(|info| info.code);
        infos.into_iter()
    }
}

/// Code for a lexical error.
pub fn lex_code(kind: LexErrorKind) -> &'static str {
    match kind {
        LexErrorKind::UnexpectedChar => "E0001",
        LexErrorKind::UnterminatedString => "E0002",
        LexErrorKind::UnterminatedRawString => "E0003",
        LexErrorKind::UnterminatedRune => "E0004",
        LexErrorKind::UnterminatedComment => "E0005",
        LexErrorKind::InvalidEscape => "E0006",
        LexErrorKind::InvalidNumber => "E0007",
        LexErrorKind::EmptyRune => "E0008",
        LexErrorKind::MultiCharRune => "E0009",
    }
}

/// Code for a syntax error, classified by its message.
pub fn syntax_code(message: &str) -> &'static str {
    if message.starts_with("Unclosed") {
        "E0101"
    } else if message.starts_with("Expected ';' or newline") {
        "E0102"
    } else if message.contains("nested too deeply") {
        "E0103"
    } else if message.contains("cannot have both tuple and struct fields") {
        "E0104"
    } else if message.contains("named and unnamed parameters")
        || message.starts_with("Missing type for parameter")
    {
        "E0105"
    } else if message.starts_with("Expected") {
        "E0100"
    } else {
        "E0106"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_lex_kind_has_a_registered_code() {
        let registry = ErrorCodeRegistry::default();
        let kinds = [
            LexErrorKind::UnexpectedChar,
            LexErrorKind::UnterminatedString,
            LexErrorKind::UnterminatedRawString,
            LexErrorKind::UnterminatedRune,
            LexErrorKind::UnterminatedComment,
            LexErrorKind::InvalidEscape,
            LexErrorKind::InvalidNumber,
            LexErrorKind::EmptyRune,
            LexErrorKind::MultiCharRune,
        ];
        for kind in kinds {
            let info = registry.get(lex_code(kind)).unwrap();
            assert_eq!(info.category, ErrorCategory::Lexical);
        }
    }

    #[test]
    fn syntax_messages_are_classified() {
        assert_eq!(syntax_code("Expected type, found ','"), "E0100");
        assert_eq!(syntax_code("Unclosed '(' - missing ')'"), "E0101");
        assert_eq!(syntax_code("Expected ';' or newline after statement, found a name"), "E0102");
        assert_eq!(syntax_code("Source is nested too deeply"), "E0103");
        assert_eq!(syntax_code("Variant 'V' cannot have both tuple and struct fields"), "E0104");
        assert_eq!(syntax_code("Cannot mix named and unnamed parameters"), "E0105");
        assert_eq!(syntax_code("Middle index required in 3-index slice"), "E0106");
    }

    #[test]
    fn listing_is_sorted() {
        let registry = ErrorCodeRegistry::default();
        let codes: Vec<_> = registry.all().map(|info| info.code).collect();
        assert_eq!(codes.first(), Some(&"E0001"));
        assert_eq!(codes.last(), Some(&"E0106"));
        assert_eq!(codes.len(), 16);
        assert_eq!(registry.get("E0101").map(|i| i.category.to_string()), Some("Syntax".into()));
    }
}
