// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line of `span.start`.
    pub line: u32,
    /// 1-based byte column of `span.start`.
    pub col: u32,
}

impl Token {
    /// The exact source slice this token was lexed from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source).unwrap_or("")
    }

    /// True for the virtual terminators produced by semicolon insertion and EOF.
    pub fn is_implicit(&self) -> bool {
        matches!(self.kind, TokenKind::Newline | TokenKind::Eof)
    }
}

/// Base of an integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }
}

/// Evaluate integer digits in the given radix. `None` on overflow.
pub fn int_value(radix: Radix, digits: &str) -> Option<u64> {
    u64::from_str_radix(digits, radix.base()).ok()
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    // Literals
    /// Integer literal. `digits` has the base prefix and `_` separators removed.
    Int { radix: Radix, digits: String },
    /// Float literal with `_` separators removed.
    Float(String),
    /// Imaginary literal (without the `i` suffix), `_` separators removed.
    Imaginary(String),
    Rune(char),
    /// Interpreted string literal with escapes decoded.
    String(String),
    /// Raw string literal body.
    RawString(String),

    // Identifier
    Ident(String),

    // Host keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    // Dingo keywords
    Let,
    Enum,
    Match,

    // Literal keywords
    True,
    False,
    Nil,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    LtLt,       // <<
    GtGt,       // >>
    AmpCaret,   // &^
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    AmpEq,      // &=
    PipeEq,     // |=
    CaretEq,    // ^=
    LtLtEq,     // <<=
    GtGtEq,     // >>=
    AmpCaretEq, // &^=
    AmpAmp,
    PipePipe,
    Arrow,      // <-
    PlusPlus,
    MinusMinus,
    EqEq,
    Lt,
    Gt,
    Eq,
    Bang,
    Tilde,
    BangEq,
    LtEq,
    GtEq,
    ColonEq,    // :=
    Ellipsis,   // ...
    Question,   // ?
    QuestionDot,      // ?.
    QuestionQuestion, // ??
    FatArrow,   // =>

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Semi,
    Colon,

    // Special
    /// Statement terminator inserted at a line end.
    Newline,
    /// Malformed input; the reason is recorded with the lexer's errors.
    Error(String),
    Eof,
}

impl TokenKind {
    /// True for literal tokens, including `true`, `false` and `nil`.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int { .. }
                | TokenKind::Float(_)
                | TokenKind::Imaginary(_)
                | TokenKind::Rune(_)
                | TokenKind::String(_)
                | TokenKind::RawString(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
        )
    }

    /// True if a newline directly after this token terminates the statement.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::Int { .. }
                | TokenKind::Float(_)
                | TokenKind::Imaginary(_)
                | TokenKind::Rune(_)
                | TokenKind::String(_)
                | TokenKind::RawString(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Return
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Question
        )
    }

    /// Returns a human-readable name for this token kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            // Literals
            TokenKind::Int { .. } => "a number",
            TokenKind::Float(_) => "a number",
            TokenKind::Imaginary(_) => "an imaginary number",
            TokenKind::Rune(_) => "a rune",
            TokenKind::String(_) => "a string",
            TokenKind::RawString(_) => "a raw string",

            TokenKind::Ident(_) => "a name",

            TokenKind::Break => "'break'",
            TokenKind::Case => "'case'",
            TokenKind::Chan => "'chan'",
            TokenKind::Const => "'const'",
            TokenKind::Continue => "'continue'",
            TokenKind::Default => "'default'",
            TokenKind::Defer => "'defer'",
            TokenKind::Else => "'else'",
            TokenKind::Fallthrough => "'fallthrough'",
            TokenKind::For => "'for'",
            TokenKind::Func => "'func'",
            TokenKind::Go => "'go'",
            TokenKind::Goto => "'goto'",
            TokenKind::If => "'if'",
            TokenKind::Import => "'import'",
            TokenKind::Interface => "'interface'",
            TokenKind::Map => "'map'",
            TokenKind::Package => "'package'",
            TokenKind::Range => "'range'",
            TokenKind::Return => "'return'",
            TokenKind::Select => "'select'",
            TokenKind::Struct => "'struct'",
            TokenKind::Switch => "'switch'",
            TokenKind::Type => "'type'",
            TokenKind::Var => "'var'",
            TokenKind::Let => "'let'",
            TokenKind::Enum => "'enum'",
            TokenKind::Match => "'match'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Nil => "'nil'",

            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::LtLt => "'<<'",
            TokenKind::GtGt => "'>>'",
            TokenKind::AmpCaret => "'&^'",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::AmpEq => "'&='",
            TokenKind::PipeEq => "'|='",
            TokenKind::CaretEq => "'^='",
            TokenKind::LtLtEq => "'<<='",
            TokenKind::GtGtEq => "'>>='",
            TokenKind::AmpCaretEq => "'&^='",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::Arrow => "'<-'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::EqEq => "'=='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Eq => "'='",
            TokenKind::Bang => "'!'",
            TokenKind::Tilde => "'~'",
            TokenKind::BangEq => "'!='",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::ColonEq => "':='",
            TokenKind::Ellipsis => "'...'",
            TokenKind::Question => "'?'",
            TokenKind::QuestionDot => "'?.'",
            TokenKind::QuestionQuestion => "'??'",
            TokenKind::FatArrow => "'=>'",

            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Semi => "';'",
            TokenKind::Colon => "':'",

            TokenKind::Newline => "end of line",
            TokenKind::Error(_) => "invalid input",
            TokenKind::Eof => "end of file",
        }
    }
}

/// Kind of comment trivia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommentKind {
    /// `// ...` up to the end of the line.
    Line,
    /// `/* ... */`, not nesting.
    Block,
}

/// A comment retained for tooling. The parser never sees these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comment {
    pub kind: CommentKind,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_value_handles_each_radix() {
        assert_eq!(int_value(Radix::Hex, "ff"), Some(255));
        assert_eq!(int_value(Radix::Octal, "17"), Some(15));
        assert_eq!(int_value(Radix::Binary, "101"), Some(5));
        assert_eq!(int_value(Radix::Decimal, "1000000"), Some(1_000_000));
        assert_eq!(int_value(Radix::Decimal, "99999999999999999999999"), None);
    }

    #[test]
    fn statement_enders_follow_go_rules() {
        assert!(TokenKind::Ident("x".into()).ends_statement());
        assert!(TokenKind::RParen.ends_statement());
        assert!(TokenKind::Question.ends_statement());
        assert!(TokenKind::Return.ends_statement());
        assert!(!TokenKind::Plus.ends_statement());
        assert!(!TokenKind::LBrace.ends_statement());
        assert!(!TokenKind::Comma.ends_statement());
    }

    #[test]
    fn token_text_slices_source() {
        let src = "x := 42";
        let tok = Token {
            kind: TokenKind::Int { radix: Radix::Decimal, digits: "42".into() },
            span: Span::new(5, 7),
            line: 1,
            col: 6,
        };
        assert_eq!(tok.text(src), "42");
        assert!(!tok.is_implicit());
    }
}
