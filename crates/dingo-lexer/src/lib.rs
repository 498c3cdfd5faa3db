// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for the Dingo language.
//!
//! Tokenizes source code into a stream of tokens for the parser, inserting
//! statement terminators at line ends the way Go does and keeping comments
//! aside as trivia.

mod error;
mod lexer;
mod literal;

pub use error::{LexError, LexErrorKind};
pub use lexer::{LexResult, Lexer};
