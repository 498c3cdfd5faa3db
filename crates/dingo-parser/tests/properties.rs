// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Robustness properties over arbitrary and token-soup input.

use dingo_ast::decl::DeclKind;
use dingo_ast::expr::{Expr, ExprKind};
use dingo_ast::stmt::StmtKind;
use dingo_ast::FileId;
use dingo_parser::{parse_source, parse_source_with, ParserConfig};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "func", "f", "x", "y", "(", ")", "{", "}", "[", "]", ",", ";", "\n", ":=", "=", "+", "|", "||",
    "?", "?.", "??", "=>", "match", "enum", "let", "if", "else", "for", "range", "switch", "case",
    "default", ":", "1", "\"s\"", "'c'", "_", ".", "type", "struct", "interface", "<-", "chan", "map",
    "var", "const", "return", "go", "defer", "select", "*", "&", "...", "@", "\"open",
];

fn token_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..60).prop_map(|parts| parts.join(" "))
}

const OPERANDS: &[&str] = &["a", "b", "c", "d", "e"];

/// Binary operators with their precedence level, loosest first.
const OPERATORS: &[(&str, u8)] = &[
    ("||", 1),
    ("&&", 2),
    ("??", 3),
    ("==", 4),
    ("!=", 4),
    ("<", 4),
    ("<=", 4),
    (">", 4),
    (">=", 4),
    ("+", 5),
    ("-", 5),
    ("|", 5),
    ("^", 5),
    ("*", 6),
    ("/", 6),
    ("%", 6),
    ("<<", 6),
    (">>", 6),
    ("&", 6),
    ("&^", 6),
];

/// Operands and the operators between them.
fn binary_chain() -> impl Strategy<Value = (Vec<&'static str>, Vec<(&'static str, u8)>)> {
    (1usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::sample::select(OPERANDS), n),
            prop::collection::vec(prop::sample::select(OPERATORS), n - 1),
        )
    })
}

/// Fully parenthesized grouping by precedence climbing, left-associative.
fn grouped(operands: &[&str], ops: &[(&str, u8)], pos: &mut usize, min: u8) -> String {
    let mut left = operands[*pos].to_string();
    while let Some(&(sym, level)) = ops.get(*pos) {
        if level < min {
            break;
        }
        *pos += 1;
        let right = grouped(operands, ops, pos, level + 1);
        left = format!("({left} {sym} {right})");
    }
    left
}

fn shape(e: &Expr) -> String {
    match &e.kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Binary { op, left, right } => format!("({} {} {})", shape(left), op.symbol(), shape(right)),
        ExprKind::NullCoalesce { left, right } => format!("({} ?? {})", shape(left), shape(right)),
        other => format!("{other:?}"),
    }
}

proptest! {
    #[test]
    fn arbitrary_text_never_panics(src in "\\PC{0,200}") {
        let result = parse_source(FileId(0), &src);
        for err in &result.errors {
            prop_assert!(err.span.start <= err.span.end);
            prop_assert!(err.span.end <= src.len());
        }
    }

    #[test]
    fn token_soup_respects_the_error_cap(src in token_soup(), cap in 1usize..8) {
        let config = ParserConfig::default().with_max_errors(cap);
        let result = parse_source_with(FileId(0), &src, &config);
        prop_assert!(result.errors.len() <= cap);
    }

    #[test]
    fn decl_spans_are_ordered_and_in_bounds(src in token_soup()) {
        let result = parse_source(FileId(0), &src);
        let mut last_end = 0;
        for decl in &result.file.decls {
            prop_assert!(decl.span.start >= last_end, "{:?} overlaps previous decl", decl.span);
            prop_assert!(decl.span.end <= src.len());
            last_end = decl.span.end;
        }
    }

    #[test]
    fn parsing_is_deterministic(src in token_soup()) {
        let first = parse_source(FileId(0), &src);
        let second = parse_source(FileId(0), &src);
        prop_assert_eq!(first.file, second.file);
        prop_assert_eq!(first.errors, second.errors);
    }

    #[test]
    fn binary_chains_group_by_precedence((operands, ops) in binary_chain()) {
        let mut src = format!("x := {}", operands[0]);
        for ((sym, _), operand) in ops.iter().zip(&operands[1..]) {
            src.push_str(&format!(" {sym} {operand}"));
        }
        src.push('\n');

        let result = parse_source(FileId(0), &src);
        prop_assert!(result.is_ok(), "{:?}", result.errors);
        let DeclKind::Stmt(stmt) = &result.file.decls[0].kind else {
            return Err(TestCaseError::fail(format!("{:?}", result.file.decls)));
        };
        let StmtKind::ShortVarDecl { values, .. } = &stmt.kind else {
            return Err(TestCaseError::fail(format!("{stmt:?}")));
        };
        prop_assert_eq!(shape(&values[0]), grouped(&operands, &ops, &mut 0, 0));
    }
}
