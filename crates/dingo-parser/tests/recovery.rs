// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error recovery: bad input yields a tree plus ordered, bounded diagnostics.

use dingo_ast::decl::DeclKind;
use dingo_ast::expr::{ElementValue, Expr, ExprBody, ExprKind};
use dingo_ast::stmt::{Stmt, StmtKind};
use dingo_ast::FileId;
use dingo_parser::{parse_source, parse_source_with, ErrorKind, ParseResult, ParserConfig};
use pretty_assertions::assert_eq;

fn messages(src: &str) -> Vec<String> {
    parse_source(FileId(0), src).errors.into_iter().map(|e| e.message).collect()
}

/// Statements of the first function in the file.
fn body(result: &ParseResult) -> &[Stmt] {
    match &result.file.decls[0].kind {
        DeclKind::Func(f) => f.body.as_ref().map(|b| b.stmts.as_slice()).unwrap_or_default(),
        other => panic!("expected function, got {other:?}"),
    }
}

/// The single value bound by a `:=` statement.
fn bound_value(stmt: &Stmt) -> &Expr {
    match &stmt.kind {
        StmtKind::ShortVarDecl { values, .. } => &values[0],
        other => panic!("expected ':=', got {other:?}"),
    }
}

#[test]
fn independent_errors_in_separate_declarations() {
    let src = "func a() {\n\tx := )\n}\n\nfunc b() {\n\ty := ]\n}\n\nfunc c() {}\n";
    let result = parse_source(FileId(0), src);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.file.decls.len(), 3);
    assert!(result.file.decls.iter().all(|d| matches!(d.kind, DeclKind::Func(_))));
}

#[test]
fn broken_declaration_becomes_placeholder() {
    let src = "func 1\nvar ok = 1\n";
    let result = parse_source(FileId(0), src);
    assert!(!result.errors.is_empty());
    assert!(matches!(result.file.decls[0].kind, DeclKind::Bad));
    assert!(matches!(result.file.decls.last().map(|d| &d.kind), Some(DeclKind::Var(_))));
}

#[test]
fn missing_terminator_between_statements() {
    let msgs = messages("x := 1 y := 2\n");
    assert_eq!(msgs, vec!["Expected ';' or newline after statement, found a name".to_string()]);
}

#[test]
fn unclosed_delimiter_names_the_opener() {
    let msgs = messages("f(a, b\n");
    assert_eq!(msgs, vec!["Unclosed '(' - missing ')'".to_string()]);
}

#[test]
fn errors_are_sorted_by_position() {
    let src = "a := )\nb := \"unterminated\nc := ]\n";
    let result = parse_source(FileId(0), src);
    let starts: Vec<usize> = result.errors.iter().map(|e| e.span.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
    assert!(result.errors.iter().any(|e| matches!(e.kind, ErrorKind::Lexical(_))));
    assert!(result.errors.iter().any(|e| e.kind == ErrorKind::Syntax));
}

#[test]
fn error_cap_stops_the_parse() {
    let src = "a := )\n".repeat(50);
    let config = ParserConfig::default().with_max_errors(5);
    let result = parse_source_with(FileId(0), &src, &config);
    assert_eq!(result.errors.len(), 5);
}

#[test]
fn bad_match_arm_keeps_the_rest() {
    let src = "r := match x {\n\t1 => a,\n\t+ => b,\n\t3 => c,\n}\n";
    let result = parse_source(FileId(0), src);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].message, "Expected pattern, found '+'");
    let DeclKind::Stmt(stmt) = &result.file.decls[0].kind else { panic!() };
    let ExprKind::Match { arms, .. } = &bound_value(stmt).kind else { panic!() };
    let placeholders: Vec<bool> = arms.iter().map(|a| a.is_error()).collect();
    assert_eq!(placeholders, vec![false, true, false]);
}

#[test]
fn missing_argument_keeps_the_call() {
    let src = "func main() {\n\tx := f(a, +)\n\ty := 2\n}\n";
    let result = parse_source(FileId(0), src);
    assert_eq!(result.errors.len(), 1);
    let stmts = body(&result);
    assert_eq!(stmts.len(), 2);
    let ExprKind::Call { args, .. } = &bound_value(&stmts[0]).kind else { panic!("{:?}", stmts[0]) };
    assert_eq!(args.len(), 2);
    assert!(matches!(&args[1].kind, ExprKind::Unary { operand, .. } if operand.is_error()));
    assert!(matches!(&stmts[1].kind, StmtKind::ShortVarDecl { names, .. } if names[0].name == "y"));
}

#[test]
fn missing_right_operand() {
    let src = "func main() {\n\tz := a +\n}\n";
    let result = parse_source(FileId(0), src);
    assert_eq!(messages(src), vec!["Expected expression, found '}'".to_string()]);
    let ExprKind::Binary { left, right, .. } = &bound_value(&body(&result)[0]).kind else { panic!() };
    assert!(!left.is_error());
    assert!(right.is_error());
}

#[test]
fn missing_composite_element() {
    let src = "p := Point{X: 1, Y: , Z: 3}\n";
    let result = parse_source(FileId(0), src);
    assert_eq!(result.errors.len(), 1);
    let DeclKind::Stmt(stmt) = &result.file.decls[0].kind else { panic!() };
    let ExprKind::CompositeLit { body, .. } = &bound_value(stmt).kind else { panic!() };
    assert_eq!(body.elements.len(), 3);
    assert!(matches!(&body.elements[1].value, ElementValue::Expr(e) if e.is_error()));
    assert!(matches!(&body.elements[2].value, ElementValue::Expr(e) if !e.is_error()));
}

#[test]
fn broken_arm_body_keeps_both_arms() {
    let src = "func f(r Result) {\n\tv := match r {\n\t\tOk(v) => v + ,\n\t\tErr(e) => 0,\n\t}\n}\n";
    let result = parse_source(FileId(0), src);
    assert_eq!(result.errors.len(), 1);
    let ExprKind::Match { arms, .. } = &bound_value(&body(&result)[0]).kind else { panic!() };
    assert_eq!(arms.len(), 2);
    let ExprBody::Expr(first) = &arms[0].body else { panic!() };
    assert!(matches!(&first.kind, ExprKind::Binary { right, .. } if right.is_error()));
    assert!(!arms[1].is_error());
}

#[test]
fn missing_and_empty_are_distinct() {
    let empty = parse_source(FileId(0), "f()\n");
    let missing = parse_source(FileId(0), "f(+)\n");
    let args = |result: &ParseResult| match &result.file.decls[0].kind {
        DeclKind::Stmt(Stmt { kind: StmtKind::Expr(Expr { kind: ExprKind::Call { args, .. }, .. }), .. }) => args.len(),
        other => panic!("{other:?}"),
    };
    assert_eq!(args(&empty), 0);
    assert_eq!(args(&missing), 1);
    assert!(empty.is_ok());
    assert!(!missing.is_ok());
}

#[test]
fn recovery_inside_case_bodies() {
    let src = "switch x {\ncase 1:\n\ta := )\n\tb := 2\ncase 2:\n\tc := 3\n}\n";
    let result = parse_source(FileId(0), src);
    assert_eq!(result.errors.len(), 1);
    let DeclKind::Stmt(stmt) = &result.file.decls[0].kind else { panic!() };
    let StmtKind::Switch(switch) = &stmt.kind else { panic!() };
    assert_eq!(switch.cases.len(), 2);
    assert_eq!(switch.cases[0].body.len(), 2);
}

#[test]
fn grouped_spec_recovery() {
    let src = "const (\n\tA = 1\n\tB = ]\n\tC = 3\n)\n";
    let result = parse_source(FileId(0), src);
    assert_eq!(result.errors.len(), 1);
    let DeclKind::Const(specs) = &result.file.decls[0].kind else { panic!("{:?}", result.file.decls) };
    let names: Vec<_> = specs.iter().map(|s| s.names[0].name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert!(specs[1].values[0].is_error());
}

#[test]
fn unnamed_spec_in_group_is_a_placeholder() {
    let src = "var (\n\ta = 1\n\t2\n\tc = 3\n)\n";
    let result = parse_source(FileId(0), src);
    assert_eq!(result.errors.len(), 1);
    let DeclKind::Var(specs) = &result.file.decls[0].kind else { panic!("{:?}", result.file.decls) };
    let placeholders: Vec<bool> = specs.iter().map(|s| s.is_error()).collect();
    assert_eq!(placeholders, vec![false, true, false]);
}

#[test]
fn deep_nesting_is_rejected_not_overflowed() {
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let depth = 5_000;
            let src = format!("x := {}1{}\n", "(".repeat(depth), ")".repeat(depth));
            parse_source(FileId(0), &src)
        })
        .unwrap();
    let result = handle.join().unwrap();
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("nested too deeply"));
}

#[test]
fn nesting_limit_is_configurable() {
    let src = "x := ((((1))))\n";
    let shallow = ParserConfig::default().with_max_nesting(3);
    assert!(!parse_source_with(FileId(0), src, &shallow).is_ok());
    assert!(parse_source(FileId(0), src).is_ok());
}
