// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rich terminal formatter for diagnostics.
//!
//! Produces multi-line, color-coded output:
//!
//! ```text
//! error[E0101]: Unclosed '(' - missing ')'
//!   --> main.dingo:3:21
//!     |
//!   3 |     fmt.Println(a, b
//!     |                     ^ unclosed delimiter
//!     |
//!     = help: add ')' to close the parenthesis
//! ```

use std::collections::BTreeMap;

use colored::Colorize;

use dingo_ast::LineMap;

use crate::{Diagnostic, LabelStyle, Severity};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

/// A source line with its labels.
struct AnnotatedLine {
    line_num: usize,
    text: String,
    annotations: Vec<Annotation>,
}

struct Annotation {
    col_start: usize,
    col_end: usize,
    style: LabelStyle,
    message: Option<String>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, file_name: None, line_map: LineMap::new(source) }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    /// Render every diagnostic, separated by blank lines.
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| self.format(d))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.format_header(&mut out, diagnostic);

        let annotated = self.collect_annotated_lines(diagnostic);
        let Some(first) = annotated.first() else {
            self.format_footer(&mut out, diagnostic, 2);
            return out;
        };

        let file = self.file_name.unwrap_or("<source>");
        let (_, col) = diagnostic
            .primary_span()
            .map(|span| self.offset_to_line_col(span.start))
            .unwrap_or((first.line_num, 1));
        out.push_str(&format!("  {} {}:{}:{}\n", "-->".blue(), file, first.line_num, col));

        let max_line = annotated.last().map(|a| a.line_num).unwrap_or(1);
        let gutter_width = max_line.to_string().len().max(2);

        out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue()));
        let mut prev_line_num: Option<usize> = None;
        for annotated_line in &annotated {
            if let Some(prev) = prev_line_num {
                if annotated_line.line_num > prev + 1 {
                    out.push_str(&format!("{} {}\n", " ".repeat(gutter_width), "...".blue()));
                }
            }

            out.push_str(&format!(
                "{:>width$} {} {}\n",
                annotated_line.line_num.to_string().blue().bold(),
                "|".blue(),
                annotated_line.text,
                width = gutter_width + 1,
            ));
            self.format_annotations(&mut out, annotated_line, gutter_width);
            prev_line_num = Some(annotated_line.line_num);
        }

        if !diagnostic.notes.is_empty() || diagnostic.help.is_some() {
            out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue()));
        }
        self.format_footer(&mut out, diagnostic, gutter_width);
        out
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity_str = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };

        match diagnostic.code {
            Some(ref code) => out.push_str(&format!(
                "{}[{}]: {}\n",
                severity_str,
                code.0.clone().red().bold(),
                diagnostic.message.bold()
            )),
            None => out.push_str(&format!("{}: {}\n", severity_str, diagnostic.message.bold())),
        }
    }

    fn format_footer(&self, out: &mut String, diagnostic: &Diagnostic, gutter_width: usize) {
        let pad = " ".repeat(gutter_width + 1);
        for note in &diagnostic.notes {
            out.push_str(&format!("{} {} {}: {}\n", pad, "=".cyan(), "note".cyan().bold(), note));
        }
        if let Some(ref help) = diagnostic.help {
            out.push_str(&format!("{} {} {}: {}\n", pad, "=".cyan(), "help".cyan().bold(), help));
        }
    }

    fn collect_annotated_lines(&self, diagnostic: &Diagnostic) -> Vec<AnnotatedLine> {
        let mut lines_map: BTreeMap<usize, AnnotatedLine> = BTreeMap::new();

        for label in &diagnostic.labels {
            let (line_num, col_start) = self.offset_to_line_col(label.span.start);
            let (end_line, col_end) = self.offset_to_line_col(label.span.end);
            let text = self.get_line(line_num).unwrap_or("");

            // Multi-line spans are underlined to the end of their first line.
            let col_end = if end_line == line_num { col_end } else { text.len() + 1 };

            let entry = lines_map.entry(line_num).or_insert_with(|| AnnotatedLine {
                line_num,
                text: text.to_string(),
                annotations: Vec::new(),
            });
            entry.annotations.push(Annotation {
                col_start,
                col_end: col_end.max(col_start + 1),
                style: label.style,
                message: label.message.clone(),
            });
        }

        lines_map.into_values().collect()
    }

    fn format_annotations(&self, out: &mut String, annotated_line: &AnnotatedLine, gutter_width: usize) {
        let mut sorted: Vec<&Annotation> = annotated_line.annotations.iter().collect();
        sorted.sort_by_key(|a| (a.style.priority(), a.col_start));

        let line_len = annotated_line
            .text
            .len()
            .max(sorted.iter().map(|a| a.col_end).max().unwrap_or(0))
            + 1;
        let mut underline = vec![' '; line_len];
        let mut messages: Vec<(usize, LabelStyle, &str)> = Vec::new();

        for ann in &sorted {
            let ch = match ann.style {
                LabelStyle::Primary => '^',
                LabelStyle::Secondary => '-',
            };
            for slot in &mut underline[ann.col_start - 1..ann.col_end - 1] {
                if *slot == ' ' {
                    *slot = ch;
                }
            }
            if let Some(ref msg) = ann.message {
                messages.push((ann.col_start, ann.style, msg));
            }
        }

        let underline_str: String = underline.iter().collect::<String>().trim_end().to_string();
        if underline_str.is_empty() {
            return;
        }
        let colored_underline = color_underline(&underline_str);
        let pad = " ".repeat(gutter_width + 1);

        match messages.as_slice() {
            [] => out.push_str(&format!("{} {} {}\n", pad, "|".blue(), colored_underline)),
            [(_, style, msg)] => out.push_str(&format!(
                "{} {} {} {}\n",
                pad,
                "|".blue(),
                colored_underline,
                style_message(*style, msg)
            )),
            _ => {
                out.push_str(&format!("{} {} {}\n", pad, "|".blue(), colored_underline));
                // Rightmost label first so connectors don't cross.
                let mut by_column = messages.clone();
                by_column.sort_by_key(|(col, _, _)| std::cmp::Reverse(*col));
                for (col, style, msg) in by_column {
                    let pipe = match style {
                        LabelStyle::Primary => "|".red().bold().to_string(),
                        LabelStyle::Secondary => "|".blue().to_string(),
                    };
                    out.push_str(&format!(
                        "{} {} {}{} {}\n",
                        pad,
                        "|".blue(),
                        " ".repeat(col - 1),
                        pipe,
                        style_message(style, msg),
                    ));
                }
            }
        }
    }

    /// Convert byte offset to (line, col), both 1-based.
    fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let (line, col) = self.line_map.offset_to_line_col(offset.min(self.source.len()));
        (line as usize, col as usize)
    }

    /// Get source line text by 1-based line number.
    fn get_line(&self, line_num: usize) -> Option<&str> {
        self.line_map.line_text(self.source, line_num as u32)
    }
}

impl LabelStyle {
    fn priority(self) -> u8 {
        match self {
            LabelStyle::Primary => 0,
            LabelStyle::Secondary => 1,
        }
    }
}

fn style_message(style: LabelStyle, msg: &str) -> String {
    match style {
        LabelStyle::Primary => msg.red().bold().to_string(),
        LabelStyle::Secondary => msg.blue().to_string(),
    }
}

/// Color the underline characters (^ in red, - in blue).
fn color_underline(s: &str) -> String {
    let mut result = String::new();
    let mut current = None;
    let mut run = String::new();

    for ch in s.chars() {
        let kind = matches!(ch, '^' | '-').then_some(ch);
        if kind != current && !run.is_empty() {
            result.push_str(&flush_run(&run, current));
            run.clear();
        }
        run.push(ch);
        current = kind;
    }
    if !run.is_empty() {
        result.push_str(&flush_run(&run, current));
    }
    result
}

fn flush_run(run: &str, kind: Option<char>) -> String {
    match kind {
        Some('^') => run.red().bold().to_string(),
        Some('-') => run.blue().to_string(),
        _ => run.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dingo_ast::Span;
    use pretty_assertions::assert_eq;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn single_label_with_help() {
        plain();
        let src = "package main\n\nx := (1 +\n";
        let diag = Diagnostic::error("Expected expression, found newline")
            .with_code("E0100")
            .with_primary(Span::new(23, 24), "unexpected token")
            .with_help("finish the expression");
        let out = DiagnosticFormatter::new(src).with_file_name("main.dingo").format(&diag);
        let expected = "\
error[E0100]: Expected expression, found newline
  --> main.dingo:3:10
    |
  3 | x := (1 +
    |          ^ unexpected token
    |
    = help: finish the expression
";
        assert_eq!(out, expected);
    }

    #[test]
    fn two_labels_on_one_line() {
        plain();
        let src = "f(a b)";
        let diag = Diagnostic::error("Expected ',' or ')'")
            .with_secondary(Span::new(1, 2), "list opened here")
            .with_primary(Span::new(4, 5), "unexpected");
        let out = DiagnosticFormatter::new(src).format(&diag);
        let expected = "\
error: Expected ',' or ')'
  --> <source>:1:5
    |
  1 | f(a b)
    |  -  ^
    |     | unexpected
    |  | list opened here
";
        assert_eq!(out, expected);
    }

    #[test]
    fn labels_on_distant_lines_show_a_gap() {
        plain();
        let src = "a\nb\nc\nd\n";
        let diag = Diagnostic::error("broken")
            .with_primary(Span::new(0, 1), "first")
            .with_secondary(Span::new(6, 7), "second");
        let out = DiagnosticFormatter::new(src).format(&diag);
        assert!(out.contains("\n   ...\n"), "{out}");
        assert!(out.contains("  4 | d\n"), "{out}");
    }

    #[test]
    fn no_labels_prints_header_and_notes() {
        plain();
        let diag = Diagnostic::warning("nothing to point at").with_note("a note");
        let out = DiagnosticFormatter::new("").format(&diag);
        assert_eq!(out, "warning: nothing to point at\n    = note: a note\n");
    }

    #[test]
    fn eof_label_is_rendered_past_the_last_line() {
        plain();
        let src = "f(a";
        let diag = Diagnostic::error("Unclosed '(' - missing ')'").with_primary(Span::empty_at(3), "here");
        let out = DiagnosticFormatter::new(src).format(&diag);
        assert!(out.contains("  1 | f(a\n    |    ^ here\n"), "{out}");
    }
}
