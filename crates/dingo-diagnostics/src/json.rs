// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON diagnostic output for machine consumption.
//!
//! Each diagnostic carries its code, category, exact line/column locations
//! and the surrounding source line so editors can act on it without
//! re-reading the file.

use serde::Serialize;

use dingo_ast::LineMap;

use crate::codes::ErrorCodeRegistry;
use crate::{Diagnostic, LabelStyle, Severity};

/// A complete JSON diagnostic report for one source file.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Schema version for forward compatibility.
    pub version: u32,
    /// The file that was parsed.
    pub file: String,
    /// True when no errors were reported.
    pub success: bool,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

/// A single diagnostic in JSON form, enriched with source context.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// "error" or "warning".
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// "Lexical" or "Syntax".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    /// Primary source location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// A source location with line/column (1-based).
#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
    pub source_line: String,
}

/// A labeled span in JSON form.
#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub role: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: LineCol,
    pub end: LineCol,
}

/// Line/column pair (1-based).
#[derive(Debug, Serialize)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

/// Build a report for the diagnostics of one file.
pub fn to_json_report(diagnostics: &[Diagnostic], source: &str, file: &str) -> DiagnosticReport {
    let registry = ErrorCodeRegistry::default();
    let line_map = LineMap::new(source);

    let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let warning_count = diagnostics.len() - error_count;
    let diagnostics = diagnostics
        .iter()
        .map(|d| to_json_diagnostic(d, source, &line_map, &registry))
        .collect();

    DiagnosticReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        diagnostics,
        error_count,
        warning_count,
    }
}

fn to_json_diagnostic(
    diag: &Diagnostic,
    source: &str,
    line_map: &LineMap,
    registry: &ErrorCodeRegistry,
) -> JsonDiagnostic {
    let code = diag.code.as_ref().map(|c| c.0.clone());
    let category = code
        .as_ref()
        .and_then(|c| registry.get(c))
        .map(|info| info.category.to_string());

    let location = diag.primary_span().map(|span| {
        let at = line_col(line_map, source, span.start);
        SourceLocation {
            line: at.line,
            column: at.column,
            byte_offset: at.byte_offset,
            source_line: line_map.line_text(source, at.line as u32).unwrap_or("").to_string(),
        }
    });

    let labels = diag
        .labels
        .iter()
        .map(|l| JsonLabel {
            role: l.style,
            message: l.message.clone(),
            start: line_col(line_map, source, l.span.start),
            end: line_col(line_map, source, l.span.end),
        })
        .collect();

    JsonDiagnostic {
        severity: diag.severity,
        code,
        category,
        message: diag.message.clone(),
        location,
        labels,
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}

fn line_col(line_map: &LineMap, source: &str, offset: usize) -> LineCol {
    let offset = offset.min(source.len());
    let (line, column) = line_map.offset_to_line_col(offset);
    LineCol { line: line as usize, column: column as usize, byte_offset: offset }
}

/// Serialize a report to pretty JSON.
pub fn to_json_string(report: &DiagnosticReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics_for;
    use dingo_ast::{FileId, Span};
    use dingo_parser::parse_source;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn report_counts_and_locations() {
        let src = "package main\n\nx := )\ny := \"open\n";
        let result = parse_source(FileId(0), src);
        let report = to_json_report(&diagnostics_for(&result), src, "main.dingo");

        assert!(!report.success);
        assert_eq!(report.error_count, 2);
        assert_eq!(report.warning_count, 0);

        let first = &report.diagnostics[0];
        assert_eq!(first.category.as_deref(), Some("Syntax"));
        let location = first.location.as_ref().unwrap();
        assert_eq!((location.line, location.column), (3, 6));
        assert_eq!(location.source_line, "x := )");
        assert_eq!((first.labels[0].start.byte_offset, first.labels[0].end.byte_offset), (19, 20));

        assert_eq!(report.diagnostics[1].category.as_deref(), Some("Lexical"));
    }

    #[test]
    fn serialized_shape() {
        let diag = Diagnostic::error("Unexpected character '@'")
            .with_code("E0001")
            .with_primary(Span::new(5, 6), "unexpected character");
        let report = to_json_report(&[diag], "x := @\n", "a.dingo");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "version": 1,
                "file": "a.dingo",
                "success": false,
                "error_count": 1,
                "warning_count": 0,
                "diagnostics": [{
                    "severity": "error",
                    "code": "E0001",
                    "category": "Lexical",
                    "message": "Unexpected character '@'",
                    "location": { "line": 1, "column": 6, "byte_offset": 5, "source_line": "x := @" },
                    "labels": [{
                        "role": "primary",
                        "message": "unexpected character",
                        "start": { "line": 1, "column": 6, "byte_offset": 5 },
                        "end": { "line": 1, "column": 7, "byte_offset": 6 }
                    }]
                }]
            })
        );
        assert!(to_json_string(&report).unwrap().contains("\"E0001\""));
    }

    #[test]
    fn clean_report_succeeds() {
        let report = to_json_report(&[], "package main\n", "ok.dingo");
        assert!(report.success);
        assert!(report.diagnostics.is_empty());
    }
}
