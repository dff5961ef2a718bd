//! Output formatting helpers for the `finder` CLI.
//!
//! Provides JSON output, table formatting, and human-readable rendering of
//! search matches and formula validation reports.

use std::io::{self, Write};

use finder_formula::{Diagnostic, Severity, ValidationReport, normalize_operators};
use finder_search::SearchMatch;
use finder_ui::styles;
use serde::Serialize;

/// JSON view of a [`ValidationReport`].
#[derive(Serialize)]
pub struct ReportView<'a> {
    pub formula: &'a str,
    pub normalized: String,
    pub valid: bool,
    pub blocked: bool,
    pub diagnostics: &'a [Diagnostic],
    pub suggestions: Vec<&'static str>,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a ValidationReport) -> Self {
        Self {
            formula: &report.formula,
            normalized: normalize_operators(&report.formula),
            valid: report.is_valid(),
            blocked: report.is_blocked(),
            diagnostics: &report.diagnostics,
            suggestions: report.suggestions(),
        }
    }
}

/// Print a value as pretty JSON to stdout.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a simple table with headers and rows.
///
/// Each row is a `Vec<String>` with columns matching the headers.
/// Column widths are computed from the data for alignment.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for (i, header) in headers.iter().enumerate() {
        if i > 0 {
            let _ = write!(handle, "  ");
        }
        let _ = write!(handle, "{:<width$}", header, width = widths[i]);
    }
    let _ = writeln!(handle);

    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            let _ = write!(handle, "  ");
        }
        let _ = write!(handle, "{}", "-".repeat(*width));
    }
    let _ = writeln!(handle);

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                let _ = write!(handle, "  ");
            }
            if i < widths.len() {
                let _ = write!(handle, "{:<width$}", cell, width = widths[i]);
            } else {
                let _ = write!(handle, "{}", cell);
            }
        }
        let _ = writeln!(handle);
    }
}

/// Render a normalized formula with its operator keywords highlighted.
pub fn highlight_formula(normalized: &str) -> String {
    normalized
        .split(' ')
        .map(|word| match word {
            "AND" | "OR" | "NOT" | "XOR" | "NOR" | "XNOR" => styles::render_operator(word),
            _ => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one search match as display lines: the path, then the text
/// (prefixed by its line number in line mode), then a blank line.
pub fn format_match(m: &SearchMatch, shown_path: &str, result_limit: usize) -> Vec<String> {
    let text = styles::truncate_text(&m.text, result_limit);
    vec![
        styles::render_path(shown_path),
        format!("{}{}", styles::render_line_number(m.line_number, m.is_unique), text),
        String::new(),
    ]
}

/// Render a validation report, one diagnostic per line, followed by
/// suggestions. A report without findings renders as a single pass line.
pub fn format_report(report: &ValidationReport) -> Vec<String> {
    if report.is_clean() {
        return vec![format!(
            "{} Formula is valid: {}",
            styles::render_pass_icon(),
            highlight_formula(&normalize_operators(&report.formula))
        )];
    }

    let mut lines: Vec<String> = report
        .diagnostics
        .iter()
        .map(|d| match d.severity {
            Severity::Error => {
                format!("{} {}", styles::render_fail_icon(), styles::render_fail(&d.message))
            }
            Severity::Warning => {
                format!("{} {}", styles::render_warn_icon(), styles::render_warn(&d.message))
            }
        })
        .collect();

    let suggestions = report.suggestions();
    if !suggestions.is_empty() {
        lines.push(styles::render_category("Suggestions"));
        lines.extend(
            suggestions
                .iter()
                .map(|s| format!("  {} {}", styles::render_hint_icon(), s)),
        );
    }
    lines
}

/// Print a validation report to stderr.
pub fn eprint_report(report: &ValidationReport) {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    for line in format_report(report) {
        let _ = writeln!(handle, "{}", line);
    }
}
