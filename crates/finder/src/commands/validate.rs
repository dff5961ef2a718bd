//! `finder validate` -- check a formula for errors and logical problems.
//!
//! Exits with status 1 when the formula has errors. Warnings (unbound
//! letters, contradictions, tautologies) are reported but do not fail.

use anyhow::Result;
use finder_formula::{DiagnosticKind, validate};

use crate::cli::ValidateArgs;
use crate::context::RuntimeContext;
use crate::output::{ReportView, format_report, output_json};

/// Execute the `finder validate` command.
pub fn run(ctx: &RuntimeContext, args: &ValidateArgs) -> Result<()> {
    let mut report = validate(&args.formula, &args.phrases.to_phrase_set());

    // Without any phrases every letter would be reported as unbound.
    if args.phrases.is_empty() {
        report
            .diagnostics
            .retain(|d| d.kind != DiagnosticKind::MissingPhrase);
    }

    if ctx.json {
        output_json(&ReportView::new(&report));
    } else if !ctx.quiet || !report.is_valid() {
        for line in format_report(&report) {
            println!("{}", line);
        }
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
