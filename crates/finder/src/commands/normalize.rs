//! `finder normalize` -- rewrite shorthand operators as words.

use anyhow::Result;
use finder_formula::{normalize_operators, tokenize};

use crate::cli::NormalizeArgs;
use crate::context::RuntimeContext;
use crate::output::{highlight_formula, output_json};

/// Execute the `finder normalize` command.
///
/// JSON output also lists the tokens when the formula tokenizes cleanly.
pub fn run(ctx: &RuntimeContext, args: &NormalizeArgs) -> Result<()> {
    let normalized = normalize_operators(&args.formula);

    if ctx.json {
        let tokens: Option<Vec<String>> = tokenize(&args.formula)
            .ok()
            .map(|tokens| tokens.iter().map(|t| t.value.to_string()).collect());
        output_json(&serde_json::json!({
            "formula": args.formula,
            "normalized": normalized,
            "tokens": tokens,
        }));
    } else {
        println!("{}", highlight_formula(&normalized));
    }

    Ok(())
}
