//! `finder eval` -- evaluate a formula against a piece of text.
//!
//! By default a formula that does not parse evaluates to `false`, the same
//! way it would fail to match during a search. `--strict` reports the parse
//! error instead.

use std::io::Read;

use anyhow::{Context, Result};
use finder_formula::{Formula, evaluate_formula};

use crate::cli::EvalArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `finder eval` command.
pub fn run(ctx: &RuntimeContext, args: &EvalArgs) -> Result<()> {
    let text = match &args.text {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read text from stdin")?;
            buf
        }
    };
    let phrases = args.phrases.to_phrase_set();

    let result = if args.strict {
        let formula = Formula::parse(&args.formula)
            .with_context(|| format!("invalid formula '{}'", args.formula))?;
        formula.evaluate(&text, &phrases)
    } else {
        evaluate_formula(&text, &phrases, &args.formula)
    };
    tracing::debug!(formula = %args.formula, result, "evaluated formula");

    if ctx.json {
        let matched: Vec<String> = phrases
            .iter()
            .filter(|(_, phrase)| phrase.matches(&text))
            .map(|(letter, _)| letter.to_string())
            .collect();
        output_json(&serde_json::json!({
            "formula": args.formula,
            "result": result,
            "matched": matched,
        }));
    } else {
        println!("{}", result);
    }

    Ok(())
}
