//! `finder search` -- search files for lines or documents matching a
//! formula.
//!
//! Options are layered: configuration defaults, then the `--profile` (if
//! any), then explicit flags. The formula is validated before any file is
//! read; the search itself runs on a background worker and results are
//! printed as they arrive.

use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use finder_config::{FinderConfig, SearchProfile};
use finder_formula::{auto_formula, normalize_operators, validate};
use finder_search::{SearchEvent, SearchMatch, SearchParams, SearchWorker, parse_extension_list};
use finder_ui::styles;
use finder_ui::terminal::terminal_width;
use tracing::{debug, trace};

use crate::cli::SearchArgs;
use crate::context::RuntimeContext;
use crate::output::{eprint_report, format_match, output_json};

/// Execute the `finder search` command.
pub fn run(ctx: &RuntimeContext, args: &SearchArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let profile = match &args.profile {
        Some(name) => Some(ctx.find_profile(name)?),
        None => None,
    };
    let mut params = build_params(args, &config, profile.as_ref());

    if !params.phrases.has_active() {
        bail!("no phrases to search for (bind one with -p A=TEXT)");
    }
    if params.formula.trim().is_empty() {
        params.formula = auto_formula(&params.phrases);
        if ctx.chatty() {
            eprintln!(
                "{} Using formula: {}",
                styles::render_info_icon(),
                params.formula
            );
        }
    }
    check_formula(ctx, &params, &config, args.force)?;

    let formula = normalize_operators(&params.formula);
    let worker = SearchWorker::new(params)?;
    ctx.track_search(Some(worker.cancel_token()));
    let handle = worker.spawn();
    let handle = match handle {
        Ok(handle) => handle,
        Err(e) => {
            ctx.track_search(None);
            return Err(e.into());
        }
    };

    let mut found: Vec<SearchMatch> = Vec::new();
    let mut summary = None;
    for event in handle.events() {
        match event {
            SearchEvent::Started { total } => debug!(total, "files collected"),
            SearchEvent::Progress { current, total } => trace!(current, total, "searching"),
            SearchEvent::Match(mut m) => {
                let shown = ctx.display_path(&m.path);
                if ctx.json {
                    m.path = PathBuf::from(shown);
                    found.push(m);
                } else {
                    for line in format_match(&m, &shown, config.result_limit) {
                        println!("{}", line);
                    }
                }
            }
            SearchEvent::FileError { path, message } => {
                if !ctx.quiet {
                    eprintln!("{} {}: {}", styles::render_warn_icon(), path, message);
                }
            }
            SearchEvent::Finished(s) => summary = Some(s),
        }
    }
    ctx.track_search(None);
    handle.join()?;
    let summary = summary.ok_or_else(|| anyhow!("search ended without a summary"))?;

    if ctx.json {
        output_json(&serde_json::json!({
            "formula": formula,
            "matches": found,
            "summary": summary,
        }));
    } else if !ctx.quiet {
        println!("{}", styles::render_separator(terminal_width()));
        println!("{}", styles::render_summary(&summary.message, summary.matches));
    }

    Ok(())
}

/// Merge configuration, profile and flags into search parameters.
///
/// The formula is left empty when none was given anywhere.
pub fn build_params(
    args: &SearchArgs,
    config: &FinderConfig,
    profile: Option<&SearchProfile>,
) -> SearchParams {
    let mut params = SearchParams::new(Default::default(), String::new());
    params.mode = config.mode;
    params.extensions = config.normalized_extensions();
    params.unique = config.unique;
    params.snippet_length = config.snippet_length;

    if let Some(profile) = profile {
        profile.apply(&mut params);
    }

    params.phrases.merge(&args.phrases.to_phrase_set());
    if let Some(formula) = &args.formula {
        params.formula = formula.clone();
    }
    if let Some(mode) = args.mode {
        params.mode = mode;
    }
    if let Some(list) = &args.extensions {
        params.extensions = parse_extension_list(list);
    }
    if args.unique {
        params.unique = true;
    }
    if !args.paths.is_empty() {
        params.paths = args.paths.clone();
    }
    if params.paths.is_empty() {
        params.paths = vec![PathBuf::from(".")];
    }
    params.max_results = args.max_results;
    params
}

/// Refuse formulas with errors, and in strict mode formulas that can never
/// match, unless forced. Warnings are printed to stderr.
fn check_formula(
    ctx: &RuntimeContext,
    params: &SearchParams,
    config: &FinderConfig,
    force: bool,
) -> Result<()> {
    let report = validate(&params.formula, &params.phrases);
    if report.is_clean() {
        return Ok(());
    }
    if !report.is_valid() {
        eprint_report(&report);
        bail!("invalid formula '{}'", params.formula);
    }
    if report.is_blocked() && config.strict && !force {
        eprint_report(&report);
        bail!(
            "formula '{}' can never match (use --force to search anyway)",
            params.formula
        );
    }
    if !ctx.quiet {
        eprint_report(&report);
    }
    Ok(())
}
