//! `finder` -- search files with boolean formulas over phrases.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::{ActiveSearch, RuntimeContext};

/// Exit status after an interrupt.
const INTERRUPTED: i32 = 130;

/// Install the Ctrl+C handler. The first signal cancels the search held in
/// `active_search`, if there is one; the second always exits.
fn install_interrupt_handler(active_search: &ActiveSearch) {
    let active_search = Arc::clone(active_search);
    let mut received = false;
    let _ = ctrlc::set_handler(move || {
        if received {
            // Second signal: force exit
            std::process::exit(INTERRUPTED);
        }
        received = true;
        let active = active_search.lock().ok().and_then(|guard| guard.clone());
        match active {
            Some(token) => {
                // First signal during a search: stop it and report what was found
                token.cancel();
                eprintln!("Cancelling search (press Ctrl+C again to exit)");
            }
            None => std::process::exit(INTERRUPTED),
        }
    });
}

fn main() {
    let active_search = ActiveSearch::default();
    install_interrupt_handler(&active_search);

    let cli = Cli::parse();
    let ctx = RuntimeContext::from_global_args(&cli.global, active_search);

    // -v turns on debug output for every finder crate; otherwise FINDER_LOG
    // may carry a filter directive.
    let filter = if ctx.verbose {
        Some(EnvFilter::new(
            "finder=debug,finder_formula=debug,finder_search=debug,finder_config=debug",
        ))
    } else {
        EnvFilter::try_from_env("FINDER_LOG").ok()
    };
    if let Some(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Some(Commands::Search(args)) => commands::search::run(&ctx, &args),
        Some(Commands::Validate(args)) => commands::validate::run(&ctx, &args),
        Some(Commands::Eval(args)) => commands::eval::run(&ctx, &args),
        Some(Commands::Normalize(args)) => commands::normalize::run(&ctx, &args),
        Some(Commands::Init(args)) => commands::init::run(&ctx, &args),
        Some(Commands::Config(args)) => commands::config_cmd::run(&ctx, &args),
        Some(Commands::Profile(args)) => commands::profile::run(&ctx, &args),
        Some(Commands::Completion(args)) => commands::completion::run(&ctx, &args),
        Some(Commands::Version) => commands::version::run(&ctx),
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
