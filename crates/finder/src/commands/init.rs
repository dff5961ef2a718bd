//! `finder init` -- create a `.finder` directory in the current directory.

use anyhow::{Context, Result, bail};
use finder_config::finder_dir::CONFIG_FILE;
use finder_config::{FinderConfig, ensure_finder_dir, profiles_dir, save_config};

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `finder init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let target = ctx.init_target();
    let config_path = target.join(CONFIG_FILE);

    if !args.force && config_path.exists() {
        bail!(
            "{} already exists\n\n\
            This directory is already initialized. Use --force to reset the\n\
            configuration to its defaults (saved profiles are kept).",
            config_path.display()
        );
    }

    // an explicit --dir is used as given, whatever its name
    let finder_dir = if ctx.finder_dir.is_some() {
        std::fs::create_dir_all(profiles_dir(&target))
            .with_context(|| format!("failed to create directory: {}", target.display()))?;
        target
    } else {
        ensure_finder_dir(&ctx.cwd)
            .with_context(|| format!("failed to create directory: {}", target.display()))?
    };
    save_config(&finder_dir, &FinderConfig::default())
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    if ctx.json {
        output_json(&serde_json::json!({
            "finder_dir": finder_dir.display().to_string(),
            "config": finder_dir.join(CONFIG_FILE).display().to_string(),
            "profiles": profiles_dir(&finder_dir).display().to_string(),
        }));
    } else if !ctx.quiet {
        println!("Initialized finder in {}", finder_dir.display());
        println!("  config:   {}", finder_dir.join(CONFIG_FILE).display());
        println!("  profiles: {}", profiles_dir(&finder_dir).display());
    }

    Ok(())
}
