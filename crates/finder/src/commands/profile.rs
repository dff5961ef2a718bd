//! `finder profile` -- list, show, save and delete saved searches.

use anyhow::{Context, Result, bail};
use finder_config::profile::{delete_profile, list_profiles, load_named_profile, save_profile};
use finder_config::{SearchProfile, profiles_dir};
use finder_formula::validate;
use finder_search::parse_extension_list;
use finder_ui::styles;

use crate::cli::{ProfileArgs, ProfileCommands, ProfileSaveArgs};
use crate::context::RuntimeContext;
use crate::output::{eprint_report, output_json, output_table};

/// Execute the `finder profile` command.
pub fn run(ctx: &RuntimeContext, args: &ProfileArgs) -> Result<()> {
    let dir = profiles_dir(&ctx.require_finder_dir()?);

    match &args.command {
        ProfileCommands::List => {
            let profiles = list_profiles(&dir)?;
            if ctx.json {
                output_json(&profiles);
            } else if profiles.is_empty() {
                if !ctx.quiet {
                    println!("No saved profiles");
                }
            } else {
                let rows: Vec<Vec<String>> = profiles
                    .iter()
                    .map(|p| vec![p.name.clone(), p.formula.clone(), p.description.clone()])
                    .collect();
                output_table(&["NAME", "FORMULA", "DESCRIPTION"], &rows);
            }
        }

        ProfileCommands::Show(name_args) => {
            let profile = load_named_profile(&dir, &name_args.name)?;
            if ctx.json {
                output_json(&profile);
            } else {
                print_profile(&profile);
            }
        }

        ProfileCommands::Save(save_args) => {
            let profile = profile_from_args(save_args);
            if !profile.formula.trim().is_empty() {
                let report = validate(&profile.formula, &profile.phrases);
                if !report.is_valid() {
                    eprint_report(&report);
                    bail!("formula '{}' has errors; profile not saved", profile.formula);
                }
            }
            let path = save_profile(&dir, &profile)
                .with_context(|| format!("failed to save profile '{}'", profile.name))?;

            if ctx.json {
                output_json(&serde_json::json!({
                    "name": profile.name,
                    "path": path.display().to_string(),
                }));
            } else if !ctx.quiet {
                println!("Saved profile '{}' to {}", profile.name, ctx.display_path(&path));
            }
        }

        ProfileCommands::Delete(name_args) => {
            let path = delete_profile(&dir, &name_args.name)?;
            if ctx.json {
                output_json(&serde_json::json!({
                    "name": name_args.name,
                    "deleted": true,
                }));
            } else if !ctx.quiet {
                println!("Deleted profile '{}' ({})", name_args.name, ctx.display_path(&path));
            }
        }
    }

    Ok(())
}

fn profile_from_args(args: &ProfileSaveArgs) -> SearchProfile {
    SearchProfile {
        description: args.description.clone().unwrap_or_default(),
        formula: args.formula.clone().unwrap_or_default(),
        mode: args.mode,
        extensions: args
            .extensions
            .as_deref()
            .map(parse_extension_list)
            .unwrap_or_default(),
        paths: args.paths.clone(),
        unique: args.unique.then_some(true),
        phrases: args.phrases.to_phrase_set(),
        ..SearchProfile::new(args.name.clone())
    }
}

fn print_profile(profile: &SearchProfile) {
    println!("{}", styles::render_bold(&profile.name));
    if !profile.description.is_empty() {
        println!("  {}", styles::render_muted(&profile.description));
    }
    if !profile.formula.is_empty() {
        println!("  formula:    {}", profile.formula);
    }
    for (letter, phrase) in profile.phrases.iter() {
        let case = if phrase.case_sensitive { " (exact)" } else { "" };
        println!("  {}:          {}{}", letter, phrase.text, case);
    }
    if let Some(mode) = profile.mode {
        println!("  mode:       {}", mode);
    }
    if !profile.extensions.is_empty() {
        println!("  extensions: {}", profile.extensions.join(", "));
    }
    if !profile.paths.is_empty() {
        let paths: Vec<String> = profile.paths.iter().map(|p| p.display().to_string()).collect();
        println!("  paths:      {}", paths.join(", "));
    }
    if let Some(unique) = profile.unique {
        println!("  unique:     {}", unique);
    }
}
