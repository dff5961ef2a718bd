//! `finder config` -- manage configuration (set/get/list/unset).
//!
//! `get` and `list` show the effective value after every layer (defaults,
//! `config.yaml`, `config.toml`, environment). `set` and `unset` edit
//! `.finder/config.yaml` only.

use anyhow::{Context, Result};
use finder_config::config::{get_value, list_values, set_value, unset_value};

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `finder config` command.
pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Set(set_args) => {
            let dir = ctx.require_finder_dir()?;
            set_value(&dir, &set_args.key, &set_args.value)
                .with_context(|| format!("failed to set config key '{}'", set_args.key))?;

            if ctx.json {
                output_json(&serde_json::json!({
                    "key": set_args.key,
                    "value": set_args.value,
                }));
            } else if !ctx.quiet {
                println!("Set {} = {}", set_args.key, set_args.value);
            }
        }

        ConfigCommands::Get(get_args) => {
            let config = ctx.load_config()?;
            let value = get_value(&config, &get_args.key)?;

            if ctx.json {
                output_json(&serde_json::json!({
                    "key": get_args.key,
                    "value": value,
                }));
            } else {
                println!("{}", value);
            }
        }

        ConfigCommands::List => {
            let config = ctx.load_config()?;

            if ctx.json {
                output_json(&config);
            } else {
                let rows: Vec<Vec<String>> = list_values(&config)?
                    .into_iter()
                    .map(|(key, value)| vec![key, value])
                    .collect();
                output_table(&["KEY", "VALUE"], &rows);
            }
        }

        ConfigCommands::Unset(unset_args) => {
            let dir = ctx.require_finder_dir()?;
            let removed = unset_value(&dir, &unset_args.key)
                .with_context(|| format!("failed to unset config key '{}'", unset_args.key))?;

            if ctx.json {
                output_json(&serde_json::json!({
                    "key": unset_args.key,
                    "deleted": removed,
                }));
            } else if removed {
                if !ctx.quiet {
                    println!("Unset {}", unset_args.key);
                }
            } else {
                eprintln!("Key '{}' is not set in config.yaml", unset_args.key);
            }
        }
    }

    Ok(())
}
