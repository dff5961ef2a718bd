//! Clap CLI definitions for the `finder` command.
//!
//! This module defines the complete CLI structure using clap 4 derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use finder_formula::{Letter, Phrase, PhraseSet};
use finder_search::SearchMode;

/// finder -- search files with boolean formulas over phrases.
///
/// Bind up to six phrases to the letters A-F and combine them with a
/// formula such as `(A | B) & !C`. Every line (or whole document) for which
/// the formula holds is reported.
#[derive(Parser, Debug)]
#[command(
    name = "finder",
    about = "Search files with boolean formulas over phrases",
    long_about = "Bind up to six phrases to the letters A-F and combine them with a formula such as '(A | B) & !C'. Every line (or whole document) for which the formula holds is reported.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Use this .finder directory instead of searching upward for one.
    #[arg(long, global = true, env = "FINDER_DIR", value_name = "PATH")]
    pub dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search files for lines (or documents) matching a formula.
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Check a formula for errors and logical problems.
    Validate(ValidateArgs),

    /// Evaluate a formula against a piece of text.
    Eval(EvalArgs),

    /// Rewrite symbolic operators (&, |, !, ...) as words.
    Normalize(NormalizeArgs),

    /// Create a .finder directory with default configuration.
    Init(InitArgs),

    /// Manage configuration.
    Config(ConfigArgs),

    /// Manage saved search profiles.
    Profile(ProfileArgs),

    /// Generate shell completions.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

// ---------------------------------------------------------------------------
// Phrases
// ---------------------------------------------------------------------------

/// Phrase bindings shared by several commands.
#[derive(Args, Debug, Clone, Default)]
pub struct PhraseArgs {
    /// Case-insensitive phrase, as LETTER=TEXT (repeatable, e.g. -p A=error).
    #[arg(
        short = 'p',
        long = "phrase",
        value_name = "LETTER=TEXT",
        value_parser = parse_phrase_binding
    )]
    pub phrases: Vec<(Letter, String)>,

    /// Case-sensitive phrase, as LETTER=TEXT (repeatable).
    #[arg(
        short = 'P',
        long = "phrase-exact",
        value_name = "LETTER=TEXT",
        value_parser = parse_phrase_binding
    )]
    pub exact_phrases: Vec<(Letter, String)>,
}

impl PhraseArgs {
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty() && self.exact_phrases.is_empty()
    }

    /// Collect the bindings; a later binding of the same letter wins.
    pub fn to_phrase_set(&self) -> PhraseSet {
        let mut set = PhraseSet::new();
        for (letter, text) in &self.phrases {
            set.set(*letter, Phrase::insensitive(text.clone()));
        }
        for (letter, text) in &self.exact_phrases {
            set.set(*letter, Phrase::sensitive(text.clone()));
        }
        set
    }
}

/// Parse `A=some text` into a letter and its phrase text.
pub fn parse_phrase_binding(s: &str) -> Result<(Letter, String), String> {
    let (letter, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LETTER=TEXT, got '{}'", s))?;
    let letter: Letter = letter.parse().map_err(|e| format!("{}", e))?;
    Ok((letter, text.to_string()))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Arguments for `finder search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Files or directories to search (default: current directory).
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub phrases: PhraseArgs,

    /// Formula over the phrase letters (default: all phrases joined with AND).
    #[arg(short = 'f', long)]
    pub formula: Option<String>,

    /// Match each line or each whole document.
    #[arg(short = 'm', long, value_name = "line|document")]
    pub mode: Option<SearchMode>,

    /// Comma separated file extensions (default: from config).
    #[arg(short = 'e', long = "ext", value_name = "EXTS")]
    pub extensions: Option<String>,

    /// Report each line (or document) only the first time it matches.
    #[arg(short = 'u', long)]
    pub unique: bool,

    /// Start from a saved profile (name or path to a profile file).
    #[arg(long)]
    pub profile: Option<String>,

    /// Search even when the formula can never match.
    #[arg(long)]
    pub force: bool,

    /// Stop after this many matches.
    #[arg(long, value_name = "N")]
    pub max_results: Option<usize>,
}

// ---------------------------------------------------------------------------
// Formula tools
// ---------------------------------------------------------------------------

/// Arguments for `finder validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// The formula to check.
    pub formula: String,

    #[command(flatten)]
    pub phrases: PhraseArgs,
}

/// Arguments for `finder eval`.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// The formula to evaluate.
    pub formula: String,

    #[command(flatten)]
    pub phrases: PhraseArgs,

    /// Text to evaluate against (default: read stdin).
    #[arg(short = 't', long)]
    pub text: Option<String>,

    /// Report formula errors instead of treating them as "no match".
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `finder normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// The formula to normalize.
    pub formula: String,
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Arguments for `finder init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.yaml with defaults.
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Arguments for `finder config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value.
    Set(ConfigSetArgs),
    /// Get a configuration value.
    Get(ConfigGetArgs),
    /// List all configuration values.
    List,
    /// Unset a configuration value.
    Unset(ConfigUnsetArgs),
}

/// Arguments for `finder config set`.
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Arguments for `finder config get`.
#[derive(Args, Debug)]
pub struct ConfigGetArgs {
    /// Configuration key.
    pub key: String,
}

/// Arguments for `finder config unset`.
#[derive(Args, Debug)]
pub struct ConfigUnsetArgs {
    /// Configuration key.
    pub key: String,
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Arguments for `finder profile`.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

/// Profile subcommands.
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List saved profiles.
    #[command(alias = "ls")]
    List,
    /// Show one profile.
    Show(ProfileNameArgs),
    /// Save (or replace) a profile.
    Save(ProfileSaveArgs),
    /// Delete a profile.
    #[command(alias = "rm")]
    Delete(ProfileNameArgs),
}

/// A profile selected by name.
#[derive(Args, Debug)]
pub struct ProfileNameArgs {
    /// Profile name.
    pub name: String,
}

/// Arguments for `finder profile save`.
#[derive(Args, Debug)]
pub struct ProfileSaveArgs {
    /// Profile name (letters, digits, '-' and '_').
    pub name: String,

    /// Paths the profile searches.
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub phrases: PhraseArgs,

    /// Formula over the phrase letters.
    #[arg(short = 'f', long)]
    pub formula: Option<String>,

    /// Match each line or each whole document.
    #[arg(short = 'm', long, value_name = "line|document")]
    pub mode: Option<SearchMode>,

    /// Comma separated file extensions.
    #[arg(short = 'e', long = "ext", value_name = "EXTS")]
    pub extensions: Option<String>,

    /// Report only first occurrences.
    #[arg(short = 'u', long)]
    pub unique: bool,

    /// Short description shown by `profile list`.
    #[arg(short = 'd', long)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Arguments for `finder completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}
