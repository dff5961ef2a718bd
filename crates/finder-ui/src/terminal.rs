//! Terminal detection utilities.
//!
//! TTY status, terminal width and whether ANSI color should be emitted.

use std::env;

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Returns the terminal width in columns, defaulting to 80 if detection fails.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _rows)| cols as usize)
        .unwrap_or(80)
}

/// Determines if ANSI color codes should be used.
///
/// Respects standard conventions:
/// - `NO_COLOR` (any value): disables color (<https://no-color.org/>)
/// - `CLICOLOR=0`: disables color
/// - `TERM=dumb`: disables color
/// - `CLICOLOR_FORCE` (any value): forces color even in non-TTY
/// - Falls back to TTY detection
pub fn supports_color() -> bool {
    color_from_env(|key| env::var(key).ok(), is_tty())
}

/// The decision behind [`supports_color`], with the environment and TTY
/// state passed in.
pub fn color_from_env(var: impl Fn(&str) -> Option<String>, tty: bool) -> bool {
    if var("NO_COLOR").is_some() {
        return false;
    }
    if var("CLICOLOR").as_deref() == Some("0") {
        return false;
    }
    if var("TERM").as_deref() == Some("dumb") {
        return false;
    }
    if var("CLICOLOR_FORCE").is_some() {
        return true;
    }
    tty
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn terminal_width_returns_positive() {
        assert!(terminal_width() > 0);
    }

    #[test]
    fn no_color_wins_over_force() {
        let env = env_of(&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")]);
        assert!(!color_from_env(env, true));
    }

    #[test]
    fn clicolor_zero_and_dumb_term_disable() {
        assert!(!color_from_env(env_of(&[("CLICOLOR", "0")]), true));
        assert!(!color_from_env(env_of(&[("TERM", "dumb")]), true));
    }

    #[test]
    fn force_enables_without_tty() {
        assert!(color_from_env(env_of(&[("CLICOLOR_FORCE", "1")]), false));
    }

    #[test]
    fn falls_back_to_tty() {
        assert!(color_from_env(env_of(&[]), true));
        assert!(!color_from_env(env_of(&[("TERM", "xterm")]), false));
    }
}
