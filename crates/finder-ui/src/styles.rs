//! Ayu color theme and styling functions for finder CLI output.
//!
//! Uses the Ayu Dark color palette for consistent terminal styling.
//! Color source: <https://github.com/ayu-theme/ayu-colors>
//!
//! Design principles:
//! - Paths are the anchor of every result, so they get the accent color
//! - Line numbers of first occurrences stand out; repeats are muted
//! - Small Unicode symbols for icons, NOT emoji blobs

use owo_colors::OwoColorize;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

// Core semantic colors
const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue

// Result colors
const LINE_UNIQUE: (u8, u8, u8) = (0xf2, 0x6d, 0x78); // #f26d78 - red
const OPERATOR: (u8, u8, u8) = (0xd2, 0xa6, 0xff); // #d2a6ff - purple

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

pub const ICON_PASS: &str = "\u{2713}"; // check mark
pub const ICON_WARN: &str = "\u{26A0}"; // warning sign
pub const ICON_FAIL: &str = "\u{2716}"; // heavy x
pub const ICON_INFO: &str = "\u{2139}"; // information source
pub const ICON_HINT: &str = "\u{2192}"; // right arrow

/// Box-drawing character used for separators.
pub const SEPARATOR_CHAR: char = '\u{2500}';

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

/// Applies truecolor foreground to a string, falling back to plain text
/// when color is not supported.
fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

/// Applies truecolor foreground + bold to a string.
fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

/// Renders text with pass (green) styling.
pub fn render_pass(s: &str) -> String {
    color_str(s, PASS)
}

/// Renders text with warning (yellow) styling.
pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

/// Renders text with fail (red) styling.
pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

/// Renders text with muted (gray) styling.
pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

/// Renders text in bold.
pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

/// Renders a section header in uppercase with accent color and bold.
pub fn render_category(s: &str) -> String {
    color_bold_str(&s.to_uppercase(), ACCENT)
}

/// Renders a separator line `width` columns wide (capped at 60).
pub fn render_separator(width: usize) -> String {
    let line: String = std::iter::repeat_n(SEPARATOR_CHAR, width.min(60)).collect();
    render_muted(&line)
}

// ---------------------------------------------------------------------------
// Icon renderers
// ---------------------------------------------------------------------------

pub fn render_pass_icon() -> String {
    color_str(ICON_PASS, PASS)
}

pub fn render_warn_icon() -> String {
    color_str(ICON_WARN, WARN)
}

pub fn render_fail_icon() -> String {
    color_str(ICON_FAIL, FAIL)
}

pub fn render_info_icon() -> String {
    color_str(ICON_INFO, ACCENT)
}

pub fn render_hint_icon() -> String {
    color_str(ICON_HINT, MUTED)
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// Renders a result's file path.
pub fn render_path(path: &str) -> String {
    color_bold_str(path, ACCENT)
}

/// Renders a line-number prefix such as `12: `.
///
/// First occurrences are highlighted; repeated lines are muted. Document
/// matches (line 0) get no prefix.
pub fn render_line_number(line_number: usize, is_unique: bool) -> String {
    if line_number == 0 {
        return String::new();
    }
    let label = format!("{}: ", line_number);
    if is_unique {
        color_str(&label, LINE_UNIQUE)
    } else {
        render_muted(&label)
    }
}

/// Renders the closing summary line; green when anything matched.
pub fn render_summary(message: &str, matches: usize) -> String {
    if matches > 0 {
        render_pass(message)
    } else {
        render_warn(message)
    }
}

/// Renders a formula keyword (`AND`, `NOT`, ...).
pub fn render_operator(s: &str) -> String {
    color_str(s, OPERATOR)
}

/// Clamp `text` to `limit` characters.
///
/// Longer text keeps its first `limit - 3` characters, loses trailing
/// whitespace and gains `...`.
pub fn truncate_text(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{}...", head.trim_end())
}
