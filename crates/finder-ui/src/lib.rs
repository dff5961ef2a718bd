//! Terminal UI components for the finder tool.
//!
//! Provides Ayu-themed color styling, result formatting helpers and
//! terminal detection for CLI output.

pub mod styles;
pub mod terminal;
