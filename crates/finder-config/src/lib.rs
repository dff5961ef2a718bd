//! Configuration management for the finder tool.
//!
//! This crate handles discovering `.finder/` directories, loading and saving
//! the layered search defaults in `.finder/config.yaml`, and reading and
//! writing saved search profiles.

pub mod config;
pub mod finder_dir;
pub mod profile;

pub use config::{ConfigError, FinderConfig, load_config, load_default_config, save_config};
pub use finder_dir::{ensure_finder_dir, find_finder_dir, profiles_dir};
pub use profile::SearchProfile;
