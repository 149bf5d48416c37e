//! Command-line front end for chordz: layered config plus subcommands.

pub mod commands;
pub mod config;
pub mod loader;

pub use config::{ChordzConfig, ConfigError, ConfigSources, OutputConfig};
