//! Layered configuration for the command-line front end.
//!
//! Files are loaded in order (later wins):
//! 1. `~/.config/chordz/config.toml` (user)
//! 2. `./chordz.toml`, or the `--config` path when one is given
//! 3. Environment variables (`CHORDZ_*`)
//!
//! Command-line flags are applied on top by the caller.
//!
//! # Example Config
//!
//! ```toml
//! [generate]
//! key = "F"
//! scale = "dorian"
//! genre = "neosoul"
//! voice_leading = true
//! melody = true
//! tempo = 88
//! seed = 42
//!
//! [output]
//! dir = "~/music/progressions"
//! log_level = "debug"
//! ```

use std::path::{Path, PathBuf};

use chordz::RequestSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader;

pub use crate::loader::ConfigSources;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {var}: {message}")]
    Env { var: String, message: String },
}

/// Effective configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordzConfig {
    /// Defaults for `chordz generate`
    pub generate: RequestSpec,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory generated files are written to
    pub dir: PathBuf,
    /// Filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("."),
            log_level: "info".to_string(),
        }
    }
}

impl ChordzConfig {
    /// Load configuration from the standard locations.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration, with `config_path` replacing `./chordz.toml`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and report where values came from.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let files = loader::discover_config_files_with_override(config_path);
        let (mut config, mut sources) = loader::load_files(&files)?;
        loader::apply_env_overrides(&mut config, &mut sources)?;
        Ok((config, sources))
    }

    /// Serialize config to a TOML string.
    pub fn to_toml(&self) -> String {
        let g = &self.generate;
        let mut output = String::new();

        output.push_str("# chordz configuration\n\n");

        output.push_str("[generate]\n");
        output.push_str(&format!("key = \"{}\"\n", g.key));
        output.push_str(&format!("scale = \"{}\"\n", g.scale));
        output.push_str(&format!("genre = \"{}\"\n", g.genre));
        output.push_str(&format!("inversion = \"{}\"\n", g.inversion));
        output.push_str(&format!("voice_leading = {}\n", g.voice_leading));
        output.push_str(&format!(
            "voice_leading_policy = \"{}\"\n",
            policy_tag(g.voice_leading_policy)
        ));
        output.push_str(&format!("rhythm = {}\n", g.rhythm));
        output.push_str(&format!("rhythm_pattern = \"{}\"\n", g.rhythm_pattern));
        output.push_str(&format!("extension_density = \"{}\"\n", g.extension_density));
        output.push_str(&format!(
            "alteration_probability = {:?}\n",
            g.alteration_probability
        ));
        output.push_str(&format!("melody = {}\n", g.melody));
        output.push_str(&format!("tempo = {}\n", g.tempo));
        output.push_str(&format!("humanize = {}\n", g.humanize));
        output.push_str(&format!("humanize_amount = {:?}\n", g.humanize_amount));
        if let Some(seed) = g.seed {
            output.push_str(&format!("seed = {}\n", seed));
        }

        output.push_str("\n[output]\n");
        output.push_str(&format!("dir = \"{}\"\n", self.output.dir.display()));
        output.push_str(&format!("log_level = \"{}\"\n", self.output.log_level));

        output
    }
}

fn policy_tag(policy: chordz::VoiceLeadingPolicy) -> &'static str {
    match policy {
        chordz::VoiceLeadingPolicy::Positional => "positional",
        chordz::VoiceLeadingPolicy::MinimumMotion => "minimum_motion",
    }
}
