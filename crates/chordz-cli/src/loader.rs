//! Config file discovery, loading, and environment variable overlay.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ChordzConfig, ConfigError};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files, optionally with a CLI override path.
///
/// Returns the user config if it exists, then either `cli_path` or the local
/// `./chordz.toml`. An explicit `cli_path` is returned even when missing so
/// that loading it reports the error.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    // User config (XDG_CONFIG_HOME or ~/.config)
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("chordz/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("chordz.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Load and merge `paths` in order over the compiled defaults.
pub fn load_files(paths: &[PathBuf]) -> Result<(ChordzConfig, ConfigSources), ConfigError> {
    let mut sources = ConfigSources::default();
    let mut merged = toml::Table::new();

    for path in paths {
        let table = load_table(path)?;
        merge_tables(&mut merged, table);
        sources.files.push(path.clone());
    }

    let mut config: ChordzConfig = match paths.last() {
        Some(last) => decode(merged, last)?,
        None => ChordzConfig::default(),
    };
    config.output.dir = expand_path(&config.output.dir.to_string_lossy());
    Ok((config, sources))
}

/// Read one file, checking that it decodes on its own.
pub fn load_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Type errors are reported against the file that caused them
    decode(table.clone(), path)?;
    Ok(table)
}

fn decode(table: toml::Table, path: &Path) -> Result<ChordzConfig, ConfigError> {
    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Merge `overlay` into `base`. Nested tables merge key by key; any other
/// value in `overlay` replaces the one in `base`.
pub fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let incoming = match value {
            toml::Value::Table(incoming) => incoming,
            other => {
                base.insert(key, other);
                continue;
            }
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_tables(existing, incoming);
            continue;
        }
        base.insert(key, toml::Value::Table(incoming));
    }
}

/// Apply `CHORDZ_*` environment variable overrides to config.
pub fn apply_env_overrides(
    config: &mut ChordzConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    apply_env_overrides_with(config, sources, |var| env::var(var).ok())
}

/// Apply overrides read through `lookup` instead of the process environment.
pub fn apply_env_overrides_with(
    config: &mut ChordzConfig,
    sources: &mut ConfigSources,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(v) = lookup("CHORDZ_KEY") {
        config.generate.key = v;
        sources.env_overrides.push("CHORDZ_KEY".to_string());
    }
    if let Some(v) = lookup("CHORDZ_SCALE") {
        config.generate.scale = v;
        sources.env_overrides.push("CHORDZ_SCALE".to_string());
    }
    if let Some(v) = lookup("CHORDZ_GENRE") {
        config.generate.genre = v;
        sources.env_overrides.push("CHORDZ_GENRE".to_string());
    }
    if let Some(v) = lookup("CHORDZ_TEMPO") {
        config.generate.tempo = parse_env("CHORDZ_TEMPO", &v)?;
        sources.env_overrides.push("CHORDZ_TEMPO".to_string());
    }
    if let Some(v) = lookup("CHORDZ_SEED") {
        config.generate.seed = Some(parse_env("CHORDZ_SEED", &v)?);
        sources.env_overrides.push("CHORDZ_SEED".to_string());
    }
    if let Some(v) = lookup("CHORDZ_OUTPUT_DIR") {
        config.output.dir = expand_path(&v);
        sources.env_overrides.push("CHORDZ_OUTPUT_DIR".to_string());
    }
    if let Some(v) = lookup("CHORDZ_LOG_LEVEL") {
        config.output.log_level = v;
        sources.env_overrides.push("CHORDZ_LOG_LEVEL".to_string());
    }
    Ok(())
}

fn parse_env<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var: var.to_string(),
        message: e.to_string(),
    })
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
