//! Config files on disk: layering, defaults, and error reporting.

use std::fs;

use chordz_cli::loader::{load_files, load_table};
use chordz_cli::{ChordzConfig, ConfigError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn later_files_override_earlier_ones() {
    let dir = TempDir::new().unwrap();
    let user = write(
        &dir,
        "user.toml",
        r#"
[generate]
key = "D"
genre = "jazz"
tempo = 90

[output]
log_level = "debug"
"#,
    );
    let local = write(
        &dir,
        "local.toml",
        r#"
[generate]
tempo = 132
melody = true
"#,
    );

    let (config, sources) = load_files(&[user.clone(), local.clone()]).unwrap();
    assert_eq!(config.generate.key, "D");
    assert_eq!(config.generate.genre, "jazz");
    assert_eq!(config.generate.tempo, 132);
    assert!(config.generate.melody);
    assert_eq!(config.output.log_level, "debug");
    assert_eq!(sources.files, vec![user, local]);
}

#[test]
fn no_files_means_defaults() {
    let (config, sources) = load_files(&[]).unwrap();
    assert_eq!(config, ChordzConfig::default());
    assert!(sources.files.is_empty());
}

#[test]
fn seed_and_policy_load() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "chordz.toml",
        r#"
[generate]
voice_leading = true
voice_leading_policy = "minimum_motion"
seed = 1234
"#,
    );
    let (config, _) = load_files(&[path]).unwrap();
    assert_eq!(config.generate.seed, Some(1234));
    assert_eq!(
        config.generate.voice_leading_policy,
        chordz::VoiceLeadingPolicy::MinimumMotion
    );
}

#[test]
fn syntax_errors_name_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.toml", "[generate\nkey = \"C\"\n");
    match load_table(&path) {
        Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn type_errors_name_the_file() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.toml", "[generate]\ngenre = \"rnb\"\n");
    let bad = write(&dir, "bad.toml", "[generate]\ntempo = \"fast\"\n");
    match load_files(&[good, bad.clone()]) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, bad),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = ChordzConfig::load_from(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::FileRead { .. }));
}

#[test]
fn explicit_file_is_listed_in_sources() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "chordz.toml", "[output]\ndir = \"renders\"\n");
    let (config, sources) = ChordzConfig::load_with_sources_from(Some(&path)).unwrap();
    assert_eq!(sources.files.last(), Some(&path));
    assert!(config.output.dir.ends_with("renders"));
}
