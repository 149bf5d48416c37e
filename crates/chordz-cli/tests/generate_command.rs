//! `chordz generate` against a temporary output directory.

use chordz_cli::commands::{default_file_name, generate, render_json, render_outcome, GenerateArgs};
use chordz_cli::ChordzConfig;
use midly::Smf;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> ChordzConfig {
    let mut config = ChordzConfig::default();
    config.output.dir = dir.path().to_path_buf();
    config
}

#[test]
fn writes_the_default_file_name() {
    let dir = TempDir::new().unwrap();
    let args = GenerateArgs {
        key: Some("F#".into()),
        scale: Some("dorian".into()),
        genre: Some("neosoul".into()),
        seed: Some(3),
        ..GenerateArgs::default()
    };
    let outcome = generate(&config_in(&dir), &args).unwrap();

    let expected = dir.path().join("F#_dorian_neosoul_progression.mid");
    assert_eq!(outcome.file, expected);
    assert_eq!(default_file_name(&outcome.progression), "F#_dorian_neosoul_progression.mid");

    let bytes = std::fs::read(&expected).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 1);
}

#[test]
fn explicit_output_and_melody() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("take1.mid");
    let args = GenerateArgs {
        melody: true,
        voice_leading: true,
        seed: Some(10),
        output: Some(target.clone()),
        ..GenerateArgs::default()
    };
    let outcome = generate(&config_in(&dir), &args).unwrap();
    assert_eq!(outcome.file, target);

    let bytes = std::fs::read(&target).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 2);
}

#[test]
fn same_seed_same_bytes() {
    let dir = TempDir::new().unwrap();
    let run = |name: &str| {
        let args = GenerateArgs {
            genre: Some("jazz".into()),
            extensions: Some("some".into()),
            alterations: Some(0.5),
            seed: Some(77),
            output: Some(dir.path().join(name)),
            ..GenerateArgs::default()
        };
        generate(&config_in(&dir), &args).unwrap();
        std::fs::read(dir.path().join(name)).unwrap()
    };
    assert_eq!(run("a.mid"), run("b.mid"));
}

#[test]
fn renders_text_and_json() {
    let dir = TempDir::new().unwrap();
    let args = GenerateArgs {
        scale: Some("locrian".into()),
        seed: Some(1),
        ..GenerateArgs::default()
    };
    let outcome = generate(&config_in(&dir), &args).unwrap();
    assert_eq!(outcome.fallbacks.len(), 1);

    let text = render_outcome(&outcome);
    assert!(text.contains("locrian"));
    assert!(text.contains(&outcome.progression.chords[0].symbol));

    let json: serde_json::Value = serde_json::from_str(&render_json(&outcome).unwrap()).unwrap();
    assert_eq!(json["progression"]["scale"], "major");
    assert_eq!(json["fallbacks"][0]["requested"], "locrian");
}

#[test]
fn invalid_request_is_reported() {
    let dir = TempDir::new().unwrap();
    let args = GenerateArgs {
        key: Some("H".into()),
        ..GenerateArgs::default()
    };
    let err = generate(&config_in(&dir), &args).unwrap_err();
    assert!(format!("{err:#}").contains("unknown key identifier"));
}
