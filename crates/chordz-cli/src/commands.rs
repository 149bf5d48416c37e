//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chordz::rng::seeded;
use chordz::{
    generate as generate_progression, to_midi, ChordType, ExtensionDensity, Fallback, GenreId,
    Identifier, Progression, RequestSpec, RhythmPattern, ScaleId, VoiceLeadingPolicy, Voicing,
};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ChordzConfig, ConfigSources};

/// Flags for `chordz generate`. Unset flags keep the configured value.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Key, one of C C# D D# E F F# G G# A A# B
    #[arg(short, long)]
    pub key: Option<String>,

    /// Scale tag (see `chordz list`)
    #[arg(short, long)]
    pub scale: Option<String>,

    /// Genre tag (see `chordz list`)
    #[arg(short, long)]
    pub genre: Option<String>,

    /// Inversion or voicing applied to every chord
    #[arg(short, long)]
    pub inversion: Option<String>,

    /// Re-voice chords for smooth motion
    #[arg(long)]
    pub voice_leading: bool,

    /// Pair voices by minimum motion instead of position; implies --voice-leading
    #[arg(long)]
    pub minimum_motion: bool,

    /// Record a rhythm pattern for playback
    #[arg(long)]
    pub rhythm: Option<String>,

    /// Extension density: none, some, lots or all
    #[arg(short, long)]
    pub extensions: Option<String>,

    /// Chance in [0, 1] of altering a dominant chord
    #[arg(short, long)]
    pub alterations: Option<f64>,

    /// Derive a melody track
    #[arg(short, long)]
    pub melody: bool,

    /// Tempo in BPM
    #[arg(short, long)]
    pub tempo: Option<u32>,

    /// Humanization amount in [0, 1] recorded for playback
    #[arg(long)]
    pub humanize: Option<f64>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file, overriding the configured directory and default name
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the progression as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail instead of substituting defaults for unknown tags
    #[arg(long)]
    pub strict: bool,
}

impl GenerateArgs {
    /// Overlay these flags onto a configured request.
    pub fn apply(&self, spec: &mut RequestSpec) {
        if let Some(v) = &self.key {
            spec.key = v.clone();
        }
        if let Some(v) = &self.scale {
            spec.scale = v.clone();
        }
        if let Some(v) = &self.genre {
            spec.genre = v.clone();
        }
        if let Some(v) = &self.inversion {
            spec.inversion = v.clone();
        }
        if self.voice_leading || self.minimum_motion {
            spec.voice_leading = true;
        }
        if self.minimum_motion {
            spec.voice_leading_policy = VoiceLeadingPolicy::MinimumMotion;
        }
        if let Some(v) = &self.rhythm {
            spec.rhythm = true;
            spec.rhythm_pattern = v.clone();
        }
        if let Some(v) = &self.extensions {
            spec.extension_density = v.clone();
        }
        if let Some(v) = self.alterations {
            spec.alteration_probability = v;
        }
        if self.melody {
            spec.melody = true;
        }
        if let Some(v) = self.tempo {
            spec.tempo = v;
        }
        if let Some(v) = self.humanize {
            spec.humanize = true;
            spec.humanize_amount = v;
        }
        if let Some(v) = self.seed {
            spec.seed = Some(v);
        }
    }
}

/// Result of a `generate` run.
#[derive(Debug, Serialize)]
pub struct GenerateOutcome {
    pub progression: Progression,
    pub fallbacks: Vec<Fallback>,
    pub file: PathBuf,
}

/// Resolve, generate, and write the `.mid` file.
pub fn generate(config: &ChordzConfig, args: &GenerateArgs) -> Result<GenerateOutcome> {
    let mut spec = config.generate.clone();
    args.apply(&mut spec);

    let resolved = spec.resolve().context("Invalid generation request")?;
    if args.strict && resolved.is_fallback() {
        let list: Vec<String> = resolved.fallbacks.iter().map(|f| f.to_string()).collect();
        bail!("Unknown identifiers: {}", list.join("; "));
    }
    let fallbacks = resolved.fallbacks;
    let request = resolved.value;

    let progression = match request.seed {
        Some(seed) => generate_progression(&request, &mut seeded(seed)),
        None => generate_progression(&request, &mut rand::thread_rng()),
    };

    let bytes = to_midi(&progression).context("Failed to encode MIDI")?;
    let file = match &args.output {
        Some(path) => path.clone(),
        None => config.output.dir.join(default_file_name(&progression)),
    };
    write_file(&file, &bytes)?;
    info!(file = %file.display(), bytes = bytes.len(), "wrote progression");

    Ok(GenerateOutcome {
        progression,
        fallbacks,
        file,
    })
}

/// `{key}_{scale}_{genre}_progression.mid`
pub fn default_file_name(progression: &Progression) -> String {
    format!(
        "{}_{}_{}_progression.mid",
        progression.key.name(),
        progression.scale.tag(),
        progression.genre.tag()
    )
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "file written");
    Ok(())
}

/// Human-readable summary of a generate run.
pub fn render_outcome(outcome: &GenerateOutcome) -> String {
    let p = &outcome.progression;
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} {} @ {} BPM\n",
        p.key,
        p.scale.scale().name,
        p.genre.genre().name,
        p.tempo
    ));
    out.push_str(&p.symbols().join("  "));
    out.push('\n');
    if !p.melody_notes().is_empty() {
        let names: Vec<String> = p
            .melody_notes()
            .iter()
            .map(|n| format!("{}{}", n.name, n.midi / 12 - 1))
            .collect();
        out.push_str(&format!("melody: {}\n", names.join(" ")));
    }
    for fallback in &outcome.fallbacks {
        out.push_str(&format!("note: {}\n", fallback));
    }
    out.push_str(&format!("wrote {}\n", outcome.file.display()));
    out
}

pub fn render_json(outcome: &GenerateOutcome) -> Result<String> {
    serde_json::to_string_pretty(outcome).context("Failed to serialize progression")
}

/// Tables listed by `chordz list`.
pub fn list() -> String {
    let mut out = String::new();

    out.push_str("Scales:\n");
    for &id in ScaleId::all() {
        let scale = id.scale();
        out.push_str(&format!("  {:<16} {:<16} {:?}\n", id.tag(), scale.name, scale.intervals));
    }

    out.push_str("\nGenres:\n");
    for &id in GenreId::all() {
        let genre = id.genre();
        let types: Vec<&str> = genre.chord_types.iter().map(|t| t.tag()).collect();
        out.push_str(&format!("  {:<16} {:<16} {}\n", id.tag(), genre.name, types.join(" ")));
    }

    out.push_str("\nChord types:\n  ");
    let types: Vec<&str> = ChordType::all().iter().map(|t| t.tag()).collect();
    out.push_str(&types.join(" "));

    out.push_str("\n\nVoicings:\n  ");
    let voicings: Vec<&str> = Voicing::all().iter().map(|v| v.tag()).collect();
    out.push_str(&voicings.join(" "));

    out.push_str("\n\nExtension densities:\n");
    for &d in ExtensionDensity::all() {
        out.push_str(&format!("  {:<16} {}\n", d.tag(), d.probability()));
    }

    out.push_str("\nRhythm patterns:\n");
    for &r in RhythmPattern::all() {
        out.push_str(&format!("  {:<16} {:?}\n", r.tag(), r.values()));
    }

    out
}

/// Effective configuration followed by its sources, as TOML comments.
pub fn show_config(config: &ChordzConfig, sources: &ConfigSources) -> String {
    let mut out = config.to_toml();
    out.push_str("\n# Sources\n");
    if sources.files.is_empty() {
        out.push_str("# files: (none, compiled defaults)\n");
    }
    for file in &sources.files {
        out.push_str(&format!("# file: {}\n", file.display()));
    }
    for var in &sources.env_overrides {
        out.push_str(&format!("# env: {}\n", var));
    }
    out
}
