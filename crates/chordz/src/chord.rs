//! Chord construction: chord-type table, extensions and alterations.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::note::{note_to_midi, Note, PitchClass};
use crate::resolve::Identifier;
use crate::scale::{diatonic_quality, scale_notes, DiatonicQuality, QualityFamily, ScaleId};
use crate::voicing::Voicing;
use crate::IdentifierKind;

/// Natural upper extensions: 9th, 11th, 13th.
const EXTENSIONS: [u8; 3] = [14, 17, 21];

/// Chromatic alterations with their symbol suffixes.
const ALTERATIONS: [(u8, &str); 4] = [(13, "b9"), (15, "#9"), (18, "#11"), (20, "b13")];

/// Chord-type tags, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordType {
    #[serde(rename = "major")]
    Major,
    #[serde(rename = "minor")]
    Minor,
    #[serde(rename = "diminished")]
    Diminished,
    /// Triad whose quality is taken from the scale degree
    #[serde(rename = "triad")]
    Triad,
    #[serde(rename = "maj7")]
    Maj7,
    #[serde(rename = "min7")]
    Min7,
    #[serde(rename = "dom7")]
    Dom7,
    #[serde(rename = "9")]
    Ninth,
    #[serde(rename = "dom9")]
    Dom9,
    #[serde(rename = "maj9")]
    Maj9,
    #[serde(rename = "min9")]
    Min9,
    #[serde(rename = "11")]
    Eleventh,
    #[serde(rename = "maj11")]
    Maj11,
    #[serde(rename = "min11")]
    Min11,
    #[serde(rename = "13")]
    Thirteenth,
    #[serde(rename = "maj13")]
    Maj13,
    #[serde(rename = "min13")]
    Min13,
    #[serde(rename = "alt")]
    Alt,
    #[serde(rename = "sus2")]
    Sus2,
    #[serde(rename = "sus4")]
    Sus4,
    #[serde(rename = "add9")]
    Add9,
    #[serde(rename = "6/9")]
    SixNine,
    #[serde(rename = "#11")]
    SharpEleven,
    #[serde(rename = "b13")]
    FlatThirteen,
    #[serde(rename = "min7b5")]
    Min7b5,
    #[serde(rename = "dim7")]
    Dim7,
}

impl ChordType {
    pub const ALL: [ChordType; 26] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Diminished,
        ChordType::Triad,
        ChordType::Maj7,
        ChordType::Min7,
        ChordType::Dom7,
        ChordType::Ninth,
        ChordType::Dom9,
        ChordType::Maj9,
        ChordType::Min9,
        ChordType::Eleventh,
        ChordType::Maj11,
        ChordType::Min11,
        ChordType::Thirteenth,
        ChordType::Maj13,
        ChordType::Min13,
        ChordType::Alt,
        ChordType::Sus2,
        ChordType::Sus4,
        ChordType::Add9,
        ChordType::SixNine,
        ChordType::SharpEleven,
        ChordType::FlatThirteen,
        ChordType::Min7b5,
        ChordType::Dim7,
    ];

    /// Semitone intervals above the root, ascending.
    ///
    /// `Triad` reports the major triad; the constructor re-resolves it
    /// against the scale degree.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordType::Major | ChordType::Triad => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Diminished => &[0, 3, 6],
            ChordType::Maj7 => &[0, 4, 7, 11],
            ChordType::Min7 => &[0, 3, 7, 10],
            ChordType::Dom7 => &[0, 4, 7, 10],
            ChordType::Ninth | ChordType::Dom9 => &[0, 4, 7, 10, 14],
            ChordType::Maj9 => &[0, 4, 7, 11, 14],
            ChordType::Min9 => &[0, 3, 7, 10, 14],
            ChordType::Eleventh => &[0, 4, 7, 10, 14, 17],
            ChordType::Maj11 => &[0, 4, 7, 11, 14, 17],
            ChordType::Min11 => &[0, 3, 7, 10, 14, 17],
            ChordType::Thirteenth => &[0, 4, 7, 10, 14, 17, 21],
            ChordType::Maj13 => &[0, 4, 7, 11, 14, 17, 21],
            ChordType::Min13 => &[0, 3, 7, 10, 14, 17, 21],
            ChordType::Alt => &[0, 4, 8, 10, 13, 16],
            ChordType::Sus2 => &[0, 2, 7],
            ChordType::Sus4 => &[0, 5, 7],
            ChordType::Add9 => &[0, 4, 7, 14],
            ChordType::SixNine => &[0, 4, 7, 9, 14],
            ChordType::SharpEleven => &[0, 4, 7, 10, 14, 18],
            ChordType::FlatThirteen => &[0, 4, 7, 10, 14, 20],
            ChordType::Min7b5 => &[0, 3, 6, 10],
            ChordType::Dim7 => &[0, 3, 6, 9],
        }
    }

    /// Symbol suffix shown after the root name.
    pub fn suffix(self) -> &'static str {
        match self {
            ChordType::Major | ChordType::Triad => "",
            ChordType::Minor => "m",
            ChordType::Diminished => "dim",
            other => other.tag(),
        }
    }

    /// Dominant-seventh based types, the only ones that take alterations.
    pub fn is_dominant(self) -> bool {
        matches!(
            self,
            ChordType::Dom7
                | ChordType::Ninth
                | ChordType::Dom9
                | ChordType::Eleventh
                | ChordType::Thirteenth
                | ChordType::Alt
                | ChordType::SharpEleven
                | ChordType::FlatThirteen
        )
    }

    /// Whether a genre may substitute this type on a degree of quality `quality`.
    pub fn fits(self, quality: DiatonicQuality) -> bool {
        use ChordType::*;
        let bare_extension = matches!(self, Ninth | Eleventh | Thirteenth);
        match quality.family() {
            QualityFamily::Major => {
                bare_extension || matches!(self, Major | Maj7 | Maj9 | Maj11 | Maj13 | Add9 | SixNine)
            }
            QualityFamily::Minor => {
                bare_extension || matches!(self, Minor | Min7 | Min9 | Min11 | Min13 | Min7b5)
            }
            QualityFamily::Dominant => bare_extension || matches!(self, Dom7 | Dom9 | Alt),
            QualityFamily::Diminished => matches!(self, Diminished | Dim7 | Min7b5),
        }
    }
}

impl From<DiatonicQuality> for ChordType {
    fn from(quality: DiatonicQuality) -> Self {
        match quality {
            DiatonicQuality::Major => ChordType::Major,
            DiatonicQuality::Maj7 => ChordType::Maj7,
            DiatonicQuality::Dom7 => ChordType::Dom7,
            DiatonicQuality::Minor => ChordType::Minor,
            DiatonicQuality::Min7 => ChordType::Min7,
            DiatonicQuality::Diminished => ChordType::Diminished,
            DiatonicQuality::Dim7 => ChordType::Dim7,
            DiatonicQuality::Min7b5 => ChordType::Min7b5,
        }
    }
}

impl Identifier for ChordType {
    const KIND: IdentifierKind = IdentifierKind::ChordType;

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn tag(self) -> &'static str {
        match self {
            ChordType::Major => "major",
            ChordType::Minor => "minor",
            ChordType::Diminished => "diminished",
            ChordType::Triad => "triad",
            ChordType::Maj7 => "maj7",
            ChordType::Min7 => "min7",
            ChordType::Dom7 => "dom7",
            ChordType::Ninth => "9",
            ChordType::Dom9 => "dom9",
            ChordType::Maj9 => "maj9",
            ChordType::Min9 => "min9",
            ChordType::Eleventh => "11",
            ChordType::Maj11 => "maj11",
            ChordType::Min11 => "min11",
            ChordType::Thirteenth => "13",
            ChordType::Maj13 => "maj13",
            ChordType::Min13 => "min13",
            ChordType::Alt => "alt",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
            ChordType::Add9 => "add9",
            ChordType::SixNine => "6/9",
            ChordType::SharpEleven => "#11",
            ChordType::FlatThirteen => "b13",
            ChordType::Min7b5 => "min7b5",
            ChordType::Dim7 => "dim7",
        }
    }

    /// Unknown chord types become a plain major triad.
    fn fallback() -> Self {
        ChordType::Major
    }
}

impl std::fmt::Display for ChordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// How often a seventh-or-larger chord gains an extra 9th/11th/13th.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionDensity {
    #[default]
    None,
    Some,
    Lots,
    All,
}

impl ExtensionDensity {
    pub const ALL: [ExtensionDensity; 4] = [
        ExtensionDensity::None,
        ExtensionDensity::Some,
        ExtensionDensity::Lots,
        ExtensionDensity::All,
    ];

    pub fn probability(self) -> f64 {
        match self {
            ExtensionDensity::None => 0.0,
            ExtensionDensity::Some => 0.3,
            ExtensionDensity::Lots => 0.6,
            ExtensionDensity::All => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExtensionDensity::None => "None",
            ExtensionDensity::Some => "Some",
            ExtensionDensity::Lots => "Lots",
            ExtensionDensity::All => "All",
        }
    }
}

impl Identifier for ExtensionDensity {
    const KIND: IdentifierKind = IdentifierKind::ExtensionDensity;

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn tag(self) -> &'static str {
        match self {
            ExtensionDensity::None => "none",
            ExtensionDensity::Some => "some",
            ExtensionDensity::Lots => "lots",
            ExtensionDensity::All => "all",
        }
    }

    fn fallback() -> Self {
        ExtensionDensity::None
    }
}

/// Parameters shared by every chord in a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChordOptions {
    pub inversion: Option<Voicing>,
    pub extension_density: ExtensionDensity,
    /// Chance in [0, 1] that a dominant chord gets one chromatic alteration
    pub alteration_probability: f64,
}

/// A concrete chord. Replaced wholesale whenever its voicing changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: ChordType,
    /// Display symbol, e.g. "Cmaj7", "Gdom7b9"
    pub symbol: String,
    pub notes: Vec<Note>,
    /// MIDI numbers parallel to `notes`
    pub midi: Vec<i32>,
}

impl Chord {
    /// Copy of this chord with new pitches; root, quality and symbol are kept.
    pub fn revoiced(&self, midi: Vec<i32>) -> Chord {
        Chord {
            root: self.root,
            quality: self.quality,
            symbol: self.symbol.clone(),
            notes: midi.iter().map(|&m| Note::from_midi(m)).collect(),
            midi,
        }
    }

    pub fn lowest(&self) -> Option<&Note> {
        self.notes.first()
    }
}

/// Build the chord on a 1-based `degree` of `scale` in `key`.
///
/// Without an explicit `chord_type` the type follows the degree's diatonic
/// quality. Extension and alteration steps draw from `rng`.
pub fn build_chord<R: Rng + ?Sized>(
    key: PitchClass,
    degree: i32,
    scale: ScaleId,
    chord_type: Option<ChordType>,
    options: &ChordOptions,
    rng: &mut R,
) -> Chord {
    let notes = scale_notes(key, scale);
    let root = notes[(degree - 1).rem_euclid(notes.len() as i32) as usize];

    let quality = chord_type.unwrap_or_else(|| default_chord_type(diatonic_quality(scale, degree)));

    let (mut intervals, mut symbol) = if quality == ChordType::Triad {
        let triad = match diatonic_quality(scale, degree).family() {
            QualityFamily::Minor => ChordType::Minor,
            QualityFamily::Diminished => ChordType::Diminished,
            QualityFamily::Major | QualityFamily::Dominant => ChordType::Major,
        };
        (triad.intervals().to_vec(), triad.suffix().to_string())
    } else {
        (quality.intervals().to_vec(), quality.suffix().to_string())
    };

    let extension_probability = options.extension_density.probability();
    if extension_probability > 0.0 && rng.gen::<f64>() < extension_probability {
        add_extension(&mut intervals, &mut symbol, rng);
    }

    if options.alteration_probability > 0.0
        && rng.gen::<f64>() < options.alteration_probability
        && quality.is_dominant()
    {
        add_alteration(&mut intervals, &mut symbol, rng);
    }

    let root_index = root.index() as i32;
    let mut midi: Vec<i32> = intervals
        .iter()
        .map(|&interval| {
            let absolute = root_index + interval as i32;
            note_to_midi(PitchClass::new(absolute), 4 + absolute / 12)
        })
        .collect();
    midi.sort_unstable();

    if let Some(inversion) = options.inversion {
        midi = inversion.apply(&midi);
    }

    trace!(root = %root, %quality, ?midi, "built chord");

    Chord {
        root,
        quality,
        symbol: format!("{}{}", root.name(), symbol),
        notes: midi.iter().map(|&m| Note::from_midi(m)).collect(),
        midi,
    }
}

/// Chord type used when the caller does not name one.
fn default_chord_type(quality: DiatonicQuality) -> ChordType {
    match quality {
        DiatonicQuality::Major | DiatonicQuality::Maj7 => ChordType::Maj7,
        DiatonicQuality::Minor | DiatonicQuality::Min7 => ChordType::Min7,
        DiatonicQuality::Dom7 => ChordType::Dom7,
        DiatonicQuality::Min7b5 => ChordType::Min7b5,
        DiatonicQuality::Dim7 => ChordType::Dim7,
        DiatonicQuality::Diminished => ChordType::Triad,
    }
}

/// Add one natural extension not already present. Seventh chords and up only.
fn add_extension<R: Rng + ?Sized>(intervals: &mut Vec<u8>, symbol: &mut String, rng: &mut R) {
    if intervals.len() < 4 {
        return;
    }
    let candidates: Vec<u8> = EXTENSIONS
        .iter()
        .copied()
        .filter(|e| !intervals.contains(e))
        .collect();
    if candidates.is_empty() {
        return;
    }

    let chosen = candidates[rng.gen_range(0..candidates.len())];
    intervals.push(chosen);
    intervals.sort_unstable();

    // The highest added extension supersedes lower ones in the symbol.
    let replaced: &[&str] = match chosen {
        21 => &["7", "9", "11"],
        17 => &["7", "9"],
        _ => &["7"],
    };
    let target = match chosen {
        21 => "13",
        17 => "11",
        _ => "9",
    };
    for from in replaced {
        replace_natural(symbol, from, target);
    }
}

/// Replace the first `from` in `symbol` that is not an altered tone like `#11`.
fn replace_natural(symbol: &mut String, from: &str, to: &str) {
    let found = symbol
        .match_indices(from)
        .map(|(at, _)| at)
        .find(|&at| !matches!(symbol[..at].chars().last(), Some('#') | Some('b')));
    if let Some(at) = found {
        symbol.replace_range(at..at + from.len(), to);
    }
}

/// Replace natural 9/11/13 with one chromatic alteration not already present.
fn add_alteration<R: Rng + ?Sized>(intervals: &mut Vec<u8>, symbol: &mut String, rng: &mut R) {
    let candidates: Vec<(u8, &str)> = ALTERATIONS
        .iter()
        .copied()
        .filter(|(interval, _)| !intervals.contains(interval))
        .collect();
    if candidates.is_empty() {
        return;
    }

    let (interval, label) = candidates[rng.gen_range(0..candidates.len())];
    intervals.retain(|i| !EXTENSIONS.contains(i));
    intervals.push(interval);
    intervals.sort_unstable();
    symbol.push_str(label);
}
