//! Genre-conditioned progression generation.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chord::{build_chord, Chord, ChordOptions, ChordType, ExtensionDensity};
use crate::genre::GenreId;
use crate::note::{Note, PitchClass};
use crate::rhythm::RhythmPattern;
use crate::scale::{diatonic_quality, ScaleId};
use crate::voicing::Voicing;

/// Chance that a degree takes a genre chord type instead of its diatonic one.
pub const GENRE_TYPE_PROBABILITY: f64 = 0.7;

/// Playback humanization settings, carried for the playback layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Humanization {
    pub enabled: bool,
    pub amount: f64,
}

/// A finished progression, ready for display, playback or serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub chords: Vec<Chord>,
    pub key: PitchClass,
    pub scale: ScaleId,
    pub genre: GenreId,
    /// Beats per minute, > 0
    pub tempo: u32,
    pub voicing: Voicing,
    pub rhythm_pattern: Option<RhythmPattern>,
    pub extension_density: ExtensionDensity,
    pub alteration_probability: f64,
    pub melody: Option<Vec<Note>>,
    pub humanization: Option<Humanization>,
    /// Seed of the random source, when one was given
    pub seed: Option<u64>,
}

impl Progression {
    /// Bare progression with default metadata.
    pub fn new(chords: Vec<Chord>, key: PitchClass, scale: ScaleId, genre: GenreId, tempo: u32) -> Self {
        Progression {
            chords,
            key,
            scale,
            genre,
            tempo,
            voicing: Voicing::Root,
            rhythm_pattern: None,
            extension_density: ExtensionDensity::None,
            alteration_probability: 0.0,
            melody: None,
            humanization: None,
            seed: None,
        }
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.chords.iter().map(|c| c.symbol.as_str()).collect()
    }

    /// Melody notes, empty when no melody was derived.
    pub fn melody_notes(&self) -> &[Note] {
        self.melody.as_deref().unwrap_or(&[])
    }
}

/// Choose the chord type for one degree from the genre's palette.
pub fn choose_chord_type<R: Rng + ?Sized>(
    scale: ScaleId,
    genre: GenreId,
    degree: i32,
    rng: &mut R,
) -> ChordType {
    let quality = diatonic_quality(scale, degree);
    let compatible: Vec<ChordType> = genre
        .genre()
        .chord_types
        .iter()
        .copied()
        .filter(|ty| ty.fits(quality))
        .collect();

    if !compatible.is_empty() && rng.gen::<f64>() < GENRE_TYPE_PROBABILITY {
        compatible[rng.gen_range(0..compatible.len())]
    } else {
        ChordType::from(quality)
    }
}

/// Build a chord sequence from one randomly chosen genre pattern.
pub fn generate_progression<R: Rng + ?Sized>(
    key: PitchClass,
    scale: ScaleId,
    genre: GenreId,
    options: &ChordOptions,
    rng: &mut R,
) -> Vec<Chord> {
    let patterns = genre.genre().patterns;
    let pattern = patterns.choose(rng).copied().unwrap_or(&[1]);
    debug!(%key, %scale, %genre, ?pattern, "generating progression");
    chords_for_pattern(key, scale, genre, pattern, options, rng)
}

/// Resolve a fixed degree pattern into chords.
pub fn chords_for_pattern<R: Rng + ?Sized>(
    key: PitchClass,
    scale: ScaleId,
    genre: GenreId,
    pattern: &[u8],
    options: &ChordOptions,
    rng: &mut R,
) -> Vec<Chord> {
    pattern
        .iter()
        .map(|&degree| {
            let degree = degree as i32;
            let chord_type = choose_chord_type(scale, genre, degree, rng);
            build_chord(key, degree, scale, Some(chord_type), options, rng)
        })
        .collect()
}
