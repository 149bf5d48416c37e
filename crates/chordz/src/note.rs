//! Pitch alphabet and concrete notes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, IdentifierKind};

/// The 12-note chromatic alphabet, sharps only.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A pitch class, 0 = C through 11 = B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Build from any integer, reducing modulo 12.
    pub fn new(value: i32) -> Self {
        PitchClass(value.rem_euclid(12) as u8)
    }

    /// Pitch class of a MIDI note number.
    pub fn of_midi(midi: i32) -> Self {
        PitchClass::new(midi)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    /// Transpose upward by `semitones`.
    pub fn transpose(self, semitones: i32) -> Self {
        PitchClass::new(self.0 as i32 + semitones)
    }

    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..12).map(PitchClass)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NOTE_NAMES
            .iter()
            .position(|name| *name == s.trim())
            .map(|idx| PitchClass(idx as u8))
            .ok_or_else(|| Error::unknown(IdentifierKind::Key, s))
    }
}

impl TryFrom<String> for PitchClass {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PitchClass> for String {
    fn from(pc: PitchClass) -> Self {
        pc.name().to_string()
    }
}

/// MIDI note number for a pitch class in a given octave (C4 = 60).
pub fn note_to_midi(pitch_class: PitchClass, octave: i32) -> i32 {
    (octave + 1) * 12 + pitch_class.index() as i32
}

/// Equal-tempered frequency, A4 = 440 Hz.
pub fn midi_to_frequency(midi: i32) -> f64 {
    440.0 * 2f64.powf((midi - 69) as f64 / 12.0)
}

/// A sounding note.
///
/// `midi` is kept signed: voicing and octave shifts may push a pitch outside
/// 0..=127, and the serializer rejects such pitches instead of wrapping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub name: PitchClass,
    pub midi: i32,
    pub frequency: f64,
}

impl Note {
    pub fn from_midi(midi: i32) -> Self {
        Note {
            name: PitchClass::of_midi(midi),
            midi,
            frequency: midi_to_frequency(midi),
        }
    }
}
