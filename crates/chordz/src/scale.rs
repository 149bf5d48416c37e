//! Scale tables and diatonic chord-quality resolution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::note::PitchClass;
use crate::resolve::Identifier;
use crate::IdentifierKind;

/// A scale: display name plus strictly increasing semitone offsets in 0..=11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scale {
    pub name: &'static str,
    pub intervals: &'static [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleId {
    Major,
    Minor,
    Dorian,
    Mixolydian,
    Pentatonic,
    Blues,
    HarmonicMinor,
    MelodicMinor,
}

impl ScaleId {
    pub const ALL: [ScaleId; 8] = [
        ScaleId::Major,
        ScaleId::Minor,
        ScaleId::Dorian,
        ScaleId::Mixolydian,
        ScaleId::Pentatonic,
        ScaleId::Blues,
        ScaleId::HarmonicMinor,
        ScaleId::MelodicMinor,
    ];

    pub fn scale(self) -> Scale {
        match self {
            ScaleId::Major => Scale {
                name: "Major",
                intervals: &[0, 2, 4, 5, 7, 9, 11],
            },
            ScaleId::Minor => Scale {
                name: "Natural Minor",
                intervals: &[0, 2, 3, 5, 7, 8, 10],
            },
            ScaleId::Dorian => Scale {
                name: "Dorian",
                intervals: &[0, 2, 3, 5, 7, 9, 10],
            },
            ScaleId::Mixolydian => Scale {
                name: "Mixolydian",
                intervals: &[0, 2, 4, 5, 7, 9, 10],
            },
            ScaleId::Pentatonic => Scale {
                name: "Pentatonic",
                intervals: &[0, 2, 4, 7, 9],
            },
            ScaleId::Blues => Scale {
                name: "Blues",
                intervals: &[0, 3, 5, 6, 7, 10],
            },
            ScaleId::HarmonicMinor => Scale {
                name: "Harmonic Minor",
                intervals: &[0, 2, 3, 5, 7, 8, 11],
            },
            ScaleId::MelodicMinor => Scale {
                name: "Melodic Minor",
                intervals: &[0, 2, 3, 5, 7, 9, 11],
            },
        }
    }

    pub fn degree_count(self) -> usize {
        self.scale().intervals.len()
    }

    /// Semitone offset of a 1-based degree. Degrees wrap modulo the scale length.
    pub fn degree_offset(self, degree: i32) -> u8 {
        let intervals = self.scale().intervals;
        intervals[degree_index(degree, intervals.len())]
    }
}

impl Identifier for ScaleId {
    const KIND: IdentifierKind = IdentifierKind::Scale;

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn tag(self) -> &'static str {
        match self {
            ScaleId::Major => "major",
            ScaleId::Minor => "minor",
            ScaleId::Dorian => "dorian",
            ScaleId::Mixolydian => "mixolydian",
            ScaleId::Pentatonic => "pentatonic",
            ScaleId::Blues => "blues",
            ScaleId::HarmonicMinor => "harmonic_minor",
            ScaleId::MelodicMinor => "melodic_minor",
        }
    }

    fn fallback() -> Self {
        ScaleId::Major
    }
}

impl std::fmt::Display for ScaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Zero-based index of a 1-based degree in a scale of `len` notes.
fn degree_index(degree: i32, len: usize) -> usize {
    (degree - 1).rem_euclid(len as i32) as usize
}

/// Note names of `scale` rooted at `root`, one per scale interval.
pub fn scale_notes(root: PitchClass, scale: ScaleId) -> Vec<PitchClass> {
    scale
        .scale()
        .intervals
        .iter()
        .map(|&interval| root.transpose(interval as i32))
        .collect()
}

/// The chord quality that arises from stacking scale thirds on a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiatonicQuality {
    Major,
    Maj7,
    Dom7,
    Minor,
    Min7,
    Diminished,
    Dim7,
    Min7b5,
}

/// Families of diatonic qualities, used for genre compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityFamily {
    Major,
    Minor,
    Dominant,
    Diminished,
}

impl DiatonicQuality {
    pub fn tag(self) -> &'static str {
        match self {
            DiatonicQuality::Major => "major",
            DiatonicQuality::Maj7 => "maj7",
            DiatonicQuality::Dom7 => "dom7",
            DiatonicQuality::Minor => "minor",
            DiatonicQuality::Min7 => "min7",
            DiatonicQuality::Diminished => "diminished",
            DiatonicQuality::Dim7 => "dim7",
            DiatonicQuality::Min7b5 => "min7b5",
        }
    }

    pub fn family(self) -> QualityFamily {
        match self {
            DiatonicQuality::Major | DiatonicQuality::Maj7 => QualityFamily::Major,
            DiatonicQuality::Dom7 => QualityFamily::Dominant,
            DiatonicQuality::Minor | DiatonicQuality::Min7 => QualityFamily::Minor,
            DiatonicQuality::Diminished | DiatonicQuality::Dim7 | DiatonicQuality::Min7b5 => {
                QualityFamily::Diminished
            }
        }
    }

    /// Classify stacked third/fifth/seventh intervals (semitones above the root).
    ///
    /// Returns `None` for stacks that are not major, minor or diminished.
    pub fn from_intervals(third: u8, fifth: u8, seventh: u8) -> Option<Self> {
        match (third, fifth) {
            (4, 7) => Some(match seventh {
                11 => DiatonicQuality::Maj7,
                10 => DiatonicQuality::Dom7,
                _ => DiatonicQuality::Major,
            }),
            (3, 7) => Some(match seventh {
                10 => DiatonicQuality::Min7,
                _ => DiatonicQuality::Minor,
            }),
            (3, 6) => Some(match seventh {
                9 => DiatonicQuality::Dim7,
                10 => DiatonicQuality::Min7b5,
                _ => DiatonicQuality::Diminished,
            }),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiatonicQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Diatonic quality of the chord built on a 1-based `degree` of `scale`.
///
/// Stacks that fit no family (common in pentatonic and blues scales) fall
/// back to a major triad.
pub fn diatonic_quality(scale: ScaleId, degree: i32) -> DiatonicQuality {
    let intervals = scale.scale().intervals;
    let len = intervals.len();
    let interval_to = |steps: i32| -> u8 {
        let start = intervals[degree_index(degree, len)] as i32;
        let target = intervals[degree_index(degree + steps, len)] as i32;
        let diff = target - start;
        if diff < 0 {
            (diff + 12) as u8
        } else {
            diff as u8
        }
    };

    let (third, fifth, seventh) = (interval_to(2), interval_to(4), interval_to(6));
    DiatonicQuality::from_intervals(third, fifth, seventh).unwrap_or_else(|| {
        debug!(%scale, degree, third, fifth, seventh, "no diatonic family, using major triad");
        DiatonicQuality::Major
    })
}
