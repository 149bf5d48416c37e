//! Rhythm patterns for playback timing.
//!
//! The core never schedules audio. These tables let a playback layer turn a
//! progression into per-chord durations.

use serde::{Deserialize, Serialize};

use crate::resolve::Identifier;
use crate::IdentifierKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhythmPattern {
    #[default]
    Quarter,
    Eighth,
    Half,
    Syncopated,
    Waltz,
}

impl RhythmPattern {
    pub const ALL: [RhythmPattern; 5] = [
        RhythmPattern::Quarter,
        RhythmPattern::Eighth,
        RhythmPattern::Half,
        RhythmPattern::Syncopated,
        RhythmPattern::Waltz,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RhythmPattern::Quarter => "Quarter Notes",
            RhythmPattern::Eighth => "Eighth Notes",
            RhythmPattern::Half => "Half Notes",
            RhythmPattern::Syncopated => "Syncopated",
            RhythmPattern::Waltz => "Waltz",
        }
    }

    /// Beat multipliers, cycled across successive chords.
    pub fn values(self) -> &'static [f64] {
        match self {
            RhythmPattern::Quarter => &[1.0, 1.0, 1.0, 1.0],
            RhythmPattern::Eighth => &[0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5],
            RhythmPattern::Half => &[2.0, 2.0],
            RhythmPattern::Syncopated => &[0.5, 1.0, 0.5, 1.0, 1.0],
            RhythmPattern::Waltz => &[1.0, 0.5, 0.5, 1.0, 0.5, 0.5],
        }
    }

    /// Duration in milliseconds of the chord at `index` at `tempo` BPM.
    pub fn chord_duration_ms(self, tempo: u32, index: usize) -> f64 {
        let values = self.values();
        let beat_ms = 60.0 / tempo as f64 * 1000.0;
        values[index % values.len()] * beat_ms
    }

    /// Durations for `count` consecutive chords.
    pub fn durations_ms(self, tempo: u32, count: usize) -> Vec<f64> {
        (0..count).map(|i| self.chord_duration_ms(tempo, i)).collect()
    }
}

impl Identifier for RhythmPattern {
    const KIND: IdentifierKind = IdentifierKind::RhythmPattern;

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn tag(self) -> &'static str {
        match self {
            RhythmPattern::Quarter => "quarter",
            RhythmPattern::Eighth => "eighth",
            RhythmPattern::Half => "half",
            RhythmPattern::Syncopated => "syncopated",
            RhythmPattern::Waltz => "waltz",
        }
    }

    fn fallback() -> Self {
        RhythmPattern::Quarter
    }
}
