//! Inversions and drop voicings.
//!
//! A voicing re-registers pitches across octaves. Cardinality and the
//! pitch-class multiset never change; only the octave of individual pitches
//! does. Output is always sorted ascending.

use serde::{Deserialize, Serialize};

use crate::resolve::Identifier;
use crate::IdentifierKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Voicing {
    #[default]
    Root,
    First,
    Second,
    Third,
    Drop2,
}

impl Voicing {
    pub const ALL: [Voicing; 5] = [
        Voicing::Root,
        Voicing::First,
        Voicing::Second,
        Voicing::Third,
        Voicing::Drop2,
    ];

    /// Inversions tried by the voice-leading search, root excluded.
    pub const INVERSIONS: [Voicing; 3] = [Voicing::First, Voicing::Second, Voicing::Third];

    /// Apply this voicing to a pitch set. Input order does not matter.
    pub fn apply(self, pitches: &[i32]) -> Vec<i32> {
        let mut out = pitches.to_vec();
        out.sort_unstable();

        match self {
            Voicing::Root => {}
            Voicing::First => raise_lowest(&mut out, 1),
            Voicing::Second => raise_lowest(&mut out, 2),
            Voicing::Third => raise_lowest(&mut out, 3),
            Voicing::Drop2 => {
                if out.len() >= 4 {
                    let idx = out.len() - 2;
                    out[idx] -= 12;
                }
            }
        }

        out.sort_unstable();
        out
    }
}

/// Raise the `count` lowest pitches an octave. Needs at least `count + 1` pitches.
fn raise_lowest(sorted: &mut [i32], count: usize) {
    if sorted.len() > count {
        for pitch in &mut sorted[..count] {
            *pitch += 12;
        }
    }
}

impl Identifier for Voicing {
    const KIND: IdentifierKind = IdentifierKind::Voicing;

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn tag(self) -> &'static str {
        match self {
            Voicing::Root => "root",
            Voicing::First => "first",
            Voicing::Second => "second",
            Voicing::Third => "third",
            Voicing::Drop2 => "drop2",
        }
    }

    fn fallback() -> Self {
        Voicing::Root
    }
}

impl std::fmt::Display for Voicing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
