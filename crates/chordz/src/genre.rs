//! Genre tables: degree patterns and preferred chord types.

use serde::{Deserialize, Serialize};

use crate::chord::ChordType;
use crate::resolve::Identifier;
use crate::IdentifierKind;

use ChordType::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub name: &'static str,
    /// Scale-degree sequences, each degree in 1..=7
    pub patterns: &'static [&'static [u8]],
    pub chord_types: &'static [ChordType],
    /// Colour tones associated with the genre. Informational only.
    pub extensions: &'static [ChordType],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreId {
    Soul,
    Neosoul,
    Rnb,
    Jazz,
    Fusion,
}

static SOUL: Genre = Genre {
    name: "Soul",
    patterns: &[
        &[1, 6, 4, 5],
        &[1, 4, 5, 1],
        &[1, 3, 6, 4],
        &[6, 4, 1, 5],
        &[1, 5, 6, 4, 2, 5, 1],
        &[2, 5, 1, 4, 7, 3, 6],
    ],
    chord_types: &[Maj7, Min7, Dom7, Ninth, Maj11, Min11],
    extensions: &[Ninth, Eleventh, Thirteenth, Sus2, Sus4],
};

static NEOSOUL: Genre = Genre {
    name: "Neo Soul",
    patterns: &[
        &[1, 7, 6, 2],
        &[1, 5, 6, 3],
        &[2, 5, 1, 4],
        &[6, 2, 5, 1],
        &[1, 3, 4, 5, 6, 2, 5, 1],
        &[4, 1, 3, 6, 2, 5, 1],
    ],
    chord_types: &[Maj9, Min9, Dom9, Thirteenth, Min11, Maj13, Min13],
    extensions: &[Add9, SixNine, Maj13, Min13, Sus2],
};

static RNB: Genre = Genre {
    name: "R&B",
    patterns: &[
        &[1, 5, 6, 4],
        &[6, 4, 1, 5],
        &[1, 6, 2, 5],
        &[4, 5, 1, 6],
        &[1, 4, 6, 5, 1],
        &[6, 5, 4, 3, 2, 5, 1],
    ],
    chord_types: &[Maj7, Min7, Ninth, SixNine, Add9, Sus4],
    extensions: &[Add9, Maj9, Min9, Sus4],
};

static JAZZ: Genre = Genre {
    name: "Jazz",
    patterns: &[
        &[2, 5, 1, 6],
        &[1, 6, 2, 5],
        &[3, 6, 2, 5],
        &[1, 4, 7, 3],
        &[1, 2, 3, 4, 5, 6, 7],
        &[1, 4, 2, 5, 3, 6, 1],
    ],
    chord_types: &[Maj7, Min7, Dom7, Min7b5, Dim7, Alt, SharpEleven, FlatThirteen],
    extensions: &[Ninth, Eleventh, Thirteenth, Alt, Sus4],
};

static FUSION: Genre = Genre {
    name: "Fusion",
    patterns: &[
        &[1, 7, 6, 5],
        &[2, 7, 1, 4],
        &[1, 3, 5, 7],
        &[6, 7, 1, 2],
        &[1, 5, 2, 6, 3, 7, 4],
        &[1, 4, 5, 6, 7, 1],
    ],
    chord_types: &[Maj7, Min7, Dom7, Ninth, Eleventh, Thirteenth, Sus2, SharpEleven, FlatThirteen],
    extensions: &[Add9, SharpEleven, FlatThirteen, Sus2, Sus4],
};

impl GenreId {
    pub const ALL: [GenreId; 5] = [
        GenreId::Soul,
        GenreId::Neosoul,
        GenreId::Rnb,
        GenreId::Jazz,
        GenreId::Fusion,
    ];

    pub fn genre(self) -> &'static Genre {
        match self {
            GenreId::Soul => &SOUL,
            GenreId::Neosoul => &NEOSOUL,
            GenreId::Rnb => &RNB,
            GenreId::Jazz => &JAZZ,
            GenreId::Fusion => &FUSION,
        }
    }
}

impl Identifier for GenreId {
    const KIND: IdentifierKind = IdentifierKind::Genre;

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn tag(self) -> &'static str {
        match self {
            GenreId::Soul => "soul",
            GenreId::Neosoul => "neosoul",
            GenreId::Rnb => "rnb",
            GenreId::Jazz => "jazz",
            GenreId::Fusion => "fusion",
        }
    }

    fn fallback() -> Self {
        GenreId::Soul
    }
}

impl std::fmt::Display for GenreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
