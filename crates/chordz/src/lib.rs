//! Genre-conditioned chord progressions and Standard MIDI File output.
//!
//! The pipeline runs scale model → chord construction → progression
//! generation → optional voice leading → optional melody → SMF encoding.
//! Every randomized step takes a caller-supplied [`rand::Rng`], so a seeded
//! generator reproduces a run exactly.
//!
//! # Example
//!
//! ```
//! use chordz::{generate, rng, to_midi, RequestSpec};
//!
//! let spec = RequestSpec {
//!     genre: "jazz".into(),
//!     melody: true,
//!     ..RequestSpec::default()
//! };
//! let request = spec.resolve().unwrap().into_value();
//! let progression = generate(&request, &mut rng::seeded(7));
//! let bytes = to_midi(&progression).unwrap();
//! assert_eq!(&bytes[..4], b"MThd");
//! ```

pub mod chord;
pub mod genre;
pub mod melody;
pub mod note;
pub mod progression;
pub mod request;
pub mod resolve;
pub mod rhythm;
pub mod rng;
pub mod scale;
pub mod smf;
pub mod voice_leading;
pub mod voicing;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use chord::{build_chord, Chord, ChordOptions, ChordType, ExtensionDensity};
pub use genre::{Genre, GenreId};
pub use melody::derive_melody;
pub use note::{Note, PitchClass};
pub use progression::{generate_progression, Humanization, Progression};
pub use request::{GenerationRequest, RequestSpec};
pub use resolve::{Fallback, Identifier, Resolved};
pub use rhythm::RhythmPattern;
pub use scale::{diatonic_quality, scale_notes, DiatonicQuality, ScaleId};
pub use voice_leading::{voice_lead, voice_lead_with, VoiceLeadingPolicy};
pub use voicing::Voicing;

/// Which identifier table a tag was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Key,
    Scale,
    Genre,
    ChordType,
    Voicing,
    ExtensionDensity,
    RhythmPattern,
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IdentifierKind::Key => "key",
            IdentifierKind::Scale => "scale",
            IdentifierKind::Genre => "genre",
            IdentifierKind::ChordType => "chord type",
            IdentifierKind::Voicing => "voicing",
            IdentifierKind::ExtensionDensity => "extension density",
            IdentifierKind::RhythmPattern => "rhythm pattern",
        })
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown {kind} identifier: {tag:?}")]
    UnknownIdentifier { kind: IdentifierKind, tag: String },

    #[error("{part} pitch {pitch} at index {index} is outside 0..=127")]
    PitchOutOfRange {
        pitch: i32,
        part: &'static str,
        index: usize,
    },

    #[error("tempo {bpm} BPM cannot be encoded")]
    InvalidTempo { bpm: u32 },

    #[error("probability {value} is outside [0, 1]")]
    InvalidProbability { value: f64 },
}

impl Error {
    pub fn unknown(kind: IdentifierKind, tag: impl Into<String>) -> Self {
        Error::UnknownIdentifier {
            kind,
            tag: tag.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Run the full generation pipeline for a typed request.
pub fn generate<R: Rng + ?Sized>(request: &GenerationRequest, rng: &mut R) -> Progression {
    let options = request.chord_options();
    let mut chords = generate_progression(request.key, request.scale, request.genre, &options, rng);

    if let Some(policy) = request.voice_leading {
        chords = voice_lead_with(&chords, policy);
    }

    let melody = request
        .melody
        .then(|| derive_melody(&chords, request.scale, request.tempo, rng));

    debug!(
        symbols = ?chords.iter().map(|c| c.symbol.as_str()).collect::<Vec<_>>(),
        melody = melody.as_ref().map_or(0, Vec::len),
        "generated"
    );

    Progression {
        chords,
        key: request.key,
        scale: request.scale,
        genre: request.genre,
        tempo: request.tempo,
        voicing: request.inversion,
        rhythm_pattern: request.rhythm_pattern,
        extension_density: request.extension_density,
        alteration_probability: request.alteration_probability,
        melody,
        humanization: request.humanization,
        seed: request.seed,
    }
}

/// Encode a progression as Standard MIDI File bytes.
pub fn to_midi(progression: &Progression) -> Result<Vec<u8>> {
    smf::encode_progression(progression)
}
