//! Melody derivation: one chord tone per chord, moving by the smallest step.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::chord::Chord;
use crate::note::Note;
use crate::scale::{scale_notes, ScaleId};

/// Derive a melodic line over `chords`.
///
/// Candidate tones are the chord notes that belong to `scale` rooted at the
/// first chord's root. The first pick is random; every later pick is the
/// candidate nearest the previous pitch. A chord without candidates
/// contributes its lowest note. A chord with no notes at all contributes
/// nothing, so the melody is shorter than `chords` only when such chords are
/// present. `tempo` is carried for callers and does not affect the choice.
pub fn derive_melody<R: Rng + ?Sized>(
    chords: &[Chord],
    scale: ScaleId,
    tempo: u32,
    rng: &mut R,
) -> Vec<Note> {
    let Some(first) = chords.first() else {
        return Vec::new();
    };
    let in_scale = scale_notes(first.root, scale);
    debug!(anchor = %first.root, %scale, tempo, chords = chords.len(), "deriving melody");

    let mut melody: Vec<Note> = Vec::with_capacity(chords.len());
    for chord in chords {
        let candidates: Vec<&Note> = chord
            .notes
            .iter()
            .filter(|n| in_scale.contains(&n.name))
            .collect();

        let picked = match melody.last() {
            None => candidates.choose(rng).copied(),
            Some(previous) => nearest(&candidates, previous.midi),
        };

        match picked.or_else(|| chord.lowest()) {
            Some(note) => melody.push(note.clone()),
            None => debug!(symbol = %chord.symbol, "chord has no notes, no melody note"),
        }
    }
    melody
}

/// First candidate at minimum distance from `target`.
fn nearest<'a>(candidates: &[&'a Note], target: i32) -> Option<&'a Note> {
    let mut best: Option<&Note> = None;
    for &note in candidates {
        match best {
            Some(b) if b.midi.abs_diff(target) <= note.midi.abs_diff(target) => {}
            _ => best = Some(note),
        }
    }
    best
}
