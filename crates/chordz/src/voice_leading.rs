//! Voice-leading optimizer.
//!
//! Each chord after the first is re-voiced to the candidate that moves the
//! least from the chord before it. The search is a fixed enumeration of
//! twelve candidates: the chord as built and its three inversions, each
//! also shifted an octave up and down.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::chord::Chord;
use crate::voicing::Voicing;

/// How voices of consecutive chords are paired when measuring motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceLeadingPolicy {
    /// Pair voices by sorted position, truncated to the shorter chord.
    #[default]
    Positional,
    /// Pair voices to minimize total motion. Differs from `Positional` only
    /// when chord sizes differ.
    MinimumMotion,
}

impl VoiceLeadingPolicy {
    pub fn cost(self, previous: &[i32], candidate: &[i32]) -> u32 {
        match self {
            VoiceLeadingPolicy::Positional => positional_cost(previous, candidate),
            VoiceLeadingPolicy::MinimumMotion => minimum_motion_cost(previous, candidate),
        }
    }
}

/// Sum of |previous[k] - candidate[k]| over the shared prefix.
pub fn positional_cost(previous: &[i32], candidate: &[i32]) -> u32 {
    previous
        .iter()
        .zip(candidate)
        .map(|(a, b)| a.abs_diff(*b))
        .sum()
}

/// Largest chord the minimum-motion search enumerates; the search state
/// doubles with every voice.
pub const MAX_MINIMUM_MOTION_VOICES: usize = 16;

/// Minimum-weight pairing of every voice of the smaller chord to a distinct
/// voice of the larger one.
///
/// Chords larger than [`MAX_MINIMUM_MOTION_VOICES`] are scored with
/// [`positional_cost`] instead.
pub fn minimum_motion_cost(previous: &[i32], candidate: &[i32]) -> u32 {
    let (small, large) = if previous.len() <= candidate.len() {
        (previous, candidate)
    } else {
        (candidate, previous)
    };
    if small.is_empty() {
        return 0;
    }
    if large.len() > MAX_MINIMUM_MOTION_VOICES {
        trace!(voices = large.len(), "too many voices, using positional cost");
        return positional_cost(previous, candidate);
    }

    // best[mask] = cheapest pairing of the first popcount(mask) small voices
    // onto the large voices in `mask`.
    let states = 1usize << large.len();
    let mut best = vec![u32::MAX; states];
    best[0] = 0;
    for mask in 0..states {
        if best[mask] == u32::MAX {
            continue;
        }
        let placed = mask.count_ones() as usize;
        if placed == small.len() {
            continue;
        }
        for (j, &pitch) in large.iter().enumerate() {
            if mask & (1 << j) != 0 {
                continue;
            }
            let next = mask | (1 << j);
            let cost = best[mask] + small[placed].abs_diff(pitch);
            if cost < best[next] {
                best[next] = cost;
            }
        }
    }

    (0..states)
        .filter(|m| m.count_ones() as usize == small.len())
        .map(|m| best[m])
        .min()
        .unwrap_or(0)
}

/// The twelve candidate voicings of a pitch set, each sorted ascending.
pub fn candidates(midi: &[i32]) -> Vec<Vec<i32>> {
    let mut base = Vec::with_capacity(4);
    base.push(Voicing::Root.apply(midi));
    for inversion in Voicing::INVERSIONS {
        base.push(inversion.apply(midi));
    }

    let mut all = base.clone();
    for voicing in &base {
        all.push(voicing.iter().map(|p| p + 12).collect());
        all.push(voicing.iter().map(|p| p - 12).collect());
    }
    all
}

/// Re-voice a progression using positional voice pairing.
pub fn voice_lead(chords: &[Chord]) -> Vec<Chord> {
    voice_lead_with(chords, VoiceLeadingPolicy::Positional)
}

/// Re-voice a progression. The first chord passes through unchanged.
pub fn voice_lead_with(chords: &[Chord], policy: VoiceLeadingPolicy) -> Vec<Chord> {
    let mut out: Vec<Chord> = Vec::with_capacity(chords.len());
    let Some(first) = chords.first() else {
        return out;
    };
    out.push(first.clone());

    for chord in &chords[1..] {
        let previous = &out[out.len() - 1].midi;
        let mut best: Option<(u32, Vec<i32>)> = None;
        for candidate in candidates(&chord.midi) {
            let cost = policy.cost(previous, &candidate);
            if best.as_ref().map_or(true, |(min, _)| cost < *min) {
                best = Some((cost, candidate));
            }
        }

        let next = match best {
            Some((cost, midi)) => {
                trace!(symbol = %chord.symbol, cost, ?midi, "voice-led");
                chord.revoiced(midi)
            }
            None => chord.clone(),
        };
        out.push(next);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::{build_chord, ChordOptions, ChordType};
    use crate::rng::seeded;
    use crate::scale::ScaleId;

    const ROOTS: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];

    /// Chord on a degree of C major, checked against its expected root.
    fn chord(root: &str, degree: i32, ty: ChordType) -> Chord {
        let c = build_chord(
            "C".parse().unwrap(),
            degree,
            ScaleId::Major,
            Some(ty),
            &ChordOptions::default(),
            &mut seeded(0),
        );
        assert_eq!(c.root.name(), root);
        c
    }

    #[test]
    fn empty_and_single_pass_through() {
        assert!(voice_lead(&[]).is_empty());
        let c = chord("C", 1, ChordType::Major);
        assert_eq!(voice_lead(std::slice::from_ref(&c)), vec![c]);
    }

    #[test]
    fn twelve_candidates() {
        let all = candidates(&[60, 64, 67]);
        assert_eq!(all.len(), 12);
        assert_eq!(all[0], vec![60, 64, 67]);
        assert_eq!(all[1], vec![64, 67, 72]);
        assert_eq!(all[4], vec![72, 76, 79]);
        assert_eq!(all[5], vec![48, 52, 55]);
        assert!(all.iter().all(|c| c.windows(2).all(|w| w[0] <= w[1])));
    }

    #[test]
    fn c_to_f_prefers_second_inversion() {
        // C E G -> F A C: C F A (second inversion, shifted down) moves 0 + 1 + 2
        let c = chord("C", 1, ChordType::Major);
        let f = chord("F", 4, ChordType::Major);
        let led = voice_lead(&[c.clone(), f.clone()]);
        assert_eq!(led[0], c);
        assert_eq!(led[1].midi, vec![60, 65, 69]);
        assert_eq!(led[1].symbol, f.symbol);
        assert_eq!(led[1].quality, f.quality);
    }

    #[test]
    fn never_worse_than_the_constructed_voicing() {
        for (a, b) in [(1, 5), (2, 5), (6, 4), (1, 7), (3, 6)] {
            let first = chord(ROOTS[a as usize - 1], a, ChordType::Maj7);
            let second = chord(ROOTS[b as usize - 1], b, ChordType::Ninth);
            let led = voice_lead(&[first.clone(), second.clone()]);
            assert!(
                positional_cost(&first.midi, &led[1].midi) <= positional_cost(&first.midi, &second.midi),
                "{a}->{b}"
            );
        }
    }

    #[test]
    fn ties_keep_the_earliest_candidate() {
        let c = chord("C", 1, ChordType::Major);
        let led = voice_lead(&[c.clone(), c.clone()]);
        assert_eq!(led[1].midi, c.midi);
    }

    #[test]
    fn chain_is_relative_to_revoiced_chord() {
        let c = chord("C", 1, ChordType::Major);
        let f = chord("F", 4, ChordType::Major);
        let g = chord("G", 5, ChordType::Major);
        let led = voice_lead(&[c, f, g]);
        // After C F A, G B D best sits at B D G (first inversion, down an octave)
        assert_eq!(led[2].midi, vec![59, 62, 67]);
    }

    #[test]
    fn positional_cost_truncates() {
        assert_eq!(positional_cost(&[60, 64, 67], &[60, 64, 67, 71]), 0);
        assert_eq!(positional_cost(&[60, 64, 67, 71], &[62, 65]), 3);
        assert_eq!(positional_cost(&[], &[60]), 0);
    }

    #[test]
    fn minimum_motion_beats_positional_on_size_change() {
        // Triad over the top three voices of a seventh chord
        let prev = [55, 60, 64, 67];
        let next = [60, 64, 67];
        assert_eq!(positional_cost(&prev, &next), 5 + 4 + 3);
        assert_eq!(minimum_motion_cost(&prev, &next), 0);
    }

    #[test]
    fn minimum_motion_matches_positional_for_equal_sizes_in_order() {
        assert_eq!(minimum_motion_cost(&[60, 64, 67], &[62, 65, 69]), 5);
        assert_eq!(minimum_motion_cost(&[], &[]), 0);
    }

    #[test]
    fn oversized_chords_fall_back_to_positional_cost() {
        let prev: Vec<i32> = (0..70).map(|i| 20 + i).collect();
        let next: Vec<i32> = (0..64).map(|i| 21 + i).collect();
        assert_eq!(minimum_motion_cost(&prev, &next), positional_cost(&prev, &next));
        assert_eq!(minimum_motion_cost(&prev, &next), 64);

        let led = voice_lead_with(
            &[chord("C", 1, ChordType::Major), chord("F", 4, ChordType::Major)],
            VoiceLeadingPolicy::MinimumMotion,
        );
        assert_eq!(led.len(), 2);
    }

    #[test]
    fn policy_is_selectable() {
        let c = chord("C", 1, ChordType::Maj7);
        let f = chord("F", 4, ChordType::Major);
        let positional = voice_lead_with(&[c.clone(), f.clone()], VoiceLeadingPolicy::Positional);
        let minimal = voice_lead_with(&[c.clone(), f], VoiceLeadingPolicy::MinimumMotion);
        let min_cost = minimum_motion_cost(&c.midi, &minimal[1].midi);
        assert!(min_cost <= minimum_motion_cost(&c.midi, &positional[1].midi));
    }
}
