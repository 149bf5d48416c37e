//! End-to-end generation scenarios and invariants across every table.

use chordz::rng::seeded;
use chordz::voice_leading::positional_cost;
use chordz::{
    derive_melody, generate, generate_progression, scale_notes, voice_lead, ChordOptions,
    ExtensionDensity, GenerationRequest, GenreId, Identifier, PitchClass, RequestSpec, ScaleId,
    Voicing,
};
use pretty_assertions::assert_eq;

fn pitch_classes(midi: &[i32]) -> Vec<i32> {
    let mut pcs: Vec<i32> = midi.iter().map(|p| p.rem_euclid(12)).collect();
    pcs.sort_unstable();
    pcs
}

#[test]
fn scale_notes_start_on_the_root() {
    for key in PitchClass::all() {
        for &scale in ScaleId::all() {
            let notes = scale_notes(key, scale);
            assert_eq!(notes.len(), scale.scale().intervals.len());
            assert_eq!(notes[0], key);
        }
    }
}

#[test]
fn voicings_keep_pitch_content() {
    let options = ChordOptions {
        extension_density: ExtensionDensity::All,
        ..ChordOptions::default()
    };
    for seed in 0..30 {
        let mut rng = seeded(seed);
        let chords = generate_progression(PitchClass::new(seed as i32), ScaleId::Major, GenreId::Neosoul, &options, &mut rng);
        for chord in &chords {
            for &voicing in Voicing::all() {
                let voiced = voicing.apply(&chord.midi);
                assert_eq!(voiced.len(), chord.midi.len());
                assert_eq!(pitch_classes(&voiced), pitch_classes(&chord.midi), "{voicing} {}", chord.symbol);
                assert!(voiced.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}

#[test]
fn chord_notes_mirror_midi() {
    for &genre in GenreId::all() {
        let request = GenerationRequest {
            genre,
            inversion: Voicing::Second,
            extension_density: ExtensionDensity::Lots,
            alteration_probability: 0.8,
            ..GenerationRequest::default()
        };
        let p = generate(&request, &mut seeded(99));
        for chord in &p.chords {
            let from_notes: Vec<i32> = chord.notes.iter().map(|n| n.midi).collect();
            assert_eq!(from_notes, chord.midi);
            assert!(chord.notes.iter().all(|n| n.name == PitchClass::of_midi(n.midi)));
            assert!(chord.symbol.starts_with(chord.root.name()));
        }
    }
}

#[test]
fn roots_follow_a_genre_pattern() {
    for &genre in GenreId::all() {
        for seed in 0..10 {
            let chords = generate_progression(PitchClass::new(7), ScaleId::Mixolydian, genre, &ChordOptions::default(), &mut seeded(seed));
            let scale = scale_notes(PitchClass::new(7), ScaleId::Mixolydian);
            let roots: Vec<PitchClass> = chords.iter().map(|c| c.root).collect();
            let matched = genre.genre().patterns.iter().any(|pattern| {
                let expected: Vec<PitchClass> = pattern.iter().map(|&d| scale[d as usize - 1]).collect();
                expected == roots
            });
            assert!(matched, "{genre} seed {seed}: {roots:?}");
        }
    }
}

#[test]
fn voice_leading_never_moves_more_than_leaving_chords_alone() {
    for &genre in GenreId::all() {
        for seed in 0..10 {
            let chords = generate_progression(PitchClass::new(2), ScaleId::Minor, genre, &ChordOptions::default(), &mut seeded(seed));
            let led = voice_lead(&chords);
            assert_eq!(led.len(), chords.len());
            assert_eq!(led[0], chords[0]);
            for i in 1..led.len() {
                let chosen = positional_cost(&led[i - 1].midi, &led[i].midi);
                let unmoved = positional_cost(&led[i - 1].midi, &chords[i].midi);
                assert!(chosen <= unmoved, "{genre} seed {seed} chord {i}");
                assert_eq!(led[i].symbol, chords[i].symbol);
                assert_eq!(pitch_classes(&led[i].midi), pitch_classes(&chords[i].midi));
            }
        }
    }
}

#[test]
fn melody_has_one_note_per_chord() {
    for &scale in ScaleId::all() {
        for seed in 0..10 {
            let chords = generate_progression(PitchClass::new(5), scale, GenreId::Jazz, &ChordOptions::default(), &mut seeded(seed));
            let melody = derive_melody(&chords, scale, 120, &mut seeded(seed));
            assert_eq!(melody.len(), chords.len());
            for (note, chord) in melody.iter().zip(&chords) {
                assert!(chord.midi.contains(&note.midi));
            }
        }
    }
}

#[test]
fn request_with_unknown_tags_still_generates() {
    let spec = RequestSpec {
        key: "A".into(),
        scale: "phrygian".into(),
        genre: "bebop".into(),
        extension_density: "tons".into(),
        melody: true,
        seed: Some(1),
        ..RequestSpec::default()
    };
    let resolved = spec.resolve().unwrap();
    assert_eq!(resolved.fallbacks.len(), 3);
    let request = resolved.into_value();

    let p = generate(&request, &mut seeded(1));
    assert_eq!(p.scale, ScaleId::Major);
    assert_eq!(p.genre, GenreId::Soul);
    assert_eq!(p.extension_density, ExtensionDensity::None);
    assert_eq!(p.melody_notes().len(), p.chords.len());
    assert!(chordz::to_midi(&p).is_ok());
}

#[test]
fn progression_serializes_with_tags() {
    let request = GenerationRequest {
        genre: GenreId::Fusion,
        ..GenerationRequest::default()
    };
    let p = generate(&request, &mut seeded(5));
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["genre"], "fusion");
    assert_eq!(json["scale"], "major");
    assert_eq!(json["key"], "C");
    assert_eq!(json["chords"].as_array().map(Vec::len), Some(p.chords.len()));
}
