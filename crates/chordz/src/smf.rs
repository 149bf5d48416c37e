//! Standard MIDI File encoding of a progression.
//!
//! One track holds the chords. A second track on its own channel holds the
//! melody when the progression carries a non-empty one. Files with one track
//! are format 0, otherwise format 1.

use tracing::debug;

use crate::progression::Progression;
use crate::{Error, Result};

pub const TICKS_PER_QUARTER: u16 = 480;
pub const BEATS_PER_CHORD: u32 = 4;

const CHORD_TICKS: u32 = TICKS_PER_QUARTER as u32 * BEATS_PER_CHORD;
const MELODY_NOTE_TICKS: u32 = TICKS_PER_QUARTER as u32;

const CHORD_CHANNEL: u8 = 0;
const MELODY_CHANNEL: u8 = 1;
const CHORD_VELOCITY: u8 = 127;
const MELODY_VELOCITY: u8 = 96;

/// Largest value a tempo meta event can carry.
const MAX_TEMPO_MICROS: u32 = 0xFF_FFFF;

/// Encode a progression as SMF bytes.
///
/// Every pitch must lie in 0..=127 and the tempo must fit a tempo meta event.
/// Nothing is encoded when either check fails.
pub fn encode_progression(progression: &Progression) -> Result<Vec<u8>> {
    let micros = tempo_micros(progression.tempo)?;

    let mut chords = Vec::with_capacity(progression.chords.len());
    for (index, chord) in progression.chords.iter().enumerate() {
        let pitches = chord
            .midi
            .iter()
            .map(|&p| midi_pitch(p, "chord", index))
            .collect::<Result<Vec<u8>>>()?;
        chords.push(pitches);
    }

    let melody = progression
        .melody_notes()
        .iter()
        .enumerate()
        .map(|(index, note)| midi_pitch(note.midi, "melody", index))
        .collect::<Result<Vec<u8>>>()?;

    let mut tracks = vec![chord_track(&chords, micros)];
    if !melody.is_empty() {
        tracks.push(melody_track(&melody, micros));
    }

    debug!(
        chords = chords.len(),
        melody = melody.len(),
        tracks = tracks.len(),
        micros,
        "encoding midi"
    );

    let format: u16 = if tracks.len() > 1 { 1 } else { 0 };
    let mut header = Vec::with_capacity(6);
    header.extend_from_slice(&format.to_be_bytes());
    header.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    header.extend_from_slice(&TICKS_PER_QUARTER.to_be_bytes());

    let mut out = Vec::new();
    write_chunk(&mut out, b"MThd", &header);
    for track in &tracks {
        write_chunk(&mut out, b"MTrk", track);
    }
    Ok(out)
}

/// Microseconds per quarter note at `bpm`, rounded to nearest.
///
/// Tempos that round to zero or overflow 24 bits are rejected.
pub fn tempo_micros(bpm: u32) -> Result<u32> {
    if bpm == 0 {
        return Err(Error::InvalidTempo { bpm });
    }
    let micros = (60_000_000.0 / bpm as f64).round() as u32;
    if micros == 0 || micros > MAX_TEMPO_MICROS {
        return Err(Error::InvalidTempo { bpm });
    }
    Ok(micros)
}

fn midi_pitch(pitch: i32, part: &'static str, index: usize) -> Result<u8> {
    u8::try_from(pitch)
        .ok()
        .filter(|p| *p <= 127)
        .ok_or(Error::PitchOutOfRange { pitch, part, index })
}

fn chord_track(chords: &[Vec<u8>], micros: u32) -> Vec<u8> {
    let mut track = TrackWriter::new(CHORD_CHANNEL);
    track.tempo(0, micros);
    for (index, pitches) in chords.iter().enumerate() {
        // The first chord starts at tick 0; later chords rest a bar first
        let onset = if index == 0 { 0 } else { CHORD_TICKS };
        for (k, &pitch) in pitches.iter().enumerate() {
            track.note_on(if k == 0 { onset } else { 0 }, pitch, CHORD_VELOCITY);
        }
        for (k, &pitch) in pitches.iter().enumerate() {
            track.note_off(if k == 0 { CHORD_TICKS } else { 0 }, pitch);
        }
    }
    track.finish()
}

fn melody_track(pitches: &[u8], micros: u32) -> Vec<u8> {
    let mut track = TrackWriter::new(MELODY_CHANNEL);
    track.tempo(0, micros);
    for (index, &pitch) in pitches.iter().enumerate() {
        let onset = if index == 0 { 0 } else { MELODY_NOTE_TICKS };
        track.note_on(onset, pitch, MELODY_VELOCITY);
        track.note_off(MELODY_NOTE_TICKS, pitch);
    }
    track.finish()
}

fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(tag);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
}

/// Event bytes of one track, each prefixed by its delta time.
struct TrackWriter {
    channel: u8,
    data: Vec<u8>,
}

impl TrackWriter {
    fn new(channel: u8) -> Self {
        TrackWriter {
            channel: channel & 0x0F,
            data: Vec::new(),
        }
    }

    fn tempo(&mut self, delta: u32, micros: u32) {
        self.meta_event(
            delta,
            0x51,
            &[
                ((micros >> 16) & 0xFF) as u8,
                ((micros >> 8) & 0xFF) as u8,
                (micros & 0xFF) as u8,
            ],
        );
    }

    fn note_on(&mut self, delta: u32, pitch: u8, velocity: u8) {
        self.channel_event(delta, &[0x90 | self.channel, pitch, velocity]);
    }

    fn note_off(&mut self, delta: u32, pitch: u8) {
        self.channel_event(delta, &[0x80 | self.channel, pitch, 0]);
    }

    fn meta_event(&mut self, delta: u32, event_type: u8, payload: &[u8]) {
        self.data.extend(encode_variable_length(delta));
        self.data.extend_from_slice(&[0xFF, event_type]);
        self.data.extend(encode_variable_length(payload.len() as u32));
        self.data.extend_from_slice(payload);
    }

    fn channel_event(&mut self, delta: u32, event: &[u8]) {
        self.data.extend(encode_variable_length(delta));
        self.data.extend_from_slice(event);
    }

    fn finish(mut self) -> Vec<u8> {
        self.data.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
        self.data
    }
}

/// Encode a value as a MIDI variable-length quantity, most significant group first.
pub fn encode_variable_length(mut value: u32) -> Vec<u8> {
    if value == 0 {
        return vec![0];
    }

    let mut bytes = Vec::new();
    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push(((value & 0x7F) | 0x80) as u8);
        value >>= 7;
    }

    bytes.reverse();
    bytes
}

/// Decode a variable-length quantity from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed, or `None` when the
/// input ends mid-quantity or the value does not fit in a `u32`.
pub fn decode_variable_length(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for (i, &byte) in bytes.iter().take(5).enumerate() {
        if value > u32::MAX >> 7 {
            return None;
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}
