//! The fixed score: chord, phrase and arpeggio tables for the calm spheric loop.
//!
//! Durations are authored at [`SCORE_TICKS_PER_BEAT`] and rescaled to the
//! sequence resolution by [`scale_ticks`].

/// Resolution the durations below are written in.
pub const SCORE_TICKS_PER_BEAT: u16 = 480;

/// Pad chord length (two beats).
pub const PAD_CHORD_TICKS: u32 = 960;

/// Times the chord progression is played.
pub const PAD_REPEATS: usize = 2;

/// Dm, C, G, Am.
pub const PAD_CHORDS: [[u8; 3]; 4] = [
    [62, 65, 69],
    [60, 64, 67],
    [55, 59, 62],
    [57, 60, 64],
];

/// A B C B A G F G
pub const PHRASE_A: [u8; 8] = [69, 71, 72, 71, 69, 67, 65, 67];

/// C D E D C B A G
pub const PHRASE_B: [u8; 8] = [72, 74, 76, 74, 72, 71, 69, 67];

/// G A B C B A G F
pub const PHRASE_C: [u8; 8] = [67, 69, 71, 72, 71, 69, 67, 65];

/// Phrase order for the melody.
pub const MELODY_PHRASES: [&[u8; 8]; 4] = [&PHRASE_A, &PHRASE_B, &PHRASE_A, &PHRASE_C];

/// Note lengths within each phrase; every fourth note is held for two beats.
pub const MELODY_RHYTHM: [u32; 8] = [480, 480, 480, 960, 480, 480, 480, 960];

/// Broken-chord patterns following the pad progression, an octave on top.
pub const ARP_PATTERNS: [[u8; 4]; 4] = [
    [62, 65, 69, 74],
    [60, 64, 67, 72],
    [55, 59, 62, 67],
    [57, 60, 64, 69],
];

/// Arpeggio note length (half a beat).
pub const ARP_NOTE_TICKS: u32 = 240;

/// Times the arpeggio patterns are played.
pub const ARP_REPEATS: usize = 4;

/// One step of a layer: a single note, or a chord when several pitches are given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreStep {
    /// Pitches sounding together.
    pub pitches: Vec<u8>,
    /// Length in ticks at the sequence resolution.
    pub duration: u32,
}

impl ScoreStep {
    /// A single note.
    pub fn note(pitch: u8, duration: u32) -> Self {
        Self {
            pitches: vec![pitch],
            duration,
        }
    }

    /// Several pitches at once.
    pub fn chord(pitches: &[u8], duration: u32) -> Self {
        Self {
            pitches: pitches.to_vec(),
            duration,
        }
    }
}

/// Rescale a duration authored at [`SCORE_TICKS_PER_BEAT`] to `ticks_per_beat`.
pub fn scale_ticks(ticks: u32, ticks_per_beat: u16) -> u32 {
    let scaled = u64::from(ticks) * u64::from(ticks_per_beat) / u64::from(SCORE_TICKS_PER_BEAT);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// The pad layer: the chord progression, twice.
pub fn pad_steps(ticks_per_beat: u16) -> Vec<ScoreStep> {
    let duration = scale_ticks(PAD_CHORD_TICKS, ticks_per_beat);
    std::iter::repeat(&PAD_CHORDS)
        .take(PAD_REPEATS)
        .flatten()
        .map(|chord| ScoreStep::chord(chord, duration))
        .collect()
}

/// The melody layer: phrases A, B, A, C.
pub fn melody_steps(ticks_per_beat: u16) -> Vec<ScoreStep> {
    MELODY_PHRASES
        .iter()
        .flat_map(|phrase| phrase.iter().zip(&MELODY_RHYTHM))
        .map(|(&pitch, &ticks)| ScoreStep::note(pitch, scale_ticks(ticks, ticks_per_beat)))
        .collect()
}

/// The arpeggio layer: each pattern note by note, the whole set four times.
pub fn arpeggio_steps(ticks_per_beat: u16) -> Vec<ScoreStep> {
    let duration = scale_ticks(ARP_NOTE_TICKS, ticks_per_beat);
    std::iter::repeat(&ARP_PATTERNS)
        .take(ARP_REPEATS)
        .flatten()
        .flatten()
        .map(|&pitch| ScoreStep::note(pitch, duration))
        .collect()
}
