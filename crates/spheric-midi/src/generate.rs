//! Main entry point for building the loop and turning it into SMF bytes.

use std::path::Path;

use crate::error::EncodeError;
use crate::options::{GenerateOptions, LayerOptions};
use crate::score::{arpeggio_steps, melody_steps, pad_steps, ScoreStep};
use crate::smf::{Event, Sequence, Track, MIDI_MAX_CHANNEL, MIDI_MAX_DATA};

/// Per-track summary returned alongside the generated bytes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TrackSummary {
    /// Layer name ("control", "pad", "melody", "arpeggio").
    pub name: &'static str,
    /// Channel of the layer (None for the control track).
    pub channel: Option<u8>,
    /// Program of the layer (None for the control track).
    pub program: Option<u8>,
    /// Number of events, excluding End-of-Track.
    pub events: usize,
    /// Sum of delta-times.
    pub total_ticks: u64,
}

/// Result of loop generation.
pub struct GenerateResult {
    /// Generated SMF bytes.
    pub data: Vec<u8>,
    /// BLAKE3 hash of the generated data.
    pub hash: String,
    /// File extension.
    pub extension: &'static str,
    /// One entry per track, in file order.
    pub tracks: Vec<TrackSummary>,
}

/// Names of the layers in the order they are added after the control track.
pub const LAYER_NAMES: [&str; 3] = ["pad", "melody", "arpeggio"];

/// Write one layer onto `track`: channel and instrument first, then one note or
/// chord per step.
pub fn emit_layer(
    track: &mut Track,
    layer: &LayerOptions,
    steps: &[ScoreStep],
) -> Result<(), EncodeError> {
    let channel = layer_byte("channel", layer.channel, 0, MIDI_MAX_CHANNEL)?;
    let program = layer_byte("program", layer.program, 0, MIDI_MAX_DATA)?;
    let velocity = layer_byte("velocity", layer.velocity, 1, MIDI_MAX_DATA)?;

    track.set_channel(channel)?;
    track.set_instrument(program)?;
    for step in steps {
        match step.pitches.as_slice() {
            [pitch] => track.emit_note(*pitch, velocity, step.duration)?,
            pitches => track.emit_chord(pitches, velocity, step.duration)?,
        }
    }
    Ok(())
}

fn layer_byte(what: &'static str, value: u32, min: u8, max: u8) -> Result<u8, EncodeError> {
    u8::try_from(value)
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or(EncodeError::InvalidRange {
            what,
            value,
            min: min.into(),
            max: max.into(),
        })
}

/// Build the complete sequence: control track with tempo, then pad, melody and
/// arpeggio layers.
pub fn build_sequence(options: &GenerateOptions) -> Result<Sequence, EncodeError> {
    let mut sequence =
        Sequence::new(options.ticks_per_beat)?.with_running_status(options.running_status);
    sequence
        .control_track_mut()
        .add_tempo(options.tempo_us_per_beat)?;

    let tpb = options.ticks_per_beat;
    let layers = [
        (&options.pad, pad_steps(tpb)),
        (&options.melody, melody_steps(tpb)),
        (&options.arpeggio, arpeggio_steps(tpb)),
    ];
    for ((layer, steps), name) in layers.iter().zip(LAYER_NAMES) {
        let track = sequence.add_track();
        emit_layer(track, layer, steps)?;
        tracing::debug!(
            layer = name,
            channel = layer.channel,
            program = layer.program,
            events = track.len(),
            ticks = track.total_ticks(),
            "built layer"
        );
    }

    Ok(sequence)
}

/// Generate the loop as SMF bytes.
///
/// # Example
/// ```no_run
/// use spheric_midi::{generate_loop, GenerateOptions};
///
/// let result = generate_loop(&GenerateOptions::default())?;
/// std::fs::write(format!("loop.{}", result.extension), &result.data)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn generate_loop(options: &GenerateOptions) -> Result<GenerateResult, EncodeError> {
    let sequence = build_sequence(options)?;
    result_for(&sequence)
}

/// Generate the loop and write it atomically to `path`.
///
/// Nothing is written unless the whole sequence builds.
pub fn write_loop(options: &GenerateOptions, path: &Path) -> Result<GenerateResult, EncodeError> {
    let sequence = build_sequence(options)?;
    sequence.write_to_file(path)?;
    result_for(&sequence)
}

fn result_for(sequence: &Sequence) -> Result<GenerateResult, EncodeError> {
    let data = sequence.to_bytes()?;
    let hash = blake3::hash(&data).to_hex().to_string();
    Ok(GenerateResult {
        data,
        hash,
        extension: "mid",
        tracks: summarize(sequence),
    })
}

fn summarize(sequence: &Sequence) -> Vec<TrackSummary> {
    sequence
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let program = track.events().iter().find_map(|e| match e.event {
                Event::ProgramChange { program, .. } => Some(program),
                _ => None,
            });
            TrackSummary {
                name: i
                    .checked_sub(1)
                    .and_then(|l| LAYER_NAMES.get(l).copied())
                    .unwrap_or("control"),
                channel: program.map(|_| track.channel()),
                program,
                events: track.len(),
                total_ticks: track.total_ticks(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sequence_layout() {
        let sequence = build_sequence(&GenerateOptions::default()).unwrap();
        assert_eq!(sequence.track_count(), 4);
        assert_eq!(sequence.ticks_per_beat(), 480);

        let control = &sequence.tracks()[0];
        assert_eq!(control.len(), 1);
        assert_eq!(
            control.events()[0].event,
            Event::Tempo { us_per_beat: 666_667 }
        );
    }

    #[test]
    fn test_layer_event_counts_and_durations() {
        let sequence = build_sequence(&GenerateOptions::default()).unwrap();
        let tracks = sequence.tracks();
        // program change + 8 chords * 6 events
        assert_eq!(tracks[1].len(), 1 + 8 * 6);
        assert_eq!(tracks[1].total_ticks(), 7680);
        // program change + 32 notes * 2 events
        assert_eq!(tracks[2].len(), 1 + 32 * 2);
        assert_eq!(tracks[2].total_ticks(), 19_200);
        // program change + 64 notes * 2 events
        assert_eq!(tracks[3].len(), 1 + 64 * 2);
        assert_eq!(tracks[3].total_ticks(), 15_360);
        assert!(tracks.iter().all(|t| t.open_notes().is_empty()));
    }

    #[test]
    fn test_layers_start_with_program_change_on_own_channel() {
        let sequence = build_sequence(&GenerateOptions::default()).unwrap();
        let firsts: Vec<Event> = sequence.tracks()[1..]
            .iter()
            .map(|t| t.events()[0].event)
            .collect();
        assert_eq!(
            firsts,
            vec![
                Event::ProgramChange { channel: 0, program: 90 },
                Event::ProgramChange { channel: 1, program: 73 },
                Event::ProgramChange { channel: 2, program: 46 },
            ]
        );
    }

    #[test]
    fn test_invalid_program_in_options() {
        let mut options = GenerateOptions::default();
        options.melody.program = 128;
        assert!(matches!(
            generate_loop(&options),
            Err(EncodeError::InvalidRange { what: "program", value: 128, .. })
        ));
    }

    #[test]
    fn test_values_wider_than_a_byte_are_range_errors() {
        let options = GenerateOptions::from_json(
            r#"{"pad": {"channel": 0, "program": 300, "velocity": 40}}"#,
        )
        .unwrap();
        assert!(matches!(
            generate_loop(&options),
            Err(EncodeError::InvalidRange { what: "program", value: 300, min: 0, max: 127 })
        ));

        let mut options = GenerateOptions::default();
        options.arpeggio.channel = 256;
        assert!(matches!(
            build_sequence(&options),
            Err(EncodeError::InvalidRange { what: "channel", value: 256, min: 0, max: 15 })
        ));

        options.arpeggio = LayerOptions::new(2, 46, 0);
        assert!(matches!(
            build_sequence(&options),
            Err(EncodeError::InvalidRange { what: "velocity", value: 0, min: 1, .. })
        ));
    }

    #[test]
    fn test_write_loop_matches_generated_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.mid");
        let written = write_loop(&GenerateOptions::default(), &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), written.data);
        assert_eq!(written.hash, generate_loop(&GenerateOptions::default()).unwrap().hash);
    }

    #[test]
    fn test_write_loop_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.mid");
        let mut options = GenerateOptions::default();
        options.pad.velocity = 128;
        assert!(write_loop(&options, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_zero_tempo_in_options() {
        let options = GenerateOptions {
            tempo_us_per_beat: 0,
            ..Default::default()
        };
        assert!(matches!(
            build_sequence(&options),
            Err(EncodeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_summary() {
        let result = generate_loop(&GenerateOptions::default()).unwrap();
        assert_eq!(result.extension, "mid");
        assert_eq!(result.hash.len(), 64);
        let names: Vec<&str> = result.tracks.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["control", "pad", "melody", "arpeggio"]);
        assert_eq!(result.tracks[0].channel, None);
        assert_eq!(result.tracks[2].program, Some(73));
        assert_eq!(result.tracks[3].total_ticks, 15_360);
    }

    #[test]
    fn test_emit_layer_single_pitch_uses_note() {
        let mut track = Track::new();
        let layer = LayerOptions::new(4, 10, 20);
        emit_layer(
            &mut track,
            &layer,
            &[ScoreStep::note(60, 100), ScoreStep::chord(&[60, 64], 200)],
        )
        .unwrap();
        // program + note pair + chord (2 on, 2 off)
        assert_eq!(track.len(), 1 + 2 + 4);
        assert_eq!(track.total_ticks(), 300);
        assert_eq!(track.channel(), 4);
    }
}
