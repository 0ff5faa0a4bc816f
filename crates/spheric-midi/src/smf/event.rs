//! SMF track events and their wire encoding.

use std::io::{self, Write};

use super::vlq::write_vlq;

/// A single event on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Select the instrument for subsequent notes on `channel`.
    ProgramChange { channel: u8, program: u8 },
    /// Start sounding `key`.
    NoteOn { channel: u8, key: u8, velocity: u8 },
    /// Stop sounding `key`.
    NoteOff { channel: u8, key: u8, velocity: u8 },
    /// Set tempo meta event (control track only).
    Tempo { us_per_beat: u32 },
}

impl Event {
    /// Channel-voice status byte, or `None` for meta events.
    pub fn status_byte(&self) -> Option<u8> {
        match *self {
            Event::ProgramChange { channel, .. } => Some(status::PROGRAM_CHANGE | channel),
            Event::NoteOn { channel, .. } => Some(status::NOTE_ON | channel),
            Event::NoteOff { channel, .. } => Some(status::NOTE_OFF | channel),
            Event::Tempo { .. } => None,
        }
    }

    /// Pitch for note events.
    pub fn key(&self) -> Option<u8> {
        match *self {
            Event::NoteOn { key, .. } | Event::NoteOff { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Whether this event releases a note (an explicit NoteOff or a zero-velocity NoteOn).
    pub fn is_note_release(&self) -> bool {
        matches!(
            self,
            Event::NoteOff { .. } | Event::NoteOn { velocity: 0, .. }
        )
    }

    /// Whether this event starts a note.
    pub fn is_note_start(&self) -> bool {
        matches!(self, Event::NoteOn { velocity, .. } if *velocity > 0)
    }

    /// Write the event body (no delta-time).
    ///
    /// `running` holds the last channel-voice status written on this track and is
    /// updated in place. When `use_running_status` is set and the status repeats,
    /// the status byte is omitted. Meta events always clear running status.
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
        running: &mut Option<u8>,
        use_running_status: bool,
    ) -> io::Result<()> {
        match *self {
            Event::Tempo { us_per_beat } => {
                let bytes = us_per_beat.to_be_bytes();
                writer.write_all(&[meta::PREFIX, meta::TEMPO, 3])?;
                writer.write_all(&bytes[1..])?;
                *running = None;
            }
            Event::ProgramChange { channel, program } => {
                write_status(writer, status::PROGRAM_CHANGE | channel, running, use_running_status)?;
                writer.write_all(&[program])?;
            }
            Event::NoteOn {
                channel,
                key,
                velocity,
            } => {
                write_status(writer, status::NOTE_ON | channel, running, use_running_status)?;
                writer.write_all(&[key, velocity])?;
            }
            Event::NoteOff {
                channel,
                key,
                velocity,
            } => {
                write_status(writer, status::NOTE_OFF | channel, running, use_running_status)?;
                writer.write_all(&[key, velocity])?;
            }
        }
        Ok(())
    }
}

fn write_status<W: Write>(
    writer: &mut W,
    status: u8,
    running: &mut Option<u8>,
    use_running_status: bool,
) -> io::Result<()> {
    if !(use_running_status && *running == Some(status)) {
        writer.write_all(&[status])?;
    }
    *running = Some(status);
    Ok(())
}

/// An event paired with its delta-time: ticks since the previous event on the same track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEvent {
    /// Ticks since the previous event on this track.
    pub delta: u32,
    /// The event itself.
    pub event: Event,
}

impl TrackEvent {
    /// Create a new track event.
    pub fn new(delta: u32, event: Event) -> Self {
        Self { delta, event }
    }

    /// Write the delta-time followed by the event body.
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
        running: &mut Option<u8>,
        use_running_status: bool,
    ) -> io::Result<()> {
        write_vlq(writer, self.delta)?;
        self.event.write(writer, running, use_running_status)
    }
}

/// Channel-voice status nibbles (high four bits of the status byte).
pub mod status {
    /// Note off (8n).
    pub const NOTE_OFF: u8 = 0x80;
    /// Note on (9n).
    pub const NOTE_ON: u8 = 0x90;
    /// Polyphonic key pressure (An).
    pub const POLY_PRESSURE: u8 = 0xA0;
    /// Control change (Bn).
    pub const CONTROL_CHANGE: u8 = 0xB0;
    /// Program change (Cn).
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    /// Channel pressure (Dn).
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    /// Pitch bend (En).
    pub const PITCH_BEND: u8 = 0xE0;
    /// System exclusive start.
    pub const SYSEX: u8 = 0xF0;
    /// System exclusive continuation / escape.
    pub const SYSEX_ESCAPE: u8 = 0xF7;
}

/// Meta event bytes.
pub mod meta {
    /// Prefix byte for every meta event.
    pub const PREFIX: u8 = 0xFF;
    /// Set tempo (3-byte microseconds per beat).
    pub const TEMPO: u8 = 0x51;
    /// End of track.
    pub const END_OF_TRACK: u8 = 0x2F;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(events: &[TrackEvent], use_running_status: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut running = None;
        for event in events {
            event.write(&mut buf, &mut running, use_running_status).unwrap();
        }
        buf
    }

    #[test]
    fn test_tempo_encoding() {
        let bytes = encode(&[TrackEvent::new(0, Event::Tempo { us_per_beat: 666_667 })], true);
        assert_eq!(bytes, [0x00, 0xFF, 0x51, 0x03, 0x0A, 0x2C, 0x2B]);
    }

    #[test]
    fn test_note_pair_with_running_status() {
        let events = [
            TrackEvent::new(0, Event::NoteOn { channel: 1, key: 69, velocity: 55 }),
            TrackEvent::new(480, Event::NoteOff { channel: 1, key: 69, velocity: 0 }),
            TrackEvent::new(0, Event::NoteOn { channel: 1, key: 71, velocity: 55 }),
            TrackEvent::new(0, Event::NoteOn { channel: 1, key: 72, velocity: 55 }),
        ];
        let bytes = encode(&events, true);
        assert_eq!(
            bytes,
            [
                0x00, 0x91, 69, 55, //
                0x83, 0x60, 0x81, 69, 0, //
                0x00, 0x91, 71, 55, //
                0x00, 72, 55,
            ]
        );
    }

    #[test]
    fn test_running_status_disabled_repeats_status() {
        let events = [
            TrackEvent::new(0, Event::NoteOn { channel: 0, key: 60, velocity: 40 }),
            TrackEvent::new(0, Event::NoteOn { channel: 0, key: 64, velocity: 40 }),
        ];
        assert_eq!(encode(&events, false), [0, 0x90, 60, 40, 0, 0x90, 64, 40]);
    }

    #[test]
    fn test_meta_event_clears_running_status() {
        let events = [
            TrackEvent::new(0, Event::ProgramChange { channel: 0, program: 1 }),
            TrackEvent::new(0, Event::Tempo { us_per_beat: 500_000 }),
            TrackEvent::new(0, Event::ProgramChange { channel: 0, program: 2 }),
        ];
        let bytes = encode(&events, true);
        assert_eq!(bytes[bytes.len() - 3..], [0x00, 0xC0, 2]);
    }

    #[test]
    fn test_zero_velocity_note_on_is_release() {
        let event = Event::NoteOn { channel: 0, key: 60, velocity: 0 };
        assert!(event.is_note_release());
        assert!(!event.is_note_start());
    }
}
