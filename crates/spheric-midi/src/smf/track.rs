//! SMF track: an independently timed event stream and its note builders.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

use super::event::{meta, Event, TrackEvent};
use super::header::{MIDI_MAX_CHANNEL, MIDI_MAX_DATA, SMF_MAX_TEMPO, SMF_TRACK_MAGIC};
use super::vlq::VLQ_MAX;
use crate::error::EncodeError;

/// An ordered list of events belonging to one musical layer or to global control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    /// Channel used for events emitted from now on.
    channel: u8,
    /// Events in playback order.
    events: Vec<TrackEvent>,
}

impl Track {
    /// Create an empty track on channel 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel used for subsequently emitted events.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Route subsequently emitted events to `channel` (0-15).
    pub fn set_channel(&mut self, channel: u8) -> Result<(), EncodeError> {
        EncodeError::check_range("channel", channel.into(), 0, MIDI_MAX_CHANNEL.into())?;
        self.channel = channel;
        Ok(())
    }

    /// Events in playback order.
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Number of events (excluding the End-of-Track marker added on write).
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the track has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total duration in ticks: the sum of all delta-times.
    pub fn total_ticks(&self) -> u64 {
        self.events.iter().map(|e| u64::from(e.delta)).sum()
    }

    /// Append a tempo meta event at delta 0.
    pub fn add_tempo(&mut self, us_per_beat: u32) -> Result<(), EncodeError> {
        if us_per_beat == 0 {
            return Err(EncodeError::InvalidConfiguration(
                "tempo must be a positive number of microseconds per beat".to_string(),
            ));
        }
        EncodeError::check_range("tempo", us_per_beat, 1, SMF_MAX_TEMPO)?;
        self.push(0, Event::Tempo { us_per_beat });
        Ok(())
    }

    /// Append a program change at delta 0.
    pub fn set_instrument(&mut self, program: u8) -> Result<(), EncodeError> {
        check_data("program", program)?;
        let channel = self.channel;
        self.push(0, Event::ProgramChange { channel, program });
        Ok(())
    }

    /// Play one note for `duration` ticks.
    ///
    /// Appends a NoteOn at delta 0 and a NoteOff whose delta is the duration, so
    /// the next event on the track starts when this note ends.
    pub fn emit_note(&mut self, pitch: u8, velocity: u8, duration: u32) -> Result<(), EncodeError> {
        check_data("pitch", pitch)?;
        check_velocity(velocity)?;
        check_delta(duration)?;

        let channel = self.channel;
        self.push(
            0,
            Event::NoteOn {
                channel,
                key: pitch,
                velocity,
            },
        );
        self.push(
            duration,
            Event::NoteOff {
                channel,
                key: pitch,
                velocity: 0,
            },
        );
        Ok(())
    }

    /// Play several pitches together for `duration` ticks.
    ///
    /// All NoteOns go out at delta 0. The first NoteOff carries the whole
    /// duration and the rest follow at delta 0, so the chord is released at one
    /// instant instead of being staggered.
    pub fn emit_chord(
        &mut self,
        pitches: &[u8],
        velocity: u8,
        duration: u32,
    ) -> Result<(), EncodeError> {
        if pitches.is_empty() {
            return Err(EncodeError::InvalidConfiguration(
                "chord must contain at least one pitch".to_string(),
            ));
        }
        for (i, &pitch) in pitches.iter().enumerate() {
            check_data("pitch", pitch)?;
            if pitches[..i].contains(&pitch) {
                return Err(EncodeError::InvalidConfiguration(format!(
                    "chord contains pitch {} more than once",
                    pitch
                )));
            }
        }
        check_velocity(velocity)?;
        check_delta(duration)?;

        let channel = self.channel;
        for &key in pitches {
            self.push(
                0,
                Event::NoteOn {
                    channel,
                    key,
                    velocity,
                },
            );
        }
        for (i, &key) in pitches.iter().enumerate() {
            let delta = if i == 0 { duration } else { 0 };
            self.push(
                delta,
                Event::NoteOff {
                    channel,
                    key,
                    velocity: 0,
                },
            );
        }
        Ok(())
    }

    /// Pitches that have been started and not yet released, in start order.
    pub fn open_notes(&self) -> Vec<u8> {
        let mut open: Vec<u8> = Vec::new();
        for event in &self.events {
            let Some(key) = event.event.key() else {
                continue;
            };
            if event.event.is_note_start() {
                open.push(key);
            } else if let Some(pos) = open.iter().position(|&k| k == key) {
                open.remove(pos);
            }
        }
        open
    }

    /// Encode the track body: all events followed by End-of-Track.
    pub fn encode(&self, use_running_status: bool) -> io::Result<Vec<u8>> {
        let mut body = Vec::new();
        let mut running = None;
        for event in &self.events {
            event.write(&mut body, &mut running, use_running_status)?;
        }
        body.write_all(&[0x00, meta::PREFIX, meta::END_OF_TRACK, 0x00])?;
        Ok(body)
    }

    /// Write the complete `MTrk` chunk to a writer.
    pub fn write<W: Write>(&self, writer: &mut W, use_running_status: bool) -> io::Result<()> {
        let body = self.encode(use_running_status)?;
        writer.write_all(SMF_TRACK_MAGIC)?;
        writer.write_u32::<BigEndian>(body.len() as u32)?;
        writer.write_all(&body)?;
        Ok(())
    }

    fn push(&mut self, delta: u32, event: Event) {
        self.events.push(TrackEvent::new(delta, event));
    }
}

fn check_data(what: &'static str, value: u8) -> Result<(), EncodeError> {
    EncodeError::check_range(what, value.into(), 0, MIDI_MAX_DATA.into())
}

/// NoteOn velocity 0 means release, so a sounding note needs at least 1.
fn check_velocity(velocity: u8) -> Result<(), EncodeError> {
    EncodeError::check_range("velocity", velocity.into(), 1, MIDI_MAX_DATA.into())
}

fn check_delta(duration: u32) -> Result<(), EncodeError> {
    EncodeError::check_range("duration", duration, 0, VLQ_MAX)
}
