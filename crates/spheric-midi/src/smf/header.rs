//! SMF header chunk structures and constants.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

/// Header chunk identifier.
pub const SMF_HEADER_MAGIC: &[u8; 4] = b"MThd";

/// Track chunk identifier.
pub const SMF_TRACK_MAGIC: &[u8; 4] = b"MTrk";

/// Length of the header chunk body (format, track count, division).
pub const SMF_HEADER_LENGTH: u32 = 6;

/// Single multi-channel track.
pub const SMF_FORMAT_SINGLE: u16 = 0;

/// Simultaneous tracks sharing one time base.
pub const SMF_FORMAT_MULTI: u16 = 1;

/// Largest metrical division; bit 15 set would select SMPTE timing.
pub const SMF_MAX_TICKS_PER_BEAT: u16 = 0x7FFF;

/// Largest tempo expressible in the 24-bit tempo meta event.
pub const SMF_MAX_TEMPO: u32 = 0x00FF_FFFF;

/// Highest MIDI channel number (channels are 0-based on the wire).
pub const MIDI_MAX_CHANNEL: u8 = 15;

/// Highest value of a 7-bit data byte (pitch, velocity, program).
pub const MIDI_MAX_DATA: u8 = 0x7F;

/// SMF header chunk data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmfHeader {
    /// File format (0 or 1).
    pub format: u16,
    /// Number of track chunks that follow.
    pub num_tracks: u16,
    /// Metrical time division.
    pub ticks_per_beat: u16,
}

impl SmfHeader {
    /// Create a header for `num_tracks` tracks, picking format 0 for a single track.
    pub fn new(num_tracks: u16, ticks_per_beat: u16) -> Self {
        let format = if num_tracks == 1 {
            SMF_FORMAT_SINGLE
        } else {
            SMF_FORMAT_MULTI
        };
        Self {
            format,
            num_tracks,
            ticks_per_beat,
        }
    }

    /// Write the header chunk to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(SMF_HEADER_MAGIC)?;
        writer.write_u32::<BigEndian>(SMF_HEADER_LENGTH)?;
        writer.write_u16::<BigEndian>(self.format)?;
        writer.write_u16::<BigEndian>(self.num_tracks)?;
        writer.write_u16::<BigEndian>(self.ticks_per_beat)?;
        Ok(())
    }
}
