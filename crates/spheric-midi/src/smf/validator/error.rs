//! Error and warning types for SMF validation.

use std::fmt;

/// SMF format validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmfFormatError {
    /// File is too small to hold a header chunk.
    FileTooSmall { size: usize, minimum: usize },
    /// First chunk is not `MThd`.
    InvalidHeaderMagic { found: Vec<u8> },
    /// Header chunk body shorter than 6 bytes.
    InvalidHeaderLength { length: u32, expected: u32 },
    /// Format other than 0, 1 or 2.
    UnsupportedFormat { format: u16 },
    /// SMPTE or zero time division.
    UnsupportedDivision { division: u16 },
    /// Format 0 file declaring more than one track.
    InvalidTrackCountForFormat { format: u16, num_tracks: u16 },
    /// Header declares a different number of tracks than the file holds.
    TrackCountMismatch { declared: u16, found: usize },
    /// Chunk header or body extends past the end of the file.
    ChunkTruncated {
        offset: usize,
        declared: usize,
        available: usize,
    },
    /// Malformed variable-length quantity.
    InvalidVarLen { track: usize, offset: usize },
    /// Event data runs past the end of its track chunk.
    EventTruncated { track: usize, offset: usize },
    /// Data byte with no preceding status byte.
    MissingRunningStatus { track: usize, offset: usize },
    /// System common / real-time status inside a track.
    InvalidStatus { track: usize, offset: usize, status: u8 },
    /// Data byte with the high bit set.
    InvalidDataByte { track: usize, offset: usize, value: u8 },
    /// Tempo meta event whose body is not 3 bytes.
    InvalidTempoLength { track: usize, length: u32 },
    /// Track chunk without an End-of-Track meta event.
    MissingEndOfTrack { track: usize },
    /// NoteOn for a pitch that is already sounding on the same channel.
    NoteAlreadyHeld {
        track: usize,
        channel: u8,
        key: u8,
        tick: u64,
    },
    /// NoteOn never released before the end of the track.
    DanglingNote { track: usize, channel: u8, key: u8 },
}

impl fmt::Display for SmfFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmfFormatError::FileTooSmall { size, minimum } => {
                write!(
                    f,
                    "File too small: {} bytes (minimum {} required)",
                    size, minimum
                )
            }
            SmfFormatError::InvalidHeaderMagic { found } => {
                write!(
                    f,
                    "Invalid header chunk id: expected 'MThd', got {:?}",
                    String::from_utf8_lossy(found)
                )
            }
            SmfFormatError::InvalidHeaderLength { length, expected } => {
                write!(
                    f,
                    "Invalid header length {} (expected {})",
                    length, expected
                )
            }
            SmfFormatError::UnsupportedFormat { format } => {
                write!(f, "Unsupported SMF format: {}", format)
            }
            SmfFormatError::UnsupportedDivision { division } => {
                write!(
                    f,
                    "Unsupported time division 0x{:04X} (only metrical timing is supported)",
                    division
                )
            }
            SmfFormatError::InvalidTrackCountForFormat { format, num_tracks } => {
                write!(
                    f,
                    "Format {} file declares {} tracks",
                    format, num_tracks
                )
            }
            SmfFormatError::TrackCountMismatch { declared, found } => {
                write!(
                    f,
                    "Header declares {} tracks but {} track chunks were found",
                    declared, found
                )
            }
            SmfFormatError::ChunkTruncated {
                offset,
                declared,
                available,
            } => {
                write!(
                    f,
                    "Chunk at offset {} truncated: {} bytes declared, {} available",
                    offset, declared, available
                )
            }
            SmfFormatError::InvalidVarLen { track, offset } => {
                write!(
                    f,
                    "Track {}: invalid variable-length quantity at offset {}",
                    track, offset
                )
            }
            SmfFormatError::EventTruncated { track, offset } => {
                write!(f, "Track {}: event at offset {} is truncated", track, offset)
            }
            SmfFormatError::MissingRunningStatus { track, offset } => {
                write!(
                    f,
                    "Track {}: data byte at offset {} without running status",
                    track, offset
                )
            }
            SmfFormatError::InvalidStatus {
                track,
                offset,
                status,
            } => {
                write!(
                    f,
                    "Track {}: invalid status byte 0x{:02X} at offset {}",
                    track, status, offset
                )
            }
            SmfFormatError::InvalidDataByte {
                track,
                offset,
                value,
            } => {
                write!(
                    f,
                    "Track {}: data byte 0x{:02X} at offset {} exceeds 0x7F",
                    track, value, offset
                )
            }
            SmfFormatError::InvalidTempoLength { track, length } => {
                write!(
                    f,
                    "Track {}: tempo meta event has length {} (expected 3)",
                    track, length
                )
            }
            SmfFormatError::MissingEndOfTrack { track } => {
                write!(f, "Track {} has no End-of-Track event", track)
            }
            SmfFormatError::NoteAlreadyHeld {
                track,
                channel,
                key,
                tick,
            } => {
                write!(
                    f,
                    "Track {}: note {} on channel {} started again at tick {} while still held",
                    track, key, channel, tick
                )
            }
            SmfFormatError::DanglingNote {
                track,
                channel,
                key,
            } => {
                write!(
                    f,
                    "Track {}: note {} on channel {} is never released",
                    track, key, channel
                )
            }
        }
    }
}

impl std::error::Error for SmfFormatError {}

/// SMF validation warning (non-fatal issues).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmfWarning {
    /// Header chunk longer than 6 bytes; the extra bytes were skipped.
    NonStandardHeaderLength { length: u32, standard: u32 },
    /// Chunk with an id other than `MThd`/`MTrk`.
    UnknownChunk { id: [u8; 4], length: u32 },
    /// NoteOff (or zero-velocity NoteOn) for a pitch that was not sounding.
    UnmatchedNoteOff {
        track: usize,
        channel: u8,
        key: u8,
        tick: u64,
    },
    /// Bytes after End-of-Track inside a track chunk.
    DataAfterEndOfTrack { track: usize, bytes: usize },
    /// Tempo event on a track other than the control track.
    TempoOutsideControlTrack { track: usize },
}

impl fmt::Display for SmfWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmfWarning::NonStandardHeaderLength { length, standard } => {
                write!(
                    f,
                    "Non-standard header length {} (standard: {})",
                    length, standard
                )
            }
            SmfWarning::UnknownChunk { id, length } => {
                write!(
                    f,
                    "Skipped unknown chunk {:?} ({} bytes)",
                    String::from_utf8_lossy(id),
                    length
                )
            }
            SmfWarning::UnmatchedNoteOff {
                track,
                channel,
                key,
                tick,
            } => {
                write!(
                    f,
                    "Track {}: note {} on channel {} released at tick {} but was not held",
                    track, key, channel, tick
                )
            }
            SmfWarning::DataAfterEndOfTrack { track, bytes } => {
                write!(
                    f,
                    "Track {}: {} bytes after End-of-Track ignored",
                    track, bytes
                )
            }
            SmfWarning::TempoOutsideControlTrack { track } => {
                write!(f, "Track {}: tempo event outside the control track", track)
            }
        }
    }
}
