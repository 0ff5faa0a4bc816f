//! Data structure types for SMF validation.

use super::error::{SmfFormatError, SmfWarning};
use crate::smf::TrackEvent;

/// Information extracted from the `MThd` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmfHeaderInfo {
    /// File format (0, 1 or 2).
    pub format: u16,
    /// Declared number of track chunks.
    pub num_tracks: u16,
    /// Metrical time division.
    pub ticks_per_beat: u16,
    /// Header chunk body length.
    pub header_length: u32,
}

/// Information about a decoded track chunk.
#[derive(Debug, Clone)]
pub struct SmfTrackInfo {
    /// Track index (0-based, counting only `MTrk` chunks).
    pub index: usize,
    /// Chunk body length in bytes.
    pub length: u32,
    /// Decoded note, program and tempo events.
    ///
    /// Deltas of skipped events (controllers, sysex, other meta) are folded into
    /// the next decoded event so absolute times are preserved.
    pub events: Vec<TrackEvent>,
    /// Sum of every delta-time in the chunk, End-of-Track included.
    pub total_ticks: u64,
    /// Note starts (NoteOn with velocity > 0).
    pub note_on_count: usize,
    /// Note releases (NoteOff or zero-velocity NoteOn).
    pub note_off_count: usize,
    /// Programs selected on this track, in order.
    pub programs: Vec<u8>,
    /// Channels used by channel-voice events, sorted.
    pub channels: Vec<u8>,
    /// Events that were read but not decoded.
    pub other_events: usize,
    /// Whether the chunk ends with End-of-Track.
    pub has_end_of_track: bool,
}

impl SmfTrackInfo {
    pub(super) fn new(index: usize, length: u32) -> Self {
        Self {
            index,
            length,
            events: Vec::new(),
            total_ticks: 0,
            note_on_count: 0,
            note_off_count: 0,
            programs: Vec::new(),
            channels: Vec::new(),
            other_events: 0,
            has_end_of_track: false,
        }
    }
}

/// Complete SMF validation report.
#[derive(Debug, Clone)]
pub struct SmfValidationReport {
    /// Whether the file is valid.
    pub valid: bool,
    /// Header information (if parsed successfully).
    pub header: Option<SmfHeaderInfo>,
    /// First tempo found on any track.
    pub tempo_us_per_beat: Option<u32>,
    /// Track information in file order.
    pub tracks: Vec<SmfTrackInfo>,
    /// Validation errors.
    pub errors: Vec<SmfFormatError>,
    /// Validation warnings.
    pub warnings: Vec<SmfWarning>,
    /// Total file size.
    pub file_size: usize,
}

impl SmfValidationReport {
    /// Create a new empty report.
    pub(super) fn new(file_size: usize) -> Self {
        Self {
            valid: true,
            header: None,
            tempo_us_per_beat: None,
            tracks: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            file_size,
        }
    }

    /// Add an error to the report.
    pub(super) fn add_error(&mut self, error: SmfFormatError) {
        self.errors.push(error);
        self.valid = false;
    }

    /// Add a warning to the report.
    pub(super) fn add_warning(&mut self, warning: SmfWarning) {
        self.warnings.push(warning);
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Length of the longest track in ticks.
    pub fn duration_ticks(&self) -> u64 {
        self.tracks.iter().map(|t| t.total_ticks).max().unwrap_or(0)
    }

    /// Playback length in seconds, using the first tempo (120 BPM if none).
    pub fn duration_seconds(&self) -> f64 {
        let ticks_per_beat = match self.header {
            Some(header) if header.ticks_per_beat > 0 => f64::from(header.ticks_per_beat),
            _ => return 0.0,
        };
        let us_per_beat = f64::from(self.tempo_us_per_beat.unwrap_or(500_000));
        self.duration_ticks() as f64 / ticks_per_beat * us_per_beat / 1_000_000.0
    }
}
