//! Standard MIDI File validator and decoder.
//!
//! Decodes SMF bytes back into [`TrackEvent`](crate::smf::TrackEvent)s and checks
//! the structural rules the writer relies on:
//! - `MThd` header layout, format and metrical division
//! - `MTrk` chunk framing, variable-length quantities and running status
//! - End-of-Track presence and note pairing (no dangling or doubled notes)
//!
//! Structural damage stops decoding and is returned as `Err`. Semantic problems
//! are collected in the [`SmfValidationReport`].
//!
//! # References
//!
//! - [Standard MIDI Files 1.0](https://midi.org/standard-midi-files)

mod error;
mod header;
mod track;
mod types;


// Re-export public API
pub use error::{SmfFormatError, SmfWarning};
pub use header::{SMF_MAX_FORMAT, SMF_MIN_FILE_SIZE};
pub use types::{SmfHeaderInfo, SmfTrackInfo, SmfValidationReport};

use crate::smf::header::{SMF_HEADER_MAGIC, SMF_TRACK_MAGIC};

/// SMF file format validator.
pub struct SmfValidator;

impl SmfValidator {
    /// Validate an SMF file from raw bytes.
    ///
    /// Returns a report holding the header, every decoded track, and all
    /// errors and warnings found along the way.
    pub fn validate(data: &[u8]) -> Result<SmfValidationReport, SmfFormatError> {
        let mut report = SmfValidationReport::new(data.len());

        // Phase 1: Header chunk
        let (header_info, mut pos) = header::validate_header(data, &mut report)?;
        report.header = Some(header_info);

        // Phase 2: Track chunks (unknown chunks are skipped)
        while pos < data.len() {
            if pos + 8 > data.len() {
                return Err(SmfFormatError::ChunkTruncated {
                    offset: pos,
                    declared: 8,
                    available: data.len() - pos,
                });
            }
            let id = [data[pos], data[pos + 1], data[pos + 2], data[pos + 3]];
            let length =
                u32::from_be_bytes([data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]]);
            let body_start = pos + 8;
            let body_end = body_start + length as usize;
            if body_end > data.len() {
                return Err(SmfFormatError::ChunkTruncated {
                    offset: pos,
                    declared: length as usize,
                    available: data.len() - body_start,
                });
            }

            if &id == SMF_TRACK_MAGIC {
                let index = report.tracks.len();
                let info = track::validate_track(data, body_start, body_end, index, &mut report)?;
                report.tracks.push(info);
            } else {
                report.add_warning(SmfWarning::UnknownChunk { id, length });
            }
            pos = body_end;
        }

        // Phase 3: Cross-checks
        if report.tracks.len() != header_info.num_tracks as usize {
            report.add_error(SmfFormatError::TrackCountMismatch {
                declared: header_info.num_tracks,
                found: report.tracks.len(),
            });
        }

        Ok(report)
    }

    /// Quick validation that only checks the header chunk.
    pub fn validate_header_only(data: &[u8]) -> Result<SmfHeaderInfo, SmfFormatError> {
        let mut report = SmfValidationReport::new(data.len());
        header::validate_header(data, &mut report).map(|(info, _)| info)
    }

    /// Check if data looks like an SMF file (quick check).
    pub fn is_smf(data: &[u8]) -> bool {
        data.len() >= SMF_MIN_FILE_SIZE && &data[0..4] == SMF_HEADER_MAGIC
    }
}
