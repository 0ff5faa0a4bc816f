//! SMF header chunk validation.

use super::error::{SmfFormatError, SmfWarning};
use super::types::{SmfHeaderInfo, SmfValidationReport};
use crate::smf::header::{SMF_FORMAT_SINGLE, SMF_HEADER_LENGTH, SMF_HEADER_MAGIC};

/// Size of the shortest possible header chunk (id + length + 6-byte body).
pub const SMF_MIN_FILE_SIZE: usize = 14;

/// Highest defined SMF format (2 = independent sequences).
pub const SMF_MAX_FORMAT: u16 = 2;

/// Validate the `MThd` chunk. Returns the header and the offset of the next chunk.
pub(super) fn validate_header(
    data: &[u8],
    report: &mut SmfValidationReport,
) -> Result<(SmfHeaderInfo, usize), SmfFormatError> {
    if data.len() < SMF_MIN_FILE_SIZE {
        return Err(SmfFormatError::FileTooSmall {
            size: data.len(),
            minimum: SMF_MIN_FILE_SIZE,
        });
    }

    // Offset 0-3: chunk id
    if &data[0..4] != SMF_HEADER_MAGIC {
        return Err(SmfFormatError::InvalidHeaderMagic {
            found: data[0..4].to_vec(),
        });
    }

    // Offset 4-7: body length
    let header_length = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    if header_length < SMF_HEADER_LENGTH {
        return Err(SmfFormatError::InvalidHeaderLength {
            length: header_length,
            expected: SMF_HEADER_LENGTH,
        });
    }
    if header_length > SMF_HEADER_LENGTH {
        report.add_warning(SmfWarning::NonStandardHeaderLength {
            length: header_length,
            standard: SMF_HEADER_LENGTH,
        });
    }

    let body_end = 8 + header_length as usize;
    if body_end > data.len() {
        return Err(SmfFormatError::ChunkTruncated {
            offset: 0,
            declared: header_length as usize,
            available: data.len() - 8,
        });
    }

    // Offset 8-13: format, track count, division
    let format = u16::from_be_bytes([data[8], data[9]]);
    if format > SMF_MAX_FORMAT {
        return Err(SmfFormatError::UnsupportedFormat { format });
    }

    let num_tracks = u16::from_be_bytes([data[10], data[11]]);
    if format == SMF_FORMAT_SINGLE && num_tracks != 1 {
        report.add_error(SmfFormatError::InvalidTrackCountForFormat { format, num_tracks });
    }

    let division = u16::from_be_bytes([data[12], data[13]]);
    if division == 0 || division & 0x8000 != 0 {
        return Err(SmfFormatError::UnsupportedDivision { division });
    }

    Ok((
        SmfHeaderInfo {
            format,
            num_tracks,
            ticks_per_beat: division,
            header_length,
        },
        body_end,
    ))
}
