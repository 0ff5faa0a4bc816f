//! Error type for sequence construction and serialization.

use thiserror::Error;

/// Error type for building and writing a MIDI sequence.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Non-positive time resolution or tempo, or an otherwise unusable setup.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A pitch, velocity, program, channel or delta-time outside the format's bounds.
    #[error("{what} out of range: {value} (expected {min}..={max})")]
    InvalidRange {
        what: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// IO error during writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncodeError {
    /// Check `value` against an inclusive range, naming the field on failure.
    pub(crate) fn check_range(
        what: &'static str,
        value: u32,
        min: u32,
        max: u32,
    ) -> Result<(), EncodeError> {
        if value < min || value > max {
            return Err(EncodeError::InvalidRange {
                what,
                value,
                min,
                max,
            });
        }
        Ok(())
    }

    /// Stable short code, used by the CLI's JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            EncodeError::InvalidConfiguration(_) => "ENC_001",
            EncodeError::InvalidRange { .. } => "ENC_002",
            EncodeError::Io(_) => "ENC_003",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_bounds_are_inclusive() {
        assert!(EncodeError::check_range("pitch", 0, 0, 127).is_ok());
        assert!(EncodeError::check_range("pitch", 127, 0, 127).is_ok());
        assert!(EncodeError::check_range("pitch", 128, 0, 127).is_err());
    }

    #[test]
    fn test_invalid_range_message() {
        let err = EncodeError::check_range("program", 128, 0, 127).unwrap_err();
        assert_eq!(err.to_string(), "program out of range: 128 (expected 0..=127)");
        assert_eq!(err.code(), "ENC_002");
    }
}
