//! JSON output types for machine-readable CLI output.
//!
//! These types back the `--json` flag on the generate and inspect commands.

use serde::{Deserialize, Serialize};
use spheric_midi::smf::{SmfTrackInfo, SmfValidationReport};
use spheric_midi::{GenerateOptions, TrackSummary};

/// Error codes for CLI operations.
///
/// Encoder errors pass their own codes through (`ENC_XXX`).
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Options file could not be parsed
    pub const OPTIONS_PARSE: &str = "CLI_002";
    /// File is not a decodable SMF file
    pub const SMF_DECODE: &str = "CLI_003";
    /// Decoded file failed validation
    pub const SMF_INVALID: &str = "CLI_004";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "ENC_002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Output of `spheric --json`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// Whether the file was written.
    pub success: bool,
    /// Destination path.
    pub output: String,
    /// BLAKE3 hash of the written bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Size of the written file in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    /// Options the loop was generated with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
    /// Per-track summary.
    pub tracks: Vec<TrackSummary>,
    /// Errors (empty on success).
    pub errors: Vec<JsonError>,
}

impl GenerateOutput {
    /// A failed run with a single error.
    pub fn failure(output: &str, error: JsonError) -> Self {
        Self {
            success: false,
            output: output.to_string(),
            hash: None,
            size: None,
            options: None,
            tracks: Vec::new(),
            errors: vec![error],
        }
    }
}

/// One track in `spheric inspect --json`.
#[derive(Debug, Clone, Serialize)]
pub struct InspectTrack {
    pub index: usize,
    pub events: usize,
    pub total_ticks: u64,
    pub note_ons: usize,
    pub programs: Vec<u8>,
    pub channels: Vec<u8>,
}

impl From<&SmfTrackInfo> for InspectTrack {
    fn from(info: &SmfTrackInfo) -> Self {
        Self {
            index: info.index,
            events: info.events.len(),
            total_ticks: info.total_ticks,
            note_ons: info.note_on_count,
            programs: info.programs.clone(),
            channels: info.channels.clone(),
        }
    }
}

/// Output of `spheric inspect --json`.
#[derive(Debug, Clone, Serialize)]
pub struct InspectOutput {
    pub valid: bool,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks_per_beat: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo_us_per_beat: Option<u32>,
    pub duration_seconds: f64,
    pub tracks: Vec<InspectTrack>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<String>,
}

impl InspectOutput {
    /// Build from a validation report.
    pub fn from_report(input: &str, report: &SmfValidationReport) -> Self {
        Self {
            valid: report.valid,
            input: input.to_string(),
            format: report.header.map(|h| h.format),
            ticks_per_beat: report.header.map(|h| h.ticks_per_beat),
            tempo_us_per_beat: report.tempo_us_per_beat,
            duration_seconds: report.duration_seconds(),
            tracks: report.tracks.iter().map(InspectTrack::from).collect(),
            errors: report
                .errors
                .iter()
                .map(|e| JsonError::new(error_codes::SMF_INVALID, e.to_string()))
                .collect(),
            warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// A file that could not be read or decoded at all.
    pub fn failure(input: &str, error: JsonError) -> Self {
        Self {
            valid: false,
            input: input.to_string(),
            format: None,
            ticks_per_beat: None,
            tempo_us_per_beat: None,
            duration_seconds: 0.0,
            tracks: Vec::new(),
            errors: vec![error],
            warnings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_omits_empty_fields() {
        let output = GenerateOutput::failure("out.mid", JsonError::new("ENC_003", "disk full"));
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("hash").is_none());
        assert_eq!(json["errors"][0]["code"], "ENC_003");
    }

    #[test]
    fn test_inspect_output_from_generated_loop() {
        let data = spheric_midi::generate_loop(&GenerateOptions::default())
            .unwrap()
            .data;
        let report = spheric_midi::SmfValidator::validate(&data).unwrap();
        let output = InspectOutput::from_report("loop.mid", &report);
        assert!(output.valid);
        assert_eq!(output.format, Some(1));
        assert_eq!(output.ticks_per_beat, Some(480));
        assert_eq!(output.tracks.len(), 4);
        assert_eq!(output.tracks[1].programs, vec![90]);
    }
}
