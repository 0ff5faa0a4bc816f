//! Generation options: time base, tempo and the voice of each layer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

/// Default time resolution.
pub const DEFAULT_TICKS_PER_BEAT: u16 = 480;

/// Default tempo, about 90 beats per minute.
pub const DEFAULT_TEMPO_US_PER_BEAT: u32 = 666_667;

/// Channel, instrument and intensity for one musical layer.
///
/// Fields are wider than a MIDI data byte so that any out-of-range value from
/// an options file is reported by [`emit_layer`](crate::emit_layer) as
/// `InvalidRange` rather than as a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerOptions {
    /// MIDI channel (0-15).
    pub channel: u32,
    /// General MIDI program number (0-127).
    pub program: u32,
    /// Velocity for every note in the layer (1-127).
    pub velocity: u32,
}

impl LayerOptions {
    /// Create layer options.
    pub const fn new(channel: u32, program: u32, velocity: u32) -> Self {
        Self {
            channel,
            program,
            velocity,
        }
    }
}

/// Options for [`generate_loop`](crate::generate_loop).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateOptions {
    /// Ticks per beat for the whole sequence.
    pub ticks_per_beat: u16,
    /// Tempo written to the control track.
    pub tempo_us_per_beat: u32,
    /// Omit repeated status bytes.
    pub running_status: bool,
    /// Warm synth pad playing the chord progression.
    pub pad: LayerOptions,
    /// Flute melody.
    pub melody: LayerOptions,
    /// Harp arpeggios.
    pub arpeggio: LayerOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
            tempo_us_per_beat: DEFAULT_TEMPO_US_PER_BEAT,
            running_status: true,
            pad: LayerOptions::new(0, 90, 40),
            melody: LayerOptions::new(1, 73, 55),
            arpeggio: LayerOptions::new(2, 46, 35),
        }
    }
}

impl GenerateOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, EncodeError> {
        serde_json::from_str(json)
            .map_err(|e| EncodeError::InvalidConfiguration(format!("invalid options: {}", e)))
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, EncodeError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Approximate tempo in beats per minute.
    pub fn bpm(&self) -> f64 {
        if self.tempo_us_per_beat == 0 {
            return 0.0;
        }
        60_000_000.0 / f64::from(self.tempo_us_per_beat)
    }
}
