//! Spheric MIDI Backend - Deterministic Standard MIDI File Generation
//!
//! This crate composes a short, fixed-structure ambient loop and serializes it
//! into a Standard MIDI File (SMF). The score itself is literal data; the
//! interesting part is the event-stream encoding: delta-time accumulation,
//! per-track channel assignment and meta-event placement.
//!
//! # Features
//!
//! - **SMF Writer**: format 0/1 files, metrical timing, running status, VLQ delta-times
//! - **Track Builders**: `emit_note` / `emit_chord` helpers that keep tracks well-formed
//! - **Validator**: decodes SMF bytes back into events and checks note pairing
//! - **Atomic Output**: files are written through a temp file and renamed into place
//!
//! # Determinism
//!
//! Given the same [`GenerateOptions`], the output is byte-identical. There is no
//! randomness and no clock involved; the BLAKE3 hash of the bytes is reported so
//! callers can compare runs.
//!
//! # Example
//!
//! ```no_run
//! use spheric_midi::{generate_loop, GenerateOptions};
//!
//! let result = generate_loop(&GenerateOptions::default())?;
//! std::fs::write(format!("loop.{}", result.extension), &result.data)?;
//! println!("Generated hash: {}", result.hash);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Structure
//!
//! - [`smf`]: Standard MIDI File event model, writer and validator
//! - [`score`]: Fixed chord, phrase and arpeggio tables
//! - [`options`]: Generation options (time base, tempo, per-layer voices)
//! - [`generate`]: Main generation entry point

pub mod error;
pub mod generate;
pub mod options;
pub mod score;
pub mod smf;

// Re-export main types
pub use error::EncodeError;
pub use generate::{
    build_sequence, emit_layer, generate_loop, write_loop, GenerateResult, TrackSummary,
};
pub use options::{GenerateOptions, LayerOptions};
pub use smf::{Event, Sequence, SmfValidationReport, SmfValidator, Track, TrackEvent};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier.
pub const BACKEND_ID: &str = "spheric-midi";

/// Default output file name for the generated loop.
pub const DEFAULT_OUTPUT_FILE: &str = "calm_spheric_loop.mid";
