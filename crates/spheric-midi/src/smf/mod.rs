//! Standard MIDI File (SMF) event model, writer and validator.
//!
//! This module provides deterministic generation of SMF files from in-memory
//! sequences, as well as a validator that decodes SMF bytes back into events.
//!
//! # SMF Overview
//!
//! An SMF file is a header chunk followed by track chunks:
//! - `MThd`: format, track count and time division (ticks per beat)
//! - `MTrk`: a stream of events, each prefixed by a variable-length delta-time
//!
//! Delta-times are local to a track. Events that happen at the same instant are
//! written as a burst of zero-delta events; only the next non-zero delta moves
//! the clock forward.
//!
//! # Validation
//!
//! ```rust,ignore
//! use spheric_midi::smf::SmfValidator;
//!
//! let data = std::fs::read("loop.mid")?;
//! let report = SmfValidator::validate(&data)?;
//!
//! if report.valid {
//!     println!("Valid SMF file: {} tracks", report.tracks.len());
//! } else {
//!     for error in &report.errors {
//!         eprintln!("Error: {}", error);
//!     }
//! }
//! ```

mod event;
mod header;
mod track;
mod validator;
mod vlq;
mod writer;

pub use event::*;
pub use header::*;
pub use track::*;
pub use validator::*;
pub use vlq::*;
pub use writer::*;
