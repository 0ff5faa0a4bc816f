//! Spheric End-to-End Test Infrastructure
//!
//! This crate provides integration tests across the library and the CLI:
//!
//! - Generation: options -> `.mid` file on disk
//! - Validation: written files decode and pass the SMF validator
//! - **Determinism**: byte-identical output across runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p spheric-tests
//! ```

pub mod determinism;
pub mod harness;

// Re-export commonly used items
pub use determinism::{
    compute_hash, verify_determinism, verify_hash_determinism, DeterminismFixture,
    DeterminismReport, DeterminismResult,
};
pub use harness::{validate_smf_file, TestHarness};
