//! Integration tests for writing generated loops to disk.
//!
//! These tests cover atomic file output, determinism across runs, and the
//! guarantee that failed runs leave no file behind.

use spheric_midi::smf::{Sequence, SmfValidator};
use spheric_midi::{
    build_sequence, generate_loop, EncodeError, GenerateOptions, DEFAULT_OUTPUT_FILE,
};

/// Build and write the default loop into `dir`, returning the file bytes.
fn write_default(dir: &std::path::Path, name: &str) -> Vec<u8> {
    let path = dir.join(name);
    build_sequence(&GenerateOptions::default())
        .unwrap()
        .write_to_file(&path)
        .unwrap();
    std::fs::read(&path).unwrap()
}

#[test]
fn test_written_file_matches_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let written = write_default(dir.path(), DEFAULT_OUTPUT_FILE);
    let generated = generate_loop(&GenerateOptions::default()).unwrap();
    assert_eq!(written, generated.data);
    assert_eq!(blake3::hash(&written).to_hex().to_string(), generated.hash);
}

#[test]
fn test_two_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_default(dir.path(), "first.mid");
    let second = write_default(dir.path(), "second.mid");
    assert_eq!(first, second);
}

#[test]
fn test_hash_stable_across_builds() {
    let a = build_sequence(&GenerateOptions::default()).unwrap();
    let b = build_sequence(&GenerateOptions::default()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
}

#[test]
fn test_options_change_output() {
    let default = generate_loop(&GenerateOptions::default()).unwrap();
    let faster = generate_loop(&GenerateOptions {
        tempo_us_per_beat: 500_000,
        ..Default::default()
    })
    .unwrap();
    assert_ne!(default.hash, faster.hash);
    assert_eq!(default.data.len(), faster.data.len());
}

#[test]
fn test_out_of_range_program_produces_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.mid");

    let result = (|| -> Result<(), EncodeError> {
        let mut sequence = Sequence::new(480)?;
        sequence.add_track().set_instrument(128)?;
        sequence.write_to_file(&path)
    })();

    assert!(matches!(
        result,
        Err(EncodeError::InvalidRange { what: "program", value: 128, .. })
    ));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unwritable_destination_fails_with_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join(DEFAULT_OUTPUT_FILE);

    let err = build_sequence(&GenerateOptions::default())
        .unwrap()
        .write_to_file(&path)
        .unwrap_err();

    assert!(matches!(err, EncodeError::Io(_)));
    assert!(!path.exists());
}

#[test]
fn test_failed_write_leaves_previous_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_OUTPUT_FILE);
    std::fs::write(&path, b"previous").unwrap();

    let mut options = GenerateOptions::default();
    options.arpeggio.velocity = 200;
    let result = build_sequence(&options).and_then(|s| s.write_to_file(&path));

    assert!(matches!(
        result,
        Err(EncodeError::InvalidRange { what: "velocity", .. })
    ));
    assert_eq!(std::fs::read(&path).unwrap(), b"previous");
}

#[test]
fn test_written_file_validates() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_default(dir.path(), DEFAULT_OUTPUT_FILE);
    assert!(SmfValidator::is_smf(&data));
    let report = SmfValidator::validate(&data).unwrap();
    assert!(report.valid, "errors: {:?}", report.errors);
    assert_eq!(report.tracks.len(), 4);
    // Melody is the longest layer: 4 phrases of 10 beats at 90 BPM.
    assert_eq!(report.duration_ticks(), 19_200);
}
