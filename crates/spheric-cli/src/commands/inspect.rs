//! Inspect command implementation
//!
//! Decodes an SMF file and prints its header, tempo and per-track contents.

use anyhow::{Context, Result};
use colored::Colorize;
use spheric_midi::smf::SmfValidationReport;
use spheric_midi::SmfValidator;
use std::fs;
use std::process::ExitCode;

use super::json_output::{error_codes, InspectOutput, JsonError};

/// Run the inspect command
///
/// # Arguments
/// * `input` - Path to the SMF file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if the file is valid, 1 otherwise
pub fn run(input: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        return run_json(input);
    }

    let data = fs::read(input).with_context(|| format!("Failed to read file: {}", input))?;
    println!("{} {}", "Inspecting:".cyan().bold(), input);

    let report = match SmfValidator::validate(&data) {
        Ok(report) => report,
        Err(e) => {
            println!("{} {}", "FAILED".red().bold(), e);
            return Ok(ExitCode::from(1));
        }
    };

    print_report(&report);

    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_report(report: &SmfValidationReport) {
    if let Some(header) = report.header {
        println!(
            "{} format {}, {} tracks, {} ticks/beat",
            "Header:".dimmed(),
            header.format,
            header.num_tracks,
            header.ticks_per_beat
        );
    }
    if let Some(tempo) = report.tempo_us_per_beat {
        println!(
            "{} {} us/beat ({:.1} BPM)",
            "Tempo:".dimmed(),
            tempo,
            60_000_000.0 / f64::from(tempo)
        );
    }

    for track in &report.tracks {
        println!(
            "  {} track {}  {:>4} events  {:>4} notes  {:>6} ticks  programs {:?}  channels {:?}",
            "-".dimmed(),
            track.index,
            track.events.len(),
            track.note_on_count,
            track.total_ticks,
            track.programs,
            track.channels
        );
    }
    println!(
        "{} {} ticks, {:.2}s",
        "Length:".dimmed(),
        report.duration_ticks(),
        report.duration_seconds()
    );

    for warning in &report.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    for error in &report.errors {
        println!("  {} {}", "error:".red(), error);
    }

    if report.has_errors() {
        println!("{} ({} errors)", "Invalid".red().bold(), report.errors.len());
    } else if report.has_warnings() {
        println!(
            "{} ({} warnings)",
            "Valid".yellow().bold(),
            report.warnings.len()
        );
    } else {
        println!("{}", "Valid".green().bold());
    }
}

/// Run inspect with machine-readable JSON output
fn run_json(input: &str) -> Result<ExitCode> {
    let output = match fs::read(input) {
        Err(e) => InspectOutput::failure(
            input,
            JsonError::new(
                error_codes::FILE_READ,
                format!("Failed to read file: {}", e),
            ),
        ),
        Ok(data) => match SmfValidator::validate(&data) {
            Ok(report) => InspectOutput::from_report(input, &report),
            Err(e) => {
                InspectOutput::failure(input, JsonError::new(error_codes::SMF_DECODE, e.to_string()))
            }
        },
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize JSON output")?;
    println!("{}", json);

    Ok(if output.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spheric_midi::{generate_loop, GenerateOptions};

    #[test]
    fn test_inspect_generated_loop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.mid");
        fs::write(&path, generate_loop(&GenerateOptions::default()).unwrap().data).unwrap();

        assert_eq!(run(path.to_str().unwrap(), false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(path.to_str().unwrap(), true).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_inspect_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mid");
        fs::write(&path, b"this is not a midi file at all").unwrap();

        assert_eq!(run(path.to_str().unwrap(), false).unwrap(), ExitCode::from(1));
        assert_eq!(run(path.to_str().unwrap(), true).unwrap(), ExitCode::from(1));
    }

    #[test]
    fn test_inspect_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.mid");
        assert!(run(path.to_str().unwrap(), false).is_err());
        assert_eq!(run(path.to_str().unwrap(), true).unwrap(), ExitCode::from(1));
    }
}
