//! Generate command implementation
//!
//! Builds the loop and writes it atomically to the output path.

use anyhow::{Context, Result};
use colored::Colorize;
use spheric_midi::{write_loop, EncodeError, GenerateOptions, DEFAULT_OUTPUT_FILE};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{error_codes, GenerateOutput, JsonError};

/// Run the generate command
///
/// # Arguments
/// * `out` - Output file path (default: `calm_spheric_loop.mid`)
/// * `options_path` - Optional JSON file overriding generation options
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 success, 1 on any error
pub fn run(out: Option<&str>, options_path: Option<&str>, json_output: bool) -> Result<ExitCode> {
    let out = out.unwrap_or(DEFAULT_OUTPUT_FILE);
    if json_output {
        run_json(out, options_path)
    } else {
        run_human(out, options_path)
    }
}

/// Load options from `path`, or the defaults.
fn load_options(path: Option<&str>) -> Result<GenerateOptions, EncodeError> {
    match path {
        Some(path) => GenerateOptions::load(Path::new(path)),
        None => Ok(GenerateOptions::default()),
    }
}

/// Run generate with human-readable (colored) output
fn run_human(out: &str, options_path: Option<&str>) -> Result<ExitCode> {
    let start = Instant::now();

    println!("{} {}", "Generating:".cyan().bold(), out);
    let options = load_options(options_path)
        .with_context(|| format!("Failed to load options: {}", options_path.unwrap_or("")))?;
    if let Some(path) = options_path {
        println!("{} {}", "Options:".dimmed(), path);
    }
    println!(
        "{} {} ticks/beat, {:.1} BPM",
        "Time base:".dimmed(),
        options.ticks_per_beat,
        options.bpm()
    );

    let result = match write_loop(&options, Path::new(out)) {
        Ok(result) => result,
        Err(e) => {
            println!("{} {}", "FAILED".red().bold(), e);
            return Ok(ExitCode::from(1));
        }
    };

    for track in &result.tracks {
        let voice = match (track.channel, track.program) {
            (Some(channel), Some(program)) => format!("ch {:>2}  prog {:>3}", channel, program),
            _ => "tempo".to_string(),
        };
        println!(
            "  {} {:<9} {}  {:>4} events  {:>6} ticks",
            "+".green(),
            track.name,
            voice.dimmed(),
            track.events,
            track.total_ticks
        );
    }

    println!(
        "{} {} bytes, {}",
        "Hash:".dimmed(),
        result.data.len(),
        &result.hash[..16]
    );
    println!(
        "{} in {:.2?}",
        "Done".green().bold(),
        start.elapsed()
    );

    Ok(ExitCode::SUCCESS)
}

/// Run generate with machine-readable JSON output
fn run_json(out: &str, options_path: Option<&str>) -> Result<ExitCode> {
    let output = match load_options(options_path) {
        Err(e) => {
            let code = match e {
                EncodeError::Io(_) => error_codes::FILE_READ,
                _ => error_codes::OPTIONS_PARSE,
            };
            GenerateOutput::failure(out, JsonError::new(code, e.to_string()))
        }
        Ok(options) => match write_loop(&options, Path::new(out)) {
            Ok(result) => GenerateOutput {
                success: true,
                output: out.to_string(),
                hash: Some(result.hash),
                size: Some(result.data.len()),
                options: Some(options),
                tracks: result.tracks,
                errors: Vec::new(),
            },
            Err(e) => GenerateOutput::failure(out, JsonError::new(e.code(), e.to_string())),
        },
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize JSON output")?;
    println!("{}", json);

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
