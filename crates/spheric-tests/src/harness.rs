//! Test harness for running CLI commands against a scratch directory.
//!
//! Commands run as library calls through `spheric_cli::commands`, so exit
//! codes and written files can be checked without spawning a process.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use spheric_midi::smf::SmfValidationReport;
use spheric_midi::{GenerateOptions, SmfValidator, DEFAULT_OUTPUT_FILE};
use tempfile::TempDir;

/// A scratch directory plus helpers for driving the CLI commands.
pub struct TestHarness {
    /// Working directory for test outputs.
    pub work_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness.
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("Failed to create work dir"),
        }
    }

    /// Get the working directory path.
    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    /// Default output path inside the working directory.
    pub fn default_output(&self) -> PathBuf {
        self.path().join(DEFAULT_OUTPUT_FILE)
    }

    /// Write `options` as JSON into the working directory and return its path.
    pub fn write_options(&self, name: &str, options: &GenerateOptions) -> PathBuf {
        let path = self.path().join(name);
        let json = serde_json::to_string_pretty(options).expect("Failed to serialize options");
        fs::write(&path, json).expect("Failed to write options file");
        path
    }

    /// Run the generate command.
    pub fn generate(&self, out: &Path, options: Option<&Path>, json: bool) -> ExitCode {
        spheric_cli::commands::generate::run(
            Some(path_str(out)),
            options.map(path_str),
            json,
        )
        .expect("generate command returned an error")
    }

    /// Run the inspect command.
    pub fn inspect(&self, input: &Path, json: bool) -> ExitCode {
        spheric_cli::commands::inspect::run(path_str(input), json)
            .expect("inspect command returned an error")
    }

    /// Names of all files in the working directory, sorted.
    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("Failed to list work dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("test paths are UTF-8")
}

/// Read and validate an SMF file.
pub fn validate_smf_file(path: &Path) -> Result<SmfValidationReport, String> {
    let data = fs::read(path).map_err(|e| format!("Failed to read file: {}", e))?;
    SmfValidator::validate(&data).map_err(|e| e.to_string())
}
