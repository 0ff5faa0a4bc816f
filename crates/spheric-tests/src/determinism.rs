//! Determinism testing for loop generation.
//!
//! The generator has no randomness and no clock input: the same options must
//! produce the same bytes every time. This module runs a generator several
//! times and reports the first byte that differs, if any.
//!
//! # Example
//!
//! ```rust,ignore
//! use spheric_tests::determinism::{verify_determinism, DeterminismFixture};
//!
//! let result = verify_determinism(|| generate_loop(&options).unwrap().data, 3);
//! result.assert_deterministic();
//!
//! let report = DeterminismFixture::new()
//!     .add_case("default", GenerateOptions::default())
//!     .runs(5)
//!     .run();
//! assert!(report.all_deterministic());
//! ```

use std::fmt;

use spheric_midi::{generate_loop, GenerateOptions};

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Size of the output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// If non-deterministic, the first difference found.
    pub diff_info: Option<DiffInfo>,
}

/// The first byte difference found between runs.
#[derive(Debug, Clone)]
pub struct DiffInfo {
    /// Byte offset of the difference.
    pub offset: usize,
    /// Value from the first run (0 past its end).
    pub expected: u8,
    /// Value from the differing run (0 past its end).
    pub actual: u8,
    /// Which run (0-indexed) differed.
    pub run_index: usize,
    /// Up to 8 bytes on each side of the difference, from the first run.
    pub before: Vec<u8>,
    pub after: Vec<u8>,
}

impl fmt::Display for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Difference at byte {}: expected 0x{:02X}, got 0x{:02X} (run {})",
            self.offset, self.expected, self.actual, self.run_index
        )?;
        if !self.before.is_empty() || !self.after.is_empty() {
            write!(f, "\n  Context: ")?;
            for b in &self.before {
                write!(f, "{:02X} ", b)?;
            }
            write!(f, "[{:02X}] ", self.expected)?;
            for b in &self.after {
                write!(f, "{:02X} ", b)?;
            }
        }
        Ok(())
    }
}

impl DeterminismResult {
    /// Panic with a detailed message if not deterministic.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = &self.diff_info {
            panic!(
                "Non-deterministic output detected!\n\
                 Runs: {}\n\
                 Output size: {} bytes\n\
                 Hash: {}\n\
                 {}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// Run `generate_fn` `runs` times and compare every output with the first.
pub fn verify_determinism<F, O>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = generate_fn();
    let reference = reference.as_ref();
    let hash = compute_hash(reference);

    let diff_info = (1..runs).find_map(|run_index| {
        let output = generate_fn();
        find_first_difference(reference, output.as_ref(), run_index)
    });

    DeterminismResult {
        is_deterministic: diff_info.is_none(),
        runs,
        output_size: reference.len(),
        hash,
        diff_info,
    }
}

/// First differing byte, treating bytes past the end of the shorter slice as 0.
fn find_first_difference(expected: &[u8], actual: &[u8], run_index: usize) -> Option<DiffInfo> {
    let offset = expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))?;

    let before_start = offset.saturating_sub(8);
    let after_end = (offset + 9).min(expected.len());
    Some(DiffInfo {
        offset,
        expected: expected.get(offset).copied().unwrap_or(0),
        actual: actual.get(offset).copied().unwrap_or(0),
        run_index,
        before: expected[before_start..offset.min(expected.len())].to_vec(),
        after: expected
            .get(offset + 1..after_end)
            .map(<[u8]>::to_vec)
            .unwrap_or_default(),
    })
}

/// True if every hash equals the first (or the slice is empty).
pub fn verify_hash_determinism(hashes: &[String]) -> bool {
    hashes.windows(2).all(|pair| pair[0] == pair[1])
}

/// Compute BLAKE3 hash of data.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// A batch of named option sets, each generated several times.
#[derive(Debug, Clone)]
pub struct DeterminismFixture {
    pub cases: Vec<(String, GenerateOptions)>,
    pub runs: usize,
}

impl Default for DeterminismFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl DeterminismFixture {
    /// Create a new empty fixture running each case three times.
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            runs: 3,
        }
    }

    /// Add a named option set.
    pub fn add_case(mut self, name: impl Into<String>, options: GenerateOptions) -> Self {
        self.cases.push((name.into(), options));
        self
    }

    /// Set the number of runs per case.
    pub fn runs(mut self, runs: usize) -> Self {
        assert!(runs >= 2, "Must run at least 2 times");
        self.runs = runs;
        self
    }

    /// Generate every case and collect the results.
    pub fn run(&self) -> DeterminismReport {
        let entries = self
            .cases
            .iter()
            .map(|(name, options)| {
                // Options that fail to build are reported, not compared.
                let result = match generate_loop(options) {
                    Err(e) => Err(e.to_string()),
                    Ok(_) => Ok(verify_determinism(
                        || generate_loop(options).map(|r| r.data).unwrap_or_default(),
                        self.runs,
                    )),
                };
                DeterminismReportEntry {
                    name: name.clone(),
                    result,
                }
            })
            .collect();
        DeterminismReport { entries }
    }
}

/// Outcome for one fixture case.
#[derive(Debug)]
pub struct DeterminismReportEntry {
    pub name: String,
    /// `Err` holds the generation error message.
    pub result: Result<DeterminismResult, String>,
}

impl DeterminismReportEntry {
    /// Check if this entry generated and was deterministic.
    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(r) if r.is_deterministic)
    }
}

/// Report of determinism tests across fixture cases.
#[derive(Debug, Default)]
pub struct DeterminismReport {
    pub entries: Vec<DeterminismReportEntry>,
}

impl DeterminismReport {
    /// Check if all cases passed.
    pub fn all_deterministic(&self) -> bool {
        self.entries.iter().all(DeterminismReportEntry::passed)
    }

    /// Get number of passed cases.
    pub fn passed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.passed()).count()
    }
}

impl fmt::Display for DeterminismReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Determinism: {}/{} passed",
            self.passed_count(),
            self.entries.len()
        )?;
        for entry in &self.entries {
            match &entry.result {
                Ok(r) if r.is_deterministic => {
                    writeln!(f, "  PASS {} ({} bytes, {})", entry.name, r.output_size, &r.hash[..16])?
                }
                Ok(r) => match &r.diff_info {
                    Some(diff) => writeln!(f, "  FAIL {}: {}", entry.name, diff)?,
                    None => writeln!(f, "  FAIL {}", entry.name)?,
                },
                Err(e) => writeln!(f, "  ERROR {}: {}", entry.name, e)?,
            }
        }
        Ok(())
    }
}
