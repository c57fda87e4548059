//! Directory scanning.
//!
//! [`Scanner::reports`] walks the input tree in sorted order and yields one
//! [`FileReport`] per regular file. Each file is loaded, judged, migrated
//! and dropped before the walk moves on, so nothing is shared between files
//! and the caller can stop at any file boundary simply by dropping the
//! iterator.

use crate::asset::AssetFile;
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::kind::{classify, AssetKind};
use crate::migrate::Action;
use crate::process::process_file;
use crate::verdict::{FailureReason, Verdict};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Result of processing one discovered file
#[derive(Debug)]
pub struct FileReport {
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// Kind declared by the extension
    pub kind: Option<AssetKind>,
    /// Validation result
    pub verdict: Verdict,
    /// Migration result
    pub action: Result<Action>,
}

/// Walks an input directory and processes every file in it
#[derive(Debug, Clone)]
pub struct Scanner {
    input_dir: PathBuf,
    config: ScanConfig,
    /// Canonical output directory, excluded from the walk when nested
    output_dir: Option<PathBuf>,
}

impl Scanner {
    /// Creates a scanner, failing if `input_dir` is not a directory
    pub fn new(input_dir: impl Into<PathBuf>, config: ScanConfig) -> Result<Self> {
        let input_dir = input_dir.into();
        if !input_dir.exists() {
            return Err(Error::input_directory(input_dir, "does not exist"));
        }
        if !input_dir.is_dir() {
            return Err(Error::input_directory(input_dir, "is not a directory"));
        }

        let output_dir = canonical_output(&config.output_dir);
        Ok(Self {
            input_dir,
            config,
            output_dir,
        })
    }

    /// The configuration in use
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Lazily processes every file, in deterministic order.
    ///
    /// Walk errors are yielded as `Err`; per-file problems are part of the
    /// report instead.
    pub fn reports(&self) -> impl Iterator<Item = Result<FileReport>> + '_ {
        WalkDir::new(&self.input_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_output_dir(entry))
            .filter_map(move |entry| match entry {
                Err(e) => Some(Err(Error::from(e))),
                Ok(entry) if !entry.file_type().is_file() => None,
                Ok(entry) => Some(Ok(self.process_path(entry.path()))),
            })
    }

    /// Processes every file, logging each outcome
    pub fn run(&self) -> ScanSummary {
        info!("Scanning directory: {}", self.input_dir.display());
        if !self.config.skip_kinds.is_empty() {
            let kinds: Vec<&str> = self.config.skip_kinds.iter().map(|k| k.as_str()).collect();
            info!("Skipping validation for {}", kinds.join(", "));
        }

        let mut summary = ScanSummary::default();
        for report in self.reports() {
            match report {
                Ok(report) => {
                    log_report(&report);
                    summary.record(&report);
                }
                Err(e) => {
                    warn!("{}", e);
                    summary.walk_errors += 1;
                }
            }
        }
        summary
    }

    fn is_output_dir(&self, entry: &walkdir::DirEntry) -> bool {
        let Some(output_dir) = &self.output_dir else {
            return false;
        };
        entry.file_type().is_dir()
            && fs::canonicalize(entry.path())
                .map(|path| &path == output_dir)
                .unwrap_or(false)
    }

    fn process_path(&self, path: &Path) -> FileReport {
        let relative_path = path
            .strip_prefix(&self.input_dir)
            .unwrap_or(path)
            .to_path_buf();
        debug!("Processing {}", relative_path.display());

        match AssetFile::load(&self.input_dir, &relative_path) {
            Ok(file) => {
                let outcome = process_file(&file, &self.config);
                FileReport {
                    kind: file.kind(),
                    relative_path,
                    verdict: outcome.verdict,
                    action: outcome.action,
                }
            }
            Err(e) => {
                warn!("{}", e);
                FileReport {
                    kind: classify(&relative_path),
                    relative_path,
                    verdict: Verdict::Fail(FailureReason::ReadError),
                    action: Ok(Action::Rejected),
                }
            }
        }
    }
}

/// Best-effort absolute form of the output directory, which may not exist yet
fn canonical_output(output_dir: &Path) -> Option<PathBuf> {
    if let Ok(path) = fs::canonicalize(output_dir) {
        return Some(path);
    }
    let name = output_dir.file_name()?;
    let parent = output_dir
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::canonicalize(parent).ok().map(|parent| parent.join(name))
}

fn log_report(report: &FileReport) {
    let path = report.relative_path.display();
    match &report.verdict {
        Verdict::Pass => info!("Validated {}", path),
        Verdict::Skipped(reason) => info!("Not validated {}: {}", path, reason),
        Verdict::Fail(reason) => warn!("Validation error for {}: {}", path, reason),
    }
    if let Err(e) = &report.action {
        error!("Failed to write {}: {}", path, e);
    }
}

/// Counters for a finished scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// `.package` files seen
    pub packages: usize,
    /// Script archives seen
    pub scripts: usize,
    /// Images seen
    pub images: usize,
    /// Files with an unknown extension
    pub other: usize,
    /// Files that passed validation
    pub valid: usize,
    /// Files that failed validation
    pub corrupted: usize,
    /// Files that were not validated
    pub skipped: usize,
    /// Files written to the output tree
    pub copied: usize,
    /// Files that would have been written in a real run
    pub dry_run: usize,
    /// Files kept out of the output tree despite not failing
    pub not_written: usize,
    /// Files whose copy failed
    pub write_failures: usize,
    /// Entries the walk could not read
    pub walk_errors: usize,
}

impl ScanSummary {
    /// Adds one file to the counters
    pub fn record(&mut self, report: &FileReport) {
        match report.kind {
            Some(AssetKind::Package) => self.packages += 1,
            Some(AssetKind::Script) => self.scripts += 1,
            Some(AssetKind::Image) => self.images += 1,
            None => self.other += 1,
        }
        match report.verdict {
            Verdict::Pass => self.valid += 1,
            Verdict::Fail(_) => self.corrupted += 1,
            Verdict::Skipped(_) => self.skipped += 1,
        }
        match report.action {
            Ok(Action::Copied) => self.copied += 1,
            Ok(Action::DryRunLogged) => self.dry_run += 1,
            Ok(Action::Skipped) => self.not_written += 1,
            Ok(Action::Rejected) => {}
            Err(_) => self.write_failures += 1,
        }
    }

    /// Total files processed
    pub fn total(&self) -> usize {
        self.packages + self.scripts + self.images + self.other
    }

    /// Returns true if any file could not be read, written or walked
    pub fn has_errors(&self) -> bool {
        self.write_failures > 0 || self.walk_errors > 0
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validated {} cc files", self.valid)?;
        writeln!(f, "Found {} corrupted cc files", self.corrupted)?;
        writeln!(f, "Skipped validation for {} files", self.skipped)?;
        writeln!(f, "Found {} package files", self.packages)?;
        writeln!(f, "Found {} script files", self.scripts)?;
        writeln!(f, "Found {} image files", self.images)?;
        writeln!(f, "Found {} other files", self.other)?;
        if self.dry_run > 0 {
            writeln!(f, "Would copy {} files (dry run)", self.dry_run)?;
        } else {
            writeln!(f, "Copied {} files", self.copied)?;
        }
        if self.not_written > 0 {
            writeln!(f, "Left out {} skipped files", self.not_written)?;
        }
        if self.write_failures > 0 {
            writeln!(f, "Failed to write {} files", self.write_failures)?;
        }
        if self.walk_errors > 0 {
            writeln!(f, "Could not read {} directory entries", self.walk_errors)?;
        }
        Ok(())
    }
}
