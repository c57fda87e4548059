//! Scan configuration.

use crate::kind::AssetKind;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Immutable settings threaded through validation and migration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root of the mirrored output tree
    pub output_dir: PathBuf,
    /// Kinds whose validation is skipped; such files get a `Skipped` verdict
    pub skip_kinds: BTreeSet<AssetKind>,
    /// Do not copy files with a `Skipped` verdict
    pub dont_write_skipped: bool,
    /// Log what would be copied without touching the output tree
    pub dry_run: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            skip_kinds: BTreeSet::new(),
            dont_write_skipped: false,
            dry_run: false,
        }
    }
}

impl ScanConfig {
    /// Creates a config writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Adds a kind to the skip-set
    pub fn skip(mut self, kind: AssetKind) -> Self {
        self.skip_kinds.insert(kind);
        self
    }

    /// Replaces the skip-set
    pub fn skip_kinds(mut self, kinds: impl IntoIterator<Item = AssetKind>) -> Self {
        self.skip_kinds = kinds.into_iter().collect();
        self
    }

    /// Sets whether skipped files are kept out of the output
    pub fn dont_write_skipped(mut self, value: bool) -> Self {
        self.dont_write_skipped = value;
        self
    }

    /// Sets dry-run mode
    pub fn dry_run(mut self, value: bool) -> Self {
        self.dry_run = value;
        self
    }

    /// Returns true if validation of `kind` is skipped
    pub fn skips(&self, kind: AssetKind) -> bool {
        self.skip_kinds.contains(&kind)
    }
}
