//! Per-file pipeline: classify, validate, migrate.

use crate::asset::AssetFile;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::migrate::{Action, Migrator};
use crate::validate::validate;
use crate::verdict::{SkipReason, Verdict};

/// Verdict and action for one file.
///
/// `action` is an error only when the output side failed; the verdict is
/// always available.
#[derive(Debug)]
pub struct Outcome {
    /// Validation result
    pub verdict: Verdict,
    /// What the migrator did, or why it could not
    pub action: Result<Action>,
}

/// Decides the verdict for `file` under `config`, without side effects
pub fn judge(file: &AssetFile, config: &ScanConfig) -> Verdict {
    match file.kind() {
        None => Verdict::Skipped(SkipReason::UnknownExtension),
        Some(kind) if config.skips(kind) => Verdict::Skipped(SkipReason::KindSkipped(kind)),
        Some(kind) => validate(file, kind),
    }
}

/// Validates `file` and acts on the verdict
pub fn process_file(file: &AssetFile, config: &ScanConfig) -> Outcome {
    let verdict = judge(file, config);
    let action = Migrator::new(config).migrate(file, &verdict);
    Outcome { verdict, action }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::AssetKind;
    use crate::testing::PackageBuilder;
    use crate::verdict::FailureReason;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_extension_is_copied() {
        let out = TempDir::new().unwrap();
        let config = ScanConfig::new(out.path());
        let file = AssetFile::new("notes/readme.txt", b"hello".to_vec());

        let outcome = process_file(&file, &config);
        assert_eq!(outcome.verdict, Verdict::Skipped(SkipReason::UnknownExtension));
        assert_eq!(outcome.action.unwrap(), Action::Copied);
        assert_eq!(fs::read(out.path().join("notes/readme.txt")).unwrap(), b"hello");
    }

    #[test]
    fn test_unknown_extension_kept_out_when_requested() {
        let out = TempDir::new().unwrap();
        let config = ScanConfig::new(out.path()).dont_write_skipped(true);
        let file = AssetFile::new("readme.txt", b"hello".to_vec());

        let outcome = process_file(&file, &config);
        assert_eq!(outcome.action.unwrap(), Action::Skipped);
        assert!(!out.path().join("readme.txt").exists());
    }

    #[test]
    fn test_skipped_kind_bypasses_validation() {
        let out = TempDir::new().unwrap();
        let config = ScanConfig::new(out.path()).skip(AssetKind::Package);
        let file = AssetFile::new("broken.package", b"garbage".to_vec());

        let outcome = process_file(&file, &config);
        assert_eq!(
            outcome.verdict,
            Verdict::Skipped(SkipReason::KindSkipped(AssetKind::Package))
        );
        assert_eq!(outcome.action.unwrap(), Action::Copied);
    }

    #[test]
    fn test_valid_package_is_copied_byte_identical() {
        let out = TempDir::new().unwrap();
        let config = ScanConfig::new(out.path());
        let data = PackageBuilder::new().resource(b"tuning".to_vec()).build();
        let file = AssetFile::new("A/B/c.package", data.clone());

        let outcome = process_file(&file, &config);
        assert_eq!(outcome.verdict, Verdict::Pass);
        assert_eq!(outcome.action.unwrap(), Action::Copied);
        assert_eq!(fs::read(out.path().join("A/B/c.package")).unwrap(), data);
    }

    #[test]
    fn test_corrupt_package_is_rejected() {
        let out = TempDir::new().unwrap();
        let config = ScanConfig::new(out.path());
        let file = AssetFile::new("c.package", Vec::new());

        let outcome = process_file(&file, &config);
        assert_eq!(
            outcome.verdict,
            Verdict::Fail(FailureReason::TooShortForHeader)
        );
        assert_eq!(outcome.action.unwrap(), Action::Rejected);
        assert!(!out.path().join("c.package").exists());
    }

    #[test]
    fn test_judge_has_no_side_effects() {
        let config = ScanConfig::new("/nonexistent/output");
        let file = AssetFile::new("a.png", b"\x89PNG\r\n\x1a\n".to_vec());
        assert_eq!(judge(&file, &config), Verdict::Pass);
    }
}
