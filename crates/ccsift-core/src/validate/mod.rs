//! Format validators.
//!
//! Each supported [`AssetKind`] has a validator implementing
//! [`FormatValidator`]. Dispatch from a kind to its validator is a plain
//! `match` in [`validate`]; adding a format means adding a variant and a
//! validator.
//!
//! Validators are total: any byte sequence produces exactly one
//! [`Verdict`], and reader errors surface as
//! [`FailureReason::ReadError`] instead of panics.

pub mod dbpf;
mod image;
mod package;
mod script;

use crate::asset::AssetFile;
use crate::kind::AssetKind;
use crate::verdict::{FailureReason, Verdict};
use tracing::{debug, warn};

pub use image::ImageValidator;
pub use package::PackageValidator;
pub use script::ScriptValidator;

/// Capability shared by all format validators
pub trait FormatValidator {
    /// The kind this validator owns
    fn kind(&self) -> AssetKind;

    /// Runs the format checks, returning the first problem found
    fn check(&self, file: &AssetFile) -> Result<(), FailureReason>;

    /// Validates a file, refusing files whose extension belongs elsewhere
    fn validate(&self, file: &AssetFile) -> Verdict {
        if file.kind() != Some(self.kind()) {
            warn!(
                "{} handed to the {} validator",
                file.relative_path().display(),
                self.kind()
            );
            return Verdict::Fail(FailureReason::UnknownExtension);
        }

        let verdict = Verdict::from(self.check(file));
        debug!(
            "[{}] {} validator: {}",
            file.file_name(),
            self.kind(),
            verdict
        );
        verdict
    }
}

/// Validates `file` with the validator for `kind`
pub fn validate(file: &AssetFile, kind: AssetKind) -> Verdict {
    match kind {
        AssetKind::Package => PackageValidator.validate(file),
        AssetKind::Script => ScriptValidator.validate(file),
        AssetKind::Image => ImageValidator.validate(file),
    }
}
