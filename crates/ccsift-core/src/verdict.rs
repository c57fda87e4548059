//! Per-file validation outcomes.

use crate::error::Error;
use crate::kind::AssetKind;
use std::fmt;

/// Why a file was judged corrupt
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// Fewer bytes than the fixed header needs
    #[error("file too short for header")]
    TooShortForHeader,

    /// Leading signature does not match the format
    #[error("bad magic signature")]
    BadMagic,

    /// Format version outside the supported set
    #[error("unsupported format version")]
    UnsupportedVersion,

    /// A header field with a fixed expected value holds something else
    #[error("unexpected header constant")]
    UnexpectedHeaderConstant,

    /// Index table lies (partly) outside the file
    #[error("index table out of bounds")]
    IndexOutOfBounds,

    /// An index entry points outside the file
    #[error("index entry out of bounds")]
    IndexEntryOutOfBounds,

    /// Declared entry count does not fit the declared index size
    #[error("entry count inconsistent with index size")]
    InconsistentCount,

    /// An index entry uses a compression type we do not know
    #[error("unknown compression type")]
    UnknownCompression,

    /// The file was handed to a validator that does not own its extension
    #[error("unknown extension")]
    UnknownExtension,

    /// Bytes could not be read or interpreted
    #[error("read error")]
    ReadError,
}

impl From<Error> for FailureReason {
    fn from(_: Error) -> Self {
        FailureReason::ReadError
    }
}

/// Why a file was let through without validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// No validator exists for the extension
    UnknownExtension,
    /// The kind was excluded by configuration
    KindSkipped(AssetKind),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownExtension => f.write_str("unknown extension"),
            SkipReason::KindSkipped(kind) => write!(f, "{} validation skipped", kind),
        }
    }
}

/// Outcome of validating one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Structurally intact
    Pass,
    /// Corrupt, with the first problem found
    Fail(FailureReason),
    /// Not validated
    Skipped(SkipReason),
}

impl Verdict {
    /// Returns true for [`Verdict::Pass`]
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Returns true for [`Verdict::Fail`]
    pub fn is_fail(&self) -> bool {
        matches!(self, Verdict::Fail(_))
    }

    /// Returns the failure reason, if any
    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            Verdict::Fail(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<Result<(), FailureReason>> for Verdict {
    fn from(result: Result<(), FailureReason>) -> Self {
        match result {
            Ok(()) => Verdict::Pass,
            Err(reason) => Verdict::Fail(reason),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail(reason) => write!(f, "FAIL({})", reason),
            Verdict::Skipped(reason) => write!(f, "SKIPPED({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Pass.to_string(), "PASS");
        assert_eq!(
            Verdict::Fail(FailureReason::BadMagic).to_string(),
            "FAIL(bad magic signature)"
        );
        assert_eq!(
            Verdict::Skipped(SkipReason::KindSkipped(AssetKind::Image)).to_string(),
            "SKIPPED(image validation skipped)"
        );
    }

    #[test]
    fn test_read_errors_become_read_error() {
        let reason = FailureReason::from(Error::out_of_bounds(0, 4, 0));
        assert_eq!(reason, FailureReason::ReadError);
    }

    #[test]
    fn test_verdict_from_result() {
        assert!(Verdict::from(Ok(())).is_pass());
        let verdict = Verdict::from(Err(FailureReason::InconsistentCount));
        assert!(verdict.is_fail());
        assert_eq!(verdict.failure(), Some(FailureReason::InconsistentCount));
    }
}
