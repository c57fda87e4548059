//! `.ts4script` validation.
//!
//! Script mods are plain zip archives. Only the leading signature is
//! checked; the archive directory is not walked.

use super::FormatValidator;
use crate::asset::AssetFile;
use crate::kind::AssetKind;
use crate::verdict::FailureReason;

/// Zip local file header
const LOCAL_FILE_SIGNATURE: [u8; 4] = *b"PK\x03\x04";

/// End of central directory, what an empty archive starts with
const EMPTY_ARCHIVE_SIGNATURE: [u8; 4] = *b"PK\x05\x06";

/// Signature check for script archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptValidator;

impl FormatValidator for ScriptValidator {
    fn kind(&self) -> AssetKind {
        AssetKind::Script
    }

    fn check(&self, file: &AssetFile) -> Result<(), FailureReason> {
        let reader = file.reader();
        if reader.len() < LOCAL_FILE_SIGNATURE.len() {
            return Err(FailureReason::TooShortForHeader);
        }

        let signature = reader.read_array::<4>(0)?;
        if signature != LOCAL_FILE_SIGNATURE && signature != EMPTY_ARCHIVE_SIGNATURE {
            return Err(FailureReason::BadMagic);
        }
        Ok(())
    }
}
