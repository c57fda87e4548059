//! Image signature checks.

use super::FormatValidator;
use crate::asset::AssetFile;
use crate::kind::AssetKind;
use crate::verdict::FailureReason;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8] = b"\xFF\xD8\xFF";
const GIF_SIGNATURES: &[&[u8]] = &[b"GIF87a", b"GIF89a"];

/// Checks that an image starts with the signature its extension promises
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageValidator;

/// Signatures for each image extension known to [`AssetKind::from_extension`].
///
/// Other extensions never reach here through [`FormatValidator::validate`],
/// which rejects files whose kind is not [`AssetKind::Image`].
fn signatures_for(extension: &str) -> &'static [&'static [u8]] {
    match extension.to_ascii_lowercase().as_str() {
        "png" => &[PNG_SIGNATURE],
        "jpg" | "jpeg" => &[JPEG_SIGNATURE],
        "gif" => GIF_SIGNATURES,
        _ => &[],
    }
}

impl FormatValidator for ImageValidator {
    fn kind(&self) -> AssetKind {
        AssetKind::Image
    }

    fn check(&self, file: &AssetFile) -> Result<(), FailureReason> {
        let reader = file.reader();
        if reader.is_empty() {
            return Err(FailureReason::TooShortForHeader);
        }

        let extension = file
            .relative_path()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let signatures = signatures_for(extension);
        if signatures.is_empty() {
            return Err(FailureReason::UnknownExtension);
        }

        let shortest = signatures.iter().map(|sig| sig.len()).min().unwrap_or(0);
        if reader.len() < shortest {
            return Err(FailureReason::TooShortForHeader);
        }

        let matches = signatures.iter().any(|sig| {
            reader
                .read_bytes(0, sig.len() as u64)
                .map(|head| head == *sig)
                .unwrap_or(false)
        });
        if !matches {
            return Err(FailureReason::BadMagic);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Verdict;

    fn verdict(name: &str, data: &[u8]) -> Verdict {
        ImageValidator.validate(&AssetFile::new(name, data.to_vec()))
    }

    #[test]
    fn test_matching_signatures() {
        assert_eq!(verdict("a.png", b"\x89PNG\r\n\x1a\n\0\0\0\x0dIHDR"), Verdict::Pass);
        assert_eq!(verdict("a.JPG", b"\xFF\xD8\xFF\xE0"), Verdict::Pass);
        assert_eq!(verdict("a.jpeg", b"\xFF\xD8\xFF\xDB"), Verdict::Pass);
        assert_eq!(verdict("a.gif", b"GIF89a\x01\x00"), Verdict::Pass);
        assert_eq!(verdict("a.gif", b"GIF87a"), Verdict::Pass);
    }

    #[test]
    fn test_empty_image() {
        assert_eq!(
            verdict("a.png", b""),
            Verdict::Fail(FailureReason::TooShortForHeader)
        );
        assert_eq!(
            verdict("a.png", b"\x89PN"),
            Verdict::Fail(FailureReason::TooShortForHeader)
        );
    }

    #[test]
    fn test_signature_must_match_extension() {
        assert_eq!(
            verdict("a.png", b"\xFF\xD8\xFF\xE0\0\0\0\0"),
            Verdict::Fail(FailureReason::BadMagic)
        );
        assert_eq!(
            verdict("a.gif", b"GIF90a"),
            Verdict::Fail(FailureReason::BadMagic)
        );
    }

    #[test]
    fn test_every_image_extension_has_signatures() {
        for ext in ["png", "jpg", "jpeg", "gif", "PNG", "Jpeg"] {
            assert_eq!(AssetKind::from_extension(ext), Some(AssetKind::Image));
            assert!(!signatures_for(ext).is_empty(), "{ext}");
        }
    }
}
