//! Mapping from file extensions to asset kinds.

use std::fmt;
use std::path::Path;

/// The kinds of custom content the scanner knows how to check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    /// DBPF `.package` container
    Package,
    /// `.ts4script` zip archive
    Script,
    /// PNG, JPEG or GIF image
    Image,
}

/// Extension table, matched case-insensitively against the final extension.
const EXTENSIONS: &[(&str, AssetKind)] = &[
    ("package", AssetKind::Package),
    ("ts4script", AssetKind::Script),
    ("t4script", AssetKind::Script),
    ("png", AssetKind::Image),
    ("jpg", AssetKind::Image),
    ("jpeg", AssetKind::Image),
    ("gif", AssetKind::Image),
];

impl AssetKind {
    /// All kinds, in display order
    pub const ALL: [AssetKind; 3] = [AssetKind::Package, AssetKind::Script, AssetKind::Image];

    /// Returns the lowercase name used on the command line and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Package => "package",
            AssetKind::Script => "script",
            AssetKind::Image => "image",
        }
    }

    /// Looks up a kind by extension (without the leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(ext))
            .map(|&(_, kind)| kind)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a path by its extension alone; file content is never consulted.
pub fn classify(path: &Path) -> Option<AssetKind> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(AssetKind::from_extension)
}
