//! A discovered file and its bytes.

use crate::error::{Error, Result};
use crate::kind::{classify, AssetKind};
use crate::reader::ByteReader;
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// One file from the scan, loaded once and never mutated
#[derive(Debug, Clone)]
pub struct AssetFile {
    relative_path: PathBuf,
    content: Bytes,
}

impl AssetFile {
    /// Creates an asset from already-loaded bytes
    pub fn new(relative_path: impl Into<PathBuf>, content: impl Into<Bytes>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Reads `root/relative_path` from disk
    pub fn load(root: &Path, relative_path: impl Into<PathBuf>) -> Result<Self> {
        let relative_path = relative_path.into();
        let path = root.join(&relative_path);
        let content = std::fs::read(&path).map_err(|e| Error::file_read(path, e))?;
        Ok(Self::new(relative_path, content))
    }

    /// Path relative to the scan root
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// File name for log lines
    pub fn file_name(&self) -> String {
        self.relative_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Kind declared by the extension
    pub fn kind(&self) -> Option<AssetKind> {
        classify(&self.relative_path)
    }

    /// Raw content
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Bounds-checked reader over the content
    pub fn reader(&self) -> ByteReader<'_> {
        ByteReader::new(&self.content)
    }

    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true for a zero-byte file
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_reads_relative_to_root() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("Mods/Hair")).unwrap();
        std::fs::write(root.path().join("Mods/Hair/bob.package"), b"DBPF").unwrap();

        let asset = AssetFile::load(root.path(), "Mods/Hair/bob.package").unwrap();
        assert_eq!(asset.relative_path(), Path::new("Mods/Hair/bob.package"));
        assert_eq!(asset.as_bytes(), b"DBPF");
        assert_eq!(asset.file_name(), "bob.package");
        assert_eq!(asset.kind(), Some(AssetKind::Package));
    }

    #[test]
    fn test_load_missing_file() {
        let root = TempDir::new().unwrap();
        let err = AssetFile::load(root.path(), "gone.package").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
