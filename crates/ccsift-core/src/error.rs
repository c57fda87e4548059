//! Error types for the ccsift-core library.
//!
//! These are *operational* errors: I/O failures, bad configuration and
//! out-of-range reads. Structural problems found inside an asset are not
//! errors, they are reported as a [`FailureReason`](crate::FailureReason)
//! inside a [`Verdict`](crate::Verdict).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ccsift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all ccsift operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Relative path would land outside the output directory
    #[error("path traversal detected: '{path}' would escape output directory")]
    PathTraversal {
        /// The suspicious path
        path: PathBuf,
    },

    /// The scan root is missing or not a directory
    #[error("input directory '{path}' {details}")]
    InputDirectory {
        /// The configured input directory
        path: PathBuf,
        /// What is wrong with it
        details: &'static str,
    },

    /// A read touched bytes past the end of the buffer
    #[error("read of {len} bytes at offset {offset} is out of bounds (buffer holds {available})")]
    OutOfBounds {
        /// Requested start offset
        offset: u64,
        /// Requested length
        len: u64,
        /// Bytes available in the buffer
        available: usize,
    },

    /// Integer width other than 1, 2, 4 or 8 bytes
    #[error("unsupported integer width: {0} bytes")]
    InvalidWidth(usize),

    /// Directory traversal failed for one entry
    #[error("failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Creates a new input directory error
    pub fn input_directory(path: impl Into<PathBuf>, details: &'static str) -> Self {
        Self::InputDirectory {
            path: path.into(),
            details,
        }
    }

    /// Creates a new out-of-bounds read error
    pub fn out_of_bounds(offset: u64, len: u64, available: usize) -> Self {
        Self::OutOfBounds {
            offset,
            len,
            available,
        }
    }

    /// Returns true if the scan can carry on with the next file
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InputDirectory { .. })
    }
}
