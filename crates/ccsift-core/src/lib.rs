//! # ccsift-core
//!
//! A library for sorting recovered Sims 4 custom content into intact and
//! corrupted files.
//!
//! This crate provides the core functionality for:
//! - Bounds-checked parsing of DBPF `.package` headers and index tables
//! - Signature checks for script archives and images
//! - Copying files that pass into a mirrored output tree
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`reader`]: Bounds-checked byte access
//! - [`validate`]: Format validators, one per [`AssetKind`]
//! - [`verdict`]: The per-file outcome types
//! - [`migrate`]: Output tree writes
//! - [`scan`]: Directory walking and summary statistics
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use ccsift_core::{ScanConfig, Scanner, AssetKind};
//!
//! let config = ScanConfig::new("./recovered-ok")
//!     .skip(AssetKind::Image)
//!     .dry_run(true);
//!
//! let scanner = Scanner::new("./recovered", config)?;
//! let summary = scanner.run();
//! println!("{}", summary);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Single files can be judged without touching the filesystem:
//!
//! ```
//! use ccsift_core::{judge, AssetFile, FailureReason, ScanConfig, Verdict};
//!
//! let file = AssetFile::new("Mods/hair.package", Vec::new());
//! let verdict = judge(&file, &ScanConfig::default());
//! assert_eq!(verdict, Verdict::Fail(FailureReason::TooShortForHeader));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod asset;
pub mod config;
pub mod error;
pub mod kind;
pub mod migrate;
pub mod process;
pub mod reader;
pub mod scan;
pub mod validate;
pub mod verdict;

#[cfg(test)]
mod testing;

// Re-export primary types for convenience
pub use asset::AssetFile;
pub use config::ScanConfig;
pub use error::{Error, Result};
pub use kind::{classify, AssetKind};
pub use migrate::{Action, Migrator};
pub use process::{judge, process_file, Outcome};
pub use reader::ByteReader;
pub use scan::{FileReport, ScanSummary, Scanner};
pub use validate::{
    validate, FormatValidator, ImageValidator, PackageValidator, ScriptValidator,
};
pub use verdict::{FailureReason, SkipReason, Verdict};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
