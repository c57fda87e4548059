//! Copying intact files into the mirrored output tree.
//!
//! The output path of a file is always `output_dir/relative_path`, so two
//! input files can never collide. Writes go through a temporary file in the
//! destination directory that is renamed over the target, which means a
//! destination either holds the complete content or is left untouched.

use crate::asset::AssetFile;
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::verdict::Verdict;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// What happened to a file after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Written to the output tree
    Copied,
    /// Not validated and kept out of the output tree
    Skipped,
    /// Failed validation, never copied
    Rejected,
    /// Would have been copied, but this is a dry run
    DryRunLogged,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Copied => "copied",
            Action::Skipped => "skipped",
            Action::Rejected => "rejected",
            Action::DryRunLogged => "dry run",
        })
    }
}

/// Turns verdicts into actions on the output tree
#[derive(Debug, Clone, Copy)]
pub struct Migrator<'a> {
    config: &'a ScanConfig,
}

impl<'a> Migrator<'a> {
    /// Creates a migrator for `config`
    pub fn new(config: &'a ScanConfig) -> Self {
        Self { config }
    }

    /// Decides the action for a verdict without touching the filesystem
    pub fn plan(&self, verdict: &Verdict) -> Action {
        match verdict {
            Verdict::Fail(_) => Action::Rejected,
            Verdict::Skipped(_) if self.config.dont_write_skipped => Action::Skipped,
            Verdict::Pass | Verdict::Skipped(_) if self.config.dry_run => Action::DryRunLogged,
            Verdict::Pass | Verdict::Skipped(_) => Action::Copied,
        }
    }

    /// Output location for a path relative to the scan root
    pub fn destination(&self, relative_path: &Path) -> Result<PathBuf> {
        let escapes = relative_path.as_os_str().is_empty()
            || relative_path.components().any(|component| {
                !matches!(component, Component::Normal(_) | Component::CurDir)
            });
        if escapes {
            return Err(Error::path_traversal(relative_path));
        }
        Ok(self.config.output_dir.join(relative_path))
    }

    /// Applies the planned action for `file`
    pub fn migrate(&self, file: &AssetFile, verdict: &Verdict) -> Result<Action> {
        let action = self.plan(verdict);
        match action {
            Action::Copied => {
                let destination = self.destination(file.relative_path())?;
                write_atomic(&destination, file.as_bytes())?;
                info!("Copied {} -> {}", file.relative_path().display(), destination.display());
            }
            Action::DryRunLogged => {
                let destination = self.destination(file.relative_path())?;
                info!("Would copy {} -> {}", file.relative_path().display(), destination.display());
            }
            Action::Skipped | Action::Rejected => {
                debug!("Not copying {} ({})", file.relative_path().display(), action);
            }
        }
        Ok(action)
    }
}

/// Returns true if `path` already holds exactly `content`
fn is_up_to_date(path: &Path, content: &[u8]) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() || metadata.len() != content.len() as u64 {
        return false;
    }
    fs::read(path)
        .map(|existing| blake3::hash(&existing) == blake3::hash(content))
        .unwrap_or(false)
}

/// Writes `content` to `path` through a temporary sibling file
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))?;

    if is_up_to_date(path, content) {
        debug!("{} is already up to date", path.display());
        return Ok(());
    }

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::file_write(path, e))?;
    temp.write_all(content)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| Error::file_write(path, e))?;
    temp.persist(path)
        .map_err(|e| Error::file_write(path, e.error))?;

    Ok(())
}
