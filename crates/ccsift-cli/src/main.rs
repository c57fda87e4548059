//! ccsift - Sort recovered Sims 4 custom content
//!
//! This tool walks a directory of recovered custom content, checks every
//! `.package`, `.ts4script` and image file for structural damage, and
//! copies the intact ones into a mirrored output directory.

use anyhow::{bail, Context, Result};
use ccsift_core::{AssetKind, ScanConfig, Scanner};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Separate intact custom content from corrupted files
#[derive(Parser, Debug)]
#[command(name = "ccsift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory to check
    #[arg(short, long)]
    directory: PathBuf,

    /// Output directory for files that pass
    #[arg(short, long)]
    outdir: PathBuf,

    /// Skip validation for specific file types (repeatable)
    #[arg(short, long, value_enum)]
    skip: Vec<SkipKind>,

    /// Don't write skipped files to the output directory
    #[arg(short = 'S', long)]
    dont_write_skipped: bool,

    /// Don't write any files to the output directory
    #[arg(short = 't', long)]
    dry_run: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File types whose validation can be skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SkipKind {
    /// DBPF .package files
    Package,
    /// .ts4script archives
    Script,
    /// PNG, JPEG and GIF images
    Image,
}

impl From<SkipKind> for AssetKind {
    fn from(kind: SkipKind) -> Self {
        match kind {
            SkipKind::Package => AssetKind::Package,
            SkipKind::Script => AssetKind::Script,
            SkipKind::Image => AssetKind::Image,
        }
    }
}

impl Cli {
    fn scan_config(&self) -> ScanConfig {
        ScanConfig::new(&self.outdir)
            .skip_kinds(self.skip.iter().copied().map(AssetKind::from))
            .dont_write_skipped(self.dont_write_skipped)
            .dry_run(self.dry_run)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    check_directories(&cli.directory, &cli.outdir)?;

    let scanner = Scanner::new(&cli.directory, cli.scan_config())
        .with_context(|| format!("Cannot scan {}", cli.directory.display()))?;

    if cli.dry_run {
        info!("Dry run: nothing will be written to {}", cli.outdir.display());
    }

    let summary = scanner.run();
    print!("{}", summary);

    if summary.has_errors() {
        bail!(
            "Scan finished with {} write failure(s) and {} walk error(s)",
            summary.write_failures,
            summary.walk_errors
        );
    }

    Ok(())
}

/// Refuses setups where the output would overwrite the input
fn check_directories(input: &Path, output: &Path) -> Result<()> {
    if output.exists() && !output.is_dir() {
        bail!("Output path is not a directory: {}", output.display());
    }
    if let (Ok(input), Ok(output)) = (input.canonicalize(), output.canonicalize()) {
        if input == output {
            bail!("Output directory must differ from the input directory");
        }
    }
    Ok(())
}
