use std::path::PathBuf;

use clap::Parser;

/// dotmeta - extract identifying metadata from .NET binaries
///
/// Reads the assembly name, module version identifier (MVID), type-library
/// GUID, and type-library version from managed binaries. The GUID is fixed
/// at project creation and the MVID at build time, which makes both useful
/// pivots for YARA rules and corpus statistics.
#[derive(Debug, Parser)]
#[command(name = "dotmeta", version, about, long_about = None)]
pub struct Cli {
    /// Path to the file or folder to analyse.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Search recursively in the folder (default off).
    #[arg(short, long)]
    pub recursive: bool,

    /// Write a CSV file with the results: filename, assembly name, GUID, TYPELIB, MVID.
    #[arg(short, long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Show skipped non-.NET files and per-file errors.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print environment and tooling version information, then exit.
    #[arg(short, long)]
    pub info: bool,

    /// Emit results as JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}
