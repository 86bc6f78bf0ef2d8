use std::path::PathBuf;

use clap::Parser;

/// Loads a `.puz` file, validates its checksums, and prints its fields.
#[derive(Debug, Parser)]
#[command(name = "puzcross", version)]
pub struct Args {
    /// Path to the `.puz` (binary or text-dialect) file to load.
    pub file: PathBuf,

    /// Treat a checksum mismatch as a fatal error instead of a warning.
    #[arg(long)]
    pub strict: bool,
}
