use clap::Parser;
use std::path::PathBuf;

use crate::writer::Target;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Spec file, or a directory scanned for .yaml / .yml / .json specs
    #[arg(default_value = ".")]
    pub input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "generated")]
    pub output: PathBuf,
    /// Artifacts to generate
    #[arg(short, long, value_enum, default_value_t = Target::All)]
    pub target: Target,
    /// Tracing filter, e.g. `debug` (falls back to RUST_LOG, then `info`)
    #[arg(long)]
    pub log_level: Option<String>,
}
