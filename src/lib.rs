pub mod cli;
pub mod error;
pub mod logic;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::error::LoadError;
use crate::logic::LogicRegistry;
use crate::model::Project;
use crate::writer::{Artifact, Target};

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_tracing(args.log_level.as_deref());

    let logic = LogicRegistry::with_builtins();
    let report = generate(&args.input, &args.output, args.target, &logic)?;

    info!(
        "Done. {} project(s), {} file(s) written, {} failure(s).",
        report.projects,
        report.written.len(),
        report.failures
    );
    Ok(())
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct Report {
    pub projects: usize,
    pub written: Vec<PathBuf>,
    pub failures: usize,
}

/// Generate artifacts for every spec under `input` into `output`.
///
/// Per-project problems are logged and counted, never returned: a spec that
/// fails to load is skipped, and an artifact that fails to emit does not
/// stop its sibling.
pub fn generate(
    input: &Path,
    output: &Path,
    target: Target,
    logic: &LogicRegistry,
) -> anyhow::Result<Report> {
    let mut report = Report::default();

    // 1. ── Discover ───────────────────────────────────────────────────
    let specs = discover(input)?;
    if specs.is_empty() {
        warn!("No spec files found in {}.", input.display());
        return Ok(report);
    }

    std::fs::create_dir_all(output)
        .with_context(|| format!("Creating {}", output.display()))?;

    for spec in &specs {
        let base = base_name(spec);
        info!("Processing project: {base}...");
        report.projects += 1;

        // 2. ── Load ───────────────────────────────────────────────────
        let project = match load_project(spec) {
            Ok(project) => project,
            Err(e) => {
                error!("  Error reading {}: {e}", spec.display());
                report.failures += 1;
                continue;
            }
        };

        // 3. ── Emit ───────────────────────────────────────────────────
        for artifact in Artifact::ALL {
            if !target.includes(artifact) {
                continue;
            }
            match writer::emit(artifact, &project, logic, output, &base) {
                Ok(path) => {
                    info!("  Generated {}", path.display());
                    report.written.push(path);
                }
                Err(e) => {
                    error!("  Error generating {} for {base}: {e:#}", artifact.label());
                    report.failures += 1;
                }
            }
        }
    }

    Ok(report)
}

/// Parse and lower one spec file.
pub fn load_project(path: &Path) -> Result<Project, LoadError> {
    let raw = parser::load(path)?;
    processor::run(&raw)
}

/// A single file is taken as is; a directory yields its spec files sorted
/// by name so batch order never depends on the filesystem.
pub fn discover(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let entries =
        std::fs::read_dir(input).with_context(|| format!("Scanning {}", input.display()))?;
    let mut specs = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Scanning {}", input.display()))?
            .path();
        if path.is_file() && parser::is_spec_file(&path) {
            specs.push(path);
        }
    }
    specs.sort();
    Ok(specs)
}

/// `specs/pong.yaml` → `pong`.
fn base_name(spec: &Path) -> String {
    spec.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}
