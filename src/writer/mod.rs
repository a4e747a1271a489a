//! Output stage: code sinks per target plus the file writing around them.
pub mod c;
pub mod html;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;

use crate::logic::LogicRegistry;
use crate::model::Project;

/// Which artifacts a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// C source only.
    Native,
    /// Browser document only.
    Script,
    All,
}

impl Target {
    pub fn includes(self, artifact: Artifact) -> bool {
        match self {
            Target::All => true,
            Target::Native => artifact == Artifact::Native,
            Target::Script => artifact == Artifact::Script,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Native,
    Script,
}

impl Artifact {
    pub const ALL: [Artifact; 2] = [Artifact::Native, Artifact::Script];

    /// `pong` → `pong_code.c` / `pong_code.html`.
    pub fn file_name(self, base: &str) -> String {
        match self {
            Artifact::Native => format!("{base}_code.c"),
            Artifact::Script => format!("{base}_code.html"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Artifact::Native => "C",
            Artifact::Script => "HTML",
        }
    }
}

/// Render one artifact and write it to `out_dir`.
pub fn emit(
    artifact: Artifact,
    project: &Project,
    logic: &LogicRegistry,
    out_dir: &Path,
    base: &str,
) -> anyhow::Result<PathBuf> {
    let text = match artifact {
        Artifact::Native => c::render(project),
        Artifact::Script => html::render(project, logic.lookup(&project.name)),
    }
    .with_context(|| format!("Generating {} for {}", artifact.label(), project.name))?;

    let path = out_dir.join(artifact.file_name(base));
    std::fs::write(&path, text).with_context(|| format!("Writing {}", path.display()))?;
    Ok(path)
}

/// Float spelling shared by both backends: always carries a decimal point
/// or an exponent, so `800.0` never degrades into the integer `800`.
///
/// Non-finite values have no literal form; `None` lets each backend name
/// its own constant.
pub(crate) fn float_literal(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let text = format!("{value:?}");
    if text.contains(['.', 'e', 'E']) {
        Some(text)
    } else {
        Some(format!("{text}.0"))
    }
}
