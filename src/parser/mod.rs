use std::path::Path;

use tracing::debug;

use crate::error::LoadError;
use crate::model::RawSpec;

/// Spec file extensions the loader understands.
pub const SPEC_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Read a spec file and deserialize it, picking the format by extension.
pub fn load(path: &Path) -> Result<RawSpec, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let from_str: fn(&str) -> Result<RawSpec, LoadError> = match ext.as_str() {
        "yaml" | "yml" => load_from_yaml,
        "json" => load_from_json,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("{} loaded, size: {} bytes", path.display(), text.len());

    from_str(&text)
}

pub fn load_from_yaml(text: &str) -> Result<RawSpec, LoadError> {
    let raw: RawSpec = serde_yaml::from_str(text)?;
    log_sections(&raw);
    Ok(raw)
}

pub fn load_from_json(text: &str) -> Result<RawSpec, LoadError> {
    let raw: RawSpec = serde_json::from_str(text)?;
    log_sections(&raw);
    Ok(raw)
}

/// True when `path` has one of the `SPEC_EXTENSIONS`.
pub fn is_spec_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SPEC_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

fn log_sections(raw: &RawSpec) {
    debug!(
        "parsed {} config entries, {} tables, {} functions, {} procedures",
        raw.config.len(),
        raw.tables.len(),
        raw.functions.len(),
        raw.procedures.len()
    );
}
