use std::path::PathBuf;

use thiserror::Error;

/// The spec could not be turned into a `Project`. The whole project is skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported spec extension for {} (expected .yaml, .yml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("tables `{first}` and `{second}` both map to type `{type_name}`")]
    NameCollision {
        first: String,
        second: String,
        type_name: String,
    },
}

/// The IR lacks something an emitter needs. Only the artifact being
/// emitted is skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmitError {
    #[error("function `{function}` references undeclared table `{table}`")]
    UnknownTable { function: String, table: String },

    #[error("procedure `{procedure}` references undeclared function `{function}`")]
    UnknownFunction { procedure: String, function: String },

    #[error("required procedure `{0}` is not declared")]
    MissingProcedure(&'static str),

    #[error("procedure `{0}` clashes with a generated routine of the same name")]
    ReservedName(String),
}
