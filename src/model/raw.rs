//! Immediately-after-parse representation, 1-to-1 with the spec file.
//!
//! Maps are `IndexMap`s so declaration order survives deserialization.

use indexmap::IndexMap;
use serde::Deserialize;

use super::{FunctionKind, Scalar};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSpec {
    pub project_name: Option<String>,
    pub config: IndexMap<String, Scalar>,
    pub tables: IndexMap<String, RawTable>,
    pub functions: IndexMap<String, RawFunction>,
    pub procedures: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTable {
    pub columns: IndexMap<String, RawColumn>,
}

/// Either `x: int` or `pos_x: { type: array, elementwise: false }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawColumn {
    Token(String),
    Detailed {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        elementwise: Option<bool>,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFunction {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub kind: Option<FunctionKind>,
}
