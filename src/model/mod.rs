pub mod raw;

use indexmap::IndexMap;
use serde::Deserialize;

pub use raw::{RawColumn, RawFunction, RawSpec, RawTable};

/// Fixed element count of an `array` column in the native backend.
pub const ARRAY_CAPACITY: usize = 100;

/// Column type tag that selects the array convention instead of a literal token.
pub const ARRAY_TAG: &str = "array";

pub const SETUP_PROCEDURE: &str = "Setup";
pub const LOOP_PROCEDURE: &str = "Loop";

pub const DEFAULT_PROJECT_NAME: &str = "Unnamed Project";

/// A `config` value. Integers and floats are kept apart because the
/// native backend spells them differently.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    /// Only reached for integers above `i64::MAX`.
    UInt(u64),
    Float(f64),
}

/// How a function relates to the double buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    /// Writes fresh state; its outputs are primed into `curr` right away.
    Init,
    Update,
    /// No outputs, called for its side effects.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Literal target type token (`int`, `float`, ...).
    Token(String),
    /// Numeric list: fixed capacity natively, dynamic in script.
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    /// Swap copies this column element by element instead of sharing it.
    pub elementwise: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    /// Target struct identifier, e.g. `BallTable`.
    pub type_name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn elementwise_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.elementwise)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub kind: FunctionKind,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub name: String,
    pub steps: Vec<String>,
}

impl Procedure {
    /// Only the procedure literally named `Loop` swaps buffers.
    pub fn swaps(&self) -> bool {
        self.name == LOOP_PROCEDURE
    }
}

/// The loaded spec. Every list keeps the order the spec declared it in;
/// emitters rely on that for byte-identical output.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub config: IndexMap<String, Scalar>,
    pub tables: Vec<Table>,
    pub functions: Vec<Function>,
    pub procedures: Vec<Procedure>,
}

impl Project {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }
}
