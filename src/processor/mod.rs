//! The functional core: lowering, naming and the shared emission walk.
pub mod lower;
pub mod naming;
pub mod traversal;

pub use traversal::{CallShape, CodeSink, Section, Wrapper, walk};

use crate::error::LoadError;
use crate::model::{Project, RawSpec};

/// Runs every processing pass and returns a read-only `Project` for writers.
pub fn run(raw: &RawSpec) -> Result<Project, LoadError> {
    lower::lower(raw)
}
