//! The one IR walk both backends share.
//!
//! `walk` resolves every reference and decides the wiring; a `CodeSink`
//! only decides how each piece is spelled in its target syntax.

use tracing::debug;

use crate::error::EmitError;
use crate::model::{
    Function, FunctionKind, LOOP_PROCEDURE, Procedure, Project, SETUP_PROCEDURE, Scalar, Table,
};

/// Top-level regions, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Config,
    Tables,
    State,
    Prototypes,
    Wrappers,
    Swap,
    Procedures,
    Entry,
}

/// Calling convention, chosen by output arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// No outputs: called for its side effects.
    Effect,
    /// One output: the return value lands in that table's `next`.
    Single,
    /// Several outputs: written through out-parameters or a result object.
    Multi,
}

/// A function with its table references resolved.
#[derive(Debug, Clone)]
pub struct Wrapper<'a> {
    pub function: &'a Function,
    pub inputs: Vec<&'a Table>,
    pub outputs: Vec<&'a Table>,
}

impl Wrapper<'_> {
    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn shape(&self) -> CallShape {
        match self.outputs.len() {
            0 => CallShape::Effect,
            1 => CallShape::Single,
            _ => CallShape::Multi,
        }
    }

    /// Initializers copy `next` into `curr` right after writing it.
    pub fn primes(&self) -> bool {
        self.function.kind == FunctionKind::Init
    }
}

/// Target-syntax renderer driven by `walk`.
pub trait CodeSink {
    /// Routine names the sink generates itself; a procedure may not reuse them.
    const RESERVED_NAMES: &'static [&'static str] = &[];

    fn begin(&mut self, project: &Project);

    /// Called once before the items of each section.
    fn section(&mut self, _section: Section) {}

    fn constant(&mut self, key: &str, value: Scalar);

    fn table(&mut self, table: &Table);

    fn state(&mut self, tables: &[Table]);

    fn prototype(&mut self, _wrapper: &Wrapper<'_>) {}

    fn wrapper(&mut self, wrapper: &Wrapper<'_>);

    fn swap(&mut self, tables: &[Table]);

    fn procedure(&mut self, procedure: &Procedure);

    fn entry(&mut self, setup: &Procedure, main_loop: &Procedure);

    fn finish(self) -> String;
}

/// Drive `sink` over `project` in the fixed emission order and return its text.
pub fn walk<S: CodeSink>(project: &Project, mut sink: S) -> Result<String, EmitError> {
    // resolve everything up front so a gap never leaves half-written output
    let wrappers = resolve_wrappers(project)?;
    check_procedures(project)?;
    if let Some(clash) = project
        .procedures
        .iter()
        .find(|p| S::RESERVED_NAMES.contains(&p.name.as_str()))
    {
        return Err(EmitError::ReservedName(clash.name.clone()));
    }
    let setup = project
        .procedure(SETUP_PROCEDURE)
        .ok_or(EmitError::MissingProcedure(SETUP_PROCEDURE))?;
    let main_loop = project
        .procedure(LOOP_PROCEDURE)
        .ok_or(EmitError::MissingProcedure(LOOP_PROCEDURE))?;

    sink.begin(project);

    sink.section(Section::Config);
    for (key, value) in &project.config {
        sink.constant(key, *value);
    }

    sink.section(Section::Tables);
    for table in &project.tables {
        sink.table(table);
    }

    sink.section(Section::State);
    sink.state(&project.tables);

    sink.section(Section::Prototypes);
    for wrapper in &wrappers {
        sink.prototype(wrapper);
    }

    sink.section(Section::Wrappers);
    for wrapper in &wrappers {
        sink.wrapper(wrapper);
    }

    sink.section(Section::Swap);
    sink.swap(&project.tables);

    sink.section(Section::Procedures);
    for procedure in &project.procedures {
        sink.procedure(procedure);
    }

    sink.section(Section::Entry);
    sink.entry(setup, main_loop);

    Ok(sink.finish())
}

fn resolve_wrappers(project: &Project) -> Result<Vec<Wrapper<'_>>, EmitError> {
    project
        .functions
        .iter()
        .map(|function| {
            let wrapper = Wrapper {
                function,
                inputs: resolve_tables(project, function, &function.inputs)?,
                outputs: resolve_tables(project, function, &function.outputs)?,
            };
            debug!(
                "wrapper {}: {:?}, primes={}",
                wrapper.name(),
                wrapper.shape(),
                wrapper.primes()
            );
            Ok(wrapper)
        })
        .collect()
}

fn resolve_tables<'a>(
    project: &'a Project,
    function: &Function,
    names: &[String],
) -> Result<Vec<&'a Table>, EmitError> {
    names
        .iter()
        .map(|name| {
            project.table(name).ok_or_else(|| EmitError::UnknownTable {
                function: function.name.clone(),
                table: name.clone(),
            })
        })
        .collect()
}

fn check_procedures(project: &Project) -> Result<(), EmitError> {
    for procedure in &project.procedures {
        if let Some(missing) = procedure
            .steps
            .iter()
            .find(|step| project.function(step).is_none())
        {
            return Err(EmitError::UnknownFunction {
                procedure: procedure.name.clone(),
                function: missing.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::load_from_yaml;
    use crate::processor::lower::lower;

    /// Records the walk as a flat event list.
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl CodeSink for Trace {
        fn begin(&mut self, project: &Project) {
            self.0.push(format!("begin {}", project.name));
        }
        fn section(&mut self, section: Section) {
            self.0.push(format!("section {section:?}"));
        }
        fn constant(&mut self, key: &str, _value: Scalar) {
            self.0.push(format!("const {key}"));
        }
        fn table(&mut self, table: &Table) {
            self.0.push(format!("table {}", table.name));
        }
        fn state(&mut self, tables: &[Table]) {
            self.0.push(format!("state {}", tables.len()));
        }
        fn prototype(&mut self, wrapper: &Wrapper<'_>) {
            self.0.push(format!("proto {}", wrapper.name()));
        }
        fn wrapper(&mut self, wrapper: &Wrapper<'_>) {
            self.0.push(format!("wrap {} {:?}", wrapper.name(), wrapper.shape()));
        }
        fn swap(&mut self, tables: &[Table]) {
            let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
            self.0.push(format!("swap {}", names.join(",")));
        }
        fn procedure(&mut self, procedure: &Procedure) {
            self.0.push(format!("proc {} swaps={}", procedure.name, procedure.swaps()));
        }
        fn entry(&mut self, setup: &Procedure, main_loop: &Procedure) {
            self.0.push(format!("entry {} {}", setup.name, main_loop.name));
        }
        fn finish(self) -> String {
            self.0.join("\n")
        }
    }

    fn project(src: &str) -> Project {
        lower(&load_from_yaml(src).expect("valid yaml")).expect("lowers")
    }

    const SPEC: &str = r#"
project_name: Demo
config: { speed: 2.5 }
tables:
  a: { columns: { v: int } }
  b: { columns: { v: int } }
functions:
  InitA: { outputs: [a] }
  Split: { inputs: [a], outputs: [a, b] }
  Show: { inputs: [b] }
procedures:
  Setup: [InitA]
  Loop: [Split, Show]
"#;

    #[test]
    fn test_walk_order() {
        let out = walk(&project(SPEC), Trace::default()).unwrap();
        let expected = [
            "begin Demo",
            "section Config",
            "const speed",
            "section Tables",
            "table a",
            "table b",
            "section State",
            "state 2",
            "section Prototypes",
            "proto InitA",
            "proto Split",
            "proto Show",
            "section Wrappers",
            "wrap InitA Single",
            "wrap Split Multi",
            "wrap Show Effect",
            "section Swap",
            "swap a,b",
            "section Procedures",
            "proc Setup swaps=false",
            "proc Loop swaps=true",
            "section Entry",
            "entry Setup Loop",
        ];
        assert_eq!(out, expected.join("\n"));
    }

    #[test]
    fn test_unknown_table() {
        let src = SPEC.replace("Show: { inputs: [b] }", "Show: { inputs: [ghost] }");
        let err = walk(&project(&src), Trace::default()).unwrap_err();
        assert_eq!(
            err,
            EmitError::UnknownTable {
                function: "Show".into(),
                table: "ghost".into()
            }
        );
    }

    #[test]
    fn test_unknown_function() {
        let src = SPEC.replace("Loop: [Split, Show]", "Loop: [Split, Vanish]");
        let err = walk(&project(&src), Trace::default()).unwrap_err();
        assert_eq!(
            err,
            EmitError::UnknownFunction {
                procedure: "Loop".into(),
                function: "Vanish".into()
            }
        );
    }

    #[test]
    fn test_missing_loop() {
        let src = SPEC.replace("  Loop: [Split, Show]\n", "");
        let err = walk(&project(&src), Trace::default()).unwrap_err();
        assert_eq!(err, EmitError::MissingProcedure("Loop"));
    }

    #[test]
    fn test_wrapper_priming() {
        let project = project(SPEC);
        let wrappers = resolve_wrappers(&project).unwrap();
        let primes: Vec<_> = wrappers.iter().map(|w| (w.name(), w.primes())).collect();
        assert_eq!(primes, vec![("InitA", true), ("Split", false), ("Show", false)]);
    }
}
