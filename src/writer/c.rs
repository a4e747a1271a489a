//! Emit the native artifact: one self-contained C translation unit.

use crate::error::EmitError;
use crate::model::{Procedure, Project, Scalar, Table};
use crate::processor::naming::{self, c_column};
use crate::processor::{CallShape, CodeSink, Section, Wrapper, walk};

use super::float_literal;

const INCLUDES: &[&str] = &["stdbool.h", "stdio.h", "stdlib.h", "math.h"];

/// Render `project` as C source.
pub fn render(project: &Project) -> Result<String, EmitError> {
    walk(project, NativeSink::default())
}

#[derive(Default)]
pub struct NativeSink {
    out: String,
    has_config: bool,
}

impl NativeSink {
    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

impl CodeSink for NativeSink {
    const RESERVED_NAMES: &'static [&'static str] = &["main", "Swap_Buffers"];

    fn begin(&mut self, project: &Project) {
        self.line(format!("// Generated Code for Project: {}", project.name));
        for header in INCLUDES {
            self.line(format!("#include <{header}>"));
        }
        self.blank();
        self.has_config = !project.config.is_empty();
    }

    fn section(&mut self, section: Section) {
        let title = match section {
            Section::Config if self.has_config => "Configuration Constants",
            // closes the config block, if there was one
            Section::Tables => {
                if self.has_config {
                    self.blank();
                }
                "Table Structures"
            }
            Section::State => "Global State (Double Buffering)",
            Section::Prototypes => "Pure Logic Prototypes",
            Section::Wrappers => {
                self.blank();
                "Generated Wrappers"
            }
            Section::Swap => "Buffer Swap",
            Section::Procedures => "High Level Procedures",
            Section::Config | Section::Entry => return,
        };
        self.line(format!("// --- {title} ---"));
    }

    fn constant(&mut self, key: &str, value: Scalar) {
        self.line(format!(
            "#define {} {}",
            naming::constant_name(key),
            number_literal(value)
        ));
    }

    fn table(&mut self, table: &Table) {
        self.line("typedef struct {");
        for column in &table.columns {
            let decl = c_column(column);
            match decl.extent {
                Some(n) => self.line(format!("    {} {}[{n}];", decl.token, column.name)),
                None => self.line(format!("    {} {};", decl.token, column.name)),
            }
        }
        self.line(format!("}} {};", table.type_name));
        self.blank();
    }

    fn state(&mut self, tables: &[Table]) {
        self.line("struct GameState {");
        for table in tables {
            self.line(format!("    {} {}_curr;", table.type_name, table.name));
            self.line(format!("    {} {}_next;", table.type_name, table.name));
        }
        self.line("} state;");
        self.blank();
    }

    fn prototype(&mut self, wrapper: &Wrapper<'_>) {
        let ret = match wrapper.shape() {
            CallShape::Single => wrapper.outputs[0].type_name.as_str(),
            CallShape::Effect | CallShape::Multi => "void",
        };

        let mut params: Vec<String> = wrapper
            .inputs
            .iter()
            .map(|t| format!("{} {}_in", t.type_name, t.name))
            .collect();
        if wrapper.shape() == CallShape::Multi {
            params.extend(
                wrapper
                    .outputs
                    .iter()
                    .map(|t| format!("{}* {}_out", t.type_name, t.name)),
            );
        }

        self.line(format!(
            "{ret} Logic_{}({});",
            wrapper.name(),
            params.join(", ")
        ));
    }

    fn wrapper(&mut self, wrapper: &Wrapper<'_>) {
        self.line(format!("void Wrapper_{}() {{", wrapper.name()));

        let mut args: Vec<String> = wrapper
            .inputs
            .iter()
            .map(|t| format!("state.{}_curr", t.name))
            .collect();

        match wrapper.shape() {
            CallShape::Single => {
                let out = &wrapper.outputs[0].name;
                self.line(format!(
                    "    state.{out}_next = Logic_{}({});",
                    wrapper.name(),
                    args.join(", ")
                ));
            }
            CallShape::Multi => {
                args.extend(
                    wrapper
                        .outputs
                        .iter()
                        .map(|t| format!("&state.{}_next", t.name)),
                );
                self.line(format!("    Logic_{}({});", wrapper.name(), args.join(", ")));
            }
            CallShape::Effect => {
                self.line(format!("    Logic_{}({});", wrapper.name(), args.join(", ")));
            }
        }

        if wrapper.primes() {
            for table in &wrapper.outputs {
                self.line(format!(
                    "    state.{0}_curr = state.{0}_next;",
                    table.name
                ));
            }
        }

        self.line("}");
        self.blank();
    }

    fn swap(&mut self, tables: &[Table]) {
        self.line("void Swap_Buffers() {");
        for table in tables {
            self.line(format!("    state.{0}_curr = state.{0}_next;", table.name));
        }
        self.line("}");
        self.blank();
    }

    fn procedure(&mut self, procedure: &Procedure) {
        self.line(format!("void {}() {{", procedure.name));
        for step in &procedure.steps {
            self.line(format!("    Wrapper_{step}();"));
        }
        if procedure.swaps() {
            self.line("    Swap_Buffers();");
        }
        self.line("}");
        self.blank();
    }

    fn entry(&mut self, setup: &Procedure, main_loop: &Procedure) {
        self.line("int main() {");
        self.line(format!("    {}();", setup.name));
        self.line("    while (true) {");
        self.line(format!("        {}();", main_loop.name));
        self.line("    }");
        self.line("    return 0;");
        self.line("}");
    }

    fn finish(self) -> String {
        self.out
    }
}

fn number_literal(value: Scalar) -> String {
    match value {
        Scalar::Int(v) => v.to_string(),
        Scalar::UInt(v) => format!("{v}ULL"),
        Scalar::Float(v) => match float_literal(v) {
            Some(text) => format!("{text}f"),
            None if v.is_nan() => "NAN".to_string(),
            None if v > 0.0 => "INFINITY".to_string(),
            None => "(-INFINITY)".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::load_from_yaml;
    use crate::processor;

    fn render_yaml(src: &str) -> String {
        let project = processor::run(&load_from_yaml(src).expect("valid yaml")).expect("lowers");
        render(&project).expect("renders")
    }

    const BALL: &str = r#"
project_name: Ball
config:
  speed: 2.5
  lives: 3
tables:
  ball:
    columns:
      x: int
      y: int
functions:
  InitBall:
    outputs: [ball]
  MoveBall:
    inputs: [ball]
    outputs: [ball]
procedures:
  Setup: [InitBall]
  Loop: [MoveBall]
"#;

    #[test]
    fn test_full_translation_unit() {
        let expected = "\
// Generated Code for Project: Ball
#include <stdbool.h>
#include <stdio.h>
#include <stdlib.h>
#include <math.h>

// --- Configuration Constants ---
#define SPEED 2.5f
#define LIVES 3

// --- Table Structures ---
typedef struct {
    int x;
    int y;
} BallTable;

// --- Global State (Double Buffering) ---
struct GameState {
    BallTable ball_curr;
    BallTable ball_next;
} state;

// --- Pure Logic Prototypes ---
BallTable Logic_InitBall();
BallTable Logic_MoveBall(BallTable ball_in);

// --- Generated Wrappers ---
void Wrapper_InitBall() {
    state.ball_next = Logic_InitBall();
    state.ball_curr = state.ball_next;
}

void Wrapper_MoveBall() {
    state.ball_next = Logic_MoveBall(state.ball_curr);
}

// --- Buffer Swap ---
void Swap_Buffers() {
    state.ball_curr = state.ball_next;
}

// --- High Level Procedures ---
void Setup() {
    Wrapper_InitBall();
}

void Loop() {
    Wrapper_MoveBall();
    Swap_Buffers();
}

int main() {
    Setup();
    while (true) {
        Loop();
    }
    return 0;
}
";
        assert_eq!(render_yaml(BALL), expected);
    }

    #[test]
    fn test_no_config_block_without_config() {
        let src = BALL.replace("config:\n  speed: 2.5\n  lives: 3\n", "");
        let out = render_yaml(&src);
        assert!(!out.contains("Configuration Constants"));
        assert!(out.contains("#include <math.h>\n\n// --- Table Structures ---\n"));
    }

    #[test]
    fn test_multi_output_uses_out_pointers() {
        let out = render_yaml(
            r#"
tables:
  snake_head: { columns: { x: int } }
  snake_body: { columns: { pos_x: array, length: int } }
  snacks: { columns: { active: int } }
functions:
  CheckSnackCollision:
    inputs: [snake_head, snake_body, snacks]
    outputs: [snake_body, snacks]
procedures:
  Setup: []
  Loop: [CheckSnackCollision]
"#,
        );
        assert!(out.contains(
            "void Logic_CheckSnackCollision(SnakeheadTable snake_head_in, SnakebodyTable snake_body_in, SnacksTable snacks_in, SnakebodyTable* snake_body_out, SnacksTable* snacks_out);"
        ));
        assert!(out.contains(
            "    Logic_CheckSnackCollision(state.snake_head_curr, state.snake_body_curr, state.snacks_curr, &state.snake_body_next, &state.snacks_next);"
        ));
        assert!(out.contains("    int pos_x[100];\n    int length;\n"));
    }

    #[test]
    fn test_multi_output_init_primes_every_output() {
        let out = render_yaml(
            r#"
tables:
  paddle1: { columns: { y: float } }
  paddle2: { columns: { y: float } }
functions:
  InitPaddles: { outputs: [paddle1, paddle2] }
procedures:
  Setup: [InitPaddles]
  Loop: []
"#,
        );
        assert!(out.contains(
            "void Wrapper_InitPaddles() {
    Logic_InitPaddles(&state.paddle1_next, &state.paddle2_next);
    state.paddle1_curr = state.paddle1_next;
    state.paddle2_curr = state.paddle2_next;
}
"
        ));
    }

    #[test]
    fn test_effect_only_function() {
        let out = render_yaml(
            r#"
tables:
  score: { columns: { p1: int } }
functions:
  GameLost: { inputs: [score] }
procedures:
  Setup: []
  Loop: [GameLost]
"#,
        );
        assert!(out.contains("void Logic_GameLost(ScoreTable score_in);"));
        assert!(out.contains("void Wrapper_GameLost() {\n    Logic_GameLost(state.score_curr);\n}\n"));
    }

    #[test]
    fn test_loop_swaps_every_table_in_order() {
        let out = render_yaml(
            r#"
tables:
  a: { columns: { v: int } }
  b: { columns: { v: int } }
functions:
  f1: { inputs: [a], outputs: [b] }
  f2: { inputs: [b], outputs: [a] }
procedures:
  Setup: []
  Loop: [f1, f2]
"#,
        );
        assert!(out.contains(
            "void Loop() {\n    Wrapper_f1();\n    Wrapper_f2();\n    Swap_Buffers();\n}\n"
        ));
        assert!(out.contains(
            "void Swap_Buffers() {\n    state.a_curr = state.a_next;\n    state.b_curr = state.b_next;\n}\n"
        ));
    }

    #[test]
    fn test_non_finite_and_unsigned_constants() {
        let out = render_yaml(&BALL.replace(
            "  lives: 3\n",
            "  lives: 3\n  far: .inf\n  near: -.inf\n  odd: .nan\n  big: 18446744073709551615\n",
        ));
        assert!(out.contains(
            "#define FAR INFINITY\n#define NEAR (-INFINITY)\n#define ODD NAN\n#define BIG 18446744073709551615ULL\n"
        ));
    }

    #[test]
    fn test_procedure_named_like_a_generated_routine() {
        for name in ["main", "Swap_Buffers"] {
            let src = BALL.replace("  Loop: [MoveBall]\n", &format!("  Loop: [MoveBall]\n  {name}: []\n"));
            let project = processor::run(&load_from_yaml(&src).unwrap()).unwrap();
            assert_eq!(
                render(&project).unwrap_err(),
                EmitError::ReservedName(name.to_string()),
                "{name}"
            );
        }
        // script hook names are fine in C
        let src = BALL.replace("  Loop: [MoveBall]\n", "  Loop: [MoveBall]\n  Render: []\n");
        assert!(render_yaml(&src).contains("void Render() {\n}\n"));
    }

    #[test]
    fn test_whole_float_keeps_decimal_point() {
        let out = render_yaml(&BALL.replace("speed: 2.5", "screen_width: 800.0"));
        assert!(out.contains("#define SCREEN_WIDTH 800.0f\n"));
    }
}
