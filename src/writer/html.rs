//! Emit the browser artifact: a self-contained HTML page with a p5.js sketch.
//!
//! The generated part of the script mirrors the C backend piece by piece;
//! the hand-written `Logic_*` bodies and the render routine come from the
//! project's `LogicProvider`.

use crate::error::EmitError;
use crate::logic::LogicProvider;
use crate::model::{Procedure, Project, Scalar, Table};
use crate::processor::naming::{self, js_column};
use crate::processor::{CallShape, CodeSink, Section, Wrapper, walk};

use super::float_literal;

const P5_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/p5.js/1.4.0/p5.js";

const PROJECT_NAME: &str = "PROJECT_NAME";
const SCREEN_WIDTH: &str = "SCREEN_WIDTH";
const SCREEN_HEIGHT: &str = "SCREEN_HEIGHT";
const DEFAULT_WIDTH: Scalar = Scalar::Int(800);
const DEFAULT_HEIGHT: Scalar = Scalar::Int(600);

const INDENT: &str = "    ";

const BASE_CSS: &str = "\
        body { margin: 0; display: flex; flex-direction: column; justify-content: center; align-items: center; height: 100vh; background: #0f172a; overflow: hidden; color: #f8fafc; font-family: 'Inter', system-ui, sans-serif; }
        canvas { box-shadow: 0 25px 50px -12px rgba(0,0,0,0.5); border: 4px solid #334155; border-radius: 12px; }
        #ui { margin-bottom: 2rem; text-align: center; }
        h1 { margin: 0; font-size: 3rem; font-weight: 800; letter-spacing: -0.025em; }
        p { color: #94a3b8; margin-top: 0.5rem; }
        .game-over { position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); background: rgba(15, 23, 42, 0.9); padding: 2rem; border-radius: 12px; border: 2px solid #ef4444; text-align: center; display: none; z-index: 100; }
        .game-over h2 { color: #ef4444; margin: 0 0 1rem; }
        .game-over button { background: #10b981; color: white; border: none; padding: 0.5rem 1rem; border-radius: 6px; cursor: pointer; font-weight: bold; }
";

/// Render `project` as an HTML document using `logic` for the hand-written parts.
pub fn render(project: &Project, logic: &dyn LogicProvider) -> Result<String, EmitError> {
    let script = walk(project, ScriptSink::new(logic))?;
    Ok(document(project, logic, &script))
}

fn document(project: &Project, logic: &dyn LogicProvider, script: &str) -> String {
    let title = escape_html(&project.name);
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("    <meta charset=\"UTF-8\">\n");
    page.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    page.push_str(&format!("    <title>{title}</title>\n"));
    page.push_str(&format!("    <script src=\"{P5_URL}\"></script>\n"));
    page.push_str("    <style>\n");
    page.push_str(BASE_CSS);
    if !logic.style().is_empty() {
        page.push_str(&format!("        {}\n", logic.style()));
    }
    page.push_str("    </style>\n</head>\n<body>\n");
    page.push_str("    <div id=\"ui\">\n");
    page.push_str(&format!("        <h1>{title}</h1>\n"));
    page.push_str(&format!("        {}\n", logic.ui()));
    page.push_str("    </div>\n    <script>\n");
    page.push_str(script);
    page.push_str("    </script>\n</body>\n</html>\n");
    page
}

pub struct ScriptSink<'a> {
    logic: &'a dyn LogicProvider,
    out: String,
    width: Scalar,
    height: Scalar,
}

impl<'a> ScriptSink<'a> {
    pub fn new(logic: &'a dyn LogicProvider) -> Self {
        Self {
            logic,
            out: String::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// One line at `depth` levels inside the `<script>` element.
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        for _ in 0..=depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Hand-written text goes in untouched.
    fn verbatim(&mut self, text: &str) {
        self.out.push_str(text);
        if !text.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn header(&mut self, title: &str) {
        self.line(0, format!("// --- {title} ---"));
    }
}

impl CodeSink for ScriptSink<'_> {
    const RESERVED_NAMES: &'static [&'static str] =
        &["Render", "setup", "draw", "resetGame", "SwapBuffers"];

    fn begin(&mut self, project: &Project) {
        for (key, value) in &project.config {
            match naming::constant_name(key).as_str() {
                SCREEN_WIDTH => self.width = *value,
                SCREEN_HEIGHT => self.height = *value,
                _ => {}
            }
        }
        self.header("Configuration");
        self.line(0, format!("const {PROJECT_NAME} = {};", js_string(&project.name)));
    }

    fn section(&mut self, section: Section) {
        match section {
            // canvas size always comes first, configured or not
            Section::Config => {
                let (width, height) = (self.width, self.height);
                self.line(0, format!("const {SCREEN_WIDTH} = {};", number_literal(width)));
                self.line(0, format!("const {SCREEN_HEIGHT} = {};", number_literal(height)));
            }
            Section::Tables => {
                self.blank();
                self.header("Table Types");
            }
            Section::State => {
                self.blank();
                self.header("Global State");
            }
            Section::Prototypes => {
                self.blank();
                self.header("Pure Logic Functions");
                let provider = self.logic;
                self.verbatim(provider.logic());
            }
            Section::Wrappers => {
                self.blank();
                self.header("Generated Wrappers");
            }
            Section::Swap => self.header("Buffer Swap"),
            Section::Procedures => self.header("Procedures"),
            Section::Entry => self.header("p5.js Lifecycle"),
        }
    }

    fn constant(&mut self, key: &str, value: Scalar) {
        let name = naming::constant_name(key);
        // already declared by `begin`/`section`
        if [PROJECT_NAME, SCREEN_WIDTH, SCREEN_HEIGHT].contains(&name.as_str()) {
            return;
        }
        self.line(0, format!("const {name} = {};", number_literal(value)));
    }

    fn table(&mut self, table: &Table) {
        if table.columns.is_empty() {
            self.line(0, format!("/** @typedef {{Object}} {} */", table.type_name));
            return;
        }
        let fields: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{}: {}", c.name, js_column(c)))
            .collect();
        self.line(
            0,
            format!(
                "/** @typedef {{{{ {} }}}} {} */",
                fields.join(", "),
                table.type_name
            ),
        );
    }

    fn state(&mut self, tables: &[Table]) {
        self.line(0, "let state = {");
        for table in tables {
            self.line(1, format!("{}_curr: {{}},", table.name));
            self.line(1, format!("{}_next: {{}},", table.name));
        }
        self.line(0, "};");
    }

    fn wrapper(&mut self, wrapper: &Wrapper<'_>) {
        self.line(0, format!("function Wrapper_{}() {{", wrapper.name()));

        let args: Vec<String> = wrapper
            .inputs
            .iter()
            .map(|t| format!("state.{}_curr", t.name))
            .collect();
        let call = format!("Logic_{}({})", wrapper.name(), args.join(", "));

        match wrapper.shape() {
            CallShape::Single => {
                let out = &wrapper.outputs[0].name;
                self.line(1, format!("state.{out}_next = {call};"));
                if wrapper.primes() {
                    self.line(1, format!("state.{out}_curr = state.{out}_next;"));
                }
            }
            CallShape::Multi => {
                self.line(1, format!("const results = {call};"));
                for table in &wrapper.outputs {
                    self.line(1, format!("state.{0}_next = results.{0};", table.name));
                    if wrapper.primes() {
                        self.line(1, format!("state.{0}_curr = state.{0}_next;", table.name));
                    }
                }
            }
            CallShape::Effect => self.line(1, format!("{call};")),
        }

        self.line(0, "}");
        self.blank();
    }

    fn swap(&mut self, tables: &[Table]) {
        self.line(0, "function SwapBuffers() {");
        for table in tables {
            let next = format!("state.{}_next", table.name);
            let mut fields = vec![format!("...{next}")];
            fields.extend(table.elementwise_columns().map(|c| {
                format!(
                    "{col}: Array.isArray({next}.{col}) ? [...{next}.{col}] : {next}.{col}",
                    col = c.name
                )
            }));
            self.line(
                1,
                format!("state.{}_curr = {{ {} }};", table.name, fields.join(", ")),
            );
        }
        self.line(0, "}");
        self.blank();
    }

    fn procedure(&mut self, procedure: &Procedure) {
        self.line(0, format!("function {}() {{", procedure.name));
        for step in &procedure.steps {
            self.line(1, format!("Wrapper_{step}();"));
        }
        if procedure.swaps() {
            self.line(1, "SwapBuffers();");
        }
        self.line(0, "}");
        self.blank();
    }

    fn entry(&mut self, setup: &Procedure, main_loop: &Procedure) {
        self.line(0, "function Render() {");
        let provider = self.logic;
        self.verbatim(provider.draw());
        self.line(0, "}");
        self.blank();

        self.line(0, "function setup() {");
        self.line(1, format!("createCanvas({SCREEN_WIDTH}, {SCREEN_HEIGHT});"));
        self.line(1, format!("{}();", setup.name));
        self.line(0, "}");
        self.blank();

        self.line(0, "function draw() {");
        self.line(1, "background(15, 23, 42);");
        self.line(1, format!("{}();", main_loop.name));
        self.line(1, "Render();");
        self.line(0, "}");
        self.blank();

        self.line(0, "function resetGame() {");
        self.line(1, "const overlay = document.getElementById('game-over');");
        self.line(1, "if (overlay) overlay.style.display = 'none';");
        self.line(1, format!("{}();", setup.name));
        self.line(0, "}");
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Script constants are plain numeric literals: no C float suffix.
fn number_literal(value: Scalar) -> String {
    match value {
        Scalar::Int(v) => v.to_string(),
        Scalar::UInt(v) => v.to_string(),
        Scalar::Float(v) => match float_literal(v) {
            Some(text) => text,
            None if v.is_nan() => "NaN".to_string(),
            None if v > 0.0 => "Infinity".to_string(),
            None => "-Infinity".to_string(),
        },
    }
}

/// A JS string literal that is also safe inside a `<script>` element.
fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string())
        .to_string()
        .replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
