//! Per-project hand-written fragments for the browser artifact.
//!
//! The core never looks inside these: each provider hands back four
//! ready-to-insert pieces of text and the script backend pastes them as is.
//! Projects are matched by name, case-insensitively; anything unregistered
//! falls back to a generic placeholder.

use indexmap::IndexMap;
use tracing::debug;

/// What a project contributes to its browser document.
pub trait LogicProvider {
    /// `Logic_*` function bodies.
    fn logic(&self) -> &str;
    /// Body of the per-frame render routine.
    fn draw(&self) -> &str;
    /// Extra CSS rules.
    fn style(&self) -> &str;
    /// Extra markup under the page title.
    fn ui(&self) -> &str;
}

/// A provider backed by static text.
#[derive(Debug, Clone, Copy)]
pub struct Fragments {
    pub logic: &'static str,
    pub draw: &'static str,
    pub style: &'static str,
    pub ui: &'static str,
}

impl LogicProvider for Fragments {
    fn logic(&self) -> &str {
        self.logic
    }
    fn draw(&self) -> &str {
        self.draw
    }
    fn style(&self) -> &str {
        self.style
    }
    fn ui(&self) -> &str {
        self.ui
    }
}

pub const PONG: Fragments = Fragments {
    logic: include_str!("pong/logic.js"),
    draw: include_str!("pong/draw.js"),
    style: "h1 { color: #38bdf8; }",
    ui: "<p>Player (WS Keys) vs CPU</p>",
};

pub const SNAKE: Fragments = Fragments {
    logic: include_str!("snake/logic.js"),
    draw: include_str!("snake/draw.js"),
    style: "h1 { color: #10b981; }",
    ui: "<p>Use Arrow Keys to Navigate</p><div id='game-over' class='game-over'><h2>GAME OVER</h2><p id='final-score'>Score: 0</p><button onclick='resetGame()'>Try Again</button></div>",
};

pub const GENERIC: Fragments = Fragments {
    logic: "// Generic Logic Placeholder\n",
    draw: "text('Generic Visualization for ' + PROJECT_NAME, 20, 40);\n",
    style: "",
    ui: "<p>Generic Project View</p>",
};

/// Project identifier → provider.
pub struct LogicRegistry {
    providers: IndexMap<String, Box<dyn LogicProvider>>,
    fallback: Box<dyn LogicProvider>,
}

impl LogicRegistry {
    /// No providers; every lookup gets the generic fragments.
    pub fn empty() -> Self {
        Self {
            providers: IndexMap::new(),
            fallback: Box::new(GENERIC),
        }
    }

    /// `pong` and `snake`, plus the generic fallback.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("pong", PONG);
        registry.register("snake", SNAKE);
        registry
    }

    /// Add or replace the provider for `project`.
    pub fn register(&mut self, project: &str, provider: impl LogicProvider + 'static) {
        self.providers
            .insert(project.to_lowercase(), Box::new(provider));
    }

    pub fn set_fallback(&mut self, provider: impl LogicProvider + 'static) {
        self.fallback = Box::new(provider);
    }

    pub fn contains(&self, project: &str) -> bool {
        self.providers.contains_key(&project.to_lowercase())
    }

    pub fn lookup(&self, project: &str) -> &dyn LogicProvider {
        match self.providers.get(&project.to_lowercase()) {
            Some(provider) => provider.as_ref(),
            None => {
                debug!("no logic provider for `{project}`, using generic fragments");
                self.fallback.as_ref()
            }
        }
    }
}

impl Default for LogicRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
