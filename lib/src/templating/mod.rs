pub mod minijinja;

use std::fmt::Debug;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::value::Dict;

pub trait EngineInit {
    type Engine: Engine + 'static;

    /// Builds an engine whose named templates resolve under `root`. `globals`
    /// is visible to every template as `G`.
    fn init<G: Serialize>(root: &Path, globals: G) -> Result<Self::Engine>;
}

/// The render contract every page, post and layout goes through.
pub trait Engine: Send + Sync + Debug {
    /// Renders the template at `name`, relative to the engine's root.
    fn render(&self, name: &str, data: &Dict) -> Result<String>;

    /// Renders `template_str`. `name`, when given, is used in diagnostics and
    /// as the base for relative includes.
    fn render_str(
        &self,
        name: Option<&str>,
        template_str: &str,
        data: &Dict,
    ) -> Result<String>;
}
