//! The fragment template engine.
//!
//! A thin wrapper over a MiniJinja environment with owned templates.
//! Fragments register their tier templates once, at registry build time;
//! after that the engine is immutable and shared by reference across the
//! render workers. There is no module-level environment and no
//! side-effecting filter: the engine travels inside the render context.

use minijinja::Environment;
use serde::Serialize;

use crate::error::RenderError;

/// A frozen template engine for fragment rendering.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Creates an engine with docloom's filters registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        register_filters(&mut env);
        TemplateEngine { env }
    }

    /// Registers a named template.
    ///
    /// # Errors
    ///
    /// Returns a template error if the source fails to compile; this is a
    /// configuration defect and surfaces before any rendering starts.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }

    /// Returns `true` if a template with the given name is registered.
    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Renders a registered template against a serializable view.
    pub fn render<S: Serialize>(&self, name: &str, view: &S) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(name)?;
        let value = minijinja::Value::from_serialize(view);
        Ok(tmpl.render(value)?)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers docloom's template filters.
fn register_filters(env: &mut Environment<'static>) {
    // Literal code span.
    env.add_filter("code", |value: String| format!("`{}`", value));

    // Markup link or literal code fallback, for LinkView-shaped values.
    env.add_filter("link", |value: minijinja::Value| -> String {
        let text = value
            .get_attr("text")
            .ok()
            .filter(|v| !v.is_undefined())
            .map(|v| v.to_string())
            .unwrap_or_else(|| value.to_string());
        match value.get_attr("uri") {
            Ok(uri) if !uri.is_undefined() && !uri.is_none() => {
                format!("[{}]({})", text, uri)
            }
            _ => format!("`{}`", text),
        }
    });

    // Percentage display, e.g. `73%`.
    env.add_filter("pct", |value: u64| format!("{}%", value));
}
