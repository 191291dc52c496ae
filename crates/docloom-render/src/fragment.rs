//! Render fragments.
//!
//! A [`RenderFragment`] is one composable unit of output for an object:
//! the base fragment everything gets, a category-specific fragment, or a
//! capability-gated enhancement. Fragment *selection* is table-driven (see
//! [`chain`](crate::chain)); this module defines the fragment contract and
//! the standard template-backed implementation.

use std::collections::BTreeMap;

use docloom_model::CapabilitySet;

use crate::engine::TemplateEngine;
use crate::error::RenderError;
use crate::section::DisclosureTier;
use crate::view::ObjectView;

/// One composable renderer of object output.
///
/// Implementations must be stateless with respect to rendering: the same
/// view and tier always produce the same output. All build-varying inputs
/// arrive through the view or the engine.
pub trait RenderFragment: Send + Sync {
    /// Stable fragment id, used in error placeholders and diagnostics.
    fn id(&self) -> &str;

    /// Capability names this fragment needs. All must be available for
    /// the fragment to join a chain.
    fn requires(&self) -> &[String] {
        &[]
    }

    /// Whether this fragment is usable under the given capability set.
    ///
    /// The default demands every required capability. Fragments with
    /// any-of semantics (the diagram fragment renders whichever diagram
    /// kind was decided) override this.
    fn enabled(&self, capabilities: &CapabilitySet) -> bool {
        self.requires().iter().all(|c| capabilities.has(c))
    }

    /// Whether this fragment contributes to the given tier.
    fn supports(&self, tier: DisclosureTier) -> bool;

    /// Installs this fragment's templates into the shared engine.
    ///
    /// Called once at registry build time; a failure here is a
    /// configuration defect, not a render-time event.
    fn register_templates(&self, engine: &mut TemplateEngine) -> Result<(), RenderError>;

    /// Renders this fragment's contribution to one tier.
    fn render(
        &self,
        view: &ObjectView,
        engine: &TemplateEngine,
        tier: DisclosureTier,
    ) -> Result<String, RenderError>;
}

/// A fragment backed by one MiniJinja template per supported tier.
pub struct TemplateFragment {
    id: String,
    requires: Vec<String>,
    templates: BTreeMap<DisclosureTier, String>,
}

impl TemplateFragment {
    /// Creates a fragment with no requirements and no templates.
    pub fn new(id: impl Into<String>) -> Self {
        TemplateFragment {
            id: id.into(),
            requires: Vec::new(),
            templates: BTreeMap::new(),
        }
    }

    /// Adds a capability requirement.
    pub fn require(mut self, capability: impl Into<String>) -> Self {
        self.requires.push(capability.into());
        self
    }

    /// Adds the template for one tier.
    pub fn template(mut self, tier: DisclosureTier, source: impl Into<String>) -> Self {
        self.templates.insert(tier, source.into());
        self
    }

    fn template_name(&self, tier: DisclosureTier) -> String {
        format!("{}.{}", self.id, tier.as_str())
    }
}

impl RenderFragment for TemplateFragment {
    fn id(&self) -> &str {
        &self.id
    }

    fn requires(&self) -> &[String] {
        &self.requires
    }

    fn supports(&self, tier: DisclosureTier) -> bool {
        self.templates.contains_key(&tier)
    }

    fn register_templates(&self, engine: &mut TemplateEngine) -> Result<(), RenderError> {
        for (tier, source) in &self.templates {
            engine.add_template(&self.template_name(*tier), source)?;
        }
        Ok(())
    }

    fn render(
        &self,
        view: &ObjectView,
        engine: &TemplateEngine,
        tier: DisclosureTier,
    ) -> Result<String, RenderError> {
        if !self.supports(tier) {
            return Err(RenderError::MissingTemplate {
                fragment: self.id.clone(),
                tier: tier.as_str().to_string(),
            });
        }
        engine.render(&self.template_name(tier), view)
    }
}
