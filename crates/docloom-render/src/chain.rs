//! Table-driven fragment chain resolution.
//!
//! The registry replaces template-file inheritance with explicit
//! composition: a `{category -> fragments}` table plus an ordered
//! enhancement list, each fragment declaring its capability requirements.
//! [`FragmentRegistry::resolve_chain`] builds the chain for one object as
//! base fragment, then category fragments, then every enabled enhancement.
//! Missing registrations and unmet requirements skip silently; the chain
//! always holds at least the base fragment, so every object renders
//! something.

use std::collections::HashMap;
use std::sync::Arc;

use docloom_model::{CapabilitySet, Category};

use crate::engine::TemplateEngine;
use crate::error::RenderError;
use crate::fragment::RenderFragment;

/// The fragment lookup tables for one build.
pub struct FragmentRegistry {
    base: Arc<dyn RenderFragment>,
    needs_attention: Option<Arc<dyn RenderFragment>>,
    by_category: HashMap<Category, Vec<Arc<dyn RenderFragment>>>,
    enhancements: Vec<Arc<dyn RenderFragment>>,
}

impl FragmentRegistry {
    /// Creates a registry with only the given base fragment.
    pub fn new(base: Arc<dyn RenderFragment>) -> Self {
        FragmentRegistry {
            base,
            needs_attention: None,
            by_category: HashMap::new(),
            enhancements: Vec::new(),
        }
    }

    /// Sets the fragment low-coverage objects are routed through.
    pub fn with_needs_attention(mut self, fragment: Arc<dyn RenderFragment>) -> Self {
        self.needs_attention = Some(fragment);
        self
    }

    /// Registers a category-specific fragment. Categories may hold
    /// several fragments; they render in registration order.
    pub fn register_category(
        mut self,
        category: Category,
        fragment: Arc<dyn RenderFragment>,
    ) -> Self {
        self.by_category.entry(category).or_default().push(fragment);
        self
    }

    /// Registers a capability-enhancement fragment. Registration order is
    /// the render order among fragments of equal capability priority.
    pub fn register_enhancement(mut self, fragment: Arc<dyn RenderFragment>) -> Self {
        self.enhancements.push(fragment);
        self
    }

    /// Builds the frozen template engine holding every registered
    /// fragment's templates.
    ///
    /// # Errors
    ///
    /// Returns the first template compilation error; a broken fragment
    /// template is a configuration defect.
    pub fn build_engine(&self) -> Result<TemplateEngine, RenderError> {
        let mut engine = TemplateEngine::new();
        self.base.register_templates(&mut engine)?;
        if let Some(frag) = &self.needs_attention {
            frag.register_templates(&mut engine)?;
        }
        for frags in self.by_category.values() {
            for frag in frags {
                frag.register_templates(&mut engine)?;
            }
        }
        for frag in &self.enhancements {
            frag.register_templates(&mut engine)?;
        }
        Ok(engine)
    }

    /// Resolves the fragment chain for one object.
    ///
    /// The chain is: base, then the needs-attention fragment when the
    /// object's coverage is low, then category fragments, then enabled
    /// enhancements ordered by descending capability priority (stable, so
    /// equal priorities keep registration order). Never empty.
    pub fn resolve_chain(
        &self,
        category: Category,
        capabilities: &CapabilitySet,
        low_coverage: bool,
    ) -> Vec<Arc<dyn RenderFragment>> {
        let mut chain: Vec<Arc<dyn RenderFragment>> = vec![self.base.clone()];

        if low_coverage {
            if let Some(frag) = &self.needs_attention {
                if frag.enabled(capabilities) {
                    chain.push(frag.clone());
                }
            }
        }

        if let Some(frags) = self.by_category.get(&category) {
            chain.extend(
                frags
                    .iter()
                    .filter(|f| f.enabled(capabilities))
                    .cloned(),
            );
        }

        let mut enabled: Vec<Arc<dyn RenderFragment>> = self
            .enhancements
            .iter()
            .filter(|f| f.enabled(capabilities))
            .cloned()
            .collect();
        enabled.sort_by_key(|f| std::cmp::Reverse(fragment_priority(f.as_ref(), capabilities)));
        chain.extend(enabled);

        chain
    }
}

/// A fragment's priority is the highest priority among its available
/// required capabilities; requirement-free fragments sit at 0.
fn fragment_priority(fragment: &dyn RenderFragment, capabilities: &CapabilitySet) -> i32 {
    fragment
        .requires()
        .iter()
        .filter_map(|c| capabilities.priority(c))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::TemplateFragment;
    use crate::section::DisclosureTier;
    use docloom_model::{AlwaysAvailable, CapabilityDecl};

    fn caps(pairs: &[(&str, i32)]) -> CapabilitySet {
        let decls: Vec<CapabilityDecl> = pairs
            .iter()
            .map(|(n, p)| CapabilityDecl::with_priority(*n, *p))
            .collect();
        CapabilitySet::build(&decls, &AlwaysAvailable)
    }

    fn frag(id: &str) -> Arc<dyn RenderFragment> {
        Arc::new(TemplateFragment::new(id).template(DisclosureTier::Essential, id.to_string()))
    }

    fn frag_requiring(id: &str, capability: &str) -> Arc<dyn RenderFragment> {
        Arc::new(
            TemplateFragment::new(id)
                .require(capability)
                .template(DisclosureTier::Essential, id.to_string()),
        )
    }

    fn ids(chain: &[Arc<dyn RenderFragment>]) -> Vec<&str> {
        chain.iter().map(|f| f.id()).collect()
    }

    #[test]
    fn chain_is_never_empty() {
        let registry = FragmentRegistry::new(frag("base"));
        for category in [
            Category::Abstract,
            Category::Mixin,
            Category::DataRecord,
            Category::Enumeration,
            Category::Exception,
            Category::Concrete,
            Category::Module,
            Category::Package,
        ] {
            let chain = registry.resolve_chain(category, &CapabilitySet::empty(), true);
            assert!(!chain.is_empty());
            assert_eq!(chain[0].id(), "base");
        }
    }

    #[test]
    fn category_fragments_follow_base() {
        let registry = FragmentRegistry::new(frag("base"))
            .register_category(Category::Exception, frag("exception-context"));

        let chain = registry.resolve_chain(Category::Exception, &CapabilitySet::empty(), false);
        assert_eq!(ids(&chain), vec!["base", "exception-context"]);

        let chain = registry.resolve_chain(Category::Concrete, &CapabilitySet::empty(), false);
        assert_eq!(ids(&chain), vec!["base"]);
    }

    #[test]
    fn enhancements_require_all_capabilities() {
        let registry = FragmentRegistry::new(frag("base"))
            .register_enhancement(frag_requiring("badge", "coverage"))
            .register_enhancement(frag_requiring("src", "source-links"));

        let chain = registry.resolve_chain(
            Category::Concrete,
            &caps(&[("coverage", 0)]),
            false,
        );
        assert_eq!(ids(&chain), vec!["base", "badge"]);
    }

    #[test]
    fn enhancement_order_follows_capability_priority() {
        let registry = FragmentRegistry::new(frag("base"))
            .register_enhancement(frag_requiring("low", "a"))
            .register_enhancement(frag_requiring("high", "b"));

        let chain =
            registry.resolve_chain(Category::Concrete, &caps(&[("a", 1), ("b", 9)]), false);
        assert_eq!(ids(&chain), vec!["base", "high", "low"]);
    }

    #[test]
    fn equal_priority_keeps_registration_order() {
        let registry = FragmentRegistry::new(frag("base"))
            .register_enhancement(frag_requiring("first", "a"))
            .register_enhancement(frag_requiring("second", "b"));

        let chain =
            registry.resolve_chain(Category::Concrete, &caps(&[("a", 3), ("b", 3)]), false);
        assert_eq!(ids(&chain), vec!["base", "first", "second"]);
    }

    #[test]
    fn needs_attention_requires_low_coverage_and_capability() {
        let registry = FragmentRegistry::new(frag("base"))
            .with_needs_attention(frag_requiring("needs-attention", "coverage"));

        // Low coverage, capability present: included.
        let chain = registry.resolve_chain(Category::Concrete, &caps(&[("coverage", 0)]), true);
        assert_eq!(ids(&chain), vec!["base", "needs-attention"]);

        // Healthy coverage: skipped.
        let chain = registry.resolve_chain(Category::Concrete, &caps(&[("coverage", 0)]), false);
        assert_eq!(ids(&chain), vec!["base"]);

        // No coverage capability: skipped even when low.
        let chain = registry.resolve_chain(Category::Concrete, &CapabilitySet::empty(), true);
        assert_eq!(ids(&chain), vec!["base"]);
    }

    #[test]
    fn build_engine_registers_all_templates() {
        let registry = FragmentRegistry::new(frag("base"))
            .register_category(Category::Mixin, frag("mixin-usage"))
            .register_enhancement(frag_requiring("badge", "coverage"));

        let engine = registry.build_engine().unwrap();
        assert!(engine.has_template("base.essential"));
        assert!(engine.has_template("mixin-usage.essential"));
        assert!(engine.has_template("badge.essential"));
    }

    #[test]
    fn build_engine_surfaces_broken_templates() {
        let broken: Arc<dyn RenderFragment> = Arc::new(
            TemplateFragment::new("broken").template(DisclosureTier::Essential, "{{ unclosed"),
        );
        let registry = FragmentRegistry::new(broken);
        assert!(registry.build_engine().is_err());
    }
}
