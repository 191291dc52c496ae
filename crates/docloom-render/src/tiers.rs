//! Progressive disclosure rendering.
//!
//! [`render_tiers`] assembles one object's [`Section`] from its fragment
//! chain: an essential body on the root section, then child sections for
//! the examples, full-reference, and source tiers. Tiers are independent;
//! one fragment failing in one tier contributes an explicit placeholder
//! and the rest of the output proceeds untouched.

use std::sync::Arc;

use tracing::warn;

use docloom_model::CapabilitySet;

use crate::engine::TemplateEngine;
use crate::fragment::RenderFragment;
use crate::section::{DisclosureTier, Section};
use crate::view::ObjectView;

/// Renders one tier by concatenating every supporting fragment's output
/// in chain order.
///
/// A failing fragment is replaced by a `[render error: <id>]` placeholder
/// so the defect is visible in the output without blocking siblings.
fn render_tier(
    view: &ObjectView,
    chain: &[Arc<dyn RenderFragment>],
    engine: &TemplateEngine,
    tier: DisclosureTier,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    for fragment in chain {
        if !fragment.supports(tier) {
            continue;
        }
        match fragment.render(view, engine, tier) {
            Ok(output) => {
                let trimmed = output.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            Err(err) => {
                warn!(
                    object = %view.id,
                    fragment = fragment.id(),
                    tier = tier.as_str(),
                    error = %err,
                    "fragment render failed"
                );
                parts.push(format!("[render error: {}]", fragment.id()));
            }
        }
    }
    parts.join("\n\n")
}

/// Assembles the disclosure tiers for one object into a section.
///
/// - essential: always rendered, becomes the root section body
/// - examples: only when the object has example blocks
/// - full: always rendered, body may be empty
/// - source: only with the `source-links` capability and a known source
///   location
pub fn render_tiers(
    view: &ObjectView,
    chain: &[Arc<dyn RenderFragment>],
    engine: &TemplateEngine,
    capabilities: &CapabilitySet,
) -> Section {
    let mut root = Section::new(
        view.id.clone(),
        view.name.clone(),
        render_tier(view, chain, engine, DisclosureTier::Essential),
        DisclosureTier::Essential,
    );

    if !view.examples.is_empty() {
        root.push_child(Section::new(
            format!("{}#examples", view.id),
            "Examples",
            render_tier(view, chain, engine, DisclosureTier::Examples),
            DisclosureTier::Examples,
        ));
    }

    root.push_child(Section::new(
        format!("{}#full", view.id),
        "Reference",
        render_tier(view, chain, engine, DisclosureTier::Full),
        DisclosureTier::Full,
    ));

    if capabilities.has("source-links") && view.source.is_some() {
        root.push_child(Section::new(
            format!("{}#source", view.id),
            "Source",
            render_tier(view, chain, engine, DisclosureTier::Source),
            DisclosureTier::Source,
        ));
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_registry;
    use crate::error::RenderError;
    use docloom_model::{
        classify, coverage, AlwaysAvailable, CapabilityDecl, DocObject, Docstring, ObjectKind,
        SourceLocation,
    };

    fn caps(names: &[&str]) -> CapabilitySet {
        let decls: Vec<CapabilityDecl> = names.iter().map(|n| CapabilityDecl::new(*n)).collect();
        CapabilitySet::build(&decls, &AlwaysAvailable)
    }

    fn view_for(obj: &DocObject) -> ObjectView {
        ObjectView::from_object(obj, classify(obj), &coverage::score(obj))
    }

    fn documented_object() -> DocObject {
        DocObject::new("m.run", ObjectKind::Function, "run")
            .with_docstring(Docstring {
                summary: Some("Runs a task.".into()),
                examples: vec![">>> run()".into()],
                ..Docstring::default()
            })
            .with_source_location(SourceLocation {
                file: "m/run.py".into(),
                line_start: 10,
                line_end: 24,
            })
    }

    #[test]
    fn essential_and_full_always_present() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = DocObject::new("m.Agent", ObjectKind::Class, "Agent");
        let view = view_for(&obj);
        let chain =
            registry.resolve_chain(docloom_model::Category::Concrete, &caps(&[]), false);

        let section = render_tiers(&view, &chain, &engine, &caps(&[]));
        assert_eq!(section.id, "m.Agent");
        assert_eq!(section.tier, DisclosureTier::Essential);
        assert!(!section.body.is_empty());

        let tiers: Vec<DisclosureTier> = section.children.iter().map(|c| c.tier).collect();
        assert_eq!(tiers, vec![DisclosureTier::Full]);
    }

    #[test]
    fn examples_tier_requires_examples() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = documented_object();
        let view = view_for(&obj);
        let chain =
            registry.resolve_chain(docloom_model::Category::Concrete, &caps(&[]), false);

        let section = render_tiers(&view, &chain, &engine, &caps(&[]));
        let tiers: Vec<DisclosureTier> = section.children.iter().map(|c| c.tier).collect();
        assert_eq!(tiers, vec![DisclosureTier::Examples, DisclosureTier::Full]);
        assert!(section.children[0].body.contains(">>> run()"));
    }

    #[test]
    fn source_tier_requires_capability_and_location() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = documented_object();
        let view = view_for(&obj);

        // Capability present: source tier renders.
        let capabilities = caps(&["source-links"]);
        let chain = registry.resolve_chain(
            docloom_model::Category::Concrete,
            &capabilities,
            false,
        );
        let section = render_tiers(&view, &chain, &engine, &capabilities);
        let last = section.children.last().unwrap();
        assert_eq!(last.tier, DisclosureTier::Source);
        assert!(last.body.contains("m/run.py"));

        // Capability absent: no source tier.
        let section = render_tiers(&view, &chain, &engine, &caps(&[]));
        assert!(section
            .children
            .iter()
            .all(|c| c.tier != DisclosureTier::Source));

        // Location absent: no source tier even with the capability.
        let bare = DocObject::new("m.x", ObjectKind::Function, "x");
        let section = render_tiers(&view_for(&bare), &chain, &engine, &capabilities);
        assert!(section
            .children
            .iter()
            .all(|c| c.tier != DisclosureTier::Source));
    }

    /// A fragment that always fails, for isolation tests.
    struct Failing;

    impl RenderFragment for Failing {
        fn id(&self) -> &str {
            "failing"
        }
        fn supports(&self, tier: DisclosureTier) -> bool {
            tier == DisclosureTier::Essential
        }
        fn register_templates(&self, _engine: &mut TemplateEngine) -> Result<(), RenderError> {
            Ok(())
        }
        fn render(
            &self,
            _view: &ObjectView,
            _engine: &TemplateEngine,
            _tier: DisclosureTier,
        ) -> Result<String, RenderError> {
            Err(RenderError::Template("boom".into()))
        }
    }

    #[test]
    fn failing_fragment_leaves_placeholder_and_siblings_render() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = documented_object();
        let view = view_for(&obj);

        let mut chain =
            registry.resolve_chain(docloom_model::Category::Concrete, &caps(&[]), false);
        chain.push(Arc::new(Failing));

        let section = render_tiers(&view, &chain, &engine, &caps(&[]));
        // The failure is visible in the essential tier...
        assert!(section.body.contains("[render error: failing]"));
        // ...next to the healthy fragment output, not instead of it.
        assert!(section.body.contains("Runs a task."));
        // Other tiers are untouched.
        assert!(section.children.iter().any(|c| c.tier == DisclosureTier::Full));
    }

    #[test]
    fn rendering_is_deterministic() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = documented_object();
        let view = view_for(&obj);
        let capabilities = caps(&["source-links", "coverage"]);
        let chain = registry.resolve_chain(
            docloom_model::Category::Concrete,
            &capabilities,
            false,
        );

        let first = render_tiers(&view, &chain, &engine, &capabilities);
        for _ in 0..5 {
            assert_eq!(render_tiers(&view, &chain, &engine, &capabilities), first);
        }
    }
}
