//! The default fragment tables.
//!
//! [`default_registry`] wires up the standard set: a base fragment every
//! object renders through, specialized fragments for the non-concrete
//! categories, and the capability-gated enhancements (diagram embed,
//! coverage badge, source link, needs-attention notice). Concrete objects
//! deliberately have no category fragment; the base fragment already
//! covers the generic shape, so their chain is the base plus whatever
//! enhancements the build enables.
//!
//! Templates emit a writer-agnostic markdown-flavored markup. The writer
//! downstream owns final emission; nothing here assumes HTML.

use std::sync::Arc;

use docloom_model::{CapabilitySet, Category};

use crate::chain::FragmentRegistry;
use crate::engine::TemplateEngine;
use crate::error::RenderError;
use crate::fragment::{RenderFragment, TemplateFragment};
use crate::section::DisclosureTier;
use crate::view::ObjectView;

const BASE_ESSENTIAL: &str = "\
{{ signature | code }}{% if is_abstract %} *(abstract)*{% endif %}
{%- for warning in warnings %}

> **Warning:** {{ warning }}
{%- endfor %}
{%- if summary %}

{{ summary }}
{%- endif %}";

const BASE_EXAMPLES: &str = "\
{% for example in examples %}```text
{{ example }}
```
{% endfor %}";

const BASE_FULL: &str = "\
{%- if params %}
**Parameters**

{% for p in params %}- {{ p.name | code }}{% if p.annotation %} ({{ p.annotation | code }}){% endif %}{% if p.doc %}: {{ p.doc }}{% endif %}
{% endfor %}
{%- endif %}
{%- if returns %}
**Returns** {{ returns | code }}{% if returns_doc %}: {{ returns_doc }}{% endif %}
{%- endif %}
{%- if annotations %}
**Attributes**

{% for name, type in annotations | items %}- {{ name | code }}: {{ type | code }}
{% endfor %}
{%- endif %}
{%- if members %}
**Members**

{% for m in members %}- {{ m.name | code }} ({{ m.kind }})
{% endfor %}
{%- endif %}";

const NEEDS_ATTENTION: &str = "\
> This entry needs attention: documentation coverage is \
{{ coverage.percentage | pct }}{% if coverage.missing %} \
(missing: {{ coverage.missing | join(\", \") }}){% endif %}.";

const MODULE_INDEX: &str = "\
{%- if members %}
**Contents**

{% for m in members %}- {{ m.name | code }} ({{ m.kind }})
{% endfor %}
{%- endif %}";

const ABSTRACT_CONTRACT: &str = "\
Abstract base class; instantiate a concrete subclass instead.
{%- if subclasses %}

**Known implementations**

{% for s in subclasses %}- {{ s | link }}
{% endfor %}
{%- endif %}";

const MIXIN_USAGE: &str = "\
Mixin class; combine with a concrete base to use it.
{%- if subclasses %}

**Used by**

{% for s in subclasses %}- {{ s | link }}
{% endfor %}
{%- endif %}";

const RECORD_FIELDS: &str = "\
{%- if annotations %}
**Fields**

{% for name, type in annotations | items %}- {{ name | code }}: {{ type | code }}
{% endfor %}
{%- endif %}";

const ENUM_MEMBERS: &str = "\
{%- if members %}
**Values**

{% for m in members %}- {{ m.name | code }}
{% endfor %}
{%- endif %}";

const EXCEPTION_CONTEXT: &str = "\
{%- if bases %}
Raised as part of the {% for b in bases %}{{ b | link }}{% if not loop.last %}, {% endif %}{% endfor %} family.
{%- endif %}";

const COVERAGE_BADGE: &str = "*Documentation coverage: {{ coverage.percentage | pct }}.*";

const SOURCE_LINK: &str = "\
Defined in {{ source.file | code }}, lines {{ source.line_start }}-{{ source.line_end }}.";

const DIAGRAM_FULL: &str = "\
{%- if diagram.image %}
![{{ diagram.kind }} diagram for {{ name }}]({{ diagram.image }})
{%- elif diagram.reason == \"exceeds complexity ceiling\" %}
*{{ diagram.kind }} diagram omitted ({{ diagram.node_count }} related nodes exceed the ceiling).*
{%- if bases %}

Bases: {% for b in bases %}{{ b | link }}{% if not loop.last %}, {% endif %}{% endfor %}
{%- endif %}
{%- if subclasses %}

Subclasses: {% for s in subclasses %}{{ s | link }}{% if not loop.last %}, {% endif %}{% endfor %}
{%- endif %}
{%- endif %}";

/// The diagram enhancement.
///
/// Enabled when *any* diagram capability is on, unlike the all-of default:
/// which kind applies was already decided per object, and this fragment
/// renders whatever that decision produced (image, degraded summary, or
/// nothing).
struct DiagramFragment {
    inner: TemplateFragment,
}

impl DiagramFragment {
    fn new() -> Self {
        DiagramFragment {
            inner: TemplateFragment::new("diagram").template(DisclosureTier::Full, DIAGRAM_FULL),
        }
    }
}

const DIAGRAM_CAPABILITIES: &[&str] =
    &["diagram:inheritance", "diagram:flow", "diagram:sequence"];

impl RenderFragment for DiagramFragment {
    fn id(&self) -> &str {
        "diagram"
    }

    fn enabled(&self, capabilities: &CapabilitySet) -> bool {
        DIAGRAM_CAPABILITIES.iter().any(|c| capabilities.has(c))
    }

    fn supports(&self, tier: DisclosureTier) -> bool {
        self.inner.supports(tier)
    }

    fn register_templates(&self, engine: &mut TemplateEngine) -> Result<(), RenderError> {
        self.inner.register_templates(engine)
    }

    fn render(
        &self,
        view: &ObjectView,
        engine: &TemplateEngine,
        tier: DisclosureTier,
    ) -> Result<String, RenderError> {
        self.inner.render(view, engine, tier)
    }
}

/// Builds the standard fragment registry.
pub fn default_registry() -> FragmentRegistry {
    let base: Arc<dyn RenderFragment> = Arc::new(
        TemplateFragment::new("base")
            .template(DisclosureTier::Essential, BASE_ESSENTIAL)
            .template(DisclosureTier::Examples, BASE_EXAMPLES)
            .template(DisclosureTier::Full, BASE_FULL),
    );

    let needs_attention: Arc<dyn RenderFragment> = Arc::new(
        TemplateFragment::new("needs-attention")
            .require("coverage")
            .template(DisclosureTier::Essential, NEEDS_ATTENTION),
    );

    let module_index: Arc<dyn RenderFragment> = Arc::new(
        TemplateFragment::new("module-index").template(DisclosureTier::Full, MODULE_INDEX),
    );

    FragmentRegistry::new(base)
        .with_needs_attention(needs_attention)
        .register_category(Category::Module, module_index.clone())
        .register_category(Category::Package, module_index)
        .register_category(
            Category::Abstract,
            Arc::new(
                TemplateFragment::new("abstract-contract")
                    .template(DisclosureTier::Full, ABSTRACT_CONTRACT),
            ),
        )
        .register_category(
            Category::Mixin,
            Arc::new(
                TemplateFragment::new("mixin-usage").template(DisclosureTier::Full, MIXIN_USAGE),
            ),
        )
        .register_category(
            Category::DataRecord,
            Arc::new(
                TemplateFragment::new("record-fields")
                    .template(DisclosureTier::Full, RECORD_FIELDS),
            ),
        )
        .register_category(
            Category::Enumeration,
            Arc::new(
                TemplateFragment::new("enum-members").template(DisclosureTier::Full, ENUM_MEMBERS),
            ),
        )
        .register_category(
            Category::Exception,
            Arc::new(
                TemplateFragment::new("exception-context")
                    .template(DisclosureTier::Full, EXCEPTION_CONTEXT),
            ),
        )
        .register_enhancement(Arc::new(DiagramFragment::new()))
        .register_enhancement(Arc::new(
            TemplateFragment::new("coverage-badge")
                .require("coverage")
                .template(DisclosureTier::Essential, COVERAGE_BADGE),
        ))
        .register_enhancement(Arc::new(
            TemplateFragment::new("source-link")
                .require("source-links")
                .template(DisclosureTier::Source, SOURCE_LINK),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docloom_model::{
        classify, coverage, AlwaysAvailable, CapabilityDecl, DocObject, ObjectKind,
    };

    fn caps(names: &[&str]) -> CapabilitySet {
        let decls: Vec<CapabilityDecl> = names.iter().map(|n| CapabilityDecl::new(*n)).collect();
        CapabilitySet::build(&decls, &AlwaysAvailable)
    }

    fn view_for(obj: &DocObject) -> ObjectView {
        ObjectView::from_object(obj, classify(obj), &coverage::score(obj))
    }

    #[test]
    fn default_templates_all_compile() {
        default_registry().build_engine().unwrap();
    }

    #[test]
    fn bare_concrete_object_resolves_to_base_only() {
        let registry = default_registry();
        let chain = registry.resolve_chain(Category::Concrete, &CapabilitySet::empty(), true);
        let ids: Vec<&str> = chain.iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["base"]);
    }

    #[test]
    fn diagram_fragment_enables_on_any_diagram_capability() {
        let registry = default_registry();
        for cap in ["diagram:inheritance", "diagram:flow", "diagram:sequence"] {
            let chain = registry.resolve_chain(Category::Concrete, &caps(&[cap]), false);
            let ids: Vec<&str> = chain.iter().map(|f| f.id()).collect();
            assert_eq!(ids, vec!["base", "diagram"]);
        }
    }

    #[test]
    fn base_essential_renders_signature_and_summary() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = DocObject::new("m.Agent", ObjectKind::Class, "Agent").with_docstring(
            docloom_model::Docstring {
                summary: Some("An agent.".into()),
                ..Default::default()
            },
        );
        let chain = registry.resolve_chain(Category::Concrete, &CapabilitySet::empty(), false);
        let out = chain[0]
            .render(&view_for(&obj), &engine, DisclosureTier::Essential)
            .unwrap();
        assert!(out.contains("`class Agent`"));
        assert!(out.contains("An agent."));
    }

    #[test]
    fn base_full_lists_parameters() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = DocObject::new("m.run", ObjectKind::Function, "run").with_parameters(vec![
            docloom_model::Parameter::annotated("task", "str"),
        ]);
        let out = registry.resolve_chain(Category::Concrete, &CapabilitySet::empty(), false)[0]
            .render(&view_for(&obj), &engine, DisclosureTier::Full)
            .unwrap();
        assert!(out.contains("**Parameters**"));
        assert!(out.contains("`task`"));
        assert!(out.contains("`str`"));
    }

    #[test]
    fn degraded_diagram_summary_renders_for_ceiling_rejection() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = DocObject::new("m.Wide", ObjectKind::Class, "Wide")
            .with_bases((0..3).map(|i| format!("m.B{i}")));
        let mut view = view_for(&obj);
        view.diagram = crate::view::DiagramView {
            kind: "inheritance".into(),
            accepted: false,
            reason: "exceeds complexity ceiling".into(),
            node_count: 25,
            image: None,
        };

        let chain = registry.resolve_chain(Category::Concrete, &caps(&["diagram:inheritance"]), false);
        let diagram = chain.iter().find(|f| f.id() == "diagram").unwrap();
        let out = diagram.render(&view, &engine, DisclosureTier::Full).unwrap();
        assert!(out.contains("diagram omitted"));
        assert!(out.contains("Bases:"));
    }

    #[test]
    fn timed_out_diagram_renders_nothing() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = DocObject::new("m.A", ObjectKind::Class, "A").with_bases(["m.B"]);
        let mut view = view_for(&obj);
        view.diagram = crate::view::DiagramView {
            kind: "inheritance".into(),
            accepted: false,
            reason: "timeout".into(),
            node_count: 1,
            image: None,
        };

        let chain = registry.resolve_chain(Category::Concrete, &caps(&["diagram:inheritance"]), false);
        let diagram = chain.iter().find(|f| f.id() == "diagram").unwrap();
        let out = diagram.render(&view, &engine, DisclosureTier::Full).unwrap();
        assert!(out.trim().is_empty());
    }

    #[test]
    fn needs_attention_renders_missing_items() {
        let registry = default_registry();
        let engine = registry.build_engine().unwrap();
        let obj = DocObject::new("m.Agent", ObjectKind::Class, "Agent");
        let chain = registry.resolve_chain(Category::Concrete, &caps(&["coverage"]), true);
        let needs = chain.iter().find(|f| f.id() == "needs-attention").unwrap();
        let out = needs
            .render(&view_for(&obj), &engine, DisclosureTier::Essential)
            .unwrap();
        assert!(out.contains("0%"));
        assert!(out.contains("summary"));
        assert!(out.contains("examples"));
    }
}
