//! docloom - A documentation rendering decision engine.
//!
//! docloom sits between an extracted object graph and a document writer.
//! Given a language-agnostic model of documented code objects and the set
//! of rendering capabilities available for a build, it decides how each
//! object renders and assembles a deterministic document tree:
//!
//! 1. a frozen [`CapabilitySet`] is built once from the declared
//!    capability list and runtime probes;
//! 2. each object is classified into a closed [`Category`], scored for
//!    documentation coverage, and given a diagram decision gated by
//!    capability, complexity, and coverage;
//! 3. a fragment chain (base → category → capability enhancements) is
//!    resolved from lookup tables and rendered through four progressive
//!    disclosure tiers;
//! 4. the assembler merges per-object sections into an ordered tree with
//!    a manifest for downstream link resolution.
//!
//! Per-object failures degrade: unresolved references become plain text,
//! diagram failures drop the image, fragment failures leave visible
//! placeholders, and base-class cycles render the object as concrete
//! with a warning. Only configuration errors and a worker pool that
//! cannot start are fatal.
//!
//! # Example
//!
//! ```rust
//! use docloom::{AlwaysAvailable, BuildConfig, DocGraph, DocObject, ObjectKind, Pipeline};
//!
//! let graph = DocGraph::from_objects(vec![
//!     DocObject::new("agents", ObjectKind::Module, "agents").with_members(["agents.Agent"]),
//!     DocObject::new("agents.Agent", ObjectKind::Class, "Agent"),
//! ])
//! .unwrap();
//!
//! let config = BuildConfig::new()
//!     .declare("diagram:inheritance")
//!     .with_concurrency(1);
//! let pipeline = Pipeline::new(config, &AlwaysAvailable).unwrap();
//! let doc = pipeline.run(&graph).unwrap();
//!
//! assert_eq!(doc.sections.len(), 1);
//! assert_eq!(doc.manifest["agents.Agent"], "agents.Agent");
//! ```

mod assemble;
mod config;
mod error;
mod pipeline;
mod probe;

pub use assemble::{BuildStats, BuildWarning, RenderedDoc, WarningKind};
pub use config::{BuildConfig, ConfigError};
pub use error::BuildError;
pub use pipeline::Pipeline;
pub use probe::CommandProbe;

// Re-export the member crates' public APIs, so downstream builds depend
// on `docloom` alone.
pub use docloom_diagram::{
    decide, generate, CommandRenderer, DecisionReason, DiagramError, DiagramKind, DiagramLimits,
    DiagramOutcome, DiagramRenderer, DiagramRequest, DiagramSpec, ImageRef,
};
pub use docloom_model::{
    classify, coverage, last_segment, AlwaysAvailable, Capability, CapabilityDecl,
    CapabilityProbe, CapabilitySet, Category, CoverageItem, CoverageScore, DocGraph, DocObject,
    DocParam, Docstring, GraphError, ObjectKind, Parameter, SourceLocation,
};
pub use docloom_render::{
    default_registry, render_tiers, DisclosureTier, FragmentRegistry, ObjectView, RenderError,
    RenderFragment, Section, TemplateEngine, TemplateFragment,
};
pub use docloom_xref::{Inventory, InventoryEntry, RefOutcome, ResolvedRef, Resolver};
