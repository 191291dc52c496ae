//! docloom-render - Fragment chains and progressive disclosure for docloom.
//!
//! This crate turns one classified, scored, diagram-decided object into a
//! [`Section`] tree:
//!
//! - [`RenderFragment`] is the unit of composition; the standard
//!   implementation is [`TemplateFragment`], backed by one MiniJinja
//!   template per supported tier.
//! - [`FragmentRegistry`] holds the composition tables and resolves the
//!   per-object chain: base fragment, category fragment, then enabled
//!   capability enhancements. The chain is never empty, so every object
//!   renders at least its base output.
//! - [`render_tiers`] drives the chain through the four disclosure tiers
//!   (essential, examples, full, source) with per-tier failure isolation.
//!
//! Selection is table-driven on the closed [`Category`] enum plus the
//! frozen capability set; there is no file-path inheritance and no ambient
//! template environment. [`default_registry`] provides the standard
//! fragment tables.
//!
//! [`Category`]: docloom_model::Category

mod chain;
mod defaults;
mod engine;
mod error;
mod fragment;
mod section;
mod tiers;
mod view;

pub use chain::FragmentRegistry;
pub use defaults::default_registry;
pub use engine::TemplateEngine;
pub use error::RenderError;
pub use fragment::{RenderFragment, TemplateFragment};
pub use section::{DisclosureTier, Section};
pub use tiers::render_tiers;
pub use view::{
    CoverageView, DiagramView, LinkView, MemberView, ObjectView, ParamView, SourceView,
};
