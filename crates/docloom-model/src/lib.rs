//! docloom-model - The object model docloom renders from.
//!
//! This crate is the data-model leaf of the docloom workspace. It defines:
//!
//! - [`DocObject`] and [`DocGraph`]: the language-agnostic record of
//!   documented code entities handed over by an external extraction stage,
//!   read-only for the duration of a render pass.
//! - [`CapabilitySet`]: the frozen registry of optional rendering features
//!   available for one build, passed by value into every pipeline stage.
//! - [`classify`]: the pure, ordered-rule classifier mapping an object to
//!   its semantic [`Category`].
//! - [`coverage::score`]: the weighted documentation-completeness
//!   checklist producing a [`CoverageScore`].
//!
//! Everything here is either plain data or a pure function over it; no
//! module in this crate performs I/O or holds mutable global state.
//!
//! # Example
//!
//! ```rust
//! use docloom_model::{classify, coverage, Category, DocObject, ObjectKind};
//!
//! let obj = DocObject::new("agents.Agent", ObjectKind::Class, "Agent");
//! assert_eq!(classify(&obj), Category::Concrete);
//! assert_eq!(coverage::score(&obj).percentage, 0);
//! ```

pub mod capability;
pub mod classify;
pub mod coverage;
pub mod graph;
pub mod object;

pub use capability::{
    AlwaysAvailable, Capability, CapabilityDecl, CapabilityProbe, CapabilitySet,
};
pub use classify::{classify, Category};
pub use coverage::{CoverageItem, CoverageScore};
pub use graph::{DocGraph, GraphError};
pub use object::{
    last_segment, DocObject, DocParam, Docstring, ObjectKind, Parameter, SourceLocation,
};
