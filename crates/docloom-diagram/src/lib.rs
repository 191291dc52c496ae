//! docloom-diagram - Diagram decisions and the external renderer client.
//!
//! Two halves, deliberately separated:
//!
//! - [`decide`] is pure: object + category + coverage + capabilities +
//!   limits in, [`DiagramSpec`] out. Capability-gated, complexity-capped,
//!   coverage-floored, deterministic.
//! - [`generate`] has the side effects: it drives a [`DiagramRenderer`]
//!   (typically a [`CommandRenderer`] wrapping an external layout tool)
//!   for accepted specs, with a per-call timeout, one reduced-cap retry
//!   after a timeout, and a cancellation check before each attempt.
//!
//! Diagram failures are never fatal; they downgrade the spec and the
//! object renders without its diagram.

mod decide;
mod renderer;
mod spec;

pub use decide::decide;
pub use renderer::{
    generate, CommandRenderer, DiagramError, DiagramObject, DiagramOutcome, DiagramRenderer,
    DiagramRequest, ImageRef,
};
pub use spec::{DecisionReason, DiagramKind, DiagramLimits, DiagramSpec};
