//! docloom-xref - Cross-reference resolution for docloom.
//!
//! Resolves symbolic references against an ordered list of link
//! [`Inventory`] instances, first hit wins. Resolution never fails: a
//! symbol absent from every inventory degrades to a
//! [`RefOutcome::PlainText`] fallback, logged once per unique symbol.
//!
//! A [`Resolver`] is constructed once per build, freezes its inventories,
//! and is shared by reference across the render worker pool; its internal
//! cache and dedup set are concurrency-safe.
//!
//! # Example
//!
//! ```rust
//! use docloom_xref::{Inventory, RefOutcome, Resolver};
//!
//! let resolver = Resolver::with_inventories(vec![Inventory::from_pairs(
//!     "stdlib",
//!     [("typing.Protocol", "typing.html#Protocol")],
//! )]);
//!
//! assert!(resolver.resolve("typing.Protocol").is_resolved());
//! assert_eq!(
//!     resolver.resolve("unknown.module.Thing"),
//!     RefOutcome::PlainText("Thing".to_string()),
//! );
//! ```

mod inventory;
mod resolver;

pub use inventory::{Inventory, InventoryEntry};
pub use resolver::{RefOutcome, ResolvedRef, Resolver};
