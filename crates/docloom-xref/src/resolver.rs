//! Symbol resolution with graceful degradation.
//!
//! [`Resolver::resolve`] tries each inventory in order and returns the
//! first hit. A symbol no inventory knows is not an error: the outcome is
//! a [`RefOutcome::PlainText`] fallback carrying the symbol's last path
//! segment, to be rendered as literal code-styled text with no link.
//!
//! The resolver owns its inventories and freezes them for its lifetime, so
//! results are cached per symbol for the duration of one build. Unresolved
//! symbols are logged at warn level exactly once each, however often they
//! are referenced.

use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::inventory::Inventory;

/// A reference successfully anchored in an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRef {
    /// The symbol as requested.
    pub symbol: String,
    /// Name of the inventory that resolved it.
    pub inventory: String,
    /// Link target.
    pub uri: String,
    /// Text to display for the link.
    pub display: String,
}

/// The outcome of resolving a symbol. Resolution never fails; the
/// fallback branch is an explicit value, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum RefOutcome {
    /// Anchored in an inventory.
    Resolved(ResolvedRef),
    /// No inventory matched; render this text as literal code.
    PlainText(String),
}

impl RefOutcome {
    /// Returns `true` if the symbol was anchored in an inventory.
    pub fn is_resolved(&self) -> bool {
        matches!(self, RefOutcome::Resolved(_))
    }

    /// The link target, if any.
    pub fn uri(&self) -> Option<&str> {
        match self {
            RefOutcome::Resolved(r) => Some(&r.uri),
            RefOutcome::PlainText(_) => None,
        }
    }

    /// The text to display, for either branch.
    pub fn display(&self) -> &str {
        match self {
            RefOutcome::Resolved(r) => &r.display,
            RefOutcome::PlainText(text) => text,
        }
    }
}

/// Resolves symbols against an ordered inventory list, first hit wins.
///
/// All methods take `&self`; the per-build cache and the unresolved-symbol
/// set are concurrency-safe maps, so one resolver is shared across the
/// whole worker pool.
#[derive(Debug, Default)]
pub struct Resolver {
    inventories: Vec<Inventory>,
    cache: DashMap<String, RefOutcome>,
    unresolved: DashSet<String>,
}

impl Resolver {
    /// Creates a resolver with no inventories; every symbol falls back to
    /// plain text.
    pub fn new() -> Self {
        Resolver::default()
    }

    /// Creates a resolver over an ordered inventory list.
    ///
    /// Earlier inventories shadow later ones, mirroring the declared
    /// lookup precedence of the build configuration.
    pub fn with_inventories(inventories: Vec<Inventory>) -> Self {
        Resolver {
            inventories,
            cache: DashMap::new(),
            unresolved: DashSet::new(),
        }
    }

    /// Resolves a symbol, consulting the per-build cache first.
    pub fn resolve(&self, symbol: &str) -> RefOutcome {
        if let Some(hit) = self.cache.get(symbol) {
            return hit.clone();
        }
        let outcome = self.resolve_uncached(symbol);
        self.cache.insert(symbol.to_string(), outcome.clone());
        outcome
    }

    fn resolve_uncached(&self, symbol: &str) -> RefOutcome {
        for inv in &self.inventories {
            if let Some(entry) = inv.lookup(symbol) {
                let display = entry
                    .display
                    .clone()
                    .unwrap_or_else(|| fallback_text(symbol).to_string());
                return RefOutcome::Resolved(ResolvedRef {
                    symbol: symbol.to_string(),
                    inventory: inv.name.clone(),
                    uri: entry.uri.clone(),
                    display,
                });
            }
        }

        if self.unresolved.insert(symbol.to_string()) {
            warn!(symbol, "reference not found in any inventory");
        }
        RefOutcome::PlainText(fallback_text(symbol).to_string())
    }

    /// Symbols that failed to resolve so far, sorted for stable reporting.
    pub fn unresolved_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .unresolved
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        symbols.sort();
        symbols
    }

    /// Count of unique unresolved symbols.
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }
}

fn fallback_text(symbol: &str) -> &str {
    symbol.rsplit('.').next().unwrap_or(symbol)
}
