//! Link inventories.
//!
//! An [`Inventory`] maps symbolic paths to link targets, typically loaded
//! from another project's published object index. Inventories are immutable
//! once handed to a resolver; within a build they are treated as frozen
//! data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One resolvable entry in an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Link target, absolute or relative to the inventory's base.
    pub uri: String,
    /// Optional display text overriding the symbol's last segment.
    #[serde(default)]
    pub display: Option<String>,
}

impl InventoryEntry {
    /// Creates an entry with no display override.
    pub fn new(uri: impl Into<String>) -> Self {
        InventoryEntry {
            uri: uri.into(),
            display: None,
        }
    }
}

/// A named mapping of symbols to link targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Inventory name, used in resolution results and diagnostics.
    pub name: String,
    entries: HashMap<String, InventoryEntry>,
}

impl Inventory {
    /// Creates an empty inventory with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Inventory {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Adds an entry, replacing any previous entry for the symbol.
    ///
    /// Inventories come from external data where later entries supersede
    /// earlier ones, so replacement is silent here; *cross*-inventory
    /// precedence is the resolver's ordered-list contract instead.
    pub fn add(mut self, symbol: impl Into<String>, entry: InventoryEntry) -> Self {
        self.entries.insert(symbol.into(), entry);
        self
    }

    /// Builds an inventory from `(symbol, uri)` pairs.
    pub fn from_pairs<I, S, U>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, U)>,
        S: Into<String>,
        U: Into<String>,
    {
        let mut inv = Inventory::new(name);
        for (symbol, uri) in pairs {
            inv.entries
                .insert(symbol.into(), InventoryEntry::new(uri.into()));
        }
        inv
    }

    /// Looks up a symbol.
    pub fn lookup(&self, symbol: &str) -> Option<&InventoryEntry> {
        self.entries.get(symbol)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the inventory has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hits_and_misses() {
        let inv = Inventory::from_pairs("stdlib", [("typing.Protocol", "typing.html#Protocol")]);
        assert!(inv.lookup("typing.Protocol").is_some());
        assert!(inv.lookup("typing.Missing").is_none());
    }

    #[test]
    fn add_replaces_existing_symbol() {
        let inv = Inventory::new("local")
            .add("m.Thing", InventoryEntry::new("old.html"))
            .add("m.Thing", InventoryEntry::new("new.html"));
        assert_eq!(inv.lookup("m.Thing").unwrap().uri, "new.html");
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "name": "stdlib",
            "entries": {
                "typing.Protocol": {"uri": "typing.html#Protocol"}
            }
        }"#;
        let inv: Inventory = serde_json::from_str(json).unwrap();
        assert_eq!(inv.name, "stdlib");
        assert!(inv.lookup("typing.Protocol").is_some());
    }
}
