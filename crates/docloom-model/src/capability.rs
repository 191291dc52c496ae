//! The capability registry.
//!
//! A [`Capability`] is a named optional rendering feature (a diagram kind,
//! math typesetting, coverage badges, source links). Which capabilities are
//! usable varies per build: a capability must be *declared* by the build
//! configuration and its runtime *probe* must pass.
//!
//! The resulting [`CapabilitySet`] is plain immutable data, constructed once
//! at build start and passed by value into every pipeline stage. Nothing
//! downstream consults ambient state to learn what is available; membership
//! checks are always `capabilities.has("name")`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A declared capability, prior to probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDecl {
    /// Capability name, e.g. `"diagram:inheritance"` or `"source-links"`.
    pub name: String,
    /// Tie-break priority among equivalent fragments and diagram kinds.
    /// Higher wins.
    pub priority: i32,
}

impl CapabilityDecl {
    /// Declares a capability with priority 0.
    pub fn new(name: impl Into<String>) -> Self {
        CapabilityDecl {
            name: name.into(),
            priority: 0,
        }
    }

    /// Declares a capability with an explicit priority.
    pub fn with_priority(name: impl Into<String>, priority: i32) -> Self {
        CapabilityDecl {
            name: name.into(),
            priority,
        }
    }
}

/// One probed capability in a frozen [`CapabilitySet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    pub available: bool,
    pub priority: i32,
}

/// Answers "is this declared capability actually usable for this build?".
///
/// Probes run once, during [`CapabilitySet::build`]. A probe that cannot
/// decide should return `false`; unprobeable capabilities default to
/// unavailable.
pub trait CapabilityProbe {
    fn probe(&self, name: &str) -> bool;
}

/// Every closure `Fn(&str) -> bool` is a probe.
impl<F> CapabilityProbe for F
where
    F: Fn(&str) -> bool,
{
    fn probe(&self, name: &str) -> bool {
        self(name)
    }
}

/// A probe that accepts every declared capability.
///
/// Useful for tests and for builds whose capability list is already
/// curated upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAvailable;

impl CapabilityProbe for AlwaysAvailable {
    fn probe(&self, _name: &str) -> bool {
        true
    }
}

/// The frozen set of capabilities for one build.
///
/// `Clone + Send + Sync` by construction; concurrent readers share it
/// freely. There is no way to mutate a set after [`build`](Self::build).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    caps: BTreeMap<String, Capability>,
}

impl CapabilitySet {
    /// An empty set: every query answers unavailable.
    pub fn empty() -> Self {
        CapabilitySet::default()
    }

    /// Merges the declared capability list with runtime probe results.
    ///
    /// A capability is available iff it was declared and its probe passed.
    /// Names never declared are simply absent and report unavailable.
    pub fn build(declared: &[CapabilityDecl], probe: &dyn CapabilityProbe) -> Self {
        let mut caps = BTreeMap::new();
        for decl in declared {
            caps.insert(
                decl.name.clone(),
                Capability {
                    name: decl.name.clone(),
                    available: probe.probe(&decl.name),
                    priority: decl.priority,
                },
            );
        }
        CapabilitySet { caps }
    }

    /// Returns `true` if the named capability is available.
    ///
    /// This is the only query downstream decision logic uses.
    pub fn has(&self, name: &str) -> bool {
        self.caps.get(name).map(|c| c.available).unwrap_or(false)
    }

    /// Priority of an *available* capability, `None` otherwise.
    pub fn priority(&self, name: &str) -> Option<i32> {
        self.caps
            .get(name)
            .filter(|c| c.available)
            .map(|c| c.priority)
    }

    /// Names of available capabilities, in lexical order.
    pub fn available_names(&self) -> impl Iterator<Item = &str> {
        self.caps
            .values()
            .filter(|c| c.available)
            .map(|c| c.name.as_str())
    }

    /// Number of available capabilities.
    pub fn len(&self) -> usize {
        self.caps.values().filter(|c| c.available).count()
    }

    /// Returns `true` if no capability is available.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls(names: &[&str]) -> Vec<CapabilityDecl> {
        names.iter().map(|n| CapabilityDecl::new(*n)).collect()
    }

    #[test]
    fn declared_and_probed_is_available() {
        let set = CapabilitySet::build(&decls(&["math", "source-links"]), &AlwaysAvailable);
        assert!(set.has("math"));
        assert!(set.has("source-links"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn undeclared_is_unavailable() {
        let set = CapabilitySet::build(&decls(&["math"]), &AlwaysAvailable);
        assert!(!set.has("diagram:flow"));
    }

    #[test]
    fn failed_probe_is_unavailable() {
        let probe = |name: &str| name != "diagram:flow";
        let set = CapabilitySet::build(&decls(&["math", "diagram:flow"]), &probe);
        assert!(set.has("math"));
        assert!(!set.has("diagram:flow"));
    }

    #[test]
    fn priority_is_reported_for_available_only() {
        let declared = vec![
            CapabilityDecl::with_priority("diagram:flow", 10),
            CapabilityDecl::with_priority("diagram:inheritance", 5),
        ];
        let probe = |name: &str| name == "diagram:inheritance";
        let set = CapabilitySet::build(&declared, &probe);
        assert_eq!(set.priority("diagram:inheritance"), Some(5));
        assert_eq!(set.priority("diagram:flow"), None);
    }

    #[test]
    fn empty_set_answers_unavailable() {
        let set = CapabilitySet::empty();
        assert!(!set.has("anything"));
        assert!(set.is_empty());
    }

    #[test]
    fn available_names_are_sorted() {
        let set = CapabilitySet::build(&decls(&["math", "coverage", "source-links"]), &AlwaysAvailable);
        let names: Vec<&str> = set.available_names().collect();
        assert_eq!(names, vec!["coverage", "math", "source-links"]);
    }
}
