//! The per-build object graph.
//!
//! [`DocGraph`] owns every [`DocObject`] for one render pass. Insertion
//! enforces id uniqueness loudly (the same strictness the build applies to
//! template collisions): a duplicate id is a defect in the extraction stage
//! that must not be papered over by an arbitrary winner.
//!
//! `bases` edges are expected to form a DAG. [`DocGraph::base_cycles`]
//! reports the objects that violate this; the pipeline renders those as
//! plain concrete objects with inheritance information omitted instead of
//! failing the build.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

use crate::object::DocObject;

/// Errors raised while assembling the object graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Two objects share an id.
    #[error("duplicate object id \"{id}\"")]
    DuplicateId { id: String },
}

/// All documented objects for one build, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct DocGraph {
    objects: HashMap<String, DocObject>,
    order: Vec<String>,
}

impl DocGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        DocGraph::default()
    }

    /// Builds a graph from an iterator of objects.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateId`] on the first id collision.
    pub fn from_objects<I>(objects: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = DocObject>,
    {
        let mut graph = DocGraph::new();
        for obj in objects {
            graph.insert(obj)?;
        }
        Ok(graph)
    }

    /// Inserts an object.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateId`] if an object with the same id
    /// is already present.
    pub fn insert(&mut self, obj: DocObject) -> Result<(), GraphError> {
        if self.objects.contains_key(&obj.id) {
            return Err(GraphError::DuplicateId { id: obj.id });
        }
        self.order.push(obj.id.clone());
        self.objects.insert(obj.id.clone(), obj);
        Ok(())
    }

    /// Looks up an object by id.
    pub fn get(&self, id: &str) -> Option<&DocObject> {
        self.objects.get(id)
    }

    /// Returns `true` if an object with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of objects in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the graph holds no objects.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Object ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DocObject> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Ids of objects that are not a member of any other object.
    ///
    /// These are the top-level entries the assembler starts its walk from.
    pub fn root_ids(&self) -> Vec<&str> {
        let mut owned: HashSet<&str> = HashSet::new();
        for obj in self.iter() {
            for member in &obj.members {
                owned.insert(member.as_str());
            }
        }
        self.order
            .iter()
            .map(|s| s.as_str())
            .filter(|id| !owned.contains(id))
            .collect()
    }

    /// Ids of objects that sit on a cycle in the `bases` relation.
    ///
    /// An object is cyclic if it can reach itself by repeatedly following
    /// `bases` edges. Edges to ids not present in the graph are ignored;
    /// external bases cannot close a cycle we can observe.
    pub fn base_cycles(&self) -> BTreeSet<String> {
        let mut cyclic = BTreeSet::new();
        for start in &self.order {
            if self.reaches_self_via_bases(start) {
                cyclic.insert(start.clone());
            }
        }
        cyclic
    }

    fn reaches_self_via_bases(&self, start: &str) -> bool {
        let mut stack: Vec<&str> = match self.objects.get(start) {
            Some(obj) => obj.bases.iter().map(|s| s.as_str()).collect(),
            None => return false,
        };
        let mut seen: HashSet<&str> = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == start {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(obj) = self.objects.get(id) {
                stack.extend(obj.bases.iter().map(|s| s.as_str()));
            }
        }
        false
    }
}
